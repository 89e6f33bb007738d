//! Response envelope returned by the dispatcher.
//!
//! Payloads are never inspected or transformed here. A buffered response
//! holds the parsed JSON document as-is; a streaming response holds the live
//! HTTP response and yields chunks as the server produces them.

use bytes::Bytes;
use eventsource_stream::Eventsource;
use futures::{Stream, StreamExt};
use reqwest::header::HeaderMap;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;

use crate::error::{Error, Result};

/// Result of a dispatched request.
#[derive(Debug)]
pub enum DifyResponse {
    /// Fully read and parsed JSON response.
    Buffered(BufferedResponse),
    /// Live response delivered incrementally.
    Streaming(ResponseStream),
}

impl DifyResponse {
    /// HTTP status code.
    pub fn status(&self) -> StatusCode {
        match self {
            DifyResponse::Buffered(r) => r.status(),
            DifyResponse::Streaming(s) => s.status(),
        }
    }

    /// Whether this is a streaming response.
    pub fn is_streaming(&self) -> bool {
        matches!(self, DifyResponse::Streaming(_))
    }

    /// Unwrap the buffered variant.
    pub fn into_buffered(self) -> Result<BufferedResponse> {
        match self {
            DifyResponse::Buffered(r) => Ok(r),
            DifyResponse::Streaming(_) => Err(Error::Stream(
                "expected a buffered response, got a stream".to_string(),
            )),
        }
    }

    /// Unwrap the streaming variant.
    pub fn into_stream(self) -> Result<ResponseStream> {
        match self {
            DifyResponse::Streaming(s) => Ok(s),
            DifyResponse::Buffered(_) => Err(Error::Stream(
                "expected a stream, got a buffered response".to_string(),
            )),
        }
    }
}

/// A fully buffered JSON response.
#[derive(Debug, Clone)]
pub struct BufferedResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: serde_json::Value,
}

impl BufferedResponse {
    pub(crate) fn new(status: StatusCode, headers: HeaderMap, body: serde_json::Value) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// HTTP status code.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Response headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Parsed body.
    pub fn body(&self) -> &serde_json::Value {
        &self.body
    }

    /// Take ownership of the parsed body.
    pub fn into_body(self) -> serde_json::Value {
        self.body
    }

    /// Deserialize the body into a caller-chosen type.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(T::deserialize(&self.body)?)
    }
}

/// A live response stream.
///
/// Consume it with [`bytes`](Self::bytes) for raw chunks (audio, arbitrary
/// payloads) or [`events`](Self::events) for server-sent events.
#[derive(Debug)]
pub struct ResponseStream {
    response: reqwest::Response,
}

impl ResponseStream {
    pub(crate) fn new(response: reqwest::Response) -> Self {
        Self { response }
    }

    /// HTTP status code.
    pub fn status(&self) -> StatusCode {
        self.response.status()
    }

    /// Response headers.
    pub fn headers(&self) -> &HeaderMap {
        self.response.headers()
    }

    /// Raw body chunks as they arrive.
    pub fn bytes(self) -> impl Stream<Item = Result<Bytes>> {
        self.response
            .bytes_stream()
            .map(|chunk| chunk.map_err(Error::Http))
    }

    /// Server-sent events as they arrive.
    ///
    /// Frames with empty data (keep-alives, comments) are skipped.
    pub fn events(self) -> impl Stream<Item = Result<StreamEvent>> {
        self.response
            .bytes_stream()
            .eventsource()
            .filter_map(|result| async move {
                match result {
                    Ok(event) => {
                        if event.data.is_empty() {
                            return None;
                        }
                        Some(Ok(StreamEvent {
                            event: event.event,
                            data: event.data,
                            id: event.id,
                        }))
                    }
                    Err(e) => Some(Err(Error::Stream(e.to_string()))),
                }
            })
    }
}

/// One server-sent event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamEvent {
    /// Event type (`message` when the server sends none).
    pub event: String,
    /// Event payload.
    pub data: String,
    /// Last event id.
    pub id: String,
}

impl StreamEvent {
    /// Parse the payload as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        match serde_json::from_str(&self.data) {
            Ok(value) => Ok(value),
            Err(e) => {
                tracing::warn!(data = %self.data, error = %e, "Failed to parse stream event");
                Err(Error::Json(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_buffered_accessors() {
        let resp = BufferedResponse::new(
            StatusCode::OK,
            HeaderMap::new(),
            json!({"result": "success"}),
        );
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.body()["result"], "success");

        #[derive(serde::Deserialize)]
        struct Outcome {
            result: String,
        }
        let outcome: Outcome = resp.json().unwrap();
        assert_eq!(outcome.result, "success");
    }

    #[test]
    fn test_variant_unwrapping() {
        let resp = DifyResponse::Buffered(BufferedResponse::new(
            StatusCode::CREATED,
            HeaderMap::new(),
            json!(null),
        ));
        assert!(!resp.is_streaming());
        assert_eq!(resp.status(), StatusCode::CREATED);
        assert!(resp.into_stream().is_err());
    }

    #[test]
    fn test_event_json() {
        let event = StreamEvent {
            event: "message".to_string(),
            data: r#"{"event":"message","answer":"Hi"}"#.to_string(),
            id: String::new(),
        };
        let value: serde_json::Value = event.json().unwrap();
        assert_eq!(value["answer"], "Hi");

        let bad = StreamEvent {
            data: "not json".to_string(),
            ..event
        };
        assert!(matches!(bad.json::<serde_json::Value>(), Err(Error::Json(_))));
    }
}
