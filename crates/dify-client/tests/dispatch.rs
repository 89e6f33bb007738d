//! Integration tests for the request dispatcher.

mod common;

use common::{header, json_body, query_map, TestServer, API_KEY};
use dify_client::{ApiRequest, ChatMessageRequest, DifyResponse, Error};
use futures::StreamExt;
use reqwest::header::{HeaderValue, CONTENT_TYPE};
use reqwest::Method;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn test_default_headers() {
    let ts = TestServer::start().await;
    ts.mock_json("GET", "/info", json!({"name": "app"})).await;

    let response = ts
        .client
        .send_request(ApiRequest::raw(Method::GET, "/info"))
        .await
        .unwrap();
    assert!(!response.is_streaming());

    let request = ts.only_request().await;
    assert_eq!(
        header(&request, "authorization").as_deref(),
        Some(format!("Bearer {}", API_KEY).as_str())
    );
    assert_eq!(
        header(&request, "content-type").as_deref(),
        Some("application/json")
    );
}

#[tokio::test]
async fn test_get_never_sends_body() {
    let ts = TestServer::start().await;
    ts.mock_json("GET", "/meta", json!({})).await;

    let request = ApiRequest::raw(Method::GET, "/meta")
        .json(&json!({"should": "vanish"}))
        .unwrap()
        .query(&json!({"user": "user-1"}))
        .unwrap();
    ts.client.send_request(request).await.unwrap();

    let received = ts.only_request().await;
    assert!(received.body.is_empty());
    assert_eq!(query_map(&received)["user"], "user-1");
}

#[tokio::test]
async fn test_get_never_sends_body_when_streaming() {
    let ts = TestServer::start().await;
    ts.mock_sse("GET", "/meta", &[r#"{"n":1}"#]).await;

    let request = ApiRequest::raw(Method::GET, "/meta")
        .json(&json!({"should": "vanish"}))
        .unwrap()
        .stream(true);
    let response = ts.client.send_request(request).await.unwrap();
    assert!(response.is_streaming());

    assert!(ts.only_request().await.body.is_empty());
}

#[tokio::test]
async fn test_non_get_sends_body() {
    let ts = TestServer::start().await;
    ts.mock_json("DELETE", "/things/1", json!({"result": "success"}))
        .await;

    let request = ApiRequest::raw(Method::DELETE, "/things/1")
        .json(&json!({"user": "u"}))
        .unwrap();
    let response = ts.client.send_request(request).await.unwrap();
    let buffered = response.into_buffered().unwrap();
    assert_eq!(buffered.status(), 200);
    assert_eq!(buffered.body(), &json!({"result": "success"}));

    assert_eq!(json_body(&ts.only_request().await), json!({"user": "u"}));
}

#[tokio::test]
async fn test_header_override_replaces_default() {
    let ts = TestServer::start().await;
    ts.mock_json("POST", "/echo", json!({})).await;

    let request = ApiRequest::raw(Method::POST, "/echo")
        .json(&json!({}))
        .unwrap()
        .header(CONTENT_TYPE, HeaderValue::from_static("application/vnd.test+json"));
    ts.client.send_request(request).await.unwrap();

    let received = ts.only_request().await;
    let values: Vec<_> = received.headers.get_all("content-type").iter().collect();
    assert_eq!(values.len(), 1);
    assert_eq!(values[0], "application/vnd.test+json");
}

#[tokio::test]
async fn test_updated_key_used_by_later_requests() {
    let ts = TestServer::start().await;
    ts.mock_json("GET", "/info", json!({})).await;

    let clone = ts.client.clone();
    clone.update_api_key("rotated");
    ts.client
        .send_request(ApiRequest::raw(Method::GET, "/info"))
        .await
        .unwrap();

    assert_eq!(
        header(&ts.only_request().await, "authorization").as_deref(),
        Some("Bearer rotated")
    );
}

#[tokio::test]
async fn test_pending_call_keeps_key_from_call_time() {
    let ts = TestServer::start().await;
    ts.mock_json("POST", "/chat-messages", json!({"answer": "hi"})).await;

    let chat = ts.client.chat();
    let pending = chat.create_message(ChatMessageRequest::new("hello", "user-1"));
    ts.client.update_api_key("rotated");
    pending.await.unwrap();

    assert_eq!(
        header(&ts.only_request().await, "authorization").as_deref(),
        Some(format!("Bearer {}", API_KEY).as_str())
    );
}

#[tokio::test]
async fn test_pending_dispatch_keeps_key_from_call_time() {
    let ts = TestServer::start().await;
    ts.mock_json("GET", "/info", json!({})).await;

    let first = ts
        .client
        .send_request(ApiRequest::raw(Method::GET, "/info"));
    ts.client.update_api_key("rotated");
    let second = ts
        .client
        .send_request(ApiRequest::raw(Method::GET, "/info"));

    first.await.unwrap();
    second.await.unwrap();

    let requests = ts.server.received_requests().await.unwrap();
    let keys: Vec<_> = requests
        .iter()
        .map(|r| header(r, "authorization").unwrap())
        .collect();
    assert_eq!(
        keys,
        [format!("Bearer {}", API_KEY), "Bearer rotated".to_string()]
    );
}

#[tokio::test]
async fn test_error_status_passes_through() {
    let ts = TestServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/info"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_string(r#"{"code":"unauthorized","message":"bad key"}"#),
        )
        .mount(&ts.server)
        .await;

    let err = ts
        .client
        .send_request(ApiRequest::raw(Method::GET, "/info"))
        .await
        .unwrap_err();
    match &err {
        Error::Api { status, body } => {
            assert_eq!(*status, 401);
            assert!(body.contains("bad key"));
        }
        other => panic!("expected API error, got {:?}", other),
    }
    assert!(err.is_auth_error());
}

#[tokio::test]
async fn test_malformed_json_is_a_transport_error() {
    let ts = TestServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/info"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&ts.server)
        .await;

    let err = ts
        .client
        .send_request(ApiRequest::raw(Method::GET, "/info"))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Http(_)));
}

#[tokio::test]
async fn test_connection_failure_is_a_transport_error() {
    let client = dify_client::DifyClient::with_base_url("k", "http://127.0.0.1:9/v1").unwrap();
    let err = client
        .send_request(ApiRequest::raw(Method::GET, "/info"))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Http(_)));
}

#[tokio::test]
async fn test_exactly_one_request_per_call() {
    let ts = TestServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/fail"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&ts.server)
        .await;

    let result = ts
        .client
        .send_request(ApiRequest::raw(Method::POST, "/fail"))
        .await;
    assert!(result.unwrap_err().is_server_error());
}

#[tokio::test]
async fn test_streaming_yields_events() {
    let ts = TestServer::start().await;
    ts.mock_sse(
        "POST",
        "/stream",
        &[r#"{"event":"message","answer":"Hel"}"#, r#"{"event":"message","answer":"lo"}"#],
    )
    .await;

    let response = ts
        .client
        .send_request(ApiRequest::raw(Method::POST, "/stream").stream(true))
        .await
        .unwrap();
    let stream = match response {
        DifyResponse::Streaming(stream) => stream,
        DifyResponse::Buffered(_) => panic!("expected a stream"),
    };
    assert_eq!(stream.status(), 200);

    let events: Vec<_> = stream.events().collect().await;
    assert_eq!(events.len(), 2);
    let answer: String = events
        .into_iter()
        .map(|e| {
            let value: serde_json::Value = e.unwrap().json().unwrap();
            value["answer"].as_str().unwrap().to_string()
        })
        .collect();
    assert_eq!(answer, "Hello");
}

#[tokio::test]
async fn test_streaming_raw_bytes() {
    let ts = TestServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/audio"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(vec![1u8, 2, 3, 4], "audio/mpeg"))
        .mount(&ts.server)
        .await;

    let stream = ts
        .client
        .send_request(ApiRequest::raw(Method::POST, "/audio").stream(true))
        .await
        .unwrap()
        .into_stream()
        .unwrap();
    assert_eq!(stream.headers()["content-type"], "audio/mpeg");

    let mut collected = Vec::new();
    let bytes = stream.bytes();
    futures::pin_mut!(bytes);
    while let Some(chunk) = bytes.next().await {
        collected.extend_from_slice(&chunk.unwrap());
    }
    assert_eq!(collected, vec![1, 2, 3, 4]);
}
