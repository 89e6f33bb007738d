//! Common test utilities for integration tests.

#![allow(dead_code)]

use std::collections::HashMap;

use dify_client::DifyClient;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

pub const API_KEY: &str = "app-test-key";

/// A mock Dify server with a client pointed at its `/v1` prefix.
pub struct TestServer {
    pub server: MockServer,
    pub client: DifyClient,
}

impl TestServer {
    pub async fn start() -> Self {
        let server = MockServer::start().await;
        let client = DifyClient::with_base_url(API_KEY, format!("{}/v1", server.uri()))
            .expect("client should build");
        Self { server, client }
    }

    /// Answer `verb path` with a JSON body.
    pub async fn mock_json(&self, verb: &str, route: &str, body: serde_json::Value) {
        Mock::given(method(verb))
            .and(path(format!("/v1{}", route)))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&self.server)
            .await;
    }

    /// Answer `verb path` with a server-sent event stream.
    pub async fn mock_sse(&self, verb: &str, route: &str, events: &[&str]) {
        let body: String = events
            .iter()
            .map(|data| format!("data: {}\n\n", data))
            .collect();
        Mock::given(method(verb))
            .and(path(format!("/v1{}", route)))
            .respond_with(
                ResponseTemplate::new(200).set_body_raw(body.into_bytes(), "text/event-stream"),
            )
            .mount(&self.server)
            .await;
    }

    /// The single request the server received.
    pub async fn only_request(&self) -> Request {
        let mut requests = self
            .server
            .received_requests()
            .await
            .expect("request recording is enabled");
        assert_eq!(requests.len(), 1, "expected exactly one request");
        requests.remove(0)
    }
}

/// Query string as a map.
pub fn query_map(request: &Request) -> HashMap<String, String> {
    request.url.query_pairs().into_owned().collect()
}

/// Header value as a string, if present.
pub fn header(request: &Request, name: &str) -> Option<String> {
    request
        .headers
        .get(name)
        .map(|v| v.to_str().expect("ascii header").to_string())
}

/// Body parsed as JSON.
pub fn json_body(request: &Request) -> serde_json::Value {
    serde_json::from_slice(&request.body).expect("JSON body")
}
