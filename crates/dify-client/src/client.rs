//! Main client implementation.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Method;
use url::Url;

use crate::api::{AppApi, AudioApi, ChatApi, FilesApi, WorkflowsApi};
use crate::error::{Error, Result};
use crate::request::{ApiRequest, RequestBody};
use crate::response::{BufferedResponse, DifyResponse, ResponseStream};

/// Default API base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.dify.ai/v1";

/// Dify API client.
///
/// Cheap to clone; clones share the HTTP connection pool and the credential,
/// so [`update_api_key`](Self::update_api_key) on one is seen by all.
///
/// # Example
///
/// ```no_run
/// use dify_client::{ChatMessageRequest, DifyClient};
///
/// # async fn example() -> dify_client::Result<()> {
/// let client = DifyClient::new("app-secret")?;
///
/// let response = client
///     .chat()
///     .create_message(ChatMessageRequest::new("hello", "user-1"))
///     .await?
///     .into_buffered()?;
/// println!("{}", response.body()["answer"]);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct DifyClient {
    /// Inner shared state.
    inner: Arc<ClientInner>,
}

/// Inner client state (shared across clones).
struct ClientInner {
    /// HTTP client.
    http: reqwest::Client,
    /// Base URL, kept exactly as configured.
    base_url: String,
    /// Bearer credential.
    api_key: RwLock<String>,
}

impl std::fmt::Debug for DifyClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DifyClient")
            .field("base_url", &self.inner.base_url)
            .finish_non_exhaustive()
    }
}

impl DifyClient {
    /// Create a new client builder.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Create a client for the public API host.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::builder().api_key(api_key).build()
    }

    /// Create a client for a self-hosted instance.
    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Result<Self> {
        Self::builder().api_key(api_key).base_url(base_url).build()
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    /// Current credential.
    pub fn api_key(&self) -> String {
        self.inner.api_key.read().clone()
    }

    /// Replace the credential.
    ///
    /// Requests built after this call use the new key. Requests already
    /// built keep the header they captured.
    pub fn update_api_key(&self, api_key: impl Into<String>) {
        *self.inner.api_key.write() = api_key.into();
    }

    // ─────────────────────────────────────────────────────────────────────────
    // API accessors
    // ─────────────────────────────────────────────────────────────────────────

    /// Access operations shared by every app type.
    pub fn app(&self) -> AppApi {
        AppApi::new(self.clone())
    }

    /// Access the file upload API.
    pub fn files(&self) -> FilesApi {
        FilesApi::new(self.clone())
    }

    /// Access the speech API.
    pub fn audio(&self) -> AudioApi {
        AudioApi::new(self.clone())
    }

    /// Access the chat API.
    pub fn chat(&self) -> ChatApi {
        ChatApi::new(self.clone())
    }

    /// Access the workflows API.
    pub fn workflows(&self) -> WorkflowsApi {
        WorkflowsApi::new(self.clone())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Dispatcher
    // ─────────────────────────────────────────────────────────────────────────

    /// Issue exactly one HTTP request and return its response.
    ///
    /// Defaults are `Authorization: Bearer <key>` and
    /// `Content-Type: application/json`; the request's header overrides
    /// replace them key by key. GET requests never carry a body. Non-2xx
    /// statuses are returned as [`Error::Api`] with the raw body; nothing is
    /// retried.
    ///
    /// Headers are resolved when this is called, not when the returned
    /// future is first polled: a later [`update_api_key`](Self::update_api_key)
    /// does not affect a call already made.
    pub fn send_request(
        &self,
        request: ApiRequest,
    ) -> impl Future<Output = Result<DifyResponse>> + Send + use<> {
        let prepared = self.prepare(request);
        async move { prepared?.send().await }
    }

    /// Dispatch a non-streaming request.
    pub(crate) fn send_buffered(
        &self,
        request: ApiRequest,
    ) -> impl Future<Output = Result<BufferedResponse>> + Send + use<> {
        let pending = self.send_request(request.stream(false));
        async move { pending.await?.into_buffered() }
    }

    /// Dispatch a request whose construction may have failed.
    pub(crate) fn dispatch(
        &self,
        request: Result<ApiRequest>,
    ) -> impl Future<Output = Result<DifyResponse>> + Send + use<> {
        let pending = request.map(|request| self.send_request(request));
        async move { pending?.await }
    }

    /// Buffered counterpart of [`dispatch`](Self::dispatch).
    pub(crate) fn dispatch_buffered(
        &self,
        request: Result<ApiRequest>,
    ) -> impl Future<Output = Result<BufferedResponse>> + Send + use<> {
        let pending = request.map(|request| self.send_buffered(request));
        async move { pending?.await }
    }

    /// Resolve headers, URL and body for one call.
    fn prepare(&self, request: ApiRequest) -> Result<Prepared> {
        let ApiRequest {
            method,
            path,
            body,
            query,
            stream,
            headers: overrides,
        } = request;

        let mut headers = self.default_headers()?;
        for (name, value) in overrides.iter() {
            headers.insert(name.clone(), value.clone());
        }

        let body = if method == Method::GET { None } else { body };

        Ok(Prepared {
            http: self.inner.http.clone(),
            url: format!("{}{}", self.inner.base_url, path),
            method,
            headers,
            query,
            body,
            stream,
        })
    }

    /// Default headers, with the credential read once.
    fn default_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        let auth = HeaderValue::from_str(&format!("Bearer {}", self.inner.api_key.read()))
            .map_err(|_| Error::InvalidHeader("API key is not a valid header value".to_string()))?;
        headers.insert(AUTHORIZATION, auth);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Ok(headers)
    }
}

/// A request with its headers already resolved.
struct Prepared {
    http: reqwest::Client,
    method: Method,
    url: String,
    headers: HeaderMap,
    query: Vec<(String, String)>,
    body: Option<RequestBody>,
    stream: bool,
}

impl Prepared {
    async fn send(self) -> Result<DifyResponse> {
        let Prepared {
            http,
            method,
            url,
            mut headers,
            query,
            body,
            stream,
        } = self;

        tracing::debug!(%method, %url, stream, "Sending request");

        let mut builder = http.request(method, &url);
        if !query.is_empty() {
            builder = builder.query(&query);
        }
        builder = match body {
            Some(RequestBody::Json(value)) => builder.headers(headers).json(&value),
            Some(RequestBody::Multipart(form)) => {
                // The form encoder supplies the content type with its boundary.
                headers.remove(CONTENT_TYPE);
                builder.headers(headers).multipart(form)
            }
            None => builder.headers(headers),
        };

        let response = builder.send().await?;
        let status = response.status();
        tracing::debug!(%url, status = status.as_u16(), "Received response");

        if !status.is_success() {
            let body = response.text().await?;
            return Err(Error::Api {
                status: status.as_u16(),
                body,
            });
        }

        if stream {
            return Ok(DifyResponse::Streaming(ResponseStream::new(response)));
        }

        let headers = response.headers().clone();
        let body = response.json::<serde_json::Value>().await?;
        Ok(DifyResponse::Buffered(BufferedResponse::new(
            status, headers, body,
        )))
    }
}

/// Builder for creating a DifyClient.
#[derive(Debug)]
pub struct ClientBuilder {
    base_url: Option<String>,
    api_key: Option<String>,
    timeout: Option<Duration>,
    user_agent: Option<String>,
}

impl ClientBuilder {
    /// Create a new builder with defaults.
    pub fn new() -> Self {
        Self {
            base_url: None,
            api_key: None,
            timeout: None,
            user_agent: None,
        }
    }

    /// Set the base URL, including the `/v1` prefix.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the API key.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Set a request timeout. Unset means the transport default.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set a custom user agent.
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<DifyClient> {
        let api_key = self
            .api_key
            .ok_or_else(|| Error::Config("api_key is required".to_string()))?;

        // Validated, but stored verbatim: paths are appended without normalization.
        let base_url = self
            .base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        Url::parse(&base_url)?;

        let user_agent = self
            .user_agent
            .unwrap_or_else(|| format!("dify-client/{}", env!("CARGO_PKG_VERSION")));

        let mut http = reqwest::Client::builder().user_agent(user_agent);
        if let Some(timeout) = self.timeout {
            http = http.timeout(timeout);
        }

        Ok(DifyClient {
            inner: Arc::new(ClientInner {
                http: http.build()?,
                base_url,
                api_key: RwLock::new(api_key),
            }),
        })
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_requires_api_key() {
        let result = ClientBuilder::new().build();
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_builder_default_base_url() {
        let client = DifyClient::new("key").unwrap();
        assert_eq!(client.base_url(), DEFAULT_BASE_URL);
    }

    #[test]
    fn test_builder_keeps_base_url_verbatim() {
        let client = DifyClient::with_base_url("key", "http://localhost:5001/v1/").unwrap();
        assert_eq!(client.base_url(), "http://localhost:5001/v1/");
    }

    #[test]
    fn test_builder_rejects_invalid_url() {
        let result = DifyClient::with_base_url("key", "not a url");
        assert!(matches!(result, Err(Error::InvalidUrl(_))));
    }

    #[test]
    fn test_update_api_key_is_shared_by_clones() {
        let client = DifyClient::new("old").unwrap();
        let clone = client.clone();
        clone.update_api_key("new");
        assert_eq!(client.api_key(), "new");
    }

    #[test]
    fn test_default_headers() {
        let client = DifyClient::new("secret").unwrap();
        let headers = client.default_headers().unwrap();
        assert_eq!(headers[AUTHORIZATION], "Bearer secret");
        assert_eq!(headers[CONTENT_TYPE], "application/json");
    }

    #[test]
    fn test_invalid_api_key_header() {
        let client = DifyClient::new("bad\nkey").unwrap();
        assert!(matches!(
            client.default_headers(),
            Err(Error::InvalidHeader(_))
        ));
    }
}
