//! Per-call request descriptor consumed by the dispatcher.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Method;
use serde::Serialize;

use crate::error::{Error, Result};
use crate::routes::Route;

/// Outgoing request body.
pub enum RequestBody {
    /// JSON document.
    Json(serde_json::Value),
    /// Pre-encoded multipart form, passed through untouched.
    Multipart(reqwest::multipart::Form),
}

impl std::fmt::Debug for RequestBody {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RequestBody::Json(value) => f.debug_tuple("Json").field(value).finish(),
            RequestBody::Multipart(form) => f
                .debug_struct("Multipart")
                .field("boundary", &form.boundary())
                .finish(),
        }
    }
}

/// A fully resolved request, built fresh for each call.
#[derive(Debug)]
pub struct ApiRequest {
    pub(crate) method: Method,
    pub(crate) path: String,
    pub(crate) body: Option<RequestBody>,
    pub(crate) query: Vec<(String, String)>,
    pub(crate) stream: bool,
    pub(crate) headers: HeaderMap,
}

impl ApiRequest {
    /// Start a request for a parameterless route.
    pub fn new(route: &Route) -> Self {
        Self::raw(route.method.clone(), route.path())
    }

    /// Start a request for a route with a path parameter.
    pub fn with_param(route: &Route, id: &str) -> Self {
        Self::raw(route.method.clone(), route.path_with(id))
    }

    /// Start a request from an explicit method and path.
    ///
    /// The path is appended to the base URL verbatim and should start with `/`.
    pub fn raw(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
            query: Vec::new(),
            stream: false,
            headers: HeaderMap::new(),
        }
    }

    /// Attach a JSON body.
    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self> {
        self.body = Some(RequestBody::Json(serde_json::to_value(body)?));
        Ok(self)
    }

    /// Attach a multipart form body.
    pub fn multipart(mut self, form: reqwest::multipart::Form) -> Self {
        self.body = Some(RequestBody::Multipart(form));
        self
    }

    /// Attach query parameters from a serializable struct or map.
    ///
    /// Top-level fields become `key=value` pairs, sorted by key. Null fields
    /// are skipped.
    pub fn query<Q: Serialize + ?Sized>(mut self, params: &Q) -> Result<Self> {
        self.query = query_pairs(&serde_json::to_value(params)?)?;
        Ok(self)
    }

    /// Select the streaming transport.
    pub fn stream(mut self, stream: bool) -> Self {
        self.stream = stream;
        self
    }

    /// Override a default header.
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// HTTP method.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Resolved path, relative to the base URL.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Body, if any.
    pub fn body(&self) -> Option<&RequestBody> {
        self.body.as_ref()
    }

    /// Query pairs, sorted by key.
    pub fn query_pairs(&self) -> &[(String, String)] {
        &self.query
    }

    /// Whether the streaming transport is selected.
    pub fn is_stream(&self) -> bool {
        self.stream
    }

    /// Header overrides.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }
}

fn query_pairs(value: &serde_json::Value) -> Result<Vec<(String, String)>> {
    use serde_json::Value;

    let map = match value {
        Value::Object(map) => map,
        Value::Null => return Ok(Vec::new()),
        other => {
            return Err(Error::InvalidRequest(format!(
                "query parameters must serialize to an object, got {}",
                other
            )));
        }
    };

    let mut pairs = Vec::with_capacity(map.len());
    for (key, value) in map {
        let rendered = match value {
            Value::Null => continue,
            Value::String(s) => s.clone(),
            Value::Bool(_) | Value::Number(_) => value.to_string(),
            Value::Array(_) | Value::Object(_) => {
                return Err(Error::InvalidRequest(format!(
                    "query parameter '{}' is not a scalar",
                    key
                )));
            }
        };
        pairs.push((key.clone(), rendered));
    }
    Ok(pairs)
}
