//! Operations available to every app type.

use std::future::Future;

use crate::client::DifyClient;
use crate::error::Result;
use crate::request::ApiRequest;
use crate::response::BufferedResponse;
use crate::routes;
use crate::types::{FeedbackRequest, UserQuery};

/// App API client.
pub struct AppApi {
    client: DifyClient,
}

impl AppApi {
    pub(crate) fn new(client: DifyClient) -> Self {
        Self { client }
    }

    /// Get the app's input form and feature configuration.
    pub fn parameters(
        &self,
        user: &str,
    ) -> impl Future<Output = Result<BufferedResponse>> + Send + use<> {
        let request =
            ApiRequest::new(&routes::APPLICATION_PARAMETERS).query(&UserQuery::new(user));
        self.client.dispatch_buffered(request)
    }

    /// Get the app's name, description and tags.
    pub fn info(&self, user: &str) -> impl Future<Output = Result<BufferedResponse>> + Send + use<> {
        let request = ApiRequest::new(&routes::INFO).query(&UserQuery::new(user));
        self.client.dispatch_buffered(request)
    }

    /// Get app metadata such as tool icons.
    pub fn meta(&self, user: &str) -> impl Future<Output = Result<BufferedResponse>> + Send + use<> {
        let request = ApiRequest::new(&routes::META).query(&UserQuery::new(user));
        self.client.dispatch_buffered(request)
    }

    /// Rate a message, or revoke a rating with `rating: None`.
    pub fn message_feedback(
        &self,
        message_id: &str,
        feedback: FeedbackRequest,
    ) -> impl Future<Output = Result<BufferedResponse>> + Send + use<> {
        let request = ApiRequest::with_param(&routes::MESSAGE_FEEDBACK, message_id).json(&feedback);
        self.client.dispatch_buffered(request)
    }
}
