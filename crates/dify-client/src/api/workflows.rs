//! Workflows API.

use std::future::Future;

use crate::client::DifyClient;
use crate::error::Result;
use crate::request::ApiRequest;
use crate::response::{BufferedResponse, DifyResponse};
use crate::routes;
use crate::types::{UserBody, WorkflowLogsQuery, WorkflowRunRequest};

/// Workflows API client.
pub struct WorkflowsApi {
    client: DifyClient,
}

impl WorkflowsApi {
    pub(crate) fn new(client: DifyClient) -> Self {
        Self { client }
    }

    /// Run the app's workflow.
    ///
    /// Streams when the request's `response_mode` is streaming.
    pub fn run(
        &self,
        request: WorkflowRunRequest,
    ) -> impl Future<Output = Result<DifyResponse>> + Send + use<> {
        let stream = request.response_mode.is_streaming();
        let request = ApiRequest::new(&routes::RUN_WORKFLOW)
            .json(&request)
            .map(|r| r.stream(stream));
        self.client.dispatch(request)
    }

    /// Get the state of a workflow run.
    pub fn status(
        &self,
        workflow_run_id: &str,
    ) -> impl Future<Output = Result<BufferedResponse>> + Send + use<> {
        self.client
            .send_buffered(ApiRequest::with_param(&routes::CHECK_WORKFLOW, workflow_run_id))
    }

    /// Stop a streaming workflow task.
    pub fn stop(
        &self,
        task_id: &str,
        user: &str,
    ) -> impl Future<Output = Result<BufferedResponse>> + Send + use<> {
        let request =
            ApiRequest::with_param(&routes::STOP_WORKFLOW, task_id).json(&UserBody::new(user));
        self.client.dispatch_buffered(request)
    }

    /// List workflow run logs.
    pub fn logs(
        &self,
        query: WorkflowLogsQuery,
    ) -> impl Future<Output = Result<BufferedResponse>> + Send + use<> {
        let request = ApiRequest::new(&routes::WORKFLOW_LOGS).query(&query);
        self.client.dispatch_buffered(request)
    }
}
