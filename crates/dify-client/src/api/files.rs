//! File upload API.

use std::future::Future;

use reqwest::header::{HeaderValue, CONTENT_TYPE};

use crate::client::DifyClient;
use crate::error::Result;
use crate::request::ApiRequest;
use crate::response::BufferedResponse;
use crate::routes;

/// Files API client.
pub struct FilesApi {
    client: DifyClient,
}

impl FilesApi {
    pub(crate) fn new(client: DifyClient) -> Self {
        Self { client }
    }

    /// Upload a file for later use as a [`FileInput`](crate::FileInput).
    ///
    /// The form is sent as-is; see [`FileUploadForm`](crate::FileUploadForm)
    /// for the expected parts.
    pub fn upload(
        &self,
        form: reqwest::multipart::Form,
    ) -> impl Future<Output = Result<BufferedResponse>> + Send + use<> {
        let request = ApiRequest::new(&routes::FILE_UPLOAD)
            .multipart(form)
            .header(CONTENT_TYPE, HeaderValue::from_static("multipart/form-data"));
        self.client.send_buffered(request)
    }
}
