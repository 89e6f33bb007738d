//! Speech API.

use std::future::Future;

use reqwest::header::{HeaderValue, CONTENT_TYPE};

use crate::client::DifyClient;
use crate::error::Result;
use crate::request::ApiRequest;
use crate::response::{BufferedResponse, ResponseStream};
use crate::routes;

/// Audio API client.
pub struct AudioApi {
    client: DifyClient,
}

impl AudioApi {
    pub(crate) fn new(client: DifyClient) -> Self {
        Self { client }
    }

    fn multipart(route: &routes::Route, form: reqwest::multipart::Form) -> ApiRequest {
        ApiRequest::new(route)
            .multipart(form)
            .header(CONTENT_TYPE, HeaderValue::from_static("multipart/form-data"))
    }

    /// Transcribe an audio file.
    pub fn audio_to_text(
        &self,
        form: reqwest::multipart::Form,
    ) -> impl Future<Output = Result<BufferedResponse>> + Send + use<> {
        self.client
            .send_buffered(Self::multipart(&routes::AUDIO_TO_TEXT, form))
    }

    /// Synthesize speech, expecting a JSON response.
    pub fn text_to_audio(
        &self,
        form: reqwest::multipart::Form,
    ) -> impl Future<Output = Result<BufferedResponse>> + Send + use<> {
        self.client
            .send_buffered(Self::multipart(&routes::TEXT_TO_AUDIO, form))
    }

    /// Synthesize speech and receive the raw audio as it is produced.
    pub fn text_to_audio_stream(
        &self,
        form: reqwest::multipart::Form,
    ) -> impl Future<Output = Result<ResponseStream>> + Send + use<> {
        let pending = self
            .client
            .send_request(Self::multipart(&routes::TEXT_TO_AUDIO, form).stream(true));
        async move { pending.await?.into_stream() }
    }
}
