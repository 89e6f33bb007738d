//! Request parameter types for the Dify API.
//!
//! Each struct documents which fields are always sent and which are omitted
//! when empty. Optional filters follow one rule: they are only sent when set
//! to a non-empty string, a non-zero number, or `true`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Error, Result};

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().is_none_or(str::is_empty)
}

fn is_zero(value: &Option<u32>) -> bool {
    value.is_none_or(|n| n == 0)
}

fn is_false(value: &Option<bool>) -> bool {
    !value.unwrap_or(false)
}

fn non_blank(value: String) -> Option<String> {
    if value.is_empty() { None } else { Some(value) }
}

// ─────────────────────────────────────────────────────────────────────────────
// Shared
// ─────────────────────────────────────────────────────────────────────────────

/// `response_mode` of streaming-capable operations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseMode {
    /// Wait for the complete answer.
    #[default]
    Blocking,
    /// Receive server-sent events as the answer is produced.
    Streaming,
}

impl ResponseMode {
    /// Mode for a streaming flag.
    pub fn from_stream(stream: bool) -> Self {
        if stream {
            ResponseMode::Streaming
        } else {
            ResponseMode::Blocking
        }
    }

    /// Whether the streaming transport must be used.
    pub fn is_streaming(self) -> bool {
        self == ResponseMode::Streaming
    }
}

/// Query carrying only the end-user identifier.
#[derive(Debug, Clone, Serialize)]
pub struct UserQuery {
    /// End-user identifier.
    pub user: String,
}

impl UserQuery {
    pub fn new(user: impl Into<String>) -> Self {
        Self { user: user.into() }
    }
}

/// Body carrying only the end-user identifier.
pub type UserBody = UserQuery;

/// How an attached file reaches the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransferMethod {
    /// Fetched by the server from a URL.
    RemoteUrl,
    /// Previously uploaded through the file upload endpoint.
    LocalFile,
}

/// A file attached to a chat message or workflow run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileInput {
    /// File kind, e.g. `image`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Transfer method.
    pub transfer_method: TransferMethod,
    /// Source URL for [`TransferMethod::RemoteUrl`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Upload id for [`TransferMethod::LocalFile`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upload_file_id: Option<String>,
}

impl FileInput {
    /// An image fetched from a URL.
    pub fn remote_image(url: impl Into<String>) -> Self {
        Self {
            kind: "image".to_string(),
            transfer_method: TransferMethod::RemoteUrl,
            url: Some(url.into()),
            upload_file_id: None,
        }
    }

    /// An image previously uploaded.
    pub fn uploaded_image(upload_file_id: impl Into<String>) -> Self {
        Self {
            kind: "image".to_string(),
            transfer_method: TransferMethod::LocalFile,
            url: None,
            upload_file_id: Some(upload_file_id.into()),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Feedback
// ─────────────────────────────────────────────────────────────────────────────

/// Message rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rating {
    Like,
    Dislike,
}

/// Feedback on a message.
///
/// `rating` is always sent; `None` is sent as `null`, which revokes an
/// earlier rating.
#[derive(Debug, Clone, Serialize)]
pub struct FeedbackRequest {
    pub rating: Option<Rating>,
    pub user: String,
}

impl FeedbackRequest {
    pub fn new(rating: Option<Rating>, user: impl Into<String>) -> Self {
        Self {
            rating,
            user: user.into(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Chat
// ─────────────────────────────────────────────────────────────────────────────

/// Request to create a chat message.
///
/// `files` is always sent (`null` when empty); `conversation_id` only when
/// non-empty.
#[derive(Debug, Clone, Serialize)]
pub struct ChatMessageRequest {
    /// App-defined input variables.
    pub inputs: Map<String, Value>,
    /// User question.
    pub query: String,
    /// End-user identifier.
    pub user: String,
    /// Blocking or streaming.
    pub response_mode: ResponseMode,
    /// Attached files.
    pub files: Option<Vec<FileInput>>,
    /// Conversation to continue.
    #[serde(skip_serializing_if = "is_blank")]
    pub conversation_id: Option<String>,
}

impl ChatMessageRequest {
    /// A blocking request with no inputs.
    pub fn new(query: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            inputs: Map::new(),
            query: query.into(),
            user: user.into(),
            response_mode: ResponseMode::Blocking,
            files: None,
            conversation_id: None,
        }
    }

    /// Select streaming or blocking mode.
    pub fn streaming(mut self, stream: bool) -> Self {
        self.response_mode = ResponseMode::from_stream(stream);
        self
    }

    /// Continue an existing conversation.
    pub fn conversation_id(mut self, id: impl Into<String>) -> Self {
        self.conversation_id = non_blank(id.into());
        self
    }

    /// Replace all input variables.
    pub fn inputs(mut self, inputs: Map<String, Value>) -> Self {
        self.inputs = inputs;
        self
    }

    /// Set one input variable.
    pub fn input(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.inputs.insert(key.into(), value.into());
        self
    }

    /// Attach files. An empty list is the same as none.
    pub fn files(mut self, files: Vec<FileInput>) -> Self {
        self.files = (!files.is_empty()).then_some(files);
        self
    }
}

/// Query for the message history of a conversation.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MessagesQuery {
    pub user: String,
    #[serde(skip_serializing_if = "is_blank")]
    pub conversation_id: Option<String>,
    #[serde(skip_serializing_if = "is_blank")]
    pub first_id: Option<String>,
    #[serde(skip_serializing_if = "is_zero")]
    pub limit: Option<u32>,
}

impl MessagesQuery {
    pub fn new(user: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            ..Default::default()
        }
    }

    pub fn conversation_id(mut self, id: impl Into<String>) -> Self {
        self.conversation_id = Some(id.into());
        self
    }

    pub fn first_id(mut self, id: impl Into<String>) -> Self {
        self.first_id = Some(id.into());
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Query for listing conversations.
///
/// `first_id` follows the same omit-when-empty rule as every other filter.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ConversationsQuery {
    pub user: String,
    #[serde(skip_serializing_if = "is_blank")]
    pub first_id: Option<String>,
    #[serde(skip_serializing_if = "is_zero")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "is_false")]
    pub pinned: Option<bool>,
}

impl ConversationsQuery {
    pub fn new(user: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            ..Default::default()
        }
    }

    pub fn first_id(mut self, id: impl Into<String>) -> Self {
        self.first_id = Some(id.into());
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn pinned(mut self, pinned: bool) -> Self {
        self.pinned = Some(pinned);
        self
    }
}

/// Request to rename a conversation.
///
/// `name` is omitted when absent; `auto_generate` is always sent.
#[derive(Debug, Clone, Serialize)]
pub struct RenameConversationRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub user: String,
    pub auto_generate: bool,
}

impl RenameConversationRequest {
    /// Rename to an explicit name.
    pub fn named(name: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            user: user.into(),
            auto_generate: false,
        }
    }

    /// Let the server generate a name.
    pub fn auto_generate(user: impl Into<String>) -> Self {
        Self {
            name: None,
            user: user.into(),
            auto_generate: true,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Workflows
// ─────────────────────────────────────────────────────────────────────────────

/// Request to run a workflow.
///
/// `files` is only sent when supplied.
#[derive(Debug, Clone, Serialize)]
pub struct WorkflowRunRequest {
    pub inputs: Map<String, Value>,
    pub user: String,
    pub response_mode: ResponseMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub files: Option<Vec<FileInput>>,
}

impl WorkflowRunRequest {
    /// A blocking run.
    pub fn new(inputs: Map<String, Value>, user: impl Into<String>) -> Self {
        Self {
            inputs,
            user: user.into(),
            response_mode: ResponseMode::Blocking,
            files: None,
        }
    }

    /// Select streaming or blocking mode.
    pub fn streaming(mut self, stream: bool) -> Self {
        self.response_mode = ResponseMode::from_stream(stream);
        self
    }

    /// Set one input variable.
    pub fn input(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.inputs.insert(key.into(), value.into());
        self
    }

    /// Attach files. An empty list is the same as none.
    pub fn files(mut self, files: Vec<FileInput>) -> Self {
        self.files = (!files.is_empty()).then_some(files);
        self
    }
}

/// Query for workflow run logs.
///
/// `page` is always sent and defaults to 1.
#[derive(Debug, Clone, Serialize)]
pub struct WorkflowLogsQuery {
    #[serde(skip_serializing_if = "is_blank")]
    pub keyword: Option<String>,
    #[serde(skip_serializing_if = "is_blank")]
    pub status: Option<String>,
    pub page: u32,
    #[serde(skip_serializing_if = "is_zero")]
    pub limit: Option<u32>,
}

impl Default for WorkflowLogsQuery {
    fn default() -> Self {
        Self {
            keyword: None,
            status: None,
            page: 1,
            limit: None,
        }
    }
}

impl WorkflowLogsQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn keyword(mut self, keyword: impl Into<String>) -> Self {
        self.keyword = Some(keyword.into());
        self
    }

    /// Filter by run status (`succeeded`, `failed`, `stopped`).
    pub fn status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Multipart forms
// ─────────────────────────────────────────────────────────────────────────────

fn file_part(
    bytes: Vec<u8>,
    file_name: String,
    mime: &str,
) -> Result<reqwest::multipart::Part> {
    reqwest::multipart::Part::bytes(bytes)
        .file_name(file_name)
        .mime_str(mime)
        .map_err(|e| Error::InvalidRequest(format!("Invalid mime type '{}': {}", mime, e)))
}

/// Form for the file upload endpoint.
#[derive(Debug, Clone)]
pub struct FileUploadForm {
    pub bytes: Vec<u8>,
    pub file_name: String,
    pub mime: String,
    pub user: String,
}

impl FileUploadForm {
    pub fn new(
        bytes: Vec<u8>,
        file_name: impl Into<String>,
        mime: impl Into<String>,
        user: impl Into<String>,
    ) -> Self {
        Self {
            bytes,
            file_name: file_name.into(),
            mime: mime.into(),
            user: user.into(),
        }
    }

    /// Encode as `file` + `user` parts.
    pub fn into_form(self) -> Result<reqwest::multipart::Form> {
        let part = file_part(self.bytes, self.file_name, &self.mime)?;
        Ok(reqwest::multipart::Form::new()
            .part("file", part)
            .text("user", self.user))
    }
}

/// Form for speech-to-text.
#[derive(Debug, Clone)]
pub struct AudioToTextForm {
    pub bytes: Vec<u8>,
    pub file_name: String,
    pub mime: String,
    pub user: String,
}

impl AudioToTextForm {
    pub fn new(
        bytes: Vec<u8>,
        file_name: impl Into<String>,
        mime: impl Into<String>,
        user: impl Into<String>,
    ) -> Self {
        Self {
            bytes,
            file_name: file_name.into(),
            mime: mime.into(),
            user: user.into(),
        }
    }

    /// Encode as `file` + `user` parts.
    pub fn into_form(self) -> Result<reqwest::multipart::Form> {
        let part = file_part(self.bytes, self.file_name, &self.mime)?;
        Ok(reqwest::multipart::Form::new()
            .part("file", part)
            .text("user", self.user))
    }
}

/// Form for text-to-speech. Either `text` or `message_id` selects the source.
#[derive(Debug, Clone, Default)]
pub struct TextToAudioForm {
    pub text: Option<String>,
    pub message_id: Option<String>,
    pub user: String,
}

impl TextToAudioForm {
    /// Speak arbitrary text.
    pub fn text(text: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            message_id: None,
            user: user.into(),
        }
    }

    /// Speak the content of an existing message.
    pub fn message(message_id: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            text: None,
            message_id: Some(message_id.into()),
            user: user.into(),
        }
    }

    /// Encode as text parts, omitting absent fields.
    pub fn into_form(self) -> reqwest::multipart::Form {
        let mut form = reqwest::multipart::Form::new().text("user", self.user);
        if let Some(text) = self.text {
            form = form.text("text", text);
        }
        if let Some(message_id) = self.message_id {
            form = form.text("message_id", message_id);
        }
        form
    }
}
