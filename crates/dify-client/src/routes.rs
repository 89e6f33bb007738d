//! Route table for the Dify API.
//!
//! Each logical operation maps to exactly one fixed HTTP method and a path
//! template with at most one `{id}` placeholder. Paths are relative to the
//! client's base URL (which already carries the `/v1` prefix).

use reqwest::Method;

/// Placeholder substituted by [`Route::path_with`].
const PARAM: &str = "{id}";

/// A fixed (method, path template) pair for one logical operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    /// Operation name, used in logs.
    pub name: &'static str,
    /// HTTP method. Never decided at call time.
    pub method: Method,
    /// Path template, with a leading slash.
    pub template: &'static str,
}

impl Route {
    const fn new(name: &'static str, method: Method, template: &'static str) -> Self {
        Self {
            name,
            method,
            template,
        }
    }

    /// Whether the template carries a path parameter.
    pub fn has_param(&self) -> bool {
        self.template.contains(PARAM)
    }

    /// Render a parameterless template.
    pub fn path(&self) -> String {
        self.template.to_string()
    }

    /// Render the template with its path parameter.
    ///
    /// The identifier is percent-encoded so ids containing `/`, `?` or spaces
    /// cannot escape their path segment.
    pub fn path_with(&self, id: &str) -> String {
        self.template.replace(PARAM, &urlencoding::encode(id))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Shared
// ─────────────────────────────────────────────────────────────────────────────

pub const APPLICATION_PARAMETERS: Route =
    Route::new("application_parameters", Method::GET, "/parameters");
pub const MESSAGE_FEEDBACK: Route =
    Route::new("message_feedback", Method::POST, "/messages/{id}/feedbacks");
pub const FILE_UPLOAD: Route = Route::new("file_upload", Method::POST, "/files/upload");
pub const META: Route = Route::new("meta", Method::GET, "/meta");
pub const INFO: Route = Route::new("info", Method::GET, "/info");
pub const AUDIO_TO_TEXT: Route = Route::new("audio_to_text", Method::POST, "/audio-to-text");
pub const TEXT_TO_AUDIO: Route = Route::new("text_to_audio", Method::POST, "/text-to-audio");

// ─────────────────────────────────────────────────────────────────────────────
// Chat
// ─────────────────────────────────────────────────────────────────────────────

pub const CREATE_CHAT_MESSAGE: Route =
    Route::new("create_chat_message", Method::POST, "/chat-messages");
pub const CONVERSATION_MESSAGES: Route =
    Route::new("conversation_messages", Method::GET, "/messages");
pub const CONVERSATIONS: Route = Route::new("conversations", Method::GET, "/conversations");
pub const RENAME_CONVERSATION: Route = Route::new(
    "rename_conversation",
    Method::POST,
    "/conversations/{id}/name",
);
pub const DELETE_CONVERSATION: Route =
    Route::new("delete_conversation", Method::DELETE, "/conversations/{id}");
pub const SUGGESTED: Route = Route::new("suggested", Method::GET, "/messages/{id}/suggested");
pub const STOP_CHAT: Route = Route::new("stop_chat", Method::POST, "/chat-messages/{id}/stop");

// ─────────────────────────────────────────────────────────────────────────────
// Workflows
// ─────────────────────────────────────────────────────────────────────────────

pub const RUN_WORKFLOW: Route = Route::new("run_workflow", Method::POST, "/workflows/run");
pub const CHECK_WORKFLOW: Route =
    Route::new("check_workflow", Method::GET, "/workflows/run/{id}");
pub const STOP_WORKFLOW: Route =
    Route::new("stop_workflow", Method::POST, "/workflows/tasks/{id}/stop");
pub const WORKFLOW_LOGS: Route = Route::new("workflow_logs", Method::GET, "/workflows/logs");

/// Every route, in table order.
pub const ALL: &[Route] = &[
    APPLICATION_PARAMETERS,
    MESSAGE_FEEDBACK,
    CREATE_CHAT_MESSAGE,
    CONVERSATION_MESSAGES,
    CONVERSATIONS,
    RENAME_CONVERSATION,
    DELETE_CONVERSATION,
    FILE_UPLOAD,
    META,
    INFO,
    AUDIO_TO_TEXT,
    TEXT_TO_AUDIO,
    SUGGESTED,
    STOP_CHAT,
    RUN_WORKFLOW,
    CHECK_WORKFLOW,
    STOP_WORKFLOW,
    WORKFLOW_LOGS,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_is_complete() {
        assert_eq!(ALL.len(), 18);
        let mut names: Vec<_> = ALL.iter().map(|r| r.name).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), 18);
    }

    #[test]
    fn test_at_most_one_param() {
        for route in ALL {
            assert!(route.template.starts_with('/'), "{}", route.name);
            assert!(route.template.matches(PARAM).count() <= 1, "{}", route.name);
        }
    }

    #[test]
    fn test_methods() {
        assert_eq!(APPLICATION_PARAMETERS.method, Method::GET);
        assert_eq!(CREATE_CHAT_MESSAGE.method, Method::POST);
        assert_eq!(DELETE_CONVERSATION.method, Method::DELETE);
        assert_eq!(CHECK_WORKFLOW.method, Method::GET);
        assert_eq!(STOP_WORKFLOW.method, Method::POST);
    }

    #[test]
    fn test_path_rendering() {
        assert_eq!(CONVERSATIONS.path(), "/conversations");
        assert!(!CONVERSATIONS.has_param());

        assert!(RENAME_CONVERSATION.has_param());
        assert_eq!(
            RENAME_CONVERSATION.path_with("conv-1"),
            "/conversations/conv-1/name"
        );
        assert_eq!(MESSAGE_FEEDBACK.path_with("m1"), "/messages/m1/feedbacks");
        assert_eq!(CHECK_WORKFLOW.path_with("wf-1"), "/workflows/run/wf-1");
        assert_eq!(STOP_CHAT.path_with("t-9"), "/chat-messages/t-9/stop");
    }

    #[test]
    fn test_path_param_is_encoded() {
        assert_eq!(
            DELETE_CONVERSATION.path_with("a/b c?d"),
            "/conversations/a%2Fb%20c%3Fd"
        );
    }
}
