//! Chat API.

use std::future::Future;

use crate::client::DifyClient;
use crate::error::Result;
use crate::request::ApiRequest;
use crate::response::{BufferedResponse, DifyResponse};
use crate::routes;
use crate::types::{
    ChatMessageRequest, ConversationsQuery, MessagesQuery, RenameConversationRequest, UserBody,
    UserQuery,
};

/// Chat API client.
pub struct ChatApi {
    client: DifyClient,
}

impl ChatApi {
    pub(crate) fn new(client: DifyClient) -> Self {
        Self { client }
    }

    /// Send a chat message.
    ///
    /// The request's `response_mode` also selects the transport: a streaming
    /// request returns [`DifyResponse::Streaming`].
    pub fn create_message(
        &self,
        request: ChatMessageRequest,
    ) -> impl Future<Output = Result<DifyResponse>> + Send + use<> {
        let stream = request.response_mode.is_streaming();
        let request = ApiRequest::new(&routes::CREATE_CHAT_MESSAGE)
            .json(&request)
            .map(|r| r.stream(stream));
        self.client.dispatch(request)
    }

    /// Stop a streaming answer.
    pub fn stop(
        &self,
        task_id: &str,
        user: &str,
    ) -> impl Future<Output = Result<BufferedResponse>> + Send + use<> {
        let request = ApiRequest::with_param(&routes::STOP_CHAT, task_id).json(&UserBody::new(user));
        self.client.dispatch_buffered(request)
    }

    /// Get suggested follow-up questions for a message.
    pub fn suggested(
        &self,
        message_id: &str,
        user: &str,
    ) -> impl Future<Output = Result<BufferedResponse>> + Send + use<> {
        let request =
            ApiRequest::with_param(&routes::SUGGESTED, message_id).query(&UserQuery::new(user));
        self.client.dispatch_buffered(request)
    }

    /// List messages of a conversation.
    pub fn messages(
        &self,
        query: MessagesQuery,
    ) -> impl Future<Output = Result<BufferedResponse>> + Send + use<> {
        let request = ApiRequest::new(&routes::CONVERSATION_MESSAGES).query(&query);
        self.client.dispatch_buffered(request)
    }

    /// List a user's conversations.
    pub fn conversations(
        &self,
        query: ConversationsQuery,
    ) -> impl Future<Output = Result<BufferedResponse>> + Send + use<> {
        let request = ApiRequest::new(&routes::CONVERSATIONS).query(&query);
        self.client.dispatch_buffered(request)
    }

    /// Rename a conversation.
    pub fn rename_conversation(
        &self,
        conversation_id: &str,
        request: RenameConversationRequest,
    ) -> impl Future<Output = Result<BufferedResponse>> + Send + use<> {
        let request =
            ApiRequest::with_param(&routes::RENAME_CONVERSATION, conversation_id).json(&request);
        self.client.dispatch_buffered(request)
    }

    /// Delete a conversation.
    pub fn delete_conversation(
        &self,
        conversation_id: &str,
        user: &str,
    ) -> impl Future<Output = Result<BufferedResponse>> + Send + use<> {
        let request = ApiRequest::with_param(&routes::DELETE_CONVERSATION, conversation_id)
            .json(&UserBody::new(user));
        self.client.dispatch_buffered(request)
    }
}
