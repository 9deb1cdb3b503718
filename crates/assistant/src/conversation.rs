use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::{AssistantError, QueryError};
use crate::protocol::{QueryRequest, QueryResponse, ResponseMeta};
use crate::service::QueryService;

/// Shown when the service answers without a summary.
const EMPTY_ANSWER: &str = "I couldn't generate a response. Please try again.";

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatRole {
    User,
    Assistant,
}

/// One entry in the chat transcript. Ids are time-ordered (UUIDv7).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: Uuid,
    pub role: ChatRole,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sql: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Vec<Map<String, JsonValue>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub viz: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<ResponseMeta>,
}

impl ChatMessage {
    fn text(role: ChatRole, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            role,
            content: content.into(),
            sql: None,
            data: None,
            viz: None,
            mime: None,
            meta: None,
        }
    }

    fn answer(response: QueryResponse) -> Self {
        let meta = response.meta();
        let content = if response.summary.trim().is_empty() {
            EMPTY_ANSWER.to_string()
        } else {
            response.summary
        };
        Self {
            sql: response.sql,
            data: Some(response.data),
            viz: response.viz,
            mime: response.mime,
            meta,
            ..Self::text(ChatRole::Assistant, content)
        }
    }
}

/// Chat transcript with at most one outstanding question.
///
/// A question is asked in two steps: [`Conversation::begin`] records it and
/// hands back the request to send; [`Conversation::complete`] records the
/// outcome. [`Conversation::ask`] does both against a [`QueryService`].
#[derive(Debug, Clone, Default)]
pub struct Conversation {
    messages: Vec<ChatMessage>,
    pending: Option<Uuid>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Record the user's question and mark it outstanding.
    pub fn begin(&mut self, question: &str) -> Result<QueryRequest, AssistantError> {
        if self.pending.is_some() {
            return Err(AssistantError::Busy);
        }
        let question = question.trim();
        if question.is_empty() {
            return Err(AssistantError::EmptyQuestion);
        }

        let message = ChatMessage::text(ChatRole::User, question);
        self.pending = Some(message.id);
        self.messages.push(message);
        Ok(QueryRequest::new(question))
    }

    /// Append the answer (or failure notice) for the outstanding question.
    pub fn complete(
        &mut self,
        outcome: Result<QueryResponse, QueryError>,
    ) -> Result<&ChatMessage, AssistantError> {
        let question_id = self.pending.take().ok_or(AssistantError::NotPending)?;

        let reply = match outcome {
            Ok(response) => ChatMessage::answer(response),
            Err(err) => {
                warn!(%question_id, error = %err, "query failed");
                ChatMessage::text(ChatRole::Assistant, format!("Error: {err}"))
            }
        };
        debug!(%question_id, reply_id = %reply.id, "question answered");

        let index = self.messages.len();
        self.messages.push(reply);
        Ok(&self.messages[index])
    }

    /// Ask `question` through `service` and record the reply.
    pub fn ask<S: QueryService + ?Sized>(
        &mut self,
        service: &S,
        question: &str,
    ) -> Result<&ChatMessage, AssistantError> {
        let request = self.begin(question)?;
        let outcome = service.query(&request);
        self.complete(outcome)
    }

    /// Drop the transcript and any outstanding question.
    pub fn clear(&mut self) {
        self.messages.clear();
        self.pending = None;
    }
}
