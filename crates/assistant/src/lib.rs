//! `millboard-assistant`
//!
//! **Responsibility:** the natural-language query side panel.
//!
//! - Wire types of the remote query service and how its replies are read.
//! - A transport seam ([`QueryService`]); no HTTP client ships here.
//! - Conversation state with at most one question in flight.

pub mod conversation;
pub mod error;
pub mod protocol;
pub mod service;

pub use conversation::{ChatMessage, ChatRole, Conversation};
pub use error::{AssistantError, QueryError};
pub use protocol::{QueryRequest, QueryResponse, ResponseMeta, interpret_response};
pub use service::QueryService;
