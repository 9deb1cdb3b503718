use crate::error::QueryError;
use crate::protocol::{QueryRequest, QueryResponse};

/// Sends a question to the remote query service.
///
/// Implementations own the transport; they should run the raw status and body
/// through [`crate::interpret_response`] so error bodies are read consistently.
pub trait QueryService {
    fn query(&self, request: &QueryRequest) -> Result<QueryResponse, QueryError>;
}
