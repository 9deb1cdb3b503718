use thiserror::Error;

/// Failure of one remote query.
#[derive(Debug, Error)]
pub enum QueryError {
    /// The service answered with an error.
    #[error("{0}")]
    Service(String),

    #[error("could not decode query response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("unable to reach the query service: {0}")]
    Transport(String),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AssistantError {
    #[error("a question is already awaiting an answer")]
    Busy,

    #[error("question is empty")]
    EmptyQuestion,

    #[error("no question is awaiting an answer")]
    NotPending,
}
