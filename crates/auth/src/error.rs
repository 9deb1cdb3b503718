use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("username and password are required")]
    MissingCredentials,

    #[error("invalid username or password")]
    InvalidCredentials,

    #[error("malformed session: {0}")]
    MalformedSession(String),

    #[error("session is not valid JSON: {0}")]
    SessionJson(#[from] serde_json::Error),
}
