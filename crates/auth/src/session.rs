use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AuthError;
use crate::roles::Role;

/// Logged-in dashboard user, persisted client-side as JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub username: String,
    pub role: Role,
    pub issued_at: DateTime<Utc>,
}

/// Stored form before shape checks.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredSession {
    #[serde(default)]
    username: String,
    #[serde(default)]
    role: String,
    #[serde(default)]
    issued_at: String,
}

impl Session {
    /// Restore a stored session, checking only that every field is present and
    /// well-formed.
    pub fn from_json(json: &str) -> Result<Self, AuthError> {
        let stored: StoredSession = serde_json::from_str(json)?;

        if stored.username.trim().is_empty() {
            return Err(AuthError::MalformedSession("missing username".to_string()));
        }
        if stored.role.trim().is_empty() {
            return Err(AuthError::MalformedSession("missing role".to_string()));
        }
        let issued_at = DateTime::parse_from_rfc3339(stored.issued_at.trim())
            .map_err(|err| AuthError::MalformedSession(format!("issuedAt: {err}")))?
            .with_timezone(&Utc);

        Ok(Self {
            username: stored.username,
            role: Role::from(stored.role),
            issued_at,
        })
    }

    pub fn to_json(&self) -> Result<String, AuthError> {
        Ok(serde_json::to_string(self)?)
    }
}
