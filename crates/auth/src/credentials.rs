use chrono::{DateTime, Utc};
use csv::{ReaderBuilder, Trim};
use tracing::{debug, warn};

use crate::error::AuthError;
use crate::roles::Role;
use crate::session::Session;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    pub username: String,
    pub password: String,
    pub role: Role,
}

/// Login table loaded from `username,password,role` text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CredentialTable {
    entries: Vec<Credential>,
}

impl CredentialTable {
    /// Parse the credential table.
    ///
    /// Header names match case-insensitively and may appear in any order. Rows
    /// with an empty username, password or role are dropped; a header without
    /// all three columns yields an empty table.
    pub fn parse(text: &str) -> Self {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(Trim::All)
            .from_reader(text.as_bytes());

        let headers = match reader.headers() {
            Ok(h) => h.clone(),
            Err(err) => {
                warn!(error = %err, "unreadable credential header; no logins available");
                return Self::default();
            }
        };
        let column = |name: &str| headers.iter().position(|h| h.eq_ignore_ascii_case(name));
        let (Some(user_ix), Some(pass_ix), Some(role_ix)) =
            (column("username"), column("password"), column("role"))
        else {
            warn!("credential table lacks username/password/role columns; no logins available");
            return Self::default();
        };

        let mut entries = Vec::new();
        for row in reader.records() {
            let row = match row {
                Ok(row) => row,
                Err(err) => {
                    warn!(error = %err, "skipping unreadable credential row");
                    continue;
                }
            };
            let field = |ix: usize| row.get(ix).unwrap_or("").to_string();
            let (username, password, role) = (field(user_ix), field(pass_ix), field(role_ix));
            if username.is_empty() || password.is_empty() || role.is_empty() {
                continue;
            }
            entries.push(Credential {
                username,
                password,
                role: Role::from(role),
            });
        }

        debug!(logins = entries.len(), "loaded credential table");
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[Credential] {
        &self.entries
    }

    /// Check a login attempt and open a session stamped `issued_at`.
    ///
    /// The identifier matches usernames trimmed and case-insensitively; the
    /// password must match exactly.
    pub fn validate_login(
        &self,
        identifier: &str,
        password: &str,
        issued_at: DateTime<Utc>,
    ) -> Result<Session, AuthError> {
        let identifier = identifier.trim().to_lowercase();
        if identifier.is_empty() || password.is_empty() {
            return Err(AuthError::MissingCredentials);
        }

        let matched = self
            .entries
            .iter()
            .find(|c| c.username.trim().to_lowercase() == identifier)
            .filter(|c| c.password == password)
            .ok_or(AuthError::InvalidCredentials)?;

        Ok(Session {
            username: matched.username.clone(),
            role: matched.role.clone(),
            issued_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const TABLE: &str = "Username,Role,Password\n\
        Admin,admin,\"s3cret,with,commas\"\n\
        ops.lead,operations,mill2024\n\
        ,operations,orphan\n\
        planner,Planner,\"say \"\"hi\"\"\"\n";

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 4, 8, 0, 0).unwrap()
    }

    #[test]
    fn parses_quoted_fields_and_drops_incomplete_rows() {
        let table = CredentialTable::parse(TABLE);
        assert_eq!(table.len(), 3);
        assert_eq!(table.entries()[0].password, "s3cret,with,commas");
        assert_eq!(table.entries()[2].password, "say \"hi\"");
        assert_eq!(table.entries()[2].role, Role::Other("Planner".to_string()));
    }

    #[test]
    fn header_without_required_columns_is_empty() {
        assert!(CredentialTable::parse("user,pass\nadmin,x\n").is_empty());
        assert!(CredentialTable::parse("").is_empty());
    }

    #[test]
    fn login_matches_username_case_insensitively() {
        let table = CredentialTable::parse(TABLE);
        let session = table.validate_login("  OPS.LEAD ", "mill2024", at()).unwrap();
        assert_eq!(session.username, "ops.lead");
        assert_eq!(session.role, Role::Operations);
        assert_eq!(session.issued_at, at());
    }

    #[test]
    fn wrong_password_and_unknown_user_are_rejected() {
        let table = CredentialTable::parse(TABLE);
        assert!(matches!(
            table.validate_login("ops.lead", "MILL2024", at()),
            Err(AuthError::InvalidCredentials)
        ));
        assert!(matches!(
            table.validate_login("nobody", "mill2024", at()),
            Err(AuthError::InvalidCredentials)
        ));
        assert!(matches!(
            table.validate_login("  ", "mill2024", at()),
            Err(AuthError::MissingCredentials)
        ));
    }
}
