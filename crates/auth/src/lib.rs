//! `millboard-auth`: dashboard login against a credential table.
//!
//! This is a presentation gate, not a trust boundary: sessions are plain JSON
//! and only their shape is checked.

pub mod credentials;
pub mod error;
pub mod roles;
pub mod session;

pub use credentials::{Credential, CredentialTable};
pub use error::AuthError;
pub use roles::Role;
pub use session::Session;
