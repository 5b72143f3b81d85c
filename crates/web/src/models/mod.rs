//! Domain models for the web site.

pub mod session;
pub mod user;

pub use session::{AuthSession, SessionCredential, SessionUser, StoredSession, keys as session_keys};
pub use user::User;
