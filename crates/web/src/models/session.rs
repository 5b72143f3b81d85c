//! Session-related types.
//!
//! Types stored in the session for authentication state, and the resolved
//! [`AuthSession`] handed to handlers.

use chrono::{DateTime, Duration, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use recipe_finder_core::UserId;

use super::User;

/// How long a sign-in stays valid.
pub const SESSION_TTL_DAYS: i64 = 30;

/// Public profile of the signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    /// Local user ID.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: Option<String>,
    /// Avatar URL.
    pub image: Option<String>,
}

impl From<&User> for SessionUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            name: user.name.clone(),
            email: user.email.clone(),
            image: user.image.clone(),
        }
    }
}

/// Session-stored sign-in record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredSession {
    pub user: SessionUser,
    pub expires_at: DateTime<Utc>,
}

impl StoredSession {
    /// Start a new sign-in valid for [`SESSION_TTL_DAYS`].
    #[must_use]
    pub fn new(user: SessionUser, now: DateTime<Utc>) -> Self {
        Self {
            user,
            expires_at: now + Duration::days(SESSION_TTL_DAYS),
        }
    }

    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// The raw cookie material that authenticated this request.
///
/// Forwarded verbatim as the `Cookie` header on server-initiated API calls
/// so the API can validate the same session. Redacted in `Debug` output.
#[derive(Clone)]
pub struct SessionCredential(SecretString);

impl SessionCredential {
    #[must_use]
    pub fn new(cookie_header: impl Into<String>) -> Self {
        Self(SecretString::from(cookie_header.into()))
    }

    /// The `Cookie` header value.
    #[must_use]
    pub fn cookie_header(&self) -> &str {
        self.0.expose_secret()
    }
}

impl std::fmt::Debug for SessionCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SessionCredential([REDACTED])")
    }
}

/// An authenticated principal for the current request.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub user: SessionUser,
    pub expires_at: DateTime<Utc>,
    pub credential: SessionCredential,
}

impl AuthSession {
    /// Subject identifier of the signed-in user.
    #[must_use]
    pub const fn user_id(&self) -> &UserId {
        &self.user.id
    }
}

/// Session keys for authentication data.
pub mod keys {
    /// Key for the signed-in user record.
    pub const CURRENT_SESSION: &str = "current_session";

    /// Key for Google OAuth state (CSRF protection).
    pub const GOOGLE_OAUTH_STATE: &str = "google_oauth_state";

    /// Key for the last recipe list rendered to this session.
    pub const RECIPE_LIST: &str = "recipe_list";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stored_session_expiry() {
        let now = Utc::now();
        let session = StoredSession::new(
            SessionUser {
                id: UserId::new("u1"),
                name: "Ada".to_string(),
                email: None,
                image: None,
            },
            now,
        );
        assert!(!session.is_expired(now));
        assert!(!session.is_expired(now + Duration::days(SESSION_TTL_DAYS - 1)));
        assert!(session.is_expired(now + Duration::days(SESSION_TTL_DAYS)));
    }

    #[test]
    fn test_credential_debug_is_redacted() {
        let credential = SessionCredential::new("rf_session=abc123");
        assert_eq!(credential.cookie_header(), "rf_session=abc123");
        assert!(!format!("{credential:?}").contains("abc123"));
    }
}
