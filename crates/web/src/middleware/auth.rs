//! Session resolution and authentication extractors.
//!
//! Handlers never read the session store directly. They receive the
//! resolved [`AuthSession`] through [`OptionalSession`] or
//! [`RequireSession`].

use axum::{
    extract::FromRequestParts,
    http::{Method, StatusCode, header::COOKIE, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use chrono::{DateTime, Utc};
use tower_sessions::Session;

use crate::models::{AuthSession, SessionCredential, StoredSession, session_keys};

/// Resolve the authenticated principal for a request.
///
/// A record that is missing, expired, or not accompanied by cookie material
/// yields `None`; none of these are errors.
#[must_use]
pub fn resolve_session(
    stored: Option<StoredSession>,
    cookie_header: Option<&str>,
    now: DateTime<Utc>,
) -> Option<AuthSession> {
    let stored = stored.filter(|s| !s.is_expired(now))?;
    let cookie_header = cookie_header.map(str::trim).filter(|c| !c.is_empty())?;

    Some(AuthSession {
        user: stored.user,
        expires_at: stored.expires_at,
        credential: SessionCredential::new(cookie_header),
    })
}

async fn session_from_parts(parts: &Parts) -> Option<AuthSession> {
    let session = parts.extensions.get::<Session>()?;

    let stored = match session
        .get::<StoredSession>(session_keys::CURRENT_SESSION)
        .await
    {
        Ok(stored) => stored,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to read session record");
            None
        }
    };

    let cookie_header = parts.headers.get(COOKIE).and_then(|v| v.to_str().ok());

    resolve_session(stored, cookie_header, Utc::now())
}

/// Extractor that requires a signed-in visitor.
///
/// Page loads redirect to `/`. API routes and non-GET actions answer 401.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireSession(session): RequireSession,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", session.user.name)
/// }
/// ```
pub struct RequireSession(pub AuthSession);

/// Error returned when a session is required but the visitor is signed out.
#[derive(Debug)]
pub enum SessionRejection {
    /// Redirect to the landing page (for HTML requests).
    RedirectToLanding,
    /// Unauthorized response (for API requests).
    Unauthorized,
}

impl IntoResponse for SessionRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLanding => Redirect::to("/").into_response(),
            Self::Unauthorized => StatusCode::UNAUTHORIZED.into_response(),
        }
    }
}

impl<S> FromRequestParts<S> for RequireSession
where
    S: Send + Sync,
{
    type Rejection = SessionRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        session_from_parts(parts).await.map(Self).ok_or_else(|| {
            if parts.uri.path().starts_with("/api/") || parts.method != Method::GET {
                SessionRejection::Unauthorized
            } else {
                SessionRejection::RedirectToLanding
            }
        })
    }
}

/// Extractor that optionally gets the current session.
///
/// Unlike `RequireSession`, this never rejects the request.
pub struct OptionalSession(pub Option<AuthSession>);

impl<S> FromRequestParts<S> for OptionalSession
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(session_from_parts(parts).await))
    }
}

/// Store a new sign-in, rotating the session ID first.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_session(
    session: &Session,
    stored: &StoredSession,
) -> Result<(), tower_sessions::session::Error> {
    session.cycle_id().await?;
    session.insert(session_keys::CURRENT_SESSION, stored).await
}

/// Drop everything held for this visitor (sign-out).
///
/// # Errors
///
/// Returns an error if the session cannot be deleted from the store.
pub async fn clear_session(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session.flush().await
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use recipe_finder_core::UserId;

    use super::*;
    use crate::models::SessionUser;

    fn stored(now: DateTime<Utc>) -> StoredSession {
        StoredSession::new(
            SessionUser {
                id: UserId::new("u1"),
                name: "Ada".to_string(),
                email: Some("ada@example.com".to_string()),
                image: None,
            },
            now,
        )
    }

    #[test]
    fn test_resolve_valid_session() {
        let now = Utc::now();
        let session = resolve_session(Some(stored(now)), Some("rf_session=abc"), now);
        let session = session.as_ref();

        assert_eq!(session.map(|s| s.user_id().as_str()), Some("u1"));
        assert_eq!(
            session.map(|s| s.credential.cookie_header()),
            Some("rf_session=abc")
        );
    }

    #[test]
    fn test_resolve_missing_record() {
        assert!(resolve_session(None, Some("rf_session=abc"), Utc::now()).is_none());
    }

    #[test]
    fn test_resolve_expired_record_is_absent() {
        let issued = Utc::now() - Duration::days(31);
        assert!(resolve_session(Some(stored(issued)), Some("rf_session=abc"), Utc::now()).is_none());
    }

    #[test]
    fn test_resolve_without_cookie_material() {
        let now = Utc::now();
        assert!(resolve_session(Some(stored(now)), None, now).is_none());
        assert!(resolve_session(Some(stored(now)), Some("  "), now).is_none());
    }

    #[test]
    fn test_rejection_responses() {
        assert_eq!(
            SessionRejection::Unauthorized.into_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            SessionRejection::RedirectToLanding.into_response().status(),
            StatusCode::SEE_OTHER
        );
    }
}
