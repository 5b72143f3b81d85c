//! Google sign-in route handlers.
//!
//! - Sign-in: redirects to Google (or straight on if already signed in)
//! - Callback: exchanges the code, upserts the user and starts a session
//! - Sign-out: drops the session

use axum::{
    Json,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use chrono::Utc;
use rand::Rng;
use serde::Deserialize;
use serde_json::{Value, json};
use tower_sessions::Session;

use crate::db::{UpsertUser, UserRepository};
use crate::error::{AppError, clear_sentry_user, set_sentry_user};
use crate::middleware::{OptionalSession, clear_session, set_session};
use crate::models::{AuthSession, SessionUser, StoredSession, session_keys};
use crate::state::AppState;

/// Where a successful sign-in lands.
pub const SIGNED_IN_DESTINATION: &str = "/home";

/// Query parameters from the Google OAuth callback.
#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    /// Authorization code to exchange for tokens.
    pub code: Option<String>,
    /// State parameter for CSRF protection.
    pub state: Option<String>,
    /// Error code if authorization failed.
    pub error: Option<String>,
}

/// Generate a cryptographically secure random string.
fn generate_random_string(length: usize) -> String {
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
    let mut rng = rand::rng();
    (0..length)
        .filter_map(|_| CHARSET.get(rng.random_range(0..CHARSET.len())))
        .map(|&b| char::from(b))
        .collect()
}

fn signin_failed(reason: &str) -> Response {
    Redirect::to(&format!("/?error={reason}")).into_response()
}

/// Start Google sign-in.
///
/// A visitor who already holds a valid session is sent on without being
/// prompted again.
///
/// # Route
///
/// `GET /auth/signin/google`
pub async fn signin(
    State(state): State<AppState>,
    OptionalSession(current): OptionalSession,
    session: Session,
) -> Response {
    if let Some(current) = current {
        tracing::debug!(user_id = %current.user_id(), "Already signed in, skipping Google prompt");
        return Redirect::to(SIGNED_IN_DESTINATION).into_response();
    }

    let oauth_state = generate_random_string(32);

    if let Err(e) = session
        .insert(session_keys::GOOGLE_OAUTH_STATE, &oauth_state)
        .await
    {
        tracing::error!(error = %e, "Failed to store OAuth state in session");
        return signin_failed("session");
    }

    let auth_url = state
        .google()
        .authorization_url(&state.config().google_redirect_uri(), &oauth_state);

    Redirect::to(&auth_url).into_response()
}

/// Handle the Google OAuth callback.
///
/// # Route
///
/// `GET /auth/callback/google`
pub async fn callback(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<CallbackQuery>,
) -> Response {
    if let Some(error) = query.error {
        tracing::warn!(error = %error, "Google OAuth error");
        return signin_failed("google_denied");
    }

    let Some(code) = query.code else {
        tracing::warn!("Google OAuth callback missing code");
        return signin_failed("missing_code");
    };

    let Some(returned_state) = query.state else {
        tracing::warn!("Google OAuth callback missing state");
        return signin_failed("missing_state");
    };

    let stored_state: Option<String> = session
        .get(session_keys::GOOGLE_OAUTH_STATE)
        .await
        .ok()
        .flatten();

    if stored_state.as_ref() != Some(&returned_state) {
        tracing::warn!("Google OAuth state mismatch");
        return signin_failed("invalid_state");
    }

    // One-time use
    let _ = session
        .remove::<String>(session_keys::GOOGLE_OAUTH_STATE)
        .await;

    match complete_signin(&state, &session, &code).await {
        Ok(user) => {
            tracing::info!(user_id = %user.id, "User signed in with Google");
            Redirect::to(SIGNED_IN_DESTINATION).into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "Google sign-in failed");
            signin_failed("signin")
        }
    }
}

async fn complete_signin(
    state: &AppState,
    session: &Session,
    code: &str,
) -> Result<SessionUser, AppError> {
    let redirect_uri = state.config().google_redirect_uri();
    let tokens = state.google().exchange_code(code, &redirect_uri).await?;
    let profile = state.google().fetch_profile(&tokens.access_token).await?;

    let name = profile.display_name();

    let user = UserRepository::new(state.pool())
        .upsert(UpsertUser {
            google_subject: &profile.sub,
            name: &name,
            email: profile.email.as_deref(),
            image: profile.picture.as_deref(),
        })
        .await?;

    let session_user = SessionUser::from(&user);
    set_session(session, &StoredSession::new(session_user.clone(), Utc::now())).await?;
    set_sentry_user(&user.id, user.email.as_deref());

    Ok(session_user)
}

/// Sign out.
///
/// # Route
///
/// `POST /auth/signout`
pub async fn signout(session: Session) -> Result<Redirect, AppError> {
    clear_session(&session).await?;
    clear_sentry_user();
    Ok(Redirect::to("/"))
}

/// JSON view of a session: `{}` when signed out.
#[must_use]
pub fn session_json(session: Option<&AuthSession>) -> Value {
    session.map_or_else(
        || json!({}),
        |s| {
            json!({
                "user": {
                    "id": s.user.id,
                    "name": s.user.name,
                    "email": s.user.email,
                    "image": s.user.image,
                },
                "expires": s.expires_at.to_rfc3339(),
            })
        },
    )
}

/// Current session.
///
/// # Route
///
/// `GET /api/auth/session`
pub async fn session(OptionalSession(current): OptionalSession) -> Json<Value> {
    Json(session_json(current.as_ref()))
}
