//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Landing page (?view=product|features|about, ?menu=open)
//!
//! # Auth
//! GET  /auth/signin/google     - Start Google sign-in
//! GET  /auth/callback/google   - Handle OAuth callback
//! POST /auth/signout           - Sign out
//! GET  /api/auth/session       - Current session as JSON
//!
//! # Recipes (requires session)
//! GET    /home                 - Recipe feed (?page, ?limit, ?sortOption, ?query)
//! GET    /profile              - The viewer's own recipes
//! POST   /recipes/{id}/like    - Toggle like
//! DELETE /recipes/{id}         - Delete a recipe
//!
//! # Media (requires session)
//! GET  /api/audio?src=         - Preloaded narration audio
//! ```

pub mod auth;
pub mod home;
pub mod media;
pub mod recipes;

use axum::{
    Router,
    routing::{delete, get, post},
};

use crate::config::AppConfig;
use crate::middleware::auth_rate_limiter;
use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes(config: &AppConfig) -> Router<AppState> {
    Router::new()
        .route("/signin/google", get(auth::signin))
        .route("/callback/google", get(auth::callback))
        .route("/signout", post(auth::signout))
        .layer(auth_rate_limiter(config.trust_proxy_headers))
}

/// Create the recipe routes router.
pub fn recipe_routes() -> Router<AppState> {
    Router::new()
        .route("/{id}", delete(recipes::delete))
        .route("/{id}/like", post(recipes::like))
}

/// Create all routes for the site.
pub fn routes(config: &AppConfig) -> Router<AppState> {
    Router::new()
        .route("/", get(home::landing))
        .route("/home", get(recipes::feed))
        .route("/profile", get(recipes::profile))
        .nest("/recipes", recipe_routes())
        .nest("/auth", auth_routes(config))
        .route("/api/auth/session", get(auth::session))
        .route("/api/audio", get(media::audio))
}

/// Decode a raw query string into key/value pairs, keeping repeats.
pub(crate) fn query_pairs(raw: Option<&str>) -> Vec<(String, String)> {
    raw.map(|query| {
        url::form_urlencoded::parse(query.as_bytes())
            .into_owned()
            .collect()
    })
    .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_pairs_decodes_and_keeps_repeats() {
        let pairs = query_pairs(Some("query=lentil+soup&page=2&page=3"));
        assert_eq!(
            pairs,
            vec![
                ("query".to_string(), "lentil soup".to_string()),
                ("page".to_string(), "2".to_string()),
                ("page".to_string(), "3".to_string()),
            ]
        );
        assert!(query_pairs(None).is_empty());
    }
}
