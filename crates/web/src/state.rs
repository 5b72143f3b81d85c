//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::AppConfig;
use crate::google::{GoogleClient, GoogleEndpoints};
use crate::rest::ApiClient;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AppConfig,
    pool: PgPool,
    api: ApiClient,
    google: GoogleClient,
    media: reqwest::Client,
}

impl AppState {
    /// Create a new application state talking to Google's production endpoints.
    #[must_use]
    pub fn new(config: AppConfig, pool: PgPool) -> Self {
        Self::with_google_endpoints(config, pool, GoogleEndpoints::default())
    }

    /// Create a new application state with custom Google endpoints.
    #[must_use]
    pub fn with_google_endpoints(
        config: AppConfig,
        pool: PgPool,
        endpoints: GoogleEndpoints,
    ) -> Self {
        let api = ApiClient::new(&config.api);
        let google = GoogleClient::with_endpoints(&config.google, endpoints);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                api,
                google,
                media: reqwest::Client::new(),
            }),
        }
    }

    /// Get a reference to the site configuration.
    #[must_use]
    pub fn config(&self) -> &AppConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Get a reference to the recipe REST API client.
    #[must_use]
    pub fn api(&self) -> &ApiClient {
        &self.inner.api
    }

    /// Get a reference to the Google OAuth client.
    #[must_use]
    pub fn google(&self) -> &GoogleClient {
        &self.inner.google
    }

    /// HTTP client used for media preloads.
    #[must_use]
    pub fn media_client(&self) -> &reqwest::Client {
        &self.inner.media
    }
}
