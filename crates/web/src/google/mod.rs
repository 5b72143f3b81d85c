//! Google OAuth 2.0 client.
//!
//! Google is the only identity provider. The site runs a standard
//! authorization-code flow and only consumes its result: a verified profile
//! that is stored as the local user.
//!
//! # OAuth Flow
//!
//! 1. Generate authorization URL with `authorization_url()`
//! 2. Redirect the visitor to Google's consent page
//! 3. Google redirects back with an authorization code
//! 4. Exchange the code for tokens with `exchange_code()`
//! 5. Fetch the `OpenID` profile with `fetch_profile()`
//!
//! # Example
//!
//! ```rust,ignore
//! use recipe_finder_web::google::GoogleClient;
//!
//! let client = GoogleClient::new(&config.google);
//! let auth_url = client.authorization_url(&config.google_redirect_uri(), &state);
//!
//! // After the callback
//! let tokens = client.exchange_code(&code, &config.google_redirect_uri()).await?;
//! let profile = client.fetch_profile(&tokens.access_token).await?;
//! ```

mod types;

pub use types::*;

use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

use crate::config::GoogleConfig;

/// Errors that can occur when talking to Google.
#[derive(Debug, Error)]
pub enum GoogleError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Google rejected the request.
    #[error("OAuth error: {0}")]
    OAuth(String),
}

/// Google endpoints used by the flow.
///
/// Overridable so the flow can be exercised against a local server.
#[derive(Debug, Clone)]
pub struct GoogleEndpoints {
    pub authorize: String,
    pub token: String,
    pub userinfo: String,
}

impl Default for GoogleEndpoints {
    fn default() -> Self {
        Self {
            authorize: "https://accounts.google.com/o/oauth2/v2/auth".to_string(),
            token: "https://oauth2.googleapis.com/token".to_string(),
            userinfo: "https://openidconnect.googleapis.com/v1/userinfo".to_string(),
        }
    }
}

/// Client for Google's OAuth and userinfo endpoints.
#[derive(Clone)]
pub struct GoogleClient {
    inner: Arc<GoogleClientInner>,
}

struct GoogleClientInner {
    client: reqwest::Client,
    endpoints: GoogleEndpoints,
    client_id: String,
    client_secret: SecretString,
}

impl GoogleClient {
    /// Create a client for the production Google endpoints.
    #[must_use]
    pub fn new(config: &GoogleConfig) -> Self {
        Self::with_endpoints(config, GoogleEndpoints::default())
    }

    /// Create a client for custom endpoints.
    #[must_use]
    pub fn with_endpoints(config: &GoogleConfig, endpoints: GoogleEndpoints) -> Self {
        Self {
            inner: Arc::new(GoogleClientInner {
                client: reqwest::Client::new(),
                endpoints,
                client_id: config.client_id.clone(),
                client_secret: config.client_secret.clone(),
            }),
        }
    }

    /// Generate the authorization URL for sign-in.
    ///
    /// # Arguments
    ///
    /// * `redirect_uri` - The callback URL registered with Google
    /// * `state` - A random string stored in the session to prevent CSRF attacks
    #[must_use]
    pub fn authorization_url(&self, redirect_uri: &str, state: &str) -> String {
        format!(
            "{}?\
            client_id={}&\
            response_type=code&\
            redirect_uri={}&\
            scope=openid%20email%20profile&\
            state={}&\
            prompt=select_account",
            self.inner.endpoints.authorize,
            urlencoding::encode(&self.inner.client_id),
            urlencoding::encode(redirect_uri),
            urlencoding::encode(state)
        )
    }

    /// Exchange an authorization code for tokens.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or Google rejects the code.
    pub async fn exchange_code(
        &self,
        code: &str,
        redirect_uri: &str,
    ) -> Result<GoogleTokens, GoogleError> {
        let params = [
            ("grant_type", "authorization_code"),
            ("client_id", self.inner.client_id.as_str()),
            ("client_secret", self.inner.client_secret.expose_secret()),
            ("code", code),
            ("redirect_uri", redirect_uri),
        ];

        let response = self
            .inner
            .client
            .post(&self.inner.endpoints.token)
            .form(&params)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            let reason = serde_json::from_str::<OAuthErrorResponse>(&text).map_or_else(
                |_| format!("status {status}"),
                |e| match e.error_description {
                    Some(description) => format!("{}: {description}", e.error),
                    None => e.error,
                },
            );
            return Err(GoogleError::OAuth(format!("Token exchange failed: {reason}")));
        }

        Ok(response.json().await?)
    }

    /// Fetch the signed-in account's profile.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the token is rejected, or the
    /// profile has no subject.
    pub async fn fetch_profile(&self, access_token: &str) -> Result<GoogleProfile, GoogleError> {
        let response = self
            .inner
            .client
            .get(&self.inner.endpoints.userinfo)
            .bearer_auth(access_token)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(GoogleError::OAuth(format!(
                "Userinfo request failed: status {}",
                response.status()
            )));
        }

        let profile: GoogleProfile = response.json().await?;
        if profile.sub.is_empty() {
            return Err(GoogleError::OAuth("Userinfo has no subject".to_string()));
        }

        Ok(profile)
    }
}
