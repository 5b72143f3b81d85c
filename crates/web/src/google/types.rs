//! Types for Google OAuth token and userinfo responses.

use serde::Deserialize;

/// Tokens obtained from the authorization-code exchange.
///
/// Only the access token is used; it is spent immediately on the userinfo
/// request and never stored.
#[derive(Debug, Clone, Deserialize)]
pub struct GoogleTokens {
    /// Bearer token for the userinfo endpoint.
    pub access_token: String,
}

/// Error body returned by Google's OAuth endpoints.
#[derive(Debug, Deserialize)]
pub(super) struct OAuthErrorResponse {
    pub error: String,
    #[serde(default)]
    pub error_description: Option<String>,
}

/// `OpenID` Connect userinfo for the signed-in Google account.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GoogleProfile {
    /// Stable account identifier.
    pub sub: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub email_verified: Option<bool>,
    /// Avatar URL.
    #[serde(default)]
    pub picture: Option<String>,
}

impl GoogleProfile {
    /// Name to display: the profile name, else the email's local part.
    #[must_use]
    pub fn display_name(&self) -> String {
        if let Some(name) = self.name.as_deref().filter(|n| !n.trim().is_empty()) {
            return name.trim().to_string();
        }
        self.email
            .as_deref()
            .and_then(|email| email.split('@').next())
            .unwrap_or_default()
            .to_string()
    }
}
