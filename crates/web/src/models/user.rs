//! User model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use recipe_finder_core::UserId;

/// A user who has signed in with Google at least once.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Local user ID (stable across sign-ins, exposed as `session.user.id`).
    pub id: UserId,
    /// Google account subject identifier.
    pub google_subject: String,
    /// Display name.
    pub name: String,
    /// Email address reported by Google.
    pub email: Option<String>,
    /// Avatar URL.
    pub image: Option<String>,
    /// When the user first signed in.
    pub created_at: DateTime<Utc>,
    /// When the profile was last refreshed from Google.
    pub updated_at: DateTime<Utc>,
}
