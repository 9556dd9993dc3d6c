//! Joined feed types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Display name used when a post's author cannot be resolved.
pub const UNKNOWN_USER: &str = "Unknown User";

/// User identifier assigned by the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub u64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Post identifier assigned by the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PostId(pub u64);

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A user profile. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Stable identity
    pub id: UserId,
    /// Full name, the search key
    pub display_name: String,
    /// Handle
    pub username: String,
    /// Contact email
    pub email: String,
    /// Contact phone
    pub phone_number: String,
    /// Personal site
    pub website_url: String,
    /// Employer, when the source provides one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    /// Home city, when the source provides one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    /// Derived from `id` by an avatar policy
    pub avatar_url: String,
}

/// A post joined with its author's display fields.
///
/// `author_display_name` and `author_avatar_url` are copied at join time and
/// are not refreshed if the user record changes later.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    /// Stable identity
    pub id: PostId,
    /// Author reference, absent when the source omitted it
    pub author_id: Option<UserId>,
    /// Headline
    pub title: String,
    /// Text body
    pub body: String,
    /// Synthetic activity timestamp assigned at load time
    pub created_at: DateTime<Utc>,
    /// Author name, or [`UNKNOWN_USER`]
    pub author_display_name: String,
    /// Author avatar; `None` when the author is unknown
    pub author_avatar_url: Option<String>,
}

impl Post {
    /// Whether the author was resolved during the join
    #[must_use]
    pub fn has_known_author(&self) -> bool {
        self.author_avatar_url.is_some()
    }
}
