//! Raw records and boundary validation.
//!
//! Sources hand back loosely shaped JSON. Each element is decoded on its own so
//! that one bad record never takes the batch down with it: missing or
//! mistyped text fields become empty strings, a bad author reference becomes
//! "no author", and only records without a usable `id` are dropped.

use crate::model::{PostId, UserId};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

/// A post as delivered by a source, before joining.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostRecord {
    /// Post identity
    pub id: PostId,
    /// Referenced author
    pub author_id: Option<UserId>,
    /// Headline
    pub title: String,
    /// Text body
    pub body: String,
}

/// A user as delivered by a source, before avatar derivation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    /// User identity
    pub id: UserId,
    /// Full name
    pub name: Option<String>,
    /// Handle
    pub username: String,
    /// Contact email
    pub email: String,
    /// Contact phone
    pub phone: String,
    /// Personal site
    pub website: String,
    /// `company.name`
    pub company_name: Option<String>,
    /// `address.city`
    pub city: Option<String>,
}

/// Read an identifier that may arrive as a number or a numeric string.
fn id_field(value: &Value, key: &str) -> Option<u64> {
    match value.get(key)? {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn text_field(value: &Value, key: &str) -> Option<String> {
    value.get(key)?.as_str().map(str::to_owned)
}

fn nested_text(value: &Value, outer: &str, inner: &str) -> Option<String> {
    value.get(outer)?.get(inner)?.as_str().map(str::to_owned)
}

impl PostRecord {
    /// Decode one post; `None` only when it has no usable `id`.
    #[must_use]
    pub fn from_value(value: &Value) -> Option<Self> {
        let id = PostId(id_field(value, "id")?);
        Some(Self {
            id,
            author_id: id_field(value, "userId").map(UserId),
            title: text_field(value, "title").unwrap_or_default(),
            body: text_field(value, "body").unwrap_or_default(),
        })
    }
}

impl UserRecord {
    /// Decode one user; `None` only when it has no usable `id`.
    #[must_use]
    pub fn from_value(value: &Value) -> Option<Self> {
        let id = UserId(id_field(value, "id")?);
        Some(Self {
            id,
            name: text_field(value, "name").filter(|n| !n.trim().is_empty()),
            username: text_field(value, "username").unwrap_or_default(),
            email: text_field(value, "email").unwrap_or_default(),
            phone: text_field(value, "phone").unwrap_or_default(),
            website: text_field(value, "website").unwrap_or_default(),
            company_name: nested_text(value, "company", "name"),
            city: nested_text(value, "address", "city"),
        })
    }
}

/// Decode a batch of posts, skipping unidentifiable elements.
pub fn decode_posts(values: &[Value]) -> Vec<PostRecord> {
    values
        .iter()
        .enumerate()
        .filter_map(|(index, value)| {
            let record = PostRecord::from_value(value);
            if record.is_none() {
                warn!(index, "Skipping post record without a usable id");
            }
            record
        })
        .collect()
}

/// Decode a batch of users, skipping unidentifiable elements.
pub fn decode_users(values: &[Value]) -> Vec<UserRecord> {
    values
        .iter()
        .enumerate()
        .filter_map(|(index, value)| {
            let record = UserRecord::from_value(value);
            if record.is_none() {
                warn!(index, "Skipping user record without a usable id");
            }
            record
        })
        .collect()
}
