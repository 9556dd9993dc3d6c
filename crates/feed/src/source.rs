//! The fetch boundary.
//!
//! [`FeedSource`] is everything the core needs from the outside world. Transport,
//! authentication and retries are the implementor's business.

use crate::model::UserId;
use crate::record::{decode_posts, decode_users, PostRecord, UserRecord};
use async_trait::async_trait;
use serde_json::Value;
use std::path::Path;
use thiserror::Error;

/// Failure reported by a [`FeedSource`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SourceError {
    /// Connection, timeout or other transport problem
    #[error("transport failure: {0}")]
    Transport(String),

    /// The source answered with an error status
    #[error("source returned status {status}: {message}")]
    Status {
        /// HTTP-like status code
        status: u16,
        /// Body or reason text
        message: String,
    },

    /// The payload was not a JSON array
    #[error("malformed payload: {0}")]
    Malformed(String),
}

/// Async provider of raw post and user records.
#[async_trait]
pub trait FeedSource: Send + Sync {
    /// Every post, in source order
    async fn fetch_all_posts(&self) -> Result<Vec<PostRecord>, SourceError>;

    /// Every user, in source order
    async fn fetch_all_users(&self) -> Result<Vec<UserRecord>, SourceError>;

    /// Posts written by one user
    async fn fetch_posts_by_user(&self, user_id: UserId) -> Result<Vec<PostRecord>, SourceError>;
}

/// A source backed by records held in memory.
///
/// Used for fixtures and offline runs.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    posts: Vec<PostRecord>,
    users: Vec<UserRecord>,
}

fn parse_array(text: &str, what: &str) -> Result<Vec<Value>, SourceError> {
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Array(values)) => Ok(values),
        Ok(_) => Err(SourceError::Malformed(format!("{what}: expected a JSON array"))),
        Err(e) => Err(SourceError::Malformed(format!("{what}: {e}"))),
    }
}

impl StaticSource {
    /// Source over already-decoded records
    #[must_use]
    pub fn new(posts: Vec<PostRecord>, users: Vec<UserRecord>) -> Self {
        Self { posts, users }
    }

    /// Source over JSON arrays shaped like the public API's `/posts` and `/users`
    pub fn from_json(posts: &str, users: &str) -> Result<Self, SourceError> {
        let posts = decode_posts(&parse_array(posts, "posts")?);
        let users = decode_users(&parse_array(users, "users")?);
        Ok(Self { posts, users })
    }

    /// Source over `posts.json` and `users.json` in `dir`
    pub fn from_dir(dir: impl AsRef<Path>) -> Result<Self, SourceError> {
        let dir = dir.as_ref();
        let read = |name: &str| {
            let path = dir.join(name);
            std::fs::read_to_string(&path)
                .map_err(|e| SourceError::Transport(format!("{}: {e}", path.display())))
        };
        Self::from_json(&read("posts.json")?, &read("users.json")?)
    }
}

#[async_trait]
impl FeedSource for StaticSource {
    async fn fetch_all_posts(&self) -> Result<Vec<PostRecord>, SourceError> {
        Ok(self.posts.clone())
    }

    async fn fetch_all_users(&self) -> Result<Vec<UserRecord>, SourceError> {
        Ok(self.users.clone())
    }

    async fn fetch_posts_by_user(&self, user_id: UserId) -> Result<Vec<PostRecord>, SourceError> {
        Ok(self
            .posts
            .iter()
            .filter(|p| p.author_id == Some(user_id))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PostId;

    const POSTS: &str = r#"[
        {"userId": 1, "id": 1, "title": "sunt aut facere", "body": "quia et suscipit"},
        {"userId": 2, "id": 11, "title": "et ea vero", "body": "delectus reiciendis"},
        {"userId": 1, "id": 2, "title": "qui est esse", "body": "est rerum tempore"}
    ]"#;

    const USERS: &str = r#"[
        {"id": 1, "name": "Leanne Graham", "username": "Bret"},
        {"id": 2, "name": "Ervin Howell", "username": "Antonette"}
    ]"#;

    #[tokio::test]
    async fn test_static_source_filters_by_user() {
        let source = StaticSource::from_json(POSTS, USERS).unwrap();
        let posts = source.fetch_posts_by_user(UserId(1)).await.unwrap();
        let ids: Vec<_> = posts.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![PostId(1), PostId(2)]);
        assert_eq!(source.fetch_all_users().await.unwrap().len(), 2);
    }

    #[test]
    fn test_non_array_payload_rejected() {
        let err = StaticSource::from_json(r#"{"id": 1}"#, USERS).unwrap_err();
        assert!(matches!(err, SourceError::Malformed(_)));
    }

    #[test]
    fn test_from_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("posts.json"), POSTS).unwrap();
        std::fs::write(dir.path().join("users.json"), USERS).unwrap();
        let source = StaticSource::from_dir(dir.path()).unwrap();
        assert_eq!(source.posts.len(), 3);
    }

    #[test]
    fn test_from_dir_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = StaticSource::from_dir(dir.path()).unwrap_err();
        assert!(matches!(err, SourceError::Transport(_)));
    }
}
