//! Post endpoints

use crate::client::FeedClient;
use crate::error::ApiResult;
use feedlens_feed::{decode_posts, PostRecord, UserId};

/// Posts API interface
#[derive(Debug, Clone)]
pub struct PostsApi {
    client: FeedClient,
}

impl PostsApi {
    /// Create a new posts API interface
    pub(crate) fn new(client: FeedClient) -> Self {
        Self { client }
    }

    /// Every post
    ///
    /// GET /posts
    pub async fn list(&self) -> ApiResult<Vec<PostRecord>> {
        let values = self.client.get_array(&list_path()).await?;
        Ok(decode_posts(&values))
    }

    /// Posts written by one user
    ///
    /// GET /posts?userId={id}
    pub async fn by_user(&self, user_id: UserId) -> ApiResult<Vec<PostRecord>> {
        let values = self.client.get_array(&by_user_path(user_id)).await?;
        Ok(decode_posts(&values))
    }
}

fn list_path() -> String {
    "posts".to_string()
}

fn by_user_path(user_id: UserId) -> String {
    format!("posts?userId={user_id}")
}
