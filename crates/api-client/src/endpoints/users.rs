//! User endpoints

use crate::client::FeedClient;
use crate::error::ApiResult;
use feedlens_feed::{decode_users, UserRecord};

/// Users API interface
#[derive(Debug, Clone)]
pub struct UsersApi {
    client: FeedClient,
}

impl UsersApi {
    /// Create a new users API interface
    pub(crate) fn new(client: FeedClient) -> Self {
        Self { client }
    }

    /// Every user profile
    ///
    /// GET /users
    pub async fn list(&self) -> ApiResult<Vec<UserRecord>> {
        let values = self.client.get_array("users").await?;
        Ok(decode_users(&values))
    }
}
