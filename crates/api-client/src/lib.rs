//! HTTP feed source for feedlens
//!
//! [`FeedClient`] talks to a JSONPlaceholder-compatible API (`/posts`,
//! `/users`, `/posts?userId=N`) and implements [`feedlens_feed::FeedSource`].
//! Payloads are read as JSON arrays and decoded record by record, so one
//! malformed element never fails a whole response.
//!
//! # Example
//!
//! ```rust,no_run
//! use feedlens_api_client::{ClientConfig, FeedClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = FeedClient::with_config(ClientConfig::default())?;
//!
//!     let users = client.users().list().await?;
//!     println!("Got {} users", users.len());
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod client;
pub mod config;
pub mod endpoints;
pub mod error;

pub use client::FeedClient;
pub use config::ClientConfig;
pub use error::{ApiError, ApiResult};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::client::FeedClient;
    pub use crate::config::ClientConfig;
    pub use crate::endpoints::{PostsApi, UsersApi};
    pub use crate::error::{ApiError, ApiResult};
}
