//! Feed data for feedlens.
//!
//! - [`model`]: the joined [`User`] and [`Post`] types shown to the viewer
//! - [`record`]: raw records as they arrive from a source, decoded leniently
//! - [`aggregate`]: joins records into a time-ordered feed
//! - [`avatar`]: deterministic avatar URLs
//! - [`source`]: the async [`FeedSource`] boundary and an in-memory source

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod aggregate;
pub mod avatar;
pub mod model;
pub mod record;
pub mod source;

pub use aggregate::Aggregator;
pub use avatar::{AvatarUrlPolicy, TemplateAvatars};
pub use model::{Post, PostId, User, UserId, UNKNOWN_USER};
pub use record::{decode_posts, decode_users, PostRecord, UserRecord};
pub use source::{FeedSource, SourceError, StaticSource};
