//! Endpoint-specific API implementations
//!
//! | Module | Path | Description |
//! |--------|------|-------------|
//! | `posts` | `/posts`, `/posts?userId=N` | All posts, or one author's posts |
//! | `users` | `/users` | All user profiles |

pub mod posts;
pub mod users;

pub use posts::PostsApi;
pub use users::UsersApi;
