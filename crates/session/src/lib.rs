//! Search session for feedlens
//!
//! [`SessionController`] is a synchronous state machine over four states
//! (`Idle`, `Suggesting`, `Selected`, `Detail`). It never performs IO: a user
//! selection returns a [`PostRequest`] tagged with a generation number, and the
//! caller reports the outcome back. Completions carrying an old generation are
//! discarded, so a slow fetch can never overwrite a newer selection.
//!
//! [`SessionDriver`] wires the controller to a [`feedlens_feed::FeedSource`]
//! on tokio: it performs the initial load, runs per-user fetches as tasks and
//! applies their results in arrival order.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod controller;
pub mod driver;
pub mod error;
pub mod snapshot;

pub use controller::{Completion, PostRequest, SessionController};
pub use driver::{SessionDriver, SessionOptions};
pub use error::SessionError;
pub use snapshot::{AppSnapshot, Overlay, SessionSnapshot, SessionState};
