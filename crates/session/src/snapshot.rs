//! Read-only views handed to renderers.

use feedlens_feed::{Post, User};
use serde::Serialize;
use std::fmt;

/// Coarse session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    /// Nothing typed, no overlay
    Idle,
    /// Suggestion overlay open
    Suggesting,
    /// A user is picked and their posts are being fetched
    Selected,
    /// Profile overlay open with the user's posts
    Detail,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Suggesting => "suggesting",
            Self::Selected => "selected",
            Self::Detail => "detail",
        };
        f.write_str(name)
    }
}

/// Which overlay, if any, covers the feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Overlay {
    /// Feed is uncovered
    None,
    /// Suggestion list
    Suggest,
    /// User profile
    Detail,
}

/// Everything a view needs to draw the search session.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    /// Current state
    pub state: SessionState,
    /// Text in the search box
    pub query: String,
    /// Suggestions, best match first
    pub candidates: Vec<User>,
    /// Open overlay
    pub overlay: Overlay,
    /// `overlay == Overlay::Suggest`
    pub suggest_overlay_open: bool,
    /// `overlay == Overlay::Detail`
    pub detail_overlay_open: bool,
    /// Picked user
    pub selected_user: Option<User>,
    /// Posts of the picked user, empty until loaded
    pub selected_user_posts: Vec<Post>,
    /// A post fetch is outstanding for the current selection
    pub loading: bool,
    /// Why the last fetch for the current selection failed
    pub error: Option<String>,
    /// Selection generation
    pub generation: u64,
}

/// Feed plus session, the full state of the app.
#[derive(Debug, Clone, Serialize)]
pub struct AppSnapshot<'a> {
    /// Aggregated feed, newest first
    pub feed: &'a [Post],
    /// Search session
    pub session: SessionSnapshot,
}
