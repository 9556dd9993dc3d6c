//! The search session state machine.
//!
//! ```text
//!            query / focus            select
//!   Idle ─────────────────▶ Suggesting ───────▶ Selected ──posts──▶ Detail
//!    ▲  ◀───── clear / empty query ──┘             │                  │
//!    └──────────────── close ──────────────────────┴──────────────────┘
//! ```
//!
//! Every selection bumps a generation counter. Fetch completions are matched
//! against it and anything older is dropped.

use crate::error::SessionError;
use crate::snapshot::{Overlay, SessionSnapshot, SessionState};
use feedlens_feed::{Post, SourceError, User, UserId};
use feedlens_search::{FuzzyIndex, MatchOptions};
use std::sync::Arc;
use tracing::{debug, warn};

/// A post fetch the caller must perform for a selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PostRequest {
    /// Selection generation the result must be reported under
    pub generation: u64,
    /// Whose posts to fetch
    pub user_id: UserId,
}

/// What [`SessionController::on_posts_loaded`] did with a completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// Posts shown, detail overlay open
    Applied,
    /// Fetch failed; the selection stays with an error message
    Failed,
    /// Superseded or dismissed selection, ignored
    Stale,
}

#[derive(Debug, Clone)]
enum Phase {
    Idle,
    Suggesting,
    Selected {
        user: User,
        request: PostRequest,
        failure: Option<String>,
    },
    Detail {
        user: User,
        posts: Vec<Post>,
    },
}

/// Owns the search session. Transitions are synchronous and never block.
pub struct SessionController {
    users: Arc<[User]>,
    index: Arc<FuzzyIndex<User>>,
    options: MatchOptions,
    query: String,
    candidates: Vec<User>,
    phase: Phase,
    generation: u64,
}

impl std::fmt::Debug for SessionController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionController")
            .field("users", &self.users.len())
            .field("query", &self.query)
            .field("state", &self.state())
            .field("generation", &self.generation)
            .finish_non_exhaustive()
    }
}

impl SessionController {
    /// Start an idle session over `users`.
    ///
    /// # Errors
    ///
    /// [`SessionError::Search`] when `options` are invalid.
    pub fn new(users: Vec<User>, options: MatchOptions) -> Result<Self, SessionError> {
        options.validate()?;

        let index = FuzzyIndex::build(users.iter().cloned(), |u| u.display_name.as_str());
        let users: Arc<[User]> = users.into();

        Ok(Self {
            candidates: users.to_vec(),
            users,
            index: Arc::new(index),
            options,
            query: String::new(),
            phase: Phase::Idle,
            generation: 0,
        })
    }

    /// The search universe, in load order
    #[must_use]
    pub fn users(&self) -> &[User] {
        &self.users
    }

    /// Shared handle to the frozen index
    #[must_use]
    pub fn index(&self) -> Arc<FuzzyIndex<User>> {
        Arc::clone(&self.index)
    }

    /// Current state
    #[must_use]
    pub fn state(&self) -> SessionState {
        match self.phase {
            Phase::Idle => SessionState::Idle,
            Phase::Suggesting => SessionState::Suggesting,
            Phase::Selected { .. } => SessionState::Selected,
            Phase::Detail { .. } => SessionState::Detail,
        }
    }

    /// Current selection generation
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether a completion tagged `generation` would be applied
    #[must_use]
    pub fn awaits(&self, generation: u64) -> bool {
        matches!(&self.phase, Phase::Selected { request, failure: None, .. } if request.generation == generation)
    }

    /// The search box changed.
    ///
    /// Ignored while a user is selected.
    pub fn on_query_change(&mut self, text: &str) {
        if !matches!(self.phase, Phase::Idle | Phase::Suggesting) {
            debug!(state = %self.state(), "Query change ignored");
            return;
        }

        self.query = text.to_string();
        if text.is_empty() {
            self.reset_candidates();
            self.phase = Phase::Idle;
            return;
        }

        self.candidates = self.rank(text);
        self.phase = Phase::Suggesting;
        debug!(query = %self.query, candidates = self.candidates.len(), "Suggestions updated");
    }

    /// The search box gained focus. Opens the full list for browsing.
    pub fn on_focus(&mut self) {
        if matches!(self.phase, Phase::Idle) {
            self.phase = Phase::Suggesting;
        }
    }

    /// Pick a user and get the fetch to run for their posts.
    ///
    /// A selection made while another fetch is in flight supersedes it.
    ///
    /// # Errors
    ///
    /// [`SessionError::UnknownUser`] for an id outside the user set and
    /// [`SessionError::SelectionUnavailable`] while the detail view is open.
    /// The session is unchanged in both cases.
    pub fn on_select_user(&mut self, user_id: UserId) -> Result<PostRequest, SessionError> {
        if matches!(self.phase, Phase::Detail { .. }) {
            return Err(SessionError::SelectionUnavailable);
        }

        let Some(user) = self.users.iter().find(|u| u.id == user_id).cloned() else {
            warn!(%user_id, "Selection of unknown user rejected");
            return Err(SessionError::UnknownUser(user_id));
        };

        self.generation += 1;
        let request = PostRequest {
            generation: self.generation,
            user_id,
        };

        self.query.clear();
        self.reset_candidates();
        self.phase = Phase::Selected {
            user,
            request,
            failure: None,
        };
        debug!(%user_id, generation = self.generation, "User selected");

        Ok(request)
    }

    /// Report the outcome of a [`PostRequest`].
    pub fn on_posts_loaded(
        &mut self,
        generation: u64,
        result: Result<Vec<Post>, SourceError>,
    ) -> Completion {
        if !self.awaits(generation) {
            debug!(generation, current = self.generation, "Stale completion dropped");
            return Completion::Stale;
        }

        let (user, request) = match std::mem::replace(&mut self.phase, Phase::Idle) {
            Phase::Selected { user, request, .. } => (user, request),
            other => {
                self.phase = other;
                return Completion::Stale;
            }
        };

        match result {
            Ok(posts) => {
                debug!(user_id = %user.id, posts = posts.len(), "Detail opened");
                self.phase = Phase::Detail { user, posts };
                Completion::Applied
            }
            Err(e) => {
                warn!(user_id = %user.id, error = %e, "Post fetch failed");
                self.phase = Phase::Selected {
                    user,
                    request,
                    failure: Some(format!("Could not load posts: {e}")),
                };
                Completion::Failed
            }
        }
    }

    /// Close the profile, or dismiss a pending selection.
    pub fn on_close_detail(&mut self) {
        if matches!(self.phase, Phase::Selected { .. } | Phase::Detail { .. }) {
            self.phase = Phase::Idle;
            debug!(generation = self.generation, "Selection dismissed");
        }
    }

    /// Clear the search box. Leaves any selection alone.
    pub fn on_clear(&mut self) {
        self.query.clear();
        self.reset_candidates();
        if matches!(self.phase, Phase::Suggesting) {
            self.phase = Phase::Idle;
        }
    }

    /// Read-only view of the session.
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        let (overlay, selected_user, posts, loading, error) = match &self.phase {
            Phase::Idle => (Overlay::None, None, Vec::new(), false, None),
            Phase::Suggesting => (Overlay::Suggest, None, Vec::new(), false, None),
            Phase::Selected { user, failure, .. } => (
                Overlay::None,
                Some(user.clone()),
                Vec::new(),
                failure.is_none(),
                failure.clone(),
            ),
            Phase::Detail { user, posts } => {
                (Overlay::Detail, Some(user.clone()), posts.clone(), false, None)
            }
        };

        SessionSnapshot {
            state: self.state(),
            query: self.query.clone(),
            candidates: self.candidates.clone(),
            overlay,
            suggest_overlay_open: overlay == Overlay::Suggest,
            detail_overlay_open: overlay == Overlay::Detail,
            selected_user,
            selected_user_posts: posts,
            loading,
            error,
            generation: self.generation,
        }
    }

    fn reset_candidates(&mut self) {
        self.candidates = self.users.to_vec();
    }

    fn rank(&self, text: &str) -> Vec<User> {
        // Nothing to rank on whitespace; keep the browse list
        if text.trim().is_empty() {
            return self.users.to_vec();
        }

        match self.index.search(text, &self.options) {
            Ok(results) => results.into_iter().map(|r| r.item).collect(),
            Err(e) => {
                warn!(error = %e, "Search failed");
                Vec::new()
            }
        }
    }
}
