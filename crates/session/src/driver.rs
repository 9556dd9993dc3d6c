//! Async driver tying the controller to a [`FeedSource`].
//!
//! The driver is the single owner of session state. Post fetches run as tokio
//! tasks that only send their result back over a channel; the driver applies
//! them one at a time in [`SessionDriver::next_completion`].

use crate::controller::{Completion, PostRequest, SessionController};
use crate::error::SessionError;
use crate::snapshot::AppSnapshot;
use chrono::Utc;
use feedlens_core::config::ConfigSchema;
use feedlens_feed::{Aggregator, FeedSource, Post, PostRecord, SourceError, TemplateAvatars, UserId};
use feedlens_search::MatchOptions;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, instrument, warn};

/// Knobs for [`SessionDriver::load`].
#[derive(Debug, Clone)]
pub struct SessionOptions {
    /// Matcher settings for suggestions
    pub match_options: MatchOptions,
    /// Width of the synthetic timestamp window
    pub window_months: u32,
    /// Avatar URL template containing `{id}`
    pub avatar_template: String,
    /// Fixed RNG seed for reproducible timestamps
    pub seed: Option<u64>,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            match_options: MatchOptions::default(),
            window_months: feedlens_feed::aggregate::DEFAULT_WINDOW_MONTHS,
            avatar_template: feedlens_feed::avatar::ROBOHASH_TEMPLATE.to_string(),
            seed: None,
        }
    }
}

impl SessionOptions {
    /// Options from the `[search]` and `[feed]` config sections
    #[must_use]
    pub fn from_config(config: &ConfigSchema) -> Self {
        Self {
            match_options: MatchOptions {
                threshold: config.search.threshold,
                distance: config.search.distance,
                ignore_location: config.search.ignore_location,
                limit: config.search.limit,
            },
            window_months: config.feed.window_months,
            avatar_template: config.feed.avatar_template.clone(),
            seed: config.feed.seed,
        }
    }
}

#[derive(Debug)]
struct Fetched {
    request: PostRequest,
    result: Result<Vec<PostRecord>, SourceError>,
}

/// Owns the feed and the search session, and runs fetches for it.
pub struct SessionDriver {
    source: Arc<dyn FeedSource>,
    aggregator: Aggregator,
    rng: StdRng,
    feed: Vec<Post>,
    controller: SessionController,
    tx: mpsc::UnboundedSender<Fetched>,
    rx: mpsc::UnboundedReceiver<Fetched>,
    pending: usize,
}

impl std::fmt::Debug for SessionDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionDriver")
            .field("feed", &self.feed.len())
            .field("controller", &self.controller)
            .field("pending", &self.pending)
            .finish_non_exhaustive()
    }
}

impl SessionDriver {
    /// Fetch users and posts, build the feed and start an idle session.
    ///
    /// # Errors
    ///
    /// [`SessionError::Load`] when either fetch fails, and
    /// [`SessionError::Search`] for invalid matcher options.
    #[instrument(skip_all)]
    pub async fn load(
        source: Arc<dyn FeedSource>,
        options: SessionOptions,
    ) -> Result<Self, SessionError> {
        options.match_options.validate()?;

        let user_records = source.fetch_all_users().await?;
        let post_records = source.fetch_all_posts().await?;

        let aggregator = Aggregator::new(TemplateAvatars::new(options.avatar_template))
            .with_window_months(options.window_months);
        let mut rng = match options.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let users = aggregator.build_users(&user_records);
        let feed = aggregator.build_feed_with(&post_records, &users, Utc::now(), &mut rng);
        info!(users = users.len(), posts = feed.len(), "Feed loaded");

        let controller = SessionController::new(users, options.match_options)?;
        let (tx, rx) = mpsc::unbounded_channel();

        Ok(Self {
            source,
            aggregator,
            rng,
            feed,
            controller,
            tx,
            rx,
            pending: 0,
        })
    }

    /// The aggregated feed, newest first
    #[must_use]
    pub fn feed(&self) -> &[Post] {
        &self.feed
    }

    /// The session controller
    #[must_use]
    pub fn controller(&self) -> &SessionController {
        &self.controller
    }

    /// Fetches started and not yet applied
    #[must_use]
    pub fn pending(&self) -> usize {
        self.pending
    }

    /// Forward a search box change
    pub fn query_changed(&mut self, text: &str) {
        self.controller.on_query_change(text);
    }

    /// Forward a search box focus
    pub fn focus(&mut self) {
        self.controller.on_focus();
    }

    /// Select a user and start fetching their posts in the background.
    ///
    /// Must be called inside a tokio runtime.
    ///
    /// # Errors
    ///
    /// Whatever [`SessionController::on_select_user`] rejects; no fetch is
    /// started then.
    pub fn select_user(&mut self, user_id: UserId) -> Result<PostRequest, SessionError> {
        let request = self.controller.on_select_user(user_id)?;

        let source = Arc::clone(&self.source);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let fetch = tokio::spawn(async move { source.fetch_posts_by_user(request.user_id).await });
            // Panics are reported too so `pending` always drains
            let result = fetch.await.unwrap_or_else(|e| {
                warn!(user_id = %request.user_id, error = %e, "Post fetch aborted");
                Err(SourceError::Transport(format!("post fetch aborted: {e}")))
            });
            // The receiver lives as long as the driver
            let _ = tx.send(Fetched { request, result });
        });
        self.pending += 1;
        debug!(%user_id, generation = request.generation, "Post fetch started");

        Ok(request)
    }

    /// Forward a detail close
    pub fn close_detail(&mut self) {
        self.controller.on_close_detail();
    }

    /// Forward a search box clear
    pub fn clear(&mut self) {
        self.controller.on_clear();
    }

    /// Wait for the next fetch to finish and apply it.
    ///
    /// Returns `None` when nothing is in flight.
    pub async fn next_completion(&mut self) -> Option<Completion> {
        if self.pending == 0 {
            return None;
        }

        let fetched = self.rx.recv().await?;
        self.pending -= 1;
        Some(self.apply(fetched))
    }

    /// Apply completions until no fetch is in flight.
    pub async fn settle(&mut self) {
        while self.next_completion().await.is_some() {}
    }

    /// Feed plus session
    #[must_use]
    pub fn snapshot(&self) -> AppSnapshot<'_> {
        AppSnapshot {
            feed: &self.feed,
            session: self.controller.snapshot(),
        }
    }

    fn apply(&mut self, fetched: Fetched) -> Completion {
        let Fetched { request, result } = fetched;
        if !self.controller.awaits(request.generation) {
            return self.controller.on_posts_loaded(request.generation, Ok(Vec::new()));
        }

        let posts = result.map(|records| {
            self.aggregator
                .build_feed_with(&records, self.controller.users(), Utc::now(), &mut self.rng)
        });
        self.controller.on_posts_loaded(request.generation, posts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::SessionState;
    use async_trait::async_trait;
    use feedlens_feed::{PostId, StaticSource, UserRecord};
    use std::collections::HashMap;
    use std::sync::Mutex;
    use tokio::sync::oneshot;

    const POSTS: &str = r#"[
        {"userId": 1, "id": 1, "title": "sunt aut facere", "body": "quia et suscipit"},
        {"userId": 1, "id": 2, "title": "qui est esse", "body": "est rerum tempore"},
        {"userId": 2, "id": 11, "title": "et ea vero", "body": "delectus reiciendis"},
        {"userId": 2, "id": 12, "title": "in quibusdam", "body": "itaque id aut"},
        {"userId": 9, "id": 81, "title": "orphan", "body": "no such user"}
    ]"#;

    const USERS: &str = r#"[
        {"id": 1, "name": "Leanne Graham", "username": "Bret"},
        {"id": 2, "name": "Ervin Howell", "username": "Antonette"},
        {"id": 3, "name": "Clementine Bauch", "username": "Samantha"}
    ]"#;

    fn fixtures() -> StaticSource {
        StaticSource::from_json(POSTS, USERS).unwrap()
    }

    fn seeded() -> SessionOptions {
        SessionOptions {
            seed: Some(42),
            ..SessionOptions::default()
        }
    }

    /// Holds each user's post fetch until the test releases it.
    struct GatedSource {
        inner: StaticSource,
        gates: Mutex<HashMap<UserId, oneshot::Receiver<()>>>,
    }

    impl GatedSource {
        fn new(users: &[u64]) -> (Self, HashMap<UserId, oneshot::Sender<()>>) {
            let mut senders = HashMap::new();
            let mut receivers = HashMap::new();
            for &id in users {
                let (tx, rx) = oneshot::channel();
                senders.insert(UserId(id), tx);
                receivers.insert(UserId(id), rx);
            }
            let source = Self {
                inner: fixtures(),
                gates: Mutex::new(receivers),
            };
            (source, senders)
        }
    }

    #[async_trait]
    impl FeedSource for GatedSource {
        async fn fetch_all_posts(&self) -> Result<Vec<PostRecord>, SourceError> {
            self.inner.fetch_all_posts().await
        }

        async fn fetch_all_users(&self) -> Result<Vec<UserRecord>, SourceError> {
            self.inner.fetch_all_users().await
        }

        async fn fetch_posts_by_user(&self, user_id: UserId) -> Result<Vec<PostRecord>, SourceError> {
            let gate = self.gates.lock().unwrap().remove(&user_id);
            if let Some(gate) = gate {
                let _ = gate.await;
            }
            self.inner.fetch_posts_by_user(user_id).await
        }
    }

    /// Fails whatever it is configured to fail.
    struct FailingSource {
        inner: StaticSource,
        fail_load: bool,
    }

    #[async_trait]
    impl FeedSource for FailingSource {
        async fn fetch_all_posts(&self) -> Result<Vec<PostRecord>, SourceError> {
            self.inner.fetch_all_posts().await
        }

        async fn fetch_all_users(&self) -> Result<Vec<UserRecord>, SourceError> {
            if self.fail_load {
                return Err(SourceError::Transport("connection refused".into()));
            }
            self.inner.fetch_all_users().await
        }

        async fn fetch_posts_by_user(&self, _user_id: UserId) -> Result<Vec<PostRecord>, SourceError> {
            Err(SourceError::Status {
                status: 503,
                message: "Service Unavailable".into(),
            })
        }
    }

    /// Panics on every post fetch.
    struct PanickingSource(StaticSource);

    #[async_trait]
    impl FeedSource for PanickingSource {
        async fn fetch_all_posts(&self) -> Result<Vec<PostRecord>, SourceError> {
            self.0.fetch_all_posts().await
        }

        async fn fetch_all_users(&self) -> Result<Vec<UserRecord>, SourceError> {
            self.0.fetch_all_users().await
        }

        async fn fetch_posts_by_user(&self, user_id: UserId) -> Result<Vec<PostRecord>, SourceError> {
            panic!("no posts for {user_id}");
        }
    }

    #[test]
    fn test_options_from_default_config() {
        let options = SessionOptions::from_config(&ConfigSchema::default());
        assert_eq!(options.match_options, MatchOptions::default());
        assert_eq!(options.window_months, 24);
        assert_eq!(options.avatar_template, "https://robohash.org/{id}?set=set4");
        assert!(options.seed.is_none());
    }

    #[tokio::test]
    async fn test_load_builds_sorted_feed() {
        let driver = SessionDriver::load(Arc::new(fixtures()), seeded()).await.unwrap();

        let feed = driver.feed();
        assert_eq!(feed.len(), 5);
        assert!(feed.windows(2).all(|w| w[0].created_at >= w[1].created_at));

        let orphan = feed.iter().find(|p| p.id == PostId(81)).unwrap();
        assert_eq!(orphan.author_display_name, "Unknown User");
        assert_eq!(driver.controller().users().len(), 3);
    }

    #[tokio::test]
    async fn test_seed_makes_feed_reproducible() {
        let a = SessionDriver::load(Arc::new(fixtures()), seeded()).await.unwrap();
        let b = SessionDriver::load(Arc::new(fixtures()), seeded()).await.unwrap();
        let ids = |d: &SessionDriver| d.feed().iter().map(|p| p.id).collect::<Vec<_>>();
        assert_eq!(ids(&a), ids(&b));
    }

    #[tokio::test]
    async fn test_load_failure_is_reported() {
        let source = FailingSource {
            inner: fixtures(),
            fail_load: true,
        };
        let err = SessionDriver::load(Arc::new(source), seeded()).await.unwrap_err();
        assert!(matches!(err, SessionError::Load(SourceError::Transport(_))));
    }

    #[tokio::test]
    async fn test_select_then_detail() {
        let mut driver = SessionDriver::load(Arc::new(fixtures()), seeded()).await.unwrap();
        driver.query_changed("Leane");
        assert_eq!(driver.snapshot().session.candidates[0].id, UserId(1));

        driver.select_user(UserId(1)).unwrap();
        assert_eq!(driver.pending(), 1);
        assert_eq!(driver.next_completion().await, Some(Completion::Applied));
        assert_eq!(driver.next_completion().await, None);

        let snapshot = driver.snapshot();
        assert_eq!(snapshot.session.state, SessionState::Detail);
        assert_eq!(snapshot.session.selected_user_posts.len(), 2);
        assert!(snapshot
            .session
            .selected_user_posts
            .iter()
            .all(|p| p.author_display_name == "Leanne Graham"));
    }

    #[tokio::test]
    async fn test_newer_selection_wins_when_it_finishes_first() {
        let (source, mut gates) = GatedSource::new(&[1, 2]);
        let mut driver = SessionDriver::load(Arc::new(source), seeded()).await.unwrap();

        driver.select_user(UserId(1)).unwrap();
        driver.select_user(UserId(2)).unwrap();

        gates.remove(&UserId(2)).unwrap().send(()).unwrap();
        assert_eq!(driver.next_completion().await, Some(Completion::Applied));

        gates.remove(&UserId(1)).unwrap().send(()).unwrap();
        assert_eq!(driver.next_completion().await, Some(Completion::Stale));

        let session = driver.snapshot().session;
        assert_eq!(session.state, SessionState::Detail);
        assert_eq!(session.selected_user.unwrap().id, UserId(2));
        assert!(session
            .selected_user_posts
            .iter()
            .all(|p| p.author_id == Some(UserId(2))));
    }

    #[tokio::test]
    async fn test_newer_selection_wins_when_it_finishes_last() {
        let (source, mut gates) = GatedSource::new(&[1, 2]);
        let mut driver = SessionDriver::load(Arc::new(source), seeded()).await.unwrap();

        driver.select_user(UserId(1)).unwrap();
        driver.select_user(UserId(2)).unwrap();

        gates.remove(&UserId(1)).unwrap().send(()).unwrap();
        assert_eq!(driver.next_completion().await, Some(Completion::Stale));
        assert_eq!(driver.snapshot().session.state, SessionState::Selected);

        gates.remove(&UserId(2)).unwrap().send(()).unwrap();
        driver.settle().await;

        let session = driver.snapshot().session;
        assert_eq!(session.selected_user.unwrap().id, UserId(2));
        assert_eq!(session.selected_user_posts.len(), 2);
        assert_eq!(driver.pending(), 0);
    }

    #[tokio::test]
    async fn test_fetch_failure_keeps_selection() {
        let source = FailingSource {
            inner: fixtures(),
            fail_load: false,
        };
        let mut driver = SessionDriver::load(Arc::new(source), seeded()).await.unwrap();

        driver.select_user(UserId(3)).unwrap();
        assert_eq!(driver.next_completion().await, Some(Completion::Failed));

        let session = driver.snapshot().session;
        assert_eq!(session.state, SessionState::Selected);
        assert!(!session.loading);
        assert!(session.error.unwrap().contains("503"));
    }

    #[tokio::test]
    async fn test_panicking_fetch_still_settles() {
        let mut driver = SessionDriver::load(Arc::new(PanickingSource(fixtures())), seeded())
            .await
            .unwrap();

        driver.select_user(UserId(2)).unwrap();
        driver.settle().await;
        assert_eq!(driver.pending(), 0);

        let session = driver.snapshot().session;
        assert_eq!(session.state, SessionState::Selected);
        assert!(!session.loading);
        assert!(session.error.unwrap().contains("aborted"));
    }

    #[tokio::test]
    async fn test_unknown_user_starts_no_fetch() {
        let mut driver = SessionDriver::load(Arc::new(fixtures()), seeded()).await.unwrap();
        let err = driver.select_user(UserId(404)).unwrap_err();
        assert_eq!(err, SessionError::UnknownUser(UserId(404)));
        assert_eq!(driver.pending(), 0);
        assert_eq!(driver.snapshot().session.state, SessionState::Idle);
    }

    #[tokio::test]
    async fn test_close_before_completion() {
        let mut driver = SessionDriver::load(Arc::new(fixtures()), seeded()).await.unwrap();
        driver.focus();
        driver.select_user(UserId(2)).unwrap();
        driver.close_detail();
        driver.settle().await;

        let session = driver.snapshot().session;
        assert_eq!(session.state, SessionState::Idle);
        assert!(session.selected_user.is_none());
    }

    #[tokio::test]
    async fn test_clear_in_detail_keeps_profile() {
        let mut driver = SessionDriver::load(Arc::new(fixtures()), seeded()).await.unwrap();
        driver.select_user(UserId(1)).unwrap();
        driver.settle().await;
        driver.clear();
        driver.clear();
        assert_eq!(driver.snapshot().session.state, SessionState::Detail);
    }
}
