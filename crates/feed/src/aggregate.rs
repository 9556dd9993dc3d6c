//! Feed aggregation: join, timestamp, sort.

use crate::avatar::{AvatarUrlPolicy, TemplateAvatars};
use crate::model::{Post, User, UserId, UNKNOWN_USER};
use crate::record::{PostRecord, UserRecord};
use chrono::{DateTime, Duration, Months, Utc};
use rand::Rng;
use std::collections::HashMap;
use tracing::debug;

/// Default width of the synthetic timestamp window.
pub const DEFAULT_WINDOW_MONTHS: u32 = 24;

/// Joins raw records into displayable users and posts.
///
/// Inputs are never mutated; every call returns fresh values.
pub struct Aggregator {
    avatars: Box<dyn AvatarUrlPolicy>,
    window_months: u32,
}

impl Default for Aggregator {
    fn default() -> Self {
        Self::new(TemplateAvatars::robohash())
    }
}

impl std::fmt::Debug for Aggregator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Aggregator")
            .field("window_months", &self.window_months)
            .finish_non_exhaustive()
    }
}

impl Aggregator {
    /// Aggregator using `avatars` and the default two-year window
    pub fn new(avatars: impl AvatarUrlPolicy + 'static) -> Self {
        Self {
            avatars: Box::new(avatars),
            window_months: DEFAULT_WINDOW_MONTHS,
        }
    }

    /// Change the timestamp window, in calendar months before now
    #[must_use]
    pub fn with_window_months(mut self, months: u32) -> Self {
        self.window_months = months;
        self
    }

    /// Avatar URL for a user id under this aggregator's policy
    #[must_use]
    pub fn avatar_url(&self, id: UserId) -> String {
        self.avatars.avatar_url(id)
    }

    /// Turn user records into users, deriving avatars.
    ///
    /// A record without a name keeps its place under [`UNKNOWN_USER`].
    #[must_use]
    pub fn build_users(&self, records: &[UserRecord]) -> Vec<User> {
        records
            .iter()
            .map(|record| User {
                id: record.id,
                display_name: record
                    .name
                    .clone()
                    .unwrap_or_else(|| UNKNOWN_USER.to_string()),
                username: record.username.clone(),
                email: record.email.clone(),
                phone_number: record.phone.clone(),
                website_url: record.website.clone(),
                company_name: record.company_name.clone(),
                city: record.city.clone(),
                avatar_url: self.avatar_url(record.id),
            })
            .collect()
    }

    /// Join posts with users and order them newest first.
    ///
    /// Uses the wall clock and the thread-local RNG for timestamps.
    #[must_use]
    pub fn build_feed(&self, posts: &[PostRecord], users: &[User]) -> Vec<Post> {
        self.build_feed_with(posts, users, Utc::now(), &mut rand::thread_rng())
    }

    /// Join posts with users using an explicit clock reading and RNG.
    ///
    /// Each post gets a `created_at` drawn uniformly, at millisecond
    /// resolution, from `[now - window, now)`. The sort is stable, so posts
    /// with equal timestamps keep their input order.
    pub fn build_feed_with<R: Rng + ?Sized>(
        &self,
        posts: &[PostRecord],
        users: &[User],
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> Vec<Post> {
        // First user wins on duplicate ids
        let mut by_id: HashMap<UserId, &User> = HashMap::with_capacity(users.len());
        for user in users {
            by_id.entry(user.id).or_insert(user);
        }
        let window_start = self.window_start(now);
        let span_ms = (now - window_start).num_milliseconds();

        let mut feed: Vec<Post> = posts
            .iter()
            .map(|record| {
                let author = record.author_id.and_then(|id| by_id.get(&id).copied());
                if author.is_none() {
                    debug!(post_id = %record.id, author_id = ?record.author_id, "Post author not found");
                }

                let created_at = if span_ms > 0 {
                    window_start + Duration::milliseconds(rng.gen_range(0..span_ms))
                } else {
                    now
                };

                Post {
                    id: record.id,
                    author_id: record.author_id,
                    title: record.title.clone(),
                    body: record.body.clone(),
                    created_at,
                    author_display_name: author
                        .map_or_else(|| UNKNOWN_USER.to_string(), |u| u.display_name.clone()),
                    author_avatar_url: author.map(|u| u.avatar_url.clone()),
                }
            })
            .collect();

        feed.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        feed
    }

    fn window_start(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now.checked_sub_months(Months::new(self.window_months))
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
    }
}
