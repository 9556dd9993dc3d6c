//! Searchable index over a fixed collection.

use crate::error::{Result, SearchError};
use crate::fuzzy::alignments;
use crate::SearchResult;
use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Default maximum score admitted into results.
pub const DEFAULT_THRESHOLD: f64 = 0.3;

/// Default number of graphemes over which the location penalty reaches 1.0.
pub const DEFAULT_DISTANCE: usize = 100;

/// Tunables for [`FuzzyIndex::search`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchOptions {
    /// Candidates scoring above this are discarded
    pub threshold: f64,
    /// A match starting `distance` graphemes into the key costs a full point
    pub distance: usize,
    /// Drop the location penalty entirely
    pub ignore_location: bool,
    /// Keep at most this many results after ranking
    pub limit: Option<usize>,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            distance: DEFAULT_DISTANCE,
            ignore_location: false,
            limit: None,
        }
    }
}

impl MatchOptions {
    /// Options with a specific threshold, validated.
    pub fn with_threshold(threshold: f64) -> Result<Self> {
        let options = Self {
            threshold,
            ..Self::default()
        };
        options.validate()?;
        Ok(options)
    }

    /// Set the location distance
    #[must_use]
    pub fn distance(mut self, distance: usize) -> Self {
        self.distance = distance;
        self
    }

    /// Ignore where in the key the match starts
    #[must_use]
    pub fn ignore_location(mut self, ignore: bool) -> Self {
        self.ignore_location = ignore;
        self
    }

    /// Cap the number of results
    #[must_use]
    pub fn limit(mut self, limit: Option<usize>) -> Self {
        self.limit = limit;
        self
    }

    /// Reject thresholds outside `0.0..=1.0` and a zero distance.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(SearchError::InvalidThreshold(self.threshold));
        }
        if self.distance == 0 && !self.ignore_location {
            return Err(SearchError::InvalidOptions(
                "distance must be positive unless ignore_location is set".to_string(),
            ));
        }
        Ok(())
    }
}

struct Entry<T> {
    item: T,
    key: Vec<String>,
}

/// Frozen fuzzy index.
///
/// Keys are lowercased and split into graphemes once at build time. The index
/// never changes afterwards; build a new one when the collection changes.
pub struct FuzzyIndex<T> {
    entries: Vec<Entry<T>>,
}

fn normalize(text: &str) -> Vec<String> {
    text.trim()
        .to_lowercase()
        .graphemes(true)
        .map(str::to_owned)
        .collect()
}

impl<T> FuzzyIndex<T> {
    /// Build an index, extracting the search key from each item.
    pub fn build<I, F>(items: I, key: F) -> Self
    where
        I: IntoIterator<Item = T>,
        F: Fn(&T) -> &str,
    {
        let entries = items
            .into_iter()
            .map(|item| {
                let key = normalize(key(&item));
                Entry { item, key }
            })
            .collect();
        Self { entries }
    }

    /// Number of indexed items
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the index holds no items
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Indexed items in their original order
    pub fn items(&self) -> impl Iterator<Item = &T> {
        self.entries.iter().map(|e| &e.item)
    }
}

/// Lowest `errors / len + start / distance` over every span of `key`.
#[allow(clippy::cast_precision_loss)]
fn score(query: &[&str], key: &[String], options: &MatchOptions) -> f64 {
    let key: Vec<&str> = key.iter().map(String::as_str).collect();

    alignments(query, &key)
        .into_iter()
        .map(|found| {
            let accuracy = found.errors as f64 / query.len() as f64;
            let proximity = if options.ignore_location {
                0.0
            } else {
                found.start as f64 / options.distance as f64
            };
            accuracy + proximity
        })
        .fold(1.0, f64::min)
}

impl<T: Clone + Send + Sync> FuzzyIndex<T> {
    /// Rank indexed items against `query`.
    ///
    /// Results are ordered by ascending score, ties by original position.
    ///
    /// # Errors
    ///
    /// [`SearchError::EmptyQuery`] when the query is blank, and the
    /// validation errors of [`MatchOptions::validate`].
    pub fn search(&self, query: &str, options: &MatchOptions) -> Result<Vec<SearchResult<T>>> {
        options.validate()?;

        let query = normalize(query);
        if query.is_empty() {
            return Err(SearchError::EmptyQuery);
        }
        let query: Vec<&str> = query.iter().map(String::as_str).collect();

        let rank = |(position, entry): (usize, &Entry<T>)| {
            let score = score(&query, &entry.key, options);
            (score <= options.threshold).then_some((position, score))
        };

        #[cfg(feature = "parallel")]
        let mut hits: Vec<(usize, f64)> =
            self.entries.par_iter().enumerate().filter_map(rank).collect();
        #[cfg(not(feature = "parallel"))]
        let mut hits: Vec<(usize, f64)> =
            self.entries.iter().enumerate().filter_map(rank).collect();

        // Stable sort keeps index order on equal scores
        hits.sort_by(|a, b| a.1.total_cmp(&b.1));

        if let Some(limit) = options.limit {
            hits.truncate(limit);
        }

        Ok(hits
            .into_iter()
            .map(|(position, score)| SearchResult {
                item: self.entries[position].item.clone(),
                score,
                position,
            })
            .collect())
    }
}
