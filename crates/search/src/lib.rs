//! Fuzzy name search for feedlens.
//!
//! This crate provides:
//! - Levenshtein and optimal-string-alignment edit distances
//! - Approximate substring scoring normalized to `0.0..=1.0`
//! - A frozen, thread-safe [`FuzzyIndex`] over any item with a string key
//!
//! ```
//! use feedlens_search::{FuzzyIndex, MatchOptions};
//!
//! let names = vec!["Leanne Graham".to_string(), "Ervin Howell".to_string()];
//! let index = FuzzyIndex::build(names, |name| name.as_str());
//! let hits = index.search("Leane", &MatchOptions::default()).unwrap();
//! assert_eq!(hits.len(), 1);
//! assert_eq!(hits[0].item, "Leanne Graham");
//! ```

mod error;
mod fuzzy;
mod index;

pub use error::{Result, SearchError};
pub use fuzzy::{alignments, best_alignment, fuzzy_match, levenshtein_distance, osa_distance, Alignment};
pub use index::{FuzzyIndex, MatchOptions, DEFAULT_DISTANCE, DEFAULT_THRESHOLD};

/// Search result with its match score.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct SearchResult<T> {
    /// The matched item
    pub item: T,
    /// Normalized dissimilarity, 0.0 is an exact match
    pub score: f64,
    /// Position of the item in the indexed collection
    pub position: usize,
}
