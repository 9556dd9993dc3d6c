//! Configuration schema definitions

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Root configuration schema
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ConfigSchema {
    /// Feed source endpoint settings
    #[serde(default)]
    pub api: ApiConfig,

    /// Fuzzy matcher settings
    #[serde(default)]
    pub search: SearchConfig,

    /// Feed aggregation settings
    #[serde(default)]
    pub feed: FeedConfig,

    /// Logging settings
    #[serde(default)]
    pub telemetry: TelemetrySection,
}

impl ConfigSchema {
    /// Check value ranges that serde cannot express
    pub fn validate(&self) -> Result<()> {
        if self.api.base_url.is_empty() {
            return Err(Error::config_invalid("api.base_url cannot be empty"));
        }
        if !self.api.base_url.starts_with("http://") && !self.api.base_url.starts_with("https://")
        {
            return Err(Error::config_invalid(
                "api.base_url must start with http:// or https://",
            ));
        }
        if self.api.timeout_secs == 0 {
            return Err(Error::config_invalid("api.timeout_secs cannot be zero"));
        }
        if !(0.0..=1.0).contains(&self.search.threshold) {
            return Err(Error::config_invalid(format!(
                "search.threshold must be within 0.0..=1.0, got {}",
                self.search.threshold
            )));
        }
        if self.search.distance == 0 {
            return Err(Error::config_invalid("search.distance cannot be zero"));
        }
        if !self.feed.avatar_template.contains("{id}") {
            return Err(Error::config_invalid(
                "feed.avatar_template must contain an {id} placeholder",
            ));
        }
        Ok(())
    }
}

/// Feed source endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL serving `/posts` and `/users`
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Default public demo endpoint
pub const DEFAULT_BASE_URL: &str = "https://jsonplaceholder.typicode.com";

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

/// Fuzzy matcher configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Maximum normalized dissimilarity admitted into results
    #[serde(default = "default_threshold")]
    pub threshold: f64,

    /// Characters after which a match position costs a full point
    #[serde(default = "default_distance")]
    pub distance: usize,

    /// Score matches regardless of where they start in the name
    #[serde(default)]
    pub ignore_location: bool,

    /// Cap on returned candidates
    #[serde(default)]
    pub limit: Option<usize>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
            distance: default_distance(),
            ignore_location: false,
            limit: None,
        }
    }
}

fn default_threshold() -> f64 {
    0.3
}

fn default_distance() -> usize {
    100
}

/// Feed aggregation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    /// Width of the synthetic timestamp window, in calendar months before now
    #[serde(default = "default_window_months")]
    pub window_months: u32,

    /// Avatar URL template; `{id}` is replaced by the user id
    #[serde(default = "default_avatar_template")]
    pub avatar_template: String,

    /// Seed for reproducible timestamps
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            window_months: default_window_months(),
            avatar_template: default_avatar_template(),
            seed: None,
        }
    }
}

fn default_window_months() -> u32 {
    24
}

/// Default avatar template
pub const DEFAULT_AVATAR_TEMPLATE: &str = "https://robohash.org/{id}?set=set4";

fn default_avatar_template() -> String {
    DEFAULT_AVATAR_TEMPLATE.to_string()
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetrySection {
    /// Default `tracing` filter when `FEEDLENS_LOG` is unset
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Emit JSON log lines instead of compact text
    #[serde(default)]
    pub json: bool,
}

impl Default for TelemetrySection {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            json: false,
        }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        assert!(ConfigSchema::default().validate().is_ok());
    }

    #[test]
    fn test_partial_sections_fill_defaults() {
        let schema: ConfigSchema = toml::from_str("[api]\ntimeout_secs = 5").unwrap();
        assert_eq!(schema.api.timeout_secs, 5);
        assert_eq!(schema.api.base_url, DEFAULT_BASE_URL);
        assert_eq!(schema.search.distance, 100);
        assert_eq!(schema.feed.avatar_template, DEFAULT_AVATAR_TEMPLATE);
    }

    #[test]
    fn test_avatar_template_needs_placeholder() {
        let mut schema = ConfigSchema::default();
        schema.feed.avatar_template = "https://example.com/avatar.png".to_string();
        assert!(schema.validate().is_err());
    }

    #[test]
    fn test_base_url_scheme() {
        let mut schema = ConfigSchema::default();
        schema.api.base_url = "ftp://example.com".to_string();
        assert!(schema.validate().is_err());
    }
}
