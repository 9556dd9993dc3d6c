//! Shared command context: configuration, feed source, session loading

use anyhow::Result;
use feedlens_api_client::{ClientConfig, FeedClient};
use feedlens_cli::output::{format_count, format_duration};
use feedlens_cli::progress;
use feedlens_core::config::Config;
use feedlens_feed::{FeedSource, StaticSource};
use feedlens_session::{SessionDriver, SessionError, SessionOptions};
use feedlens_telemetry::{metrics, Timer};
use indicatif::ProgressBar;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// Everything a command needs
pub struct AppContext {
    pub config: Config,
    pub fixtures: Option<PathBuf>,
    pub json: bool,
}

impl AppContext {
    pub fn new(config: Config, fixtures: Option<PathBuf>, json: bool) -> Self {
        Self {
            config,
            fixtures,
            json,
        }
    }

    /// Session options from config
    pub fn session_options(&self) -> SessionOptions {
        SessionOptions::from_config(&self.config.schema)
    }

    /// Fixtures directory when given, the HTTP API otherwise
    pub fn source(&self) -> Result<Arc<dyn FeedSource>> {
        if let Some(dir) = &self.fixtures {
            info!(dir = %dir.display(), "Reading fixtures");
            let source = StaticSource::from_dir(dir)
                .map_err(|e| feedlens_core::Error::from(SessionError::Load(e)))?;
            return Ok(Arc::new(source));
        }

        let config = ClientConfig::from_config(&self.config.schema.api)
            .map_err(feedlens_core::Error::from)?;
        info!(base_url = %config.base_url, "Using HTTP feed source");
        let client = FeedClient::with_config(config).map_err(feedlens_core::Error::from)?;
        Ok(Arc::new(client))
    }

    /// Load the feed with default session options
    pub async fn load(&self) -> Result<SessionDriver> {
        self.load_with(self.session_options()).await
    }

    /// Load the feed and start a session
    pub async fn load_with(&self, options: SessionOptions) -> Result<SessionDriver> {
        let source = self.source()?;
        let spinner = if self.json {
            ProgressBar::hidden()
        } else {
            progress::spinner("Loading feed...")
        };

        let timer = Timer::start("feed_load_ms");
        match SessionDriver::load(source, options).await {
            Ok(driver) => {
                let elapsed = timer.stop();
                let posts = driver.feed().len();
                metrics().increment_by("posts_loaded", posts as u64);
                metrics().increment_by("users_loaded", driver.controller().users().len() as u64);
                progress::finish_success(
                    &spinner,
                    &format!(
                        "Loaded {} in {}",
                        format_count(posts, "post", "posts"),
                        format_duration(elapsed)
                    ),
                );
                Ok(driver)
            }
            Err(e) => {
                progress::finish_error(&spinner, "Load failed");
                Err(feedlens_core::Error::from(e).into())
            }
        }
    }
}
