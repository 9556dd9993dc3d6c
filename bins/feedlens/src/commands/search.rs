//! Search command

use crate::context::AppContext;
use crate::render;
use anyhow::Result;
use feedlens_session::SessionError;

/// Rank users against `query`
pub async fn run(
    ctx: &AppContext,
    query: &str,
    threshold: Option<f64>,
    limit: Option<usize>,
) -> Result<()> {
    let mut options = ctx.session_options();
    if let Some(threshold) = threshold {
        options.match_options.threshold = threshold;
    }
    if limit.is_some() {
        options.match_options.limit = limit;
    }
    let match_options = options.match_options.clone();

    let driver = ctx.load_with(options).await?;
    let results = driver
        .controller()
        .index()
        .search(query, &match_options)
        .map_err(|e| feedlens_core::Error::from(SessionError::Search(e)))?;

    if ctx.json {
        return render::print_json(&results);
    }

    render::print_matches(&results);
    Ok(())
}
