//! Feed command

use crate::context::AppContext;
use crate::render;
use anyhow::Result;
use chrono::Utc;

/// Print the newest `limit` posts
pub async fn run(ctx: &AppContext, limit: usize) -> Result<()> {
    let driver = ctx.load().await?;
    let posts = &driver.feed()[..driver.feed().len().min(limit)];

    if ctx.json {
        return render::print_json(posts);
    }

    render::print_feed(posts, Utc::now());
    Ok(())
}
