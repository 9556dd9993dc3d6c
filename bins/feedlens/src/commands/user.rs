//! User command: select a user and show the profile overlay

use crate::context::AppContext;
use crate::render;
use anyhow::Result;
use chrono::Utc;
use feedlens_cli::output::Status;
use feedlens_core::{Error, ErrorCode};
use feedlens_feed::UserId;
use feedlens_session::SessionState;

/// Select user `id`, wait for their posts and print the profile
pub async fn run(ctx: &AppContext, id: u64) -> Result<()> {
    let mut driver = ctx.load().await?;
    driver
        .select_user(UserId(id))
        .map_err(Error::from)?;
    driver.settle().await;

    let session = driver.snapshot().session;
    if session.state != SessionState::Detail {
        let message = session
            .error
            .unwrap_or_else(|| "Posts did not load".to_string());
        return Err(Error::new(ErrorCode::TransportError, message).into());
    }

    if ctx.json {
        return render::print_json(&session);
    }

    if let Some(user) = &session.selected_user {
        render::print_user(user);
    }
    Status::subheader(&format!("Posts ({})", session.selected_user_posts.len()));
    render::print_feed(&session.selected_user_posts, Utc::now());
    Ok(())
}
