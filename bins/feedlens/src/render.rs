//! Text and JSON rendering of feed, users and session snapshots

use anyhow::Result;
use chrono::{DateTime, Utc};
use feedlens_cli::output::{format_count, relative_time, truncate, Status};
use feedlens_feed::{Post, User};
use feedlens_search::SearchResult;
use feedlens_session::{AppSnapshot, SessionSnapshot, SessionState};
use owo_colors::OwoColorize;
use serde::Serialize;

const BODY_WIDTH: usize = 72;

/// Pretty-printed JSON on stdout
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// One JSON document per line on stdout
pub fn print_json_line<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string(value)?);
    Ok(())
}

pub fn print_post(post: &Post, now: DateTime<Utc>) {
    let author = if post.has_known_author() {
        post.author_display_name.bold().to_string()
    } else {
        post.author_display_name.dimmed().to_string()
    };
    println!(
        "{} {} {}",
        author,
        "·".dimmed(),
        relative_time(post.created_at, now).dimmed()
    );
    println!("  {}", post.title);
    let body = post.body.replace('\n', " ");
    println!("  {}", truncate(&body, BODY_WIDTH).dimmed());
}

pub fn print_feed(posts: &[Post], now: DateTime<Utc>) {
    for (i, post) in posts.iter().enumerate() {
        if i > 0 {
            println!();
        }
        print_post(post, now);
    }
}

pub fn print_user(user: &User) {
    Status::header(&format!("{} (@{})", user.display_name, user.username));
    println!("  {:<9} {}", "id".dimmed(), user.id);
    println!("  {:<9} {}", "email".dimmed(), user.email);
    println!("  {:<9} {}", "phone".dimmed(), user.phone_number);
    println!("  {:<9} {}", "website".dimmed(), user.website_url);
    if let Some(company) = &user.company_name {
        println!("  {:<9} {}", "company".dimmed(), company);
    }
    if let Some(city) = &user.city {
        println!("  {:<9} {}", "city".dimmed(), city);
    }
    println!("  {:<9} {}", "avatar".dimmed(), user.avatar_url);
}

pub fn print_matches(results: &[SearchResult<User>]) {
    if results.is_empty() {
        Status::warning("No matching users");
        return;
    }
    for result in results {
        println!(
            "{}  {:>4}  {}",
            format!("{:.3}", result.score).dimmed(),
            format!("#{}", result.item.id).cyan(),
            result.item.display_name
        );
    }
}

fn state_label(state: SessionState) -> String {
    match state {
        SessionState::Idle => state.to_string().dimmed().to_string(),
        SessionState::Suggesting => state.to_string().blue().to_string(),
        SessionState::Selected => state.to_string().yellow().to_string(),
        SessionState::Detail => state.to_string().green().to_string(),
    }
}

/// Compact view of the session after a transition
pub fn print_session(session: &SessionSnapshot, now: DateTime<Utc>) {
    println!(
        "[{}] query={:?} generation={}",
        state_label(session.state),
        session.query,
        session.generation
    );

    match session.state {
        SessionState::Idle => {}
        SessionState::Suggesting => {
            if session.candidates.is_empty() {
                println!("  {}", "no suggestions".dimmed());
            }
            for user in &session.candidates {
                println!("  {:>4}  {}", format!("#{}", user.id).cyan(), user.display_name);
            }
        }
        SessionState::Selected => {
            if let Some(user) = &session.selected_user {
                println!("  selected {} (#{})", user.display_name, user.id);
            }
            if session.loading {
                println!("  {}", "loading posts...".dimmed());
            }
            if let Some(error) = &session.error {
                println!("  {} {}", "error:".red(), error);
            }
        }
        SessionState::Detail => {
            if let Some(user) = &session.selected_user {
                println!(
                    "  {} (#{}) {}",
                    user.display_name.bold(),
                    user.id,
                    format_count(session.selected_user_posts.len(), "post", "posts").dimmed()
                );
            }
            for post in &session.selected_user_posts {
                println!(
                    "    {} {} {}",
                    "-".dimmed(),
                    post.title,
                    relative_time(post.created_at, now).dimmed()
                );
            }
        }
    }
}

/// Full view: the session plus the top of the feed underneath it
pub fn print_app(snapshot: &AppSnapshot<'_>, now: DateTime<Utc>, feed_rows: usize) {
    print_session(&snapshot.session, now);
    Status::subheader(&format!(
        "Feed ({})",
        format_count(snapshot.feed.len(), "post", "posts")
    ));
    print_feed(&snapshot.feed[..snapshot.feed.len().min(feed_rows)], now);
}
