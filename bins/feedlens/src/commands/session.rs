//! Session command: a line-driven search session
//!
//! Each stdin line is one event:
//!
//! ```text
//! type <text>   search box changed (no text clears it)
//! focus         search box focused
//! select <id>   user picked; starts the post fetch
//! wait          apply finished fetches
//! close         close the profile
//! clear         clear the search box
//! show          print the session and the top of the feed
//! metrics       print counters and timings
//! quit          leave
//! ```
//!
//! The session snapshot is printed after every event.

use crate::context::AppContext;
use crate::render;
use anyhow::Result;
use chrono::Utc;
use feedlens_cli::output::Status;
use feedlens_feed::UserId;
use feedlens_session::{Completion, SessionDriver};
use feedlens_telemetry::metrics;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

const FEED_ROWS: usize = 5;

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Type(String),
    Focus,
    Select(u64),
    Wait,
    Close,
    Clear,
    Show,
    Metrics,
    Quit,
}

fn parse(line: &str) -> std::result::Result<Command, String> {
    let line = line.trim_end_matches(['\r', '\n']);
    let (word, rest) = match line.trim_start().split_once(' ') {
        Some((word, rest)) => (word, rest),
        None => (line.trim(), ""),
    };

    match word {
        "type" => Ok(Command::Type(rest.to_string())),
        "focus" => Ok(Command::Focus),
        "select" => rest
            .trim()
            .parse()
            .map(Command::Select)
            .map_err(|_| format!("not a user id: {:?}", rest.trim())),
        "wait" => Ok(Command::Wait),
        "close" => Ok(Command::Close),
        "clear" => Ok(Command::Clear),
        "show" => Ok(Command::Show),
        "metrics" => Ok(Command::Metrics),
        "quit" | "exit" => Ok(Command::Quit),
        other => Err(format!("unknown command: {other}")),
    }
}

/// Read events from stdin until `quit` or end of input
pub async fn run(ctx: &AppContext) -> Result<()> {
    let mut driver = ctx.load().await?;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    print_state(ctx, &driver)?;

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        let command = match parse(&line) {
            Ok(command) => command,
            Err(message) => {
                Status::warning(&message);
                continue;
            }
        };
        debug!(?command, "Session event");

        match command {
            Command::Type(text) => driver.query_changed(&text),
            Command::Focus => driver.focus(),
            Command::Select(id) => {
                metrics().increment("selections");
                if let Err(e) = driver.select_user(UserId(id)) {
                    Status::warning(&e.to_string());
                }
            }
            Command::Wait => {
                while let Some(completion) = driver.next_completion().await {
                    let name = match completion {
                        Completion::Applied => "completions_applied",
                        Completion::Failed => "completions_failed",
                        Completion::Stale => "completions_stale",
                    };
                    metrics().increment(name);
                }
            }
            Command::Close => driver.close_detail(),
            Command::Clear => driver.clear(),
            Command::Show => {
                if ctx.json {
                    render::print_json_line(&driver.snapshot())?;
                } else {
                    render::print_app(&driver.snapshot(), Utc::now(), FEED_ROWS);
                }
                continue;
            }
            Command::Metrics => {
                render::print_json_line(&metrics().export_json())?;
                continue;
            }
            Command::Quit => break,
        }

        print_state(ctx, &driver)?;
    }

    Ok(())
}

fn print_state(ctx: &AppContext, driver: &SessionDriver) -> Result<()> {
    let session = driver.snapshot().session;
    if ctx.json {
        render::print_json_line(&session)
    } else {
        render::print_session(&session, Utc::now());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(parse("type Leane"), Ok(Command::Type("Leane".into())));
        assert_eq!(parse("type Ervin Howell"), Ok(Command::Type("Ervin Howell".into())));
        assert_eq!(parse("type"), Ok(Command::Type(String::new())));
        assert_eq!(parse("select 2"), Ok(Command::Select(2)));
        assert_eq!(parse("  focus"), Ok(Command::Focus));
        assert_eq!(parse("exit"), Ok(Command::Quit));
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse("select bob").is_err());
        assert!(parse("dance").is_err());
    }
}
