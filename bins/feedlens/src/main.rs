//! feedlens - browse a social feed and fuzzy-search its authors
//!
//! Loads posts and users from a JSONPlaceholder-style API (or a fixtures
//! directory), joins them into a time-ordered feed and drives a search
//! session over the user set.

use clap::{Parser, Subcommand};
use feedlens_cli::output::Status;
use feedlens_core::config::Config;
use feedlens_core::error::exit_codes;
use feedlens_telemetry::TelemetryConfig;
use std::path::PathBuf;
use std::process::ExitCode;

mod commands;
mod context;
mod render;

use commands::{config, feed, search, session, user};
use context::AppContext;

/// Browse a social feed and fuzzy-search its authors
#[derive(Parser)]
#[command(name = "feedlens")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Configuration file (defaults to ./feedlens.toml if present)
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Read posts.json and users.json from this directory instead of the API
    #[arg(long, global = true, value_name = "DIR")]
    fixtures: Option<PathBuf>,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the feed, newest first
    Feed {
        /// Maximum number of posts to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Fuzzy-search users by name
    Search {
        /// Name or fragment to look for
        query: String,

        /// Maximum score to accept (0.0 exact .. 1.0 anything)
        #[arg(short, long)]
        threshold: Option<f64>,

        /// Maximum number of matches to show
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Show a user's profile and posts
    User {
        /// User id
        id: u64,
    },

    /// Drive a search session from stdin, one event per line
    Session,

    /// Print the effective configuration
    Config,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            let code = e.exit_code();
            report(&anyhow::Error::from(e), cli.json);
            return exit(code);
        }
    };

    let telemetry = TelemetryConfig {
        log_level: config.schema.telemetry.log_level.clone(),
        json: config.schema.telemetry.json,
        ..TelemetryConfig::default()
    }
    .with_verbosity(cli.verbose);
    if let Err(e) = feedlens_telemetry::init_with_config(&telemetry) {
        Status::warning(&format!("Logging disabled: {e}"));
    }

    let ctx = AppContext::new(config, cli.fixtures, cli.json);

    let result = match cli.command {
        Commands::Feed { limit } => feed::run(&ctx, limit).await,
        Commands::Search {
            query,
            threshold,
            limit,
        } => search::run(&ctx, &query, threshold, limit).await,
        Commands::User { id } => user::run(&ctx, id).await,
        Commands::Session => session::run(&ctx).await,
        Commands::Config => config::run(&ctx),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            report(&e, cli.json);
            exit(exit_code_for(&e))
        }
    }
}

fn exit_code_for(err: &anyhow::Error) -> i32 {
    err.downcast_ref::<feedlens_core::Error>()
        .map_or(exit_codes::FAILURE, feedlens_core::Error::exit_code)
}

fn exit(code: i32) -> ExitCode {
    ExitCode::from(u8::try_from(code).unwrap_or(1))
}

fn report(err: &anyhow::Error, json: bool) {
    let core = err.downcast_ref::<feedlens_core::Error>();

    if json {
        let value = match core {
            Some(core) => serde_json::to_value(core.to_report()).unwrap_or_default(),
            None => serde_json::json!({ "message": err.to_string() }),
        };
        eprintln!("{value}");
        return;
    }

    Status::error(&format!("{err:#}"));
}
