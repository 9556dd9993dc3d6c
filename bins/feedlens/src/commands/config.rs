//! Config command

use crate::context::AppContext;
use crate::render;
use anyhow::Result;
use feedlens_cli::output::Status;

/// Print the effective configuration and where it came from
pub fn run(ctx: &AppContext) -> Result<()> {
    let schema = &ctx.config.schema;

    if ctx.json {
        return render::print_json(schema);
    }

    match &ctx.config.path {
        Some(path) => Status::info(&format!("Loaded from {path}")),
        None => Status::info("No config file found, using defaults"),
    }
    println!();
    print!("{}", toml::to_string_pretty(schema)?);
    Ok(())
}
