mod app;
mod cli;
mod config;
mod diff;
mod git;
mod highlighting;
mod panel;
mod tree;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let args = cli::Args::parse();

    // Handle shell completion generation
    if let Some(shell) = args.completions {
        cli::generate_completions(shell);
        return Ok(());
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = config::load();
    let app = app::App::new(args, config)?;
    app.run()
}
