//! voxrag CLI entry point.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use voxrag::cli::{commands, Cli, Commands};
use voxrag::config::Settings;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let settings = match &cli.config {
        Some(path) => Settings::load_from(Some(&std::path::PathBuf::from(path)))?,
        None => Settings::load()?,
    };

    // Initialize logging; -v flags override the configured level
    let log_level = match cli.verbose {
        0 => settings.general.log_level.as_str(),
        1 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("voxrag={}", log_level)),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    match &cli.command {
        Commands::Serve { host, port } => {
            commands::run_serve(host.clone(), *port, settings).await?;
        }

        Commands::Search { query, docs, top_k } => {
            commands::run_search(query, docs, *top_k, settings).await?;
        }

        Commands::Config { action } => {
            commands::run_config(action, settings)?;
        }
    }

    Ok(())
}
