//! askmypdf CLI entry point.

use anyhow::Result;
use askmypdf::cli::{commands, Cli, Commands};
use askmypdf::config::{EnvOverrides, Settings};
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration: TOML file, then env file, then process environment
    let mut settings = match &cli.config {
        Some(path) => Settings::load_from(Some(&PathBuf::from(path)))?,
        None => Settings::load()?,
    };
    let overrides = EnvOverrides::from_file(Path::new(&cli.env_file))?
        .merge(EnvOverrides::from_process_env());
    overrides.apply(&mut settings);
    if let Some(model) = &cli.model {
        settings.llm.model = model.clone();
    }

    // Initialize logging
    let log_level = match cli.verbose {
        0 => settings.general.log_level.as_str(),
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("askmypdf={}", log_level)),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    // Execute command
    match &cli.command {
        Commands::Ask { question, file } => {
            commands::run_ask(question, file.as_deref(), settings).await?;
        }

        Commands::Chat { file } => {
            commands::run_chat(file.as_deref(), settings).await?;
        }

        Commands::Search {
            query,
            file,
            k,
            fetch_k,
            json,
        } => {
            commands::run_search(query, file.as_deref(), *k, *fetch_k, *json, settings).await?;
        }

        Commands::Config { action } => {
            commands::run_config(action, settings)?;
        }
    }

    Ok(())
}
