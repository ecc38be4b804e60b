use linestep::cli::{self, Cli, Commands};
use linestep::config::Config;
use linestep::logging;

use anyhow::Context;
use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Handle --init flag
    if cli.init {
        return cli::init_config(&cli.config);
    }

    // Load config, then let flags win
    let mut config = Config::load_or_default(&cli.config)
        .with_context(|| format!("Failed to load config '{}'", cli.config))?;
    cli.apply_overrides(&mut config);

    logging::init(&config.log)?;

    if let Some(Commands::Attach { host, port, auto }) = &cli.command {
        return cli::attach(host, *port, *auto).await;
    }

    let target = cli.target()?.to_path_buf();

    // The session blocks its thread at every break, so keep it off the runtime workers
    let report = tokio::task::spawn_blocking(move || cli::run_session(&config, &target))
        .await
        .context("Debug session panicked")??;

    if let Some(fault) = &report.fault {
        tracing::warn!(%fault, breaks = report.breaks, "target did not complete");
    }

    Ok(())
}
