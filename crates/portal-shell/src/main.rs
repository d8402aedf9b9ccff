//! Banking portal host shell - Entry Point

use anyhow::Result;
use clap::Parser;
use tracing::info;

/// Banking portal host shell
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Configuration file path (can also be set via PORTAL_CONFIG env var)
    #[arg(short, long)]
    config: Option<String>,

    #[command(subcommand)]
    command: portal_shell::Command,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    portal_telemetry::init_logging()?;

    info!("Starting banking portal v{}", env!("CARGO_PKG_VERSION"));

    // Config path: CLI arg > PORTAL_CONFIG env var > default
    let config_path = portal_shell::AppConfig::resolve_path(args.config);
    info!(config_path = %config_path, "Loading configuration");

    let config = portal_shell::AppConfig::load_with_env(&config_path)?;
    info!(
        source = %config.source,
        host_origin = %config.host_origin,
        delay_ms = config.submission.delay_ms,
        "Configuration loaded"
    );

    let app = portal_shell::Application::new(config)?;
    app.run(args.command).await?;

    Ok(())
}
