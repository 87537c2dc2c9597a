//! UI State Machine

use clap::Parser;
use ui_fsm::{Config, Result, VERSION, cli, init_logging};

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Cli::parse();

    let config = if let Some(config_path) = &args.config {
        Config::from_file(config_path)?
    } else {
        Config::load()?
    };

    // Command line level wins over the configured one
    init_logging(args.log_level.as_deref().unwrap_or(&config.logging.level));

    tracing::info!("UI State Machine v{}", VERSION);
    tracing::debug!("Parsed arguments: {:?}", args);
    tracing::debug!("Loaded configuration: {:?}", config);

    cli::execute(args, config).await?;

    Ok(())
}
