pub mod cli;
pub mod core;
pub mod extract;
pub mod providers;

use crate::cli::OutputFormat;
use crate::core::config::AppConfig;
use anyhow::Result;
use tracing::{debug, info};

pub enum AppCommand {
    Rates(OutputFormat),
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("bocfx starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let provider = providers::BocRateProvider::from_config(&config)?;

    match command {
        AppCommand::Rates(format) => cli::rates::run(&provider, format).await,
    }
}
