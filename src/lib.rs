pub mod cli;
pub mod config;
pub mod core;
pub mod log;
pub mod sources;

use crate::core::currency;
use crate::sources::SnapshotSource;
use anyhow::{bail, Result};
use std::path::PathBuf;
use tracing::{debug, info};

/// Commands the CLI can dispatch into the library.
pub enum AppCommand {
    Summary,
    Export { out: Option<PathBuf> },
    Convert {
        amount: f64,
        currency: String,
        base: String,
        rate: f64,
    },
}

fn build_source(config: &config::AppConfig) -> Result<Box<dyn SnapshotSource>> {
    if let Some(base_url) = &config.source.base_url {
        debug!(%base_url, "using HTTP snapshot source");
        return Ok(Box::new(sources::http::HttpSource::new(base_url)));
    }
    if let Some(data_file) = &config.source.data_file {
        debug!(path = %data_file.display(), "using file snapshot source");
        return Ok(Box::new(sources::file::FileSource::new(data_file)));
    }
    bail!(
        "No snapshot source configured. Set either source.base_url or source.data_file \
         in the config file (run `proflow setup` to create one)."
    );
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("ProFlow dashboard starting...");

    let config = match config_path {
        Some(path) => config::AppConfig::load_from_path(path)?,
        None => config::AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    match command {
        AppCommand::Summary => {
            let source = build_source(&config)?;
            cli::summary::run(source.as_ref(), &config).await
        }
        AppCommand::Export { out } => {
            let source = build_source(&config)?;
            let out = out.unwrap_or_else(cli::export::default_out_path);
            cli::export::run(source.as_ref(), &out).await
        }
        AppCommand::Convert {
            amount,
            currency: from,
            base,
            rate,
        } => {
            let converted = currency::to_base(amount, &from, &base, rate);
            println!(
                "{} {} -> {} {}",
                amount,
                currency::normalize(&from),
                cli::ui::format_amount(converted),
                currency::normalize(&base)
            );
            Ok(())
        }
    }
}
