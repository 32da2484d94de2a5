use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use proflow::log::init_logging;
use std::path::PathBuf;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

impl From<Commands> for proflow::AppCommand {
    fn from(cmd: Commands) -> proflow::AppCommand {
        match cmd {
            Commands::Summary => proflow::AppCommand::Summary,
            Commands::Export { out } => proflow::AppCommand::Export { out },
            Commands::Convert {
                amount,
                currency,
                base,
                rate,
            } => proflow::AppCommand::Convert {
                amount,
                currency,
                base,
                rate,
            },
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Display the finance dashboard across all projects
    Summary,
    /// Export expenses and invoices to CSV
    Export {
        /// Output file (defaults to proflow-export-<date>.csv)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Convert an amount to a base currency at an explicit rate
    Convert {
        amount: f64,
        /// Source currency code
        currency: String,
        /// Base currency code
        #[arg(default_value = "USD")]
        base: String,
        /// Units of the source currency per one unit of base
        #[arg(default_value_t = 0.0)]
        rate: f64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => setup(),
        Some(cmd) => proflow::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}

fn setup() -> anyhow::Result<()> {
    use anyhow::Context;

    let path = proflow::config::AppConfig::default_config_path()?;

    if path.exists() {
        anyhow::bail!("Configuration file already exists at {}", path.display());
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let default_config = r#"---
# Currency that all totals are normalized into.
base_currency: "USD"

# Rows shown in the top-customers ranking.
top_customers: 5

# Where snapshots come from: a JSON export file or the store's REST facade.
source:
  data_file: "proflow-data.json"
  # base_url: "http://localhost:8080"
"#;

    std::fs::write(&path, default_config)
        .with_context(|| format!("Failed to write config file to {}", path.display()))?;

    tracing::info!("Created default configuration at {}", path.display());
    Ok(())
}
