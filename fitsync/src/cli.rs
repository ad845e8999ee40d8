///
/// This module implements the CLI interface for fitsync — command parsing,
/// argument validation, and the async entrypoint.
///
/// All core business logic (data model, feed clients, pipeline) lives in the
/// [`fitsync-core`] crate. This module is strictly CLI glue: it loads the YAML
/// config, constructs the concrete collaborators, and invokes the pipeline.
///
/// ## How To Use
/// - For command-line users: use the installed `fitsync` binary with `--help`.
/// - For programmatic/integration use: call [`run`] with a constructed [`Cli`].
///
/// ## Extending
/// When adding subcommands, update [`Commands`] below and keep all
/// non-trivial business logic inside `fitsync-core`.
use crate::load_config::{load_config, resolve_password};
use crate::store::RestStoreClient;
use anyhow::Result;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
/// # fitsync CLI Interface (Module)
use fitsync_core::config::ImportConfig;
use fitsync_core::contract::{DateRange, EntryStore};
use fitsync_core::feed::{DietFeedClient, WeightFeedClient};
use fitsync_core::import::{import, FeedOutcome};
use fitsync_core::session::FormLoginAuthenticator;
use std::path::PathBuf;

/// CLI for fitsync: import diet and weight history into a per-day entry store.
#[derive(Parser)]
#[clap(
    name = "fitsync",
    version,
    about = "Import diet and weight history from the upstream diary into the entry store"
)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run one import over the configured date range (safe to re-run)
    Import {
        /// Path to the YAML config file
        #[clap(long)]
        config: PathBuf,
        /// Override the configured start date (YYYY-MM-DD)
        #[clap(long)]
        start: Option<NaiveDate>,
        /// Override the configured end date (YYYY-MM-DD)
        #[clap(long)]
        end: Option<NaiveDate>,
    },
    /// Print all stored entries as JSON
    Entries {
        /// Path to the YAML config file
        #[clap(long)]
        config: PathBuf,
    },
}

/// Extracted async CLI logic entrypoint for integration tests and main()
pub async fn run(cli: Cli) -> Result<()> {
    tracing::info!("trace_initialised");

    match cli.command {
        Commands::Import { config, start, end } => {
            let config = load_config(config)?;
            tracing::info!(command = "import", "Starting import run");

            let password = resolve_password(&config.import)?;
            let range = DateRange::new(
                start.unwrap_or(config.import.start_date),
                end.unwrap_or(config.import.end_date),
            )?;
            let import_config = ImportConfig {
                username: config.import.username.clone(),
                password,
                range,
            };
            import_config.trace_loaded();

            let store = RestStoreClient::new(&config.store.host, &config.store.database)
                .map_err(|e| anyhow::anyhow!("Failed to construct store client: {e}"))?;
            let authenticator = FormLoginAuthenticator::new();
            let diet = DietFeedClient::new();
            let weight = WeightFeedClient::new();

            let report = import(&import_config, &authenticator, &diet, &weight, &store).await?;
            tracing::info!(command = "import", ?report, "Import complete");

            let mut failures = Vec::new();
            if let FeedOutcome::Failed(e) = &report.diet {
                failures.push(format!("diet: {e}"));
            }
            if let FeedOutcome::Failed(e) = &report.weight {
                failures.push(format!("weight: {e}"));
            }
            if failures.is_empty() {
                Ok(())
            } else {
                Err(anyhow::anyhow!(
                    "Import finished with feed failures: {}",
                    failures.join("; ")
                ))
            }
        }
        Commands::Entries { config } => {
            let config = load_config(config)?;
            tracing::info!(command = "entries", "Listing stored entries");

            let store = RestStoreClient::new(&config.store.host, &config.store.database)
                .map_err(|e| anyhow::anyhow!("Failed to construct store client: {e}"))?;
            let entries = store
                .find_all()
                .await
                .map_err(|e| anyhow::anyhow!("Failed to fetch entries: {e}"))?;
            println!("{}", serde_json::to_string_pretty(&entries)?);
            Ok(())
        }
    }
}
