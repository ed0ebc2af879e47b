//! Qasid - maintenance CLI for saved progress and catalog data

mod commands;
mod config;

use anyhow::Context;
use clap::{Parser, Subcommand};
use qasid_catalog::FirebaseStorageResolver;
use qasid_core::TrackId;
use qasid_playback::ProgressStore;
use qasid_storage::SqliteKeyValueStore;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::AppConfig;

#[derive(Parser)]
#[command(name = "qasid")]
#[command(about = "Qasid player maintenance tool", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true, env = "QASID_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect or edit saved listening progress
    Progress {
        #[command(subcommand)]
        command: ProgressCommand,
    },
    /// Resolve a storage path to a playable URL
    Resolve {
        /// Storage-relative path, e.g. nasheeds/tala-al-badru.mp3
        path: String,
    },
    /// Build a playback queue from catalog JSON
    Queue {
        #[command(subcommand)]
        command: QueueCommand,
    },
}

#[derive(Subcommand)]
enum ProgressCommand {
    /// List saved positions
    List,
    /// Forget the saved position of one track
    Clear {
        /// Track id, e.g. quran:7:18 or nasheed:abc
        track_id: String,
    },
    /// Forget every saved position
    Reset,
}

#[derive(Subcommand)]
enum QueueCommand {
    /// Queue of a reciter document
    Reciter {
        /// Path to the reciter JSON
        file: PathBuf,
    },
    /// Queue of a nasheed document array
    Nasheeds {
        /// Path to the nasheeds JSON
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "qasid=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref())?;
    let mut out = std::io::stdout().lock();

    match cli.command {
        Commands::Progress { command } => {
            let store = open_progress_store(&config).await?;
            match command {
                ProgressCommand::List => {
                    commands::list_progress(&store, &config.player, &mut out).await?;
                }
                ProgressCommand::Clear { track_id } => {
                    commands::clear_progress(&store, &TrackId::new(track_id), &mut out).await?;
                }
                ProgressCommand::Reset => {
                    commands::reset_progress(&store, &mut out).await?;
                }
            }
        }
        Commands::Resolve { path } => {
            let bucket = config
                .resolver
                .bucket
                .as_deref()
                .context("resolver.bucket is not configured")?;
            let resolver = FirebaseStorageResolver::new(&config.resolver.endpoint, bucket)?;
            commands::resolve(&resolver, &path, &mut out).await?;
        }
        Commands::Queue { command } => match command {
            QueueCommand::Reciter { file } => {
                commands::reciter_queue_from_file(&file, &mut out)?;
            }
            QueueCommand::Nasheeds { file } => {
                commands::nasheed_queue_from_file(&file, &mut out)?;
            }
        },
    }

    Ok(())
}

async fn open_progress_store(config: &AppConfig) -> anyhow::Result<ProgressStore> {
    let database_url = &config.storage.database_url;
    if let Some(path) = database_url.strip_prefix("sqlite://") {
        if let Some(parent) = std::path::Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
        }
    }

    let pool = qasid_storage::create_pool(database_url).await?;
    qasid_storage::run_migrations(&pool).await?;
    tracing::debug!("Database connected");

    let store = Arc::new(SqliteKeyValueStore::new(pool));
    Ok(ProgressStore::new(store, config.player.progress_key.clone()))
}
