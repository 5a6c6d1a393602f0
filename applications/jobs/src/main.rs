/// Tunes Jobs - smart playlist derivation runner
use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tunes_core::{PlayEvent, SmartPlaylistStore, TrackId, UserId};
use tunes_jobs::{open_store, JobsConfig, Scheduler};
use tunes_smart_playlists::SmartPlaylistDeriver;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "tunes-jobs")]
#[command(about = "Recomputes Recently Played, Weekly Top and Discover Weekly playlists", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true, env = "TUNES_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Derive every playlist once and exit
    RunOnce {
        /// Only this user (defaults to the configured users)
        #[arg(short, long)]
        user: Option<String>,
    },
    /// Derive playlists for the configured users on an interval
    Serve,
    /// Show a user's smart playlists
    List {
        #[arg(short, long)]
        user: String,
    },
    /// Append a play event to the log
    RecordPlay {
        #[arg(short, long)]
        user: String,
        #[arg(short, long)]
        track: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "tunes_jobs=info,tunes_smart_playlists=info,tunes_storage=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = JobsConfig::load(cli.config.as_deref())?;
    config.validate()?;

    match cli.command {
        Commands::RunOnce { user } => run_once(&config, user).await?,
        Commands::Serve => serve(&config).await?,
        Commands::List { user } => list(&config, &user).await?,
        Commands::RecordPlay { user, track } => record_play(&config, &user, &track).await?,
    }

    Ok(())
}

async fn run_once(config: &JobsConfig, user: Option<String>) -> anyhow::Result<()> {
    let users = match user {
        Some(user) => vec![UserId::new(user)],
        None => config.users(),
    };
    if users.is_empty() {
        anyhow::bail!("No users to derive for (pass --user or set deriver.users)");
    }

    let store = open_store(&config.storage.database_url).await?;
    let deriver = Arc::new(SmartPlaylistDeriver::new(store, config.jobs.clone()));
    let scheduler = Scheduler::new(deriver, users, config.interval());

    let summary = scheduler.run_cycle().await;
    if summary.jobs_failed > 0 {
        anyhow::bail!("{} derivation jobs failed", summary.jobs_failed);
    }
    Ok(())
}

async fn serve(config: &JobsConfig) -> anyhow::Result<()> {
    let users = config.users();
    if users.is_empty() {
        anyhow::bail!("No users configured (set deriver.users)");
    }

    tracing::info!("Starting Tunes Jobs");
    tracing::info!("Users: {}", users.len());
    tracing::info!("Interval: {}s", config.deriver.interval_secs);

    let store = open_store(&config.storage.database_url).await?;
    let deriver = Arc::new(SmartPlaylistDeriver::new(store, config.jobs.clone()));
    let scheduler = Scheduler::new(deriver, users, config.interval());

    scheduler
        .run(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("Failed to listen for shutdown signal: {}", e);
                std::future::pending::<()>().await;
            }
        })
        .await;
    Ok(())
}

async fn list(config: &JobsConfig, user: &str) -> anyhow::Result<()> {
    let store = open_store(&config.storage.database_url).await?;
    let playlists = store
        .list_smart_playlists(&UserId::new(user))
        .await
        .context("Failed to list smart playlists")?;

    println!("Smart playlists for {}:", user);
    for playlist in playlists {
        let recomputed = playlist
            .last_recomputed_at
            .map(|at| at.to_rfc3339())
            .unwrap_or_else(|| "never".to_string());
        println!(
            "  {} - {} tracks (recomputed: {})",
            playlist.kind.name(),
            playlist.track_count,
            recomputed
        );
    }

    Ok(())
}

async fn record_play(config: &JobsConfig, user: &str, track: &str) -> anyhow::Result<()> {
    let store = open_store(&config.storage.database_url).await?;
    let event = PlayEvent::new(UserId::new(user), TrackId::new(track), chrono::Utc::now());
    let id = tunes_storage::play_events::record(store.pool(), &event).await?;

    tracing::info!("Recorded play {} of {} for {}", id, track, user);
    Ok(())
}
