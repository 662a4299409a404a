pub mod backup;
pub mod commands;
pub mod config;
pub mod db;
pub mod fetch;
pub mod lookup;
pub mod state;

use crate::backup::BackupOutcome;
use crate::config::AppConfig;
use crate::db::date_utils;
use crate::lookup::HttpDictionary;
use crate::state::AppState;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Install the global subscriber, filtered by `RUST_LOG` (default `info`).
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Open the data directory, run the daily backup and prepare today's review.
pub fn run() -> anyhow::Result<()> {
    let config = AppConfig::from_env()?;
    init_tracing();

    std::fs::create_dir_all(&config.data_dir)?;
    tracing::info!(data_dir = %config.data_dir.display(), "starting word review");

    let scheduler = config.load_scheduler_config()?;
    let lookup = HttpDictionary::new(config.lookup_timeout)?;
    let state = AppState::open(config, scheduler, lookup)?;

    match commands::run_daily_backup(&state)? {
        BackupOutcome::Completed { rows } => tracing::info!(rows, "backup written"),
        BackupOutcome::Failed { message } => tracing::warn!(%message, "backup failed"),
        outcome => tracing::debug!(?outcome, "backup skipped"),
    }

    commands::rebuild_tasks(&state)?;
    let stats = commands::get_statistics(&state)?;
    tracing::info!(
        today = %date_utils::today(),
        total = stats.total,
        unreviewed = stats.unreviewed,
        reviewing = stats.reviewing,
        mastered = stats.mastered,
        due = stats.today_total.saturating_sub(stats.today_done),
        "ready"
    );
    Ok(())
}
