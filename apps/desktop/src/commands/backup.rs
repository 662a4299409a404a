//! Backup commands.

use crate::backup::{BackupOutcome, DailyBackupGate, SqliteBackup};
use crate::db::date_utils;
use crate::lookup::DictionaryLookup;
use crate::state::AppState;

use super::{lock_book, CommandError};

/// Mirror the store into the backup database if today's backup is still due.
pub fn run_daily_backup<L: DictionaryLookup>(
    state: &AppState<L>,
) -> Result<BackupOutcome, CommandError> {
    if !state.config.backup_enabled {
        return Ok(BackupOutcome::Disabled);
    }
    let gate = DailyBackupGate::new(&state.config.data_dir);
    let now = date_utils::now();
    if !gate.is_due(now.date()) {
        return Ok(BackupOutcome::AlreadyDone);
    }

    let words = lock_book(state, "run_daily_backup")?.store().as_map().clone();
    let outcome = match SqliteBackup::open(state.config.backup_db_path()) {
        Ok(sink) => gate.run(&sink, &words, now),
        Err(e) => BackupOutcome::Failed {
            message: e.to_string(),
        },
    };
    Ok(outcome)
}
