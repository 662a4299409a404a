//! Once-a-day mirror of the word store into SQLite.
//!
//! The backup is informational: its outcome is logged and reported but never
//! blocks loading, scheduling or grading.

use crate::db::date_utils::log_timestamp;
use crate::db::schema::{BACKUP_SCHEMA, DELETE_BACKUP_DAY, INSERT_BACKUP_ROW};
use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::{params, Connection};
use serde::Serialize;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use vocab_core::store::WordMap;
use vocab_core::types::{DATE_FORMAT, TIMESTAMP_FORMAT};

/// File holding the date of the last successful backup.
pub const FLAG_FILE: &str = "last_backup.txt";

/// Append-only log of backup attempts.
pub const LOG_FILE: &str = "backup_log.txt";

/// SQLite database file inside the data directory.
pub const BACKUP_DB_FILE: &str = "words_backup.db";

#[derive(Debug, thiserror::Error)]
pub enum BackupError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Destination for a full snapshot of the store.
pub trait BackupSink {
    /// Replace the snapshot for `day` with `words`. Returns rows written.
    fn write_snapshot(&self, day: NaiveDate, words: &WordMap) -> Result<usize, BackupError>;
}

/// Backup mirror in a local SQLite database.
pub struct SqliteBackup {
    conn: Connection,
}

impl SqliteBackup {
    /// Open database at path, creating if necessary.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, BackupError> {
        let conn = Connection::open(path)?;
        conn.execute_batch(BACKUP_SCHEMA)?;
        Ok(Self { conn })
    }

    /// Open in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self, BackupError> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(BACKUP_SCHEMA)?;
        Ok(Self { conn })
    }

    /// Number of rows stored for `day`.
    pub fn rows_for(&self, day: NaiveDate) -> Result<usize, BackupError> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM words_backup WHERE backup_date = ?1",
            params![day.format(DATE_FORMAT).to_string()],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }
}

impl BackupSink for SqliteBackup {
    fn write_snapshot(&self, day: NaiveDate, words: &WordMap) -> Result<usize, BackupError> {
        let day = day.format(DATE_FORMAT).to_string();
        let tx = self.conn.unchecked_transaction()?;
        tx.execute(DELETE_BACKUP_DAY, params![day])?;
        {
            let mut insert = tx.prepare(INSERT_BACKUP_ROW)?;
            for (word, record) in words {
                let last_review = record
                    .last_review_at
                    .map(|ts| ts.format(TIMESTAMP_FORMAT).to_string())
                    .unwrap_or_default();
                insert.execute(params![
                    day,
                    word,
                    record.meaning,
                    serde_json::to_string(&record.examples)?,
                    record.review_count,
                    last_review,
                    record.last_review_date.to_string(),
                    record.reviewed_today,
                ])?;
            }
        }
        tx.commit()?;
        Ok(words.len())
    }
}

/// What a backup check did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum BackupOutcome {
    Disabled,
    AlreadyDone,
    EmptyStore,
    Completed { rows: usize },
    Failed { message: String },
}

/// Runs a backup at most once per calendar day.
#[derive(Debug, Clone)]
pub struct DailyBackupGate {
    dir: PathBuf,
}

impl DailyBackupGate {
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        Self { dir: dir.into() }
    }

    fn flag_path(&self) -> PathBuf {
        self.dir.join(FLAG_FILE)
    }

    fn log_path(&self) -> PathBuf {
        self.dir.join(LOG_FILE)
    }

    /// True unless the flag file records `today`. An unreadable flag counts
    /// as not done.
    pub fn is_due(&self, today: NaiveDate) -> bool {
        match fs::read_to_string(self.flag_path()) {
            Ok(last) => last.trim() != today.format(DATE_FORMAT).to_string(),
            Err(_) => true,
        }
    }

    /// Back up `words` through `sink` if today's backup has not run yet.
    pub fn run<S: BackupSink + ?Sized>(
        &self,
        sink: &S,
        words: &WordMap,
        now: NaiveDateTime,
    ) -> BackupOutcome {
        let today = now.date();
        if !self.is_due(today) {
            return BackupOutcome::AlreadyDone;
        }
        if words.is_empty() {
            return BackupOutcome::EmptyStore;
        }

        let outcome = match sink.write_snapshot(today, words) {
            Ok(rows) => match fs::write(self.flag_path(), today.format(DATE_FORMAT).to_string()) {
                Ok(()) => BackupOutcome::Completed { rows },
                Err(e) => BackupOutcome::Failed {
                    message: format!("backup written but flag file failed: {e}"),
                },
            },
            Err(e) => BackupOutcome::Failed {
                message: e.to_string(),
            },
        };

        let message = match &outcome {
            BackupOutcome::Completed { rows } => {
                tracing::info!(rows, "daily backup completed");
                format!("backed up {rows} words")
            }
            BackupOutcome::Failed { message } => {
                tracing::warn!(error = %message, "daily backup failed");
                format!("backup failed: {message}")
            }
            _ => return outcome,
        };
        if let Err(e) = self.append_log(now, &message) {
            tracing::warn!(error = %e, "could not write backup log");
        }
        outcome
    }

    fn append_log(&self, now: NaiveDateTime, message: &str) -> Result<(), BackupError> {
        fs::create_dir_all(&self.dir)?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.log_path())?;
        writeln!(file, "[{}] {}", log_timestamp(now), message)?;
        Ok(())
    }
}
