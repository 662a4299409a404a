//! SQLite schema for the backup mirror.

/// Daily snapshots of the word store, one row per word per backup date.
pub const BACKUP_SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS words_backup (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    backup_date TEXT NOT NULL,
    word TEXT NOT NULL,
    meaning TEXT,
    examples TEXT,
    review_count INTEGER NOT NULL DEFAULT 0,
    last_review TEXT,
    last_review_date TEXT,
    today_reviewed INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
);

CREATE INDEX IF NOT EXISTS idx_words_backup_date ON words_backup(backup_date);
CREATE INDEX IF NOT EXISTS idx_words_backup_word ON words_backup(word);
"#;

pub const DELETE_BACKUP_DAY: &str = "DELETE FROM words_backup WHERE backup_date = ?1";

pub const INSERT_BACKUP_ROW: &str = r#"
INSERT INTO words_backup
    (backup_date, word, meaning, examples, review_count, last_review, last_review_date, today_reviewed)
VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
"#;
