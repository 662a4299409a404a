//! Local persistence: the JSON word file and the SQLite backup schema.

pub mod date_utils;
pub mod error;
pub mod migrations;
pub mod repository;
pub mod schema;

pub use error::StorageError;
pub use repository::{JsonFileRepository, DATA_FILE};
