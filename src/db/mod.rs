pub mod pool;
pub mod repository;
pub mod sqlite;

pub use pool::*;
pub use repository::*;
pub use sqlite::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Migration failed at version {version}: {reason}")]
    MigrationFailed { version: i64, reason: String },

    #[error("Connection pool error: {0}")]
    Pool(String),

    #[error("Constraint violated: {0}")]
    ConstraintViolation(String),
}
