//! Activity store error handling

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur in the durable activity store
#[derive(Error, Debug)]
pub enum ActivityError {
    /// Failed to create the data directory
    #[error("Failed to create data directory '{path}': {source}")]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// SQLite database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Record could not be encoded or decoded
    #[error("Record serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The connection lock was poisoned by a panicking writer
    #[error("Activity store connection is no longer usable")]
    Poisoned,
}

/// Result type for activity store operations
pub type ActivityResult<T> = Result<T, ActivityError>;
