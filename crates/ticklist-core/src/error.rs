//! Engine error handling
//!
//! Every error here is non-fatal to the session: the store logs it and keeps
//! serving the in-memory working set. Invalid operation arguments (blank
//! titles, unknown ids) are not errors at all.
//!
//! Sources are held in `Arc` so an error can be reported both to the log
//! and to whoever is waiting on a flush.

use std::sync::Arc;

use thiserror::Error;

use crate::storage::StorageError;

/// Errors produced while loading or saving the working set
#[derive(Error, Debug, Clone)]
pub enum TodoError {
    /// The provider failed to read the stored value
    #[error("Failed to read todos from '{key}': {source}")]
    PersistenceRead {
        key: String,
        #[source]
        source: Arc<StorageError>,
    },

    /// The stored value exists but is not a JSON array
    #[error("Stored todos under '{key}' could not be parsed: {source}")]
    Parse {
        key: String,
        /// Key the unreadable value was copied to, if the copy succeeded
        backup_key: Option<String>,
        #[source]
        source: Arc<serde_json::Error>,
    },

    /// The provider failed to write the working set
    #[error("Failed to write todos to '{key}': {source}")]
    PersistenceWrite {
        key: String,
        #[source]
        source: Arc<StorageError>,
    },

    /// The working set could not be encoded
    #[error("Failed to encode todos: {0}")]
    Encode(#[source] Arc<serde_json::Error>),

    /// The background writer exited before settling pending writes
    #[error("Background writer stopped before todos were persisted")]
    WriterStopped,
}

impl TodoError {
    /// True for failures on the load path
    pub fn is_read_error(&self) -> bool {
        matches!(self, TodoError::PersistenceRead { .. } | TodoError::Parse { .. })
    }

    /// True for failures on the save path
    pub fn is_write_error(&self) -> bool {
        !self.is_read_error()
    }

    /// Get a recovery suggestion for this error
    pub fn recovery_suggestion(&self) -> Option<&'static str> {
        match self {
            TodoError::PersistenceRead { source, .. }
            | TodoError::PersistenceWrite { source, .. } => source.recovery_suggestion(),
            TodoError::Parse {
                backup_key: Some(_),
                ..
            } => Some("The unreadable data was copied aside; recover entries from the backup by hand."),
            _ => None,
        }
    }
}

/// Result type for engine operations
pub type TodoResult<T> = Result<T, TodoError>;
