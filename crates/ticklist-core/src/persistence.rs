//! Load and save routines
//!
//! The whole working set is stored as one JSON array under a single key:
//!
//! ```text
//! [{"id":2,"title":"Walk dog","completed":false},{"id":1,"title":"Buy milk","completed":true}]
//! ```
//!
//! Loading validates each element on its own. Elements that are not
//! well-formed todos are dropped with a warning; a value that is not an
//! array at all fails the load and is copied aside under `<key>.corrupt`.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::{TodoError, TodoResult};
use crate::models::Todo;
use crate::reconcile::reconcile;
use crate::storage::KeyValueStore;
use crate::working_set::WorkingSet;

pub use crate::storage::CORRUPT_SUFFIX;

/// Read persisted todos and reconcile them with the defaults
///
/// An absent key is treated as an empty persisted list.
pub async fn load<S: KeyValueStore>(
    provider: &S,
    key: &str,
    defaults: &[Todo],
) -> TodoResult<WorkingSet> {
    let raw = provider
        .get(key)
        .await
        .map_err(|e| TodoError::PersistenceRead {
            key: key.to_string(),
            source: Arc::new(e),
        })?;

    let persisted = match raw {
        None => {
            debug!("No todos stored under '{}'", key);
            Vec::new()
        }
        Some(raw) => match parse_persisted(&raw) {
            Ok(todos) => todos,
            Err(e) => {
                let backup_key = back_up_corrupt(provider, key, raw).await;
                return Err(TodoError::Parse {
                    key: key.to_string(),
                    backup_key,
                    source: Arc::new(e),
                });
            }
        },
    };

    let persisted_count = persisted.len();
    let set = reconcile(defaults, persisted);
    info!(
        "Loaded {} stored todos from '{}', {} after merge",
        persisted_count,
        key,
        set.len()
    );
    Ok(set)
}

/// Serialize the whole working set and overwrite the stored value
pub async fn save<S: KeyValueStore>(
    provider: &S,
    key: &str,
    set: &WorkingSet,
) -> TodoResult<()> {
    let json = encode(set)?;
    provider
        .set(key, json)
        .await
        .map_err(|e| TodoError::PersistenceWrite {
            key: key.to_string(),
            source: Arc::new(e),
        })?;
    debug!("Saved {} todos to '{}'", set.len(), key);
    Ok(())
}

/// Encode a working set in the persisted format
pub fn encode(set: &WorkingSet) -> TodoResult<String> {
    serde_json::to_string(set).map_err(|e| TodoError::Encode(Arc::new(e)))
}

/// Parse a stored value into well-formed todos
///
/// Fails only if the value is not a JSON array. Malformed elements are
/// skipped.
pub fn parse_persisted(raw: &str) -> Result<Vec<Todo>, serde_json::Error> {
    let values: Vec<Value> = serde_json::from_str(raw)?;
    let total = values.len();

    let todos: Vec<Todo> = values
        .into_iter()
        .enumerate()
        .filter_map(|(index, value)| match serde_json::from_value::<Todo>(value) {
            Ok(todo) => Some(todo),
            Err(e) => {
                warn!("Dropping malformed stored todo at index {}: {}", index, e);
                None
            }
        })
        .collect();

    if todos.len() < total {
        warn!("Dropped {} of {} stored todos", total - todos.len(), total);
    }
    Ok(todos)
}

/// Copy an unparsable value aside so the next save does not destroy it
async fn back_up_corrupt<S: KeyValueStore>(
    provider: &S,
    key: &str,
    raw: String,
) -> Option<String> {
    let backup_key = format!("{}{}", key, CORRUPT_SUFFIX);
    match provider.set(&backup_key, raw).await {
        Ok(()) => {
            warn!("Copied unreadable todos from '{}' to '{}'", key, backup_key);
            Some(backup_key)
        }
        Err(e) => {
            warn!("Could not back up unreadable todos from '{}': {}", key, e);
            None
        }
    }
}
