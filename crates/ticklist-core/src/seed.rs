//! Default dataset shipped with the application
//!
//! These records are merged under whatever the user has persisted on every
//! load. Persisted records with a colliding id win, so editing or toggling a
//! default todo survives across sessions.

use crate::models::Todo;

const DEFAULT_TODOS: &[(i64, &str, bool)] = &[
    (1, "Learn Rust ownership", false),
    (2, "Read the tokio tutorial", false),
    (3, "Write a CLI with clap", false),
    (4, "Persist state to disk", false),
    (5, "Add light and dark themes", false),
    (6, "Handle storage errors", false),
    (7, "Write integration tests", false),
    (8, "Ship the first release", true),
];

/// Build a fresh copy of the default dataset
///
/// Each call returns new owned records; callers may mutate the result freely.
pub fn default_todos() -> Vec<Todo> {
    DEFAULT_TODOS
        .iter()
        .map(|&(id, title, completed)| Todo {
            id,
            title: title.to_string(),
            completed,
        })
        .collect()
}
