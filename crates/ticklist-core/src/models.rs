//! Data models for Ticklist
//!
//! Defines the todo record and the patch used by the edit screen.
//! The serialized field names (`id`, `title`, `completed`) are the
//! persisted format and must not change.

use serde::{Deserialize, Serialize};

/// Maximum title length accepted at entry time, in characters
pub const MAX_TITLE_LEN: usize = 30;

/// Identifier of a todo record
pub type TodoId = i64;

/// A single todo record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Todo {
    /// Identity key, unique within a working set
    pub id: TodoId,
    /// User-supplied title
    pub title: String,
    /// Whether the todo is done
    pub completed: bool,
}

impl Todo {
    /// Create an open todo with the given id and title
    ///
    /// The title is bounded to [`MAX_TITLE_LEN`] characters.
    pub fn new(id: TodoId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: bound_title(title.into()),
            completed: false,
        }
    }

    /// Flip the completed flag
    pub fn toggle(&mut self) {
        self.completed = !self.completed;
    }

    /// Apply the fields present in a patch
    pub fn apply(&mut self, patch: &TodoPatch) {
        if let Some(ref title) = patch.title {
            self.title = bound_title(title.clone());
        }
        if let Some(completed) = patch.completed {
            self.completed = completed;
        }
    }
}

/// Partial update for a todo; `None` fields are left untouched
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TodoPatch {
    pub title: Option<String>,
    pub completed: Option<bool>,
}

impl TodoPatch {
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            completed: None,
        }
    }

    pub fn completed(completed: bool) -> Self {
        Self {
            title: None,
            completed: Some(completed),
        }
    }

    /// True if the patch carries no fields
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.completed.is_none()
    }
}

/// Returns true if the title has no visible content
pub fn is_blank(title: &str) -> bool {
    title.trim().is_empty()
}

/// Cut a title down to [`MAX_TITLE_LEN`] characters
fn bound_title(title: String) -> String {
    match title.char_indices().nth(MAX_TITLE_LEN) {
        Some((end, _)) => title[..end].to_string(),
        None => title,
    }
}
