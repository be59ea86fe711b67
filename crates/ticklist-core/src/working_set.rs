//! The working set
//!
//! An ordered, id-unique collection of todos. Every mutation is a pure
//! transformation: it returns a new `WorkingSet` when something changed and
//! `None` when the input was invalid (blank title, unknown id). Invalid input
//! is never an error.

use serde::{Deserialize, Serialize};

use crate::models::{is_blank, Todo, TodoId, TodoPatch};

/// Ordered collection of todos for the current session
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkingSet {
    todos: Vec<Todo>,
}

impl WorkingSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records in display order
    pub fn todos(&self) -> &[Todo] {
        &self.todos
    }

    pub fn len(&self) -> usize {
        self.todos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.todos.is_empty()
    }

    pub fn get(&self, id: TodoId) -> Option<&Todo> {
        self.todos.iter().find(|t| t.id == id)
    }

    /// Number of completed todos
    pub fn completed_count(&self) -> usize {
        self.todos.iter().filter(|t| t.completed).count()
    }

    /// Id the next created todo will receive
    ///
    /// `None` once the largest id is `TodoId::MAX`.
    pub fn next_id(&self) -> Option<TodoId> {
        self.todos.iter().map(|t| t.id).max().unwrap_or(0).checked_add(1)
    }

    /// Add a todo at the front
    ///
    /// Returns `None` when the title is blank or no id is left.
    pub fn with_created(&self, title: &str) -> Option<(WorkingSet, TodoId)> {
        if is_blank(title) {
            return None;
        }

        let id = self.next_id()?;
        let mut todos = Vec::with_capacity(self.todos.len() + 1);
        todos.push(Todo::new(id, title));
        todos.extend(self.todos.iter().cloned());
        Some((Self { todos }, id))
    }

    /// Flip the completed flag of a todo
    pub fn with_toggled(&self, id: TodoId) -> Option<WorkingSet> {
        self.map_one(id, Todo::toggle)
    }

    /// Remove a todo
    pub fn with_deleted(&self, id: TodoId) -> Option<WorkingSet> {
        self.get(id)?;
        let todos = self.todos.iter().filter(|t| t.id != id).cloned().collect();
        Some(Self { todos })
    }

    /// Replace the patched fields of a todo in place
    ///
    /// An empty patch, or one whose title is blank, changes nothing.
    pub fn with_updated(&self, id: TodoId, patch: &TodoPatch) -> Option<WorkingSet> {
        if patch.is_empty() || patch.title.as_deref().is_some_and(is_blank) {
            return None;
        }
        self.map_one(id, |todo| todo.apply(patch))
    }

    fn map_one(&self, id: TodoId, f: impl FnOnce(&mut Todo)) -> Option<WorkingSet> {
        let index = self.todos.iter().position(|t| t.id == id)?;
        let mut todos = self.todos.clone();
        f(&mut todos[index]);
        Some(Self { todos })
    }
}

impl From<Vec<Todo>> for WorkingSet {
    fn from(todos: Vec<Todo>) -> Self {
        Self { todos }
    }
}

impl From<WorkingSet> for Vec<Todo> {
    fn from(set: WorkingSet) -> Self {
        set.todos
    }
}
