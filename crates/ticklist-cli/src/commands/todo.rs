//! Todo command handlers
//!
//! Mutations with a blank title or an unknown id are ignored, matching the
//! store's policy: they print a note and exit successfully.

use std::io::{self, IsTerminal, Write};

use anyhow::{anyhow, Result};

use ticklist_core::models::is_blank;
use ticklist_core::{FileStore, TodoId, TodoPatch, TodoStore, MAX_TITLE_LEN};

use crate::output::Output;

type Store = TodoStore<FileStore>;

/// List all todos in display order
pub fn list(store: &Store, output: &Output) -> Result<()> {
    output.print_todos(store.todos())
}

/// Add a todo at the front of the list
pub fn add(store: &mut Store, words: Vec<String>, output: &Output) -> Result<()> {
    let title = words.join(" ");

    if title.chars().count() > MAX_TITLE_LEN {
        output.warn(&format!(
            "Title is longer than {} characters and will be shortened",
            MAX_TITLE_LEN
        ));
    }

    match store.create(&title) {
        Some(id) => {
            output.success(&format!("Added todo {}", id));
            if output.is_quiet() {
                // Scripts get the new id
                println!("{}", id);
            }
        }
        None if is_blank(&title) => output.unchanged("Nothing added: title is empty."),
        None => output.unchanged("Nothing added: no todo ids are left."),
    }
    Ok(())
}

/// Flip a todo between open and done
pub fn toggle(store: &mut Store, id: TodoId, output: &Output) -> Result<()> {
    if store.toggle(id) {
        let state = match store.get(id) {
            Some(todo) if todo.completed => "done",
            _ => "open",
        };
        output.success(&format!("Marked todo {} {}", id, state));
    } else {
        output.unchanged(&format!("No todo with id {}.", id));
    }
    Ok(())
}

/// Delete a todo
pub fn delete(store: &mut Store, id: TodoId, output: &Output) -> Result<()> {
    if store.delete(id) {
        output.success(&format!("Deleted todo {}", id));
    } else {
        output.unchanged(&format!("No todo with id {}.", id));
    }
    Ok(())
}

/// Show a single todo
pub fn show(store: &Store, id: TodoId, output: &Output) -> Result<()> {
    let todo = store
        .get(id)
        .ok_or_else(|| anyhow!("Todo not found: {}", id))?;
    output.print_todo(todo)
}

/// Edit a todo's title or status
///
/// With no flags and an interactive terminal, prompts for a new title.
pub fn edit(
    store: &mut Store,
    id: TodoId,
    title: Option<String>,
    completed: Option<bool>,
    output: &Output,
) -> Result<()> {
    let Some(current) = store.get(id) else {
        output.unchanged(&format!("No todo with id {}.", id));
        return Ok(());
    };

    let mut patch = TodoPatch { title, completed };

    if patch.is_empty() && io::stdin().is_terminal() && !output.is_quiet() {
        patch.title = prompt_with_default("Title", &current.title)?;
    }

    if store.update(id, &patch) {
        output.success(&format!("Updated todo {}", id));
        if let Some(todo) = store.get(id) {
            output.print_todo(todo)?;
        }
    } else {
        output.unchanged("Nothing changed.");
    }
    Ok(())
}

/// Prompt with a default value, returns None if user keeps default
fn prompt_with_default(prompt: &str, default: &str) -> Result<Option<String>> {
    print!("{} [{}]: ", prompt, default);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    let input = input.trim_end_matches(['\r', '\n']);

    if input.trim().is_empty() {
        Ok(None)
    } else {
        Ok(Some(input.to_string()))
    }
}
