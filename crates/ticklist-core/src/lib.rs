//! Ticklist Core Library
//!
//! This crate provides the core functionality for Ticklist, a local to-do
//! list: the todo model, reconciliation of bundled default todos with
//! persisted ones, and persistence of the working set after every change.
//!
//! # Architecture
//!
//! - **Working set**: the session's authoritative list, owned by `TodoStore`
//! - **Persistence provider**: async key-value store holding one JSON array
//! - **Writer**: single background task that serializes saves
//!
//! # Quick Start
//!
//! ```text
//! let mut store = TodoStore::open(FileStore::new(dir), StoreOptions::default()).await;
//!
//! let id = store.create("Learn Rust").unwrap();
//! store.toggle(id);
//!
//! store.close().await?;
//! ```
//!
//! # Modules
//!
//! - `store`: Session store (main entry point)
//! - `models`: Todo record and patch
//! - `working_set`: Pure create/toggle/delete/update transformations
//! - `reconcile`: Merge of defaults and persisted todos
//! - `persistence`: Load and save routines
//! - `storage`: Key-value persistence providers
//! - `seed`: Bundled default todos
//! - `theme`: Light and dark color schemes
//! - `config`: Application configuration

pub mod config;
pub mod error;
pub mod models;
pub mod persistence;
pub mod reconcile;
pub mod seed;
pub mod storage;
pub mod store;
pub mod theme;
pub mod working_set;
mod writer;

pub use config::Config;
pub use error::{TodoError, TodoResult};
pub use models::{Todo, TodoId, TodoPatch, MAX_TITLE_LEN};
pub use storage::{FileStore, KeyValueStore, MemoryStore, StorageError, StorageStats};
pub use store::{Command, StoreOptions, TodoStore};
pub use theme::{ColorScheme, Palette};
pub use working_set::WorkingSet;
