//! Todo store
//!
//! The `TodoStore` owns the working set for a session. It is built once by
//! reconciling the default todos with whatever the provider holds, then
//! mutated through create/toggle/delete/update. Every effective mutation
//! queues a full write of the new working set on the background writer.
//!
//! ## Usage
//!
//! ```ignore
//! let mut store = TodoStore::open(FileStore::new(dir), StoreOptions::default()).await;
//!
//! let id = store.create("Buy milk").unwrap();
//! store.toggle(id);
//!
//! for todo in store.todos() {
//!     println!("{} {}", todo.id, todo.title);
//! }
//!
//! store.close().await?;
//! ```
//!
//! Invalid arguments (blank titles, unknown ids) are ignored rather than
//! reported: the operation returns `None`/`false` and nothing is written.

use std::sync::Arc;

use tracing::{debug, error, info};

use crate::config::{Config, DEFAULT_STORAGE_KEY};
use crate::error::{TodoError, TodoResult};
use crate::models::{Todo, TodoId, TodoPatch};
use crate::persistence;
use crate::seed::default_todos;
use crate::storage::{FileStore, KeyValueStore};
use crate::working_set::WorkingSet;
use crate::writer::Writer;

/// How a store finds and seeds its data
#[derive(Debug, Clone)]
pub struct StoreOptions {
    /// Key the working set is stored under
    pub key: String,
    /// Records merged under the persisted ones on load
    pub defaults: Vec<Todo>,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            key: DEFAULT_STORAGE_KEY.to_string(),
            defaults: default_todos(),
        }
    }
}

impl StoreOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            key: config.storage_key.clone(),
            defaults: if config.seed_defaults {
                default_todos()
            } else {
                Vec::new()
            },
        }
    }
}

/// A mutation request from a front end
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Create { title: String },
    Toggle { id: TodoId },
    Delete { id: TodoId },
    Update { id: TodoId, patch: TodoPatch },
}

/// Owner of the session's working set
pub struct TodoStore<S: KeyValueStore> {
    working_set: WorkingSet,
    provider: Arc<S>,
    key: String,
    writer: Writer,
    load_error: Option<TodoError>,
}

impl<S: KeyValueStore> TodoStore<S> {
    /// Load and reconcile the working set, then start the writer
    ///
    /// Never fails: if the stored value can't be read the error is logged,
    /// kept in [`load_error`](Self::load_error), and the store starts empty.
    pub async fn open(provider: S, options: StoreOptions) -> Self {
        let StoreOptions { key, defaults } = options;
        let provider = Arc::new(provider);

        let (working_set, load_error) =
            match persistence::load(provider.as_ref(), &key, &defaults).await {
                Ok(set) => (set, None),
                Err(e) => {
                    error!("Failed to load todos: {}", e);
                    (WorkingSet::new(), Some(e))
                }
            };

        let writer = Writer::spawn(Arc::clone(&provider), key.clone());

        info!("Opened store '{}' with {} todos", key, working_set.len());

        Self {
            working_set,
            provider,
            key,
            writer,
            load_error,
        }
    }

    // ==================== Queries ====================

    /// Todos in display order
    pub fn todos(&self) -> &[Todo] {
        self.working_set.todos()
    }

    pub fn working_set(&self) -> &WorkingSet {
        &self.working_set
    }

    pub fn get(&self, id: TodoId) -> Option<&Todo> {
        self.working_set.get(id)
    }

    /// Error from the load at open time, if any
    pub fn load_error(&self) -> Option<&TodoError> {
        self.load_error.as_ref()
    }

    /// Key the working set is stored under
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn provider(&self) -> &S {
        &self.provider
    }

    /// Number of writes queued since open
    pub fn generation(&self) -> u64 {
        self.writer.generation()
    }

    // ==================== Mutations ====================

    /// Add a todo at the front of the list
    ///
    /// Returns the new id, or `None` if the title is blank.
    pub fn create(&mut self, title: &str) -> Option<TodoId> {
        let (next, id) = self.working_set.with_created(title)?;
        self.commit(next);
        debug!("Created todo {}", id);
        Some(id)
    }

    /// Flip a todo's completed flag; false if the id is unknown
    pub fn toggle(&mut self, id: TodoId) -> bool {
        self.commit_if(self.working_set.with_toggled(id))
    }

    /// Remove a todo; false if the id is unknown
    pub fn delete(&mut self, id: TodoId) -> bool {
        self.commit_if(self.working_set.with_deleted(id))
    }

    /// Replace the patched fields of a todo; false if nothing changed
    pub fn update(&mut self, id: TodoId, patch: &TodoPatch) -> bool {
        self.commit_if(self.working_set.with_updated(id, patch))
    }

    /// Handle a command message; true if the working set changed
    pub fn apply(&mut self, command: Command) -> bool {
        match command {
            Command::Create { title } => self.create(&title).is_some(),
            Command::Toggle { id } => self.toggle(id),
            Command::Delete { id } => self.delete(id),
            Command::Update { id, patch } => self.update(id, &patch),
        }
    }

    fn commit_if(&mut self, next: Option<WorkingSet>) -> bool {
        match next {
            Some(next) => {
                self.commit(next);
                true
            }
            None => false,
        }
    }

    fn commit(&mut self, next: WorkingSet) {
        self.working_set = next;
        self.writer.submit(&self.working_set);
    }

    // ==================== Lifecycle ====================

    /// Wait for the newest working set to be written
    ///
    /// A write failure is returned here for callers that want to report it;
    /// the store itself keeps running on the in-memory working set.
    pub async fn flush(&mut self) -> TodoResult<()> {
        self.writer.flush().await
    }

    /// Flush pending writes and stop the writer
    pub async fn close(self) -> TodoResult<()> {
        self.writer.close().await
    }
}

impl TodoStore<FileStore> {
    /// Open the file-backed store described by `config`
    pub async fn open_with_config(config: &Config) -> Self {
        let provider = FileStore::new(&config.data_dir);
        Self::open(provider, StoreOptions::from_config(config)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::parse_persisted;
    use crate::storage::{MemoryStore, StorageError};
    use crate::theme::ColorScheme;
    use tempfile::TempDir;

    const KEY: &str = "ToDoApp";

    fn todo(id: TodoId, title: &str, completed: bool) -> Todo {
        Todo {
            id,
            title: title.to_string(),
            completed,
        }
    }

    fn options(defaults: Vec<Todo>) -> StoreOptions {
        StoreOptions {
            key: KEY.to_string(),
            defaults,
        }
    }

    fn ids<S: KeyValueStore>(store: &TodoStore<S>) -> Vec<TodoId> {
        store.todos().iter().map(|t| t.id).collect()
    }

    async fn stored(provider: &MemoryStore) -> Vec<Todo> {
        parse_persisted(&provider.peek(KEY).await.unwrap()).unwrap()
    }

    #[tokio::test]
    async fn test_open_reconciles() {
        let provider = MemoryStore::with_value(
            KEY,
            r#"[{"id":1,"title":"A","completed":true},{"id":3,"title":"C","completed":false}]"#,
        );
        let store = TodoStore::open(
            provider,
            options(vec![todo(1, "A", false), todo(2, "B", false)]),
        )
        .await;

        assert!(store.load_error().is_none());
        assert_eq!(ids(&store), vec![3, 2, 1]);
        assert!(store.get(1).unwrap().completed);
        assert_eq!(store.generation(), 0);
    }

    #[tokio::test]
    async fn test_open_does_not_write() {
        let provider = MemoryStore::new();
        let store = TodoStore::open(provider.clone(), StoreOptions::default()).await;

        assert_eq!(store.todos().len(), default_todos().len());
        store.close().await.unwrap();
        assert!(provider.history().await.is_empty());
    }

    #[tokio::test]
    async fn test_each_mutation_persists_full_set() {
        let provider = MemoryStore::new();
        let mut store = TodoStore::open(provider.clone(), options(Vec::new())).await;

        let id = store.create("first").unwrap();
        store.flush().await.unwrap();
        assert_eq!(stored(&provider).await, vec![todo(id, "first", false)]);

        assert!(store.toggle(id));
        store.flush().await.unwrap();
        assert_eq!(stored(&provider).await, vec![todo(id, "first", true)]);

        assert!(store.update(id, &TodoPatch::title("renamed")));
        store.flush().await.unwrap();
        assert_eq!(stored(&provider).await, vec![todo(id, "renamed", true)]);

        assert!(store.delete(id));
        store.flush().await.unwrap();
        assert!(stored(&provider).await.is_empty());

        assert_eq!(store.generation(), 4);
    }

    #[tokio::test]
    async fn test_noops_do_not_write() {
        let provider = MemoryStore::new();
        let mut store =
            TodoStore::open(provider.clone(), options(vec![todo(1, "A", false)])).await;

        assert!(store.create("   ").is_none());
        assert!(!store.toggle(99));
        assert!(!store.delete(99));
        assert!(!store.update(99, &TodoPatch::completed(true)));

        assert_eq!(store.generation(), 0);
        store.close().await.unwrap();
        assert!(provider.history().await.is_empty());
    }

    #[tokio::test]
    async fn test_create_after_load_uses_max_id() {
        let provider = MemoryStore::with_value(
            KEY,
            r#"[{"id":5,"title":"five","completed":false},{"id":2,"title":"two","completed":false}]"#,
        );
        let mut store = TodoStore::open(provider, options(Vec::new())).await;

        assert_eq!(store.create("new"), Some(6));
        assert_eq!(ids(&store), vec![6, 5, 2]);
    }

    #[tokio::test]
    async fn test_create_when_ids_exhausted() {
        let provider = MemoryStore::with_value(
            KEY,
            r#"[{"id":9223372036854775807,"title":"big","completed":false}]"#,
        );
        let mut store = TodoStore::open(provider.clone(), options(Vec::new())).await;

        assert_eq!(store.create("next"), None);
        assert_eq!(ids(&store), vec![TodoId::MAX]);
        store.close().await.unwrap();
        assert!(provider.history().await.is_empty());
    }

    #[tokio::test]
    async fn test_delete_then_toggle() {
        let mut store = TodoStore::open(
            MemoryStore::new(),
            options(vec![todo(1, "A", false), todo(2, "B", false)]),
        )
        .await;

        assert!(store.delete(2));
        assert!(!store.toggle(2));
        assert_eq!(ids(&store), vec![1]);
    }

    #[tokio::test]
    async fn test_apply_commands() {
        let mut store = TodoStore::open(MemoryStore::new(), options(Vec::new())).await;

        assert!(store.apply(Command::Create {
            title: "write docs".to_string()
        }));
        assert!(store.apply(Command::Toggle { id: 1 }));
        assert!(store.apply(Command::Update {
            id: 1,
            patch: TodoPatch::title("write more docs"),
        }));
        assert_eq!(store.get(1), Some(&todo(1, "write more docs", true)));

        assert!(store.apply(Command::Delete { id: 1 }));
        assert!(!store.apply(Command::Delete { id: 1 }));
        assert!(store.todos().is_empty());
    }

    #[tokio::test]
    async fn test_read_failure_starts_empty() {
        let provider = MemoryStore::with_value(KEY, "[]");
        provider.set_fail_reads(true);

        let mut store = TodoStore::open(provider.clone(), StoreOptions::default()).await;
        assert!(store.todos().is_empty());
        assert!(store.load_error().unwrap().is_read_error());

        // Still usable
        provider.set_fail_reads(false);
        assert_eq!(store.create("still works"), Some(1));
        store.close().await.unwrap();
    }

    #[tokio::test]
    async fn test_unparsable_value_is_kept_aside() {
        let provider = MemoryStore::with_value(KEY, "not json at all");

        let mut store = TodoStore::open(provider.clone(), StoreOptions::default()).await;
        assert!(matches!(store.load_error(), Some(TodoError::Parse { .. })));

        store.create("new start");
        store.close().await.unwrap();

        assert_eq!(
            provider.peek("ToDoApp.corrupt").await.as_deref(),
            Some("not json at all")
        );
    }

    #[tokio::test]
    async fn test_invalid_utf8_file_is_kept_aside() {
        let temp_dir = TempDir::new().unwrap();
        let raw: &[u8] = b"[{\"id\":1,\"title\":\"caf\xe9\",\"completed\":false}]";
        std::fs::write(temp_dir.path().join("ToDoApp.json"), raw).unwrap();

        let mut store =
            TodoStore::open(FileStore::new(temp_dir.path()), options(Vec::new())).await;
        match store.load_error() {
            Some(TodoError::PersistenceRead { source, .. }) => {
                assert!(matches!(
                    source.as_ref(),
                    StorageError::InvalidEncoding {
                        backup: Some(_),
                        ..
                    }
                ));
            }
            other => panic!("unexpected load result: {other:?}"),
        }
        assert!(store.todos().is_empty());

        store.create("new");
        store.close().await.unwrap();

        let backup = std::fs::read(temp_dir.path().join("ToDoApp.corrupt.json")).unwrap();
        assert_eq!(backup, raw);
        let saved = std::fs::read_to_string(temp_dir.path().join("ToDoApp.json")).unwrap();
        assert_eq!(parse_persisted(&saved).unwrap(), vec![todo(1, "new", false)]);
    }

    #[tokio::test]
    async fn test_write_failure_keeps_memory_state() {
        let provider = MemoryStore::new();
        let mut store = TodoStore::open(provider.clone(), options(Vec::new())).await;

        provider.set_fail_writes(true);
        let id = store.create("unsaved").unwrap();

        let err = store.flush().await.unwrap_err();
        assert!(err.is_write_error());
        assert_eq!(store.get(id), Some(&todo(id, "unsaved", false)));

        // Next successful write carries the full in-memory state
        provider.set_fail_writes(false);
        store.create("saved");
        store.flush().await.unwrap();
        assert_eq!(stored(&provider).await.len(), 2);
    }

    #[tokio::test]
    async fn test_rapid_mutations_settle_on_latest() {
        let provider = MemoryStore::new();
        let mut store = TodoStore::open(provider.clone(), options(Vec::new())).await;

        for i in 0..25 {
            store.create(&format!("todo {}", i));
        }
        let id = store.create("last").unwrap();
        store.toggle(id);
        store.close().await.unwrap();

        let saved = stored(&provider).await;
        assert_eq!(saved.len(), 26);
        assert_eq!(saved[0], todo(id, "last", true));
    }

    #[tokio::test]
    async fn test_round_trip_across_sessions() {
        let temp_dir = TempDir::new().unwrap();
        let config = Config {
            data_dir: temp_dir.path().to_path_buf(),
            storage_key: KEY.to_string(),
            color_scheme: ColorScheme::Light,
            seed_defaults: true,
            log_file: None,
        };

        let (first, seeded, seeded_completed) = {
            let mut store = TodoStore::open_with_config(&config).await;
            let seeded = store.todos()[0].id;
            store.toggle(seeded);
            let seeded_completed = store.get(seeded).unwrap().completed;
            store.create("mine");
            let first = store.working_set().clone();
            store.close().await.unwrap();
            (first, seeded, seeded_completed)
        };

        let store = TodoStore::open_with_config(&config).await;
        assert!(store.load_error().is_none());

        // Created todos go to the front with the largest id, so the reload
        // sort reproduces the same order
        assert_eq!(store.working_set(), &first);
        assert_eq!(store.todos()[0].title, "mine");
        assert_eq!(store.get(seeded).unwrap().completed, seeded_completed);
    }

    #[tokio::test]
    async fn test_seed_opt_out() {
        let temp_dir = TempDir::new().unwrap();
        let config = Config {
            data_dir: temp_dir.path().to_path_buf(),
            seed_defaults: false,
            ..Config::default()
        };

        let store = TodoStore::open_with_config(&config).await;
        assert!(store.todos().is_empty());
    }
}
