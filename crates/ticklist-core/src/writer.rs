//! Background writer
//!
//! All saves go through one task. Each submitted snapshot carries a
//! generation number; the task always writes the newest snapshot it has
//! seen, so a slow write can never be followed by an older one. Snapshots
//! superseded while a write is in flight are skipped.
//!
//! ```text
//! submit(g1) submit(g2) submit(g3)
//!     |           \________/
//!  write g1    (g2 skipped)  write g3
//! ```

use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, warn};

use crate::error::{TodoError, TodoResult};
use crate::persistence::save;
use crate::storage::KeyValueStore;
use crate::working_set::WorkingSet;

/// A working set waiting to be written
#[derive(Debug, Clone, Default)]
struct Snapshot {
    generation: u64,
    todos: Arc<WorkingSet>,
}

/// Outcome of the most recent write attempt
#[derive(Debug, Clone, Default)]
struct Settled {
    generation: u64,
    error: Option<TodoError>,
}

/// Handle to the background writer task
pub(crate) struct Writer {
    snapshot_tx: watch::Sender<Snapshot>,
    settled_rx: watch::Receiver<Settled>,
    task: JoinHandle<()>,
    generation: u64,
}

impl Writer {
    /// Spawn the writer on the current tokio runtime
    pub(crate) fn spawn<S: KeyValueStore>(provider: Arc<S>, key: String) -> Self {
        let (snapshot_tx, snapshot_rx) = watch::channel(Snapshot::default());
        let (settled_tx, settled_rx) = watch::channel(Settled::default());

        let task = tokio::spawn(writer_task(provider, key, snapshot_rx, settled_tx));

        Self {
            snapshot_tx,
            settled_rx,
            task,
            generation: 0,
        }
    }

    /// Queue a full write of `set`, replacing any snapshot not yet written
    pub(crate) fn submit(&mut self, set: &WorkingSet) -> u64 {
        self.generation += 1;
        self.snapshot_tx.send_replace(Snapshot {
            generation: self.generation,
            todos: Arc::new(set.clone()),
        });
        self.generation
    }

    /// Generation of the newest submitted snapshot
    pub(crate) fn generation(&self) -> u64 {
        self.generation
    }

    /// Wait until the newest submitted snapshot has been written or failed
    ///
    /// Returns the error of that write, if any.
    pub(crate) async fn flush(&mut self) -> TodoResult<()> {
        let target = self.generation;
        let settled = self
            .settled_rx
            .wait_for(|settled| settled.generation >= target)
            .await
            .map_err(|_| TodoError::WriterStopped)?;

        match settled.error {
            Some(ref e) => Err(e.clone()),
            None => Ok(()),
        }
    }

    /// Flush, then stop the task
    pub(crate) async fn close(mut self) -> TodoResult<()> {
        let result = self.flush().await;
        drop(self.snapshot_tx);
        if let Err(e) = self.task.await {
            warn!("Writer task ended abnormally: {}", e);
        }
        result
    }
}

async fn writer_task<S: KeyValueStore>(
    provider: Arc<S>,
    key: String,
    mut snapshot_rx: watch::Receiver<Snapshot>,
    settled_tx: watch::Sender<Settled>,
) {
    // Returns Ok while a newer snapshot exists, even after the handle is dropped
    while snapshot_rx.changed().await.is_ok() {
        let snapshot = snapshot_rx.borrow_and_update().clone();

        let error = match save(provider.as_ref(), &key, &snapshot.todos).await {
            Ok(()) => {
                debug!("Persisted generation {}", snapshot.generation);
                None
            }
            Err(e) => {
                error!("Failed to persist generation {}: {}", snapshot.generation, e);
                Some(e)
            }
        };

        settled_tx.send_replace(Settled {
            generation: snapshot.generation,
            error,
        });
    }

    debug!("Writer for '{}' stopped", key);
}
