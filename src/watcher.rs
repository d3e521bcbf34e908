//
//  watcher.rs
//  notegraph
//
//  Created by hak (tharun)
//

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use notify_debouncer_mini::{new_debouncer, DebounceEventResult, Debouncer};
use tokio::sync::{mpsc, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::graph::NoteGraph;
use crate::storage::{DocumentSource, FsStore};

/// Graph shared between the watcher task and readers.
pub type SharedGraph = Arc<RwLock<NoteGraph>>;

/// Keeps the vault watched. Dropping it stops the watcher and its task.
pub struct WatcherHandle {
    _debouncer: Debouncer<RecommendedWatcher>,
    task: JoinHandle<()>,
}

impl WatcherHandle {
    /// Stop watching now.
    pub fn stop(self) {
        drop(self);
    }
}

impl Drop for WatcherHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Watch the vault and apply every debounced change to `graph`.
///
/// Must be called from inside a tokio runtime.
pub fn start_watching(
    store: Arc<FsStore>,
    graph: SharedGraph,
    debounce_ms: u64,
) -> Result<WatcherHandle> {
    let (tx, mut rx) = mpsc::channel::<Vec<PathBuf>>(64);

    let mut debouncer = new_debouncer(
        Duration::from_millis(debounce_ms),
        move |result: DebounceEventResult| match result {
            Ok(events) => {
                let paths = events.into_iter().map(|event| event.path).collect();
                // Receiver gone means the handle was dropped.
                let _ = tx.blocking_send(paths);
            }
            Err(e) => warn!(error = ?e, "watch error"),
        },
    )?;
    debouncer
        .watcher()
        .watch(store.root(), RecursiveMode::Recursive)?;

    info!(root = %store.root().display(), debounce_ms, "watching vault");

    let task = tokio::spawn(async move {
        while let Some(paths) = rx.recv().await {
            let applied = apply_changes(&store, &graph, &paths).await;
            if applied > 0 {
                info!(applied, "vault changes applied");
            }
        }
        debug!("watch channel closed");
    });

    Ok(WatcherHandle {
        _debouncer: debouncer,
        task,
    })
}

/// Apply one batch of changed paths. Returns how many notes were updated or removed.
///
/// Documents are fetched before the write lock is taken; each mutation holds
/// the lock on its own, so readers see every step as a full rebuild would.
pub(crate) async fn apply_changes(store: &FsStore, graph: &RwLock<NoteGraph>, paths: &[PathBuf]) -> usize {
    let mut ids: Vec<String> = paths
        .iter()
        .filter_map(|path| store.id_for_path(path))
        .filter(|id| !store.is_ignored(id))
        .collect();
    ids.sort();
    ids.dedup();

    let mut applied = 0;
    for id in ids {
        match store.fetch(&id).await {
            Ok(Some(document)) => {
                debug!(id = %id, "note changed");
                graph.write().await.upsert_document(document);
                applied += 1;
            }
            Ok(None) => {
                if graph.write().await.remove_node(&id) {
                    debug!(id = %id, "note removed");
                    applied += 1;
                }
            }
            Err(e) => warn!(id = %id, error = %e, "failed to reload note"),
        }
    }
    applied
}
