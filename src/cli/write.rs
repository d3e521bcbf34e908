//! Vault operations: write, delete, watch

use anyhow::{Context as _, Result};
use serde::Serialize;
use std::io::Read;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

use super::print_json;
use crate::graph::NoteGraph;
use crate::storage::FsStore;
use crate::watcher::start_watching;

#[derive(Serialize)]
struct WriteResult<'a> {
    id: &'a str,
    status: &'a str,
    outlinks: usize,
    resolved: usize,
    backlinks: usize,
}

/// Create or overwrite a note, then refresh it in the graph.
///
/// `content` of `-` reads the note from stdin.
pub async fn write(
    store: &FsStore,
    graph: &mut NoteGraph,
    id: &str,
    content: &str,
    json: bool,
) -> Result<()> {
    let content = if content == "-" {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("reading note from stdin")?;
        buffer
    } else {
        content.to_string()
    };

    let id = store.canonical_id(id)?;
    let existed = store.path_for(&id)?.is_file();
    store.write_note(&id, &content)?;
    graph.update_node(store, &id).await?;

    let (outlinks, backlinks) = graph
        .get_node(&id)
        .map(|n| (n.outlinks.len(), n.inlinks.len()))
        .unwrap_or_default();
    let result = WriteResult {
        id: &id,
        status: if existed { "updated" } else { "created" },
        outlinks,
        resolved: graph.resolved_targets(&id).len(),
        backlinks,
    };

    if json {
        return print_json(&result);
    }
    println!("{} {}", result.status, result.id);
    println!(
        "links: {} ({} resolved), backlinks: {}",
        result.outlinks, result.resolved, result.backlinks
    );
    Ok(())
}

/// Delete a note and report the notes whose links now dangle.
pub fn delete(store: &FsStore, graph: &mut NoteGraph, id: &str, json: bool) -> Result<()> {
    let id = store.delete_note(id)?;
    let dangling_from: Vec<String> = graph
        .get_node(&id)
        .map(|n| n.inlinks.clone())
        .unwrap_or_default();
    graph.remove_node(&id);

    if json {
        return print_json(&serde_json::json!({
            "id": id,
            "status": "deleted",
            "dangling_from": dangling_from,
        }));
    }
    println!("deleted {}", id);
    for source in &dangling_from {
        println!("  dangling link in {}", source);
    }
    Ok(())
}

/// Watch the vault until Ctrl-C.
pub async fn watch(store: FsStore, graph: NoteGraph, debounce_ms: u64) -> Result<()> {
    let store = Arc::new(store);
    let graph = Arc::new(RwLock::new(graph));

    let handle = start_watching(store.clone(), graph.clone(), debounce_ms)?;
    println!(
        "watching {} ({} notes), Ctrl-C to stop",
        store.root().display(),
        graph.read().await.len()
    );

    tokio::signal::ctrl_c().await?;
    handle.stop();

    let stats = graph.read().await.get_stats();
    info!(notes = stats.total_nodes, links = stats.total_edges, "watcher stopped");
    super::read::print_stats(&stats);
    Ok(())
}
