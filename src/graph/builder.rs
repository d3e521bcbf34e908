//
//  builder.rs
//  notegraph
//
//  Created by hak (tharun)
//

use std::path::Path;
use std::time::Instant;

use tracing::info;

use super::engine::NoteGraph;
use crate::error::Result;
use crate::storage::FsStore;

/// Open the vault at `root` and build its graph.
///
/// Respects `.gitignore` and `.notegraphignore`, reads notes in parallel and
/// returns the store alongside the fully linked graph.
pub async fn build_vault(root: &Path, extension: &str) -> Result<(FsStore, NoteGraph)> {
    let started = Instant::now();
    let store = FsStore::open(root, extension)?;

    let mut graph = NoteGraph::with_extension(extension);
    graph.build(&store).await?;

    info!(
        root = %store.root().display(),
        notes = graph.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "vault indexed"
    );
    Ok((store, graph))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NoteGraphError;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_build_vault_links_folders() {
        let dir = tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("projects")).unwrap();
        std::fs::write(dir.path().join("index.md"), "# Home\n[[alpha]] [plan](projects/alpha.md)").unwrap();
        std::fs::write(dir.path().join("projects/alpha.md"), "[[../index]] [up](../index.md)").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "[[alpha]]").unwrap();

        let (_store, graph) = build_vault(dir.path(), "md").await.unwrap();
        assert_eq!(graph.len(), 2);

        let backlinks: Vec<&str> = graph
            .get_backlinks("alpha")
            .into_iter()
            .map(|n| n.id.as_str())
            .collect();
        assert_eq!(backlinks, vec!["index.md"]);
        assert_eq!(graph.get_backlinks("Home").len(), 1);
    }

    #[tokio::test]
    async fn test_build_vault_missing_root() {
        let dir = tempdir().unwrap();
        let result = build_vault(&dir.path().join("missing"), "md").await;
        assert!(matches!(result, Err(NoteGraphError::VaultNotFound(_))));
    }
}
