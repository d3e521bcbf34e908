//
//  mutation.rs
//  notegraph
//
//  Created by hak (tharun)
//

use tracing::{debug, info};

use super::engine::NoteGraph;
use super::types::*;
use crate::error::{NoteGraphError, Result};
use crate::note::NoteDocument;
use crate::storage::DocumentSource;

impl NoteGraph {
    /// Rebuild the whole graph and search index from a document source.
    ///
    /// Everything is fetched before the current graph is touched, so a fetch
    /// failure leaves the previous state intact.
    pub async fn build<S: DocumentSource>(&mut self, source: &S) -> Result<()> {
        let documents = source.fetch_all().await?;
        self.build_from_documents(documents);
        Ok(())
    }

    /// Re-read one document and apply it. Unknown ids are inserted.
    ///
    /// Returns `DocumentNotFound` (without mutating anything) when the source
    /// no longer has the document.
    pub async fn update_node<S: DocumentSource>(&mut self, source: &S, id: &str) -> Result<()> {
        match source.fetch(id).await? {
            Some(document) => {
                self.upsert_document(document);
                Ok(())
            }
            None => Err(NoteGraphError::DocumentNotFound(id.to_string())),
        }
    }

    /// Replace the graph with nodes built from `id -> text` pairs.
    pub fn build_from_texts<I, K, V>(&mut self, documents: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let extension = self.table.extension().to_string();
        let documents = documents
            .into_iter()
            .map(|(id, text)| NoteDocument::from_markdown(id.as_ref(), text.as_ref(), &extension))
            .collect();
        self.build_from_documents(documents);
    }

    /// Replace the graph with nodes built from already-extracted documents.
    pub fn build_from_documents(&mut self, documents: Vec<NoteDocument>) {
        self.table.clear();
        self.edges.clear();

        // Phase 1: every node exists before any link is resolved.
        for document in &documents {
            self.table.insert(GraphNode::from_document(document));
        }

        // Phase 2: resolve outlinks into inlinks.
        self.relink();

        self.search.build_index(
            documents
                .iter()
                .map(|d| (d.id.as_str(), d.text.as_str())),
        );

        info!(
            nodes = self.table.len(),
            edges = self.edge_count(),
            "graph built"
        );
    }

    /// Insert or replace a single document, keeping edges identical to a full rebuild.
    pub fn upsert_document(&mut self, document: NoteDocument) {
        debug!(id = %document.id, "updating node");

        // Undo the old version's contributions; links from other nodes stay.
        self.unlink_source(&document.id);
        let inlinks = self
            .table
            .get(&document.id)
            .map(|old| old.inlinks.clone())
            .unwrap_or_default();

        let mut node = GraphNode::from_document(&document);
        node.inlinks = inlinks;
        self.table.insert(node);

        let changed = self.relink();
        debug!(id = %document.id, changed, "edges recomputed");

        self.search.update_document(&document.id, &document.text);
    }

    /// Remove a node and every edge it contributed. Unknown ids are a no-op.
    ///
    /// Other nodes keep their outlinks; references to the removed note become
    /// dangling (or fall through to another match, as a rebuild would).
    pub fn remove_node(&mut self, id: &str) -> bool {
        if !self.table.contains(id) {
            return false;
        }
        debug!(id, "removing node");

        self.unlink_source(id);
        self.table.remove(id);
        self.relink();
        self.search.remove_document(id);
        true
    }

    pub(crate) fn edge_count(&self) -> usize {
        self.edges.values().map(Vec::len).sum()
    }
}
