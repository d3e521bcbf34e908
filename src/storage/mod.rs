//! Storage layer for notegraph.
//!
//! The graph never touches the filesystem directly. It pulls documents
//! through a [`DocumentSource`]:
//! - [`FsStore`] reads a vault directory of markdown notes
//! - [`MemoryStore`] keeps `id -> text` pairs in memory (tests, embedding)

mod fs;
mod memory;

pub use fs::FsStore;
pub use memory::MemoryStore;

use crate::error::Result;
use crate::note::NoteDocument;

/// Anything that can hand documents to the graph engine.
///
/// Fetches may suspend; the engine only mutates once a fetch has completed.
#[allow(async_fn_in_trait)]
pub trait DocumentSource {
    /// Note extension without the dot.
    fn extension(&self) -> &str;

    /// Every document id the source currently holds.
    async fn list(&self) -> Result<Vec<String>>;

    /// One document, or `None` when the id is unknown.
    async fn fetch(&self, id: &str) -> Result<Option<NoteDocument>>;

    /// Every document. Ids that vanish between `list` and `fetch` are skipped.
    async fn fetch_all(&self) -> Result<Vec<NoteDocument>> {
        let mut documents = Vec::new();
        for id in self.list().await? {
            if let Some(document) = self.fetch(&id).await? {
                documents.push(document);
            }
        }
        Ok(documents)
    }
}
