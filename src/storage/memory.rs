//! In-memory document source.

use std::collections::BTreeMap;

use super::DocumentSource;
use crate::error::Result;
use crate::note::NoteDocument;

/// `id -> text` map. Extraction runs on every fetch.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    texts: BTreeMap<String, String>,
    extension: String,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::with_extension("md")
    }

    pub fn with_extension(extension: &str) -> Self {
        Self {
            texts: BTreeMap::new(),
            extension: extension.trim_start_matches('.').to_string(),
        }
    }

    /// Build a store from `id -> text` pairs.
    pub fn from_texts<I, K, V>(texts: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut store = Self::new();
        for (id, text) in texts {
            store.insert(id, text);
        }
        store
    }

    /// Insert or replace a document. Returns the previous text.
    pub fn insert(&mut self, id: impl Into<String>, text: impl Into<String>) -> Option<String> {
        self.texts.insert(id.into(), text.into())
    }

    pub fn remove(&mut self, id: &str) -> Option<String> {
        self.texts.remove(id)
    }

    pub fn len(&self) -> usize {
        self.texts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.texts.is_empty()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentSource for MemoryStore {
    fn extension(&self) -> &str {
        &self.extension
    }

    async fn list(&self) -> Result<Vec<String>> {
        Ok(self.texts.keys().cloned().collect())
    }

    async fn fetch(&self, id: &str) -> Result<Option<NoteDocument>> {
        Ok(self
            .texts
            .get(id)
            .map(|text| NoteDocument::from_markdown(id, text, &self.extension)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fetch_extracts_structure() {
        let store = MemoryStore::from_texts([("notes/a.md", "# Alpha\n[[b]] #idea")]);

        let doc = store.fetch("notes/a.md").await.unwrap().unwrap();
        assert_eq!(doc.title, "Alpha");
        assert_eq!(doc.outlinks, vec!["b"]);
        assert!(doc.tags.contains("idea"));
        assert!(store.fetch("missing.md").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_fetch_all_follows_list() {
        let mut store = MemoryStore::from_texts([("b.md", "two"), ("a.md", "one")]);
        store.insert("c.md", "three");
        store.remove("b.md");

        assert_eq!(store.list().await.unwrap(), vec!["a.md", "c.md"]);
        let ids: Vec<String> = store
            .fetch_all()
            .await
            .unwrap()
            .into_iter()
            .map(|d| d.id)
            .collect();
        assert_eq!(ids, vec!["a.md", "c.md"]);
    }
}
