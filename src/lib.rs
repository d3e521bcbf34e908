//! # notegraph
//!
//! In-memory knowledge graph and lexical search over a vault of linked
//! markdown notes.
//!
//! ## Key Features
//!
//! - **Flexible links**: `[[wikilinks]]` and relative markdown links resolve by
//!   id, id without extension, file name or title
//! - **Incremental**: updating or removing one note leaves the graph exactly as
//!   a full rebuild would
//! - **Graph queries**: backlinks, neighbourhoods, shortest paths, hubs,
//!   clusters, bridge notes and statistics
//! - **Search**: TF-IDF keyword search and similar-note lookup
//! - **Deterministic**: same vault, same answers
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use notegraph::storage::MemoryStore;
//! use notegraph::NoteGraph;
//!
//! # async fn demo() -> notegraph::Result<()> {
//! let store = MemoryStore::from_texts([
//!     ("rust.md", "# Rust\nSee [[Ownership]]"),
//!     ("ownership.md", "# Ownership\nBorrowing rules"),
//! ]);
//!
//! let mut graph = NoteGraph::new();
//! graph.build(&store).await?;
//!
//! let backlinks = graph.get_backlinks("Ownership");
//! assert_eq!(backlinks[0].id, "rust.md");
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod graph;
pub mod note;
pub mod search;
pub mod storage;
pub mod watcher;

// Re-exports for convenience
pub use config::NotegraphConfig;
pub use error::{NoteGraphError, Result};
pub use graph::{GraphNode, GraphStats, HubNote, NoteGraph};
pub use note::NoteDocument;
pub use search::{SearchHit, SearchIndex};
pub use storage::{DocumentSource, FsStore, MemoryStore};
pub use watcher::{start_watching, WatcherHandle};
