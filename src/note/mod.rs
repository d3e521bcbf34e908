//! Notes - the documents the graph is built from.
//!
//! A note is a markdown file with optional YAML frontmatter. The extractor
//! turns its raw text into the title, tags and outbound links the graph
//! engine consumes.

pub mod extract;
mod types;

pub use extract::{base_name, normalize_tag, split_frontmatter};
pub use types::{NoteDocument, NoteMeta};
