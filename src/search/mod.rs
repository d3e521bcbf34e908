//! Lexical search over note text.
//!
//! Provides the markdown-aware tokenizer and a TF-IDF index supporting
//! keyword search and document-to-document similarity.

pub mod index;
pub mod tokenizer;

pub use index::{DocumentVector, SearchHit, SearchIndex};
pub use tokenizer::{stem, tokenize};
