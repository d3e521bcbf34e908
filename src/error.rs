//! Error types for notegraph.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the document store, configuration and watcher layers.
///
/// Graph and search queries never fail: unknown ids and dangling references
/// produce empty results instead.
#[derive(Debug, Error)]
pub enum NoteGraphError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid frontmatter: {0}")]
    Frontmatter(#[from] serde_yaml::Error),

    #[error("Invalid config: {0}")]
    Config(#[from] toml::de::Error),

    #[error("Watcher error: {0}")]
    Watch(#[from] notify::Error),

    #[error("Vault not found: {0}")]
    VaultNotFound(PathBuf),

    #[error("Document not found: {0}")]
    DocumentNotFound(String),

    #[error("Invalid document id: {0}")]
    InvalidDocumentId(String),
}

pub type Result<T> = std::result::Result<T, NoteGraphError>;
