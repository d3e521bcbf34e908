//! File system vault for notegraph.

use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Component, Path, PathBuf};

use chrono::{DateTime, Utc};
use ignore::gitignore::{Gitignore, GitignoreBuilder};
use ignore::WalkBuilder;
use rayon::prelude::*;
use tracing::{debug, warn};

use super::DocumentSource;
use crate::error::{NoteGraphError, Result};
use crate::note::NoteDocument;

/// Per-vault ignore file, same syntax as `.gitignore`.
pub const IGNORE_FILE: &str = ".notegraphignore";

/// Directories that never hold notes, even without a `.gitignore`.
const BUILTIN_IGNORE: &[&str] = &["node_modules", ".git", ".obsidian", ".trash"];

/// A directory of markdown notes.
///
/// Ids are vault-relative paths with `/` separators, extension included.
#[derive(Debug, Clone)]
pub struct FsStore {
    /// Canonical vault root
    root: PathBuf,
    /// Note extension without the dot
    extension: String,
    /// Root-level `.gitignore` + `.notegraphignore`, for paths reported by the watcher
    ignores: Gitignore,
}

impl FsStore {
    /// Open an existing vault directory.
    pub fn open(root: &Path, extension: &str) -> Result<Self> {
        if !root.is_dir() {
            return Err(NoteGraphError::VaultNotFound(root.to_path_buf()));
        }
        let root = fs::canonicalize(root)?;
        Ok(Self {
            ignores: root_ignores(&root),
            extension: extension.trim_start_matches('.').to_string(),
            root,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Every note id in the vault, sorted.
    ///
    /// Honors `.gitignore` and `.notegraphignore`; hidden entries are skipped.
    pub fn list_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = WalkBuilder::new(&self.root)
            .hidden(true)
            .git_ignore(true)
            .git_global(false)
            .git_exclude(true)
            .require_git(false)
            .add_custom_ignore_filename(IGNORE_FILE)
            .build()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_some_and(|ft| ft.is_file()))
            .filter_map(|entry| self.id_for_path(entry.path()))
            .collect();
        ids.sort();
        ids
    }

    /// Whether a root-level ignore file excludes this id.
    pub fn is_ignored(&self, id: &str) -> bool {
        match self.path_for(id) {
            Ok(path) => self
                .ignores
                .matched_path_or_any_parents(&path, false)
                .is_ignore(),
            Err(_) => true,
        }
    }

    /// Read and extract one note. `Ok(None)` when the file does not exist.
    pub fn read_document(&self, id: &str) -> Result<Option<NoteDocument>> {
        let path = self.path_for(id)?;
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let modified = fs::metadata(&path)
            .and_then(|m| m.modified())
            .ok()
            .map(DateTime::<Utc>::from);

        Ok(Some(
            NoteDocument::from_markdown(id, &text, &self.extension).or_updated(modified),
        ))
    }

    /// Read every note in parallel. Unreadable files are logged and skipped.
    pub fn read_all(&self) -> Vec<NoteDocument> {
        let ids = self.list_ids();
        debug!(root = %self.root.display(), files = ids.len(), "reading vault");

        ids.par_iter()
            .filter_map(|id| match self.read_document(id) {
                Ok(document) => document,
                Err(e) => {
                    warn!(id = %id, error = %e, "skipping unreadable note");
                    None
                }
            })
            .collect()
    }

    /// Write a note atomically (temp file, then rename), creating folders.
    ///
    /// A missing extension is appended. Returns the canonical id.
    pub fn write_note(&self, id: &str, content: &str) -> Result<String> {
        let id = self.canonical_id(id)?;
        let path = self.path_for(&id)?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let temp_path = path.with_extension(format!("{}.tmp", self.extension));
        let mut file = File::create(&temp_path)?;
        file.write_all(content.as_bytes())?;
        file.sync_all()?;

        fs::rename(&temp_path, &path)?;
        debug!(id = %id, bytes = content.len(), "note written");

        Ok(id)
    }

    /// Delete a note. Returns the canonical id.
    pub fn delete_note(&self, id: &str) -> Result<String> {
        let id = self.canonical_id(id)?;
        let path = self.path_for(&id)?;

        if !path.is_file() {
            return Err(NoteGraphError::DocumentNotFound(id));
        }

        fs::remove_file(&path)?;
        debug!(id = %id, "note deleted");

        Ok(id)
    }

    /// Map a filesystem path back to a note id.
    ///
    /// `None` for paths outside the vault, with another extension, or under
    /// hidden or built-in ignored folders. The file need not exist.
    pub fn id_for_path(&self, path: &Path) -> Option<String> {
        let relative = match path.strip_prefix(&self.root) {
            Ok(relative) => relative.to_path_buf(),
            Err(_) => {
                // Relative or non-canonical paths: canonicalize the parent,
                // since the file itself may already be gone.
                let parent = fs::canonicalize(path.parent()?).ok()?;
                parent.strip_prefix(&self.root).ok()?.join(path.file_name()?)
            }
        };

        if relative.extension()?.to_str()? != self.extension {
            return None;
        }

        let mut segments = Vec::new();
        for component in relative.components() {
            let Component::Normal(name) = component else {
                return None;
            };
            let name = name.to_str()?;
            if name.starts_with('.') || BUILTIN_IGNORE.contains(&name) {
                return None;
            }
            segments.push(name);
        }

        if segments.is_empty() {
            None
        } else {
            Some(segments.join("/"))
        }
    }

    /// Absolute path of a validated id.
    pub fn path_for(&self, id: &str) -> Result<PathBuf> {
        Self::validate_id(id)?;
        Ok(id.split('/').fold(self.root.clone(), |path, segment| path.join(segment)))
    }

    /// Validate a user-supplied id and append the extension when missing.
    pub fn canonical_id(&self, id: &str) -> Result<String> {
        Self::validate_id(id)?;
        let suffix = format!(".{}", self.extension);
        if id.ends_with(&suffix) {
            Ok(id.to_string())
        } else {
            Ok(format!("{id}{suffix}"))
        }
    }

    /// Ids must be non-empty, relative and free of `..` or empty segments.
    fn validate_id(id: &str) -> Result<()> {
        if id.trim().is_empty() {
            return Err(NoteGraphError::InvalidDocumentId(
                "id cannot be empty".to_string(),
            ));
        }

        if id.starts_with('/') || id.contains('\\') || Path::new(id).is_absolute() {
            return Err(NoteGraphError::InvalidDocumentId(id.to_string()));
        }

        if id
            .split('/')
            .any(|segment| segment.is_empty() || segment == "." || segment == "..")
        {
            return Err(NoteGraphError::InvalidDocumentId(id.to_string()));
        }

        Ok(())
    }
}

fn root_ignores(root: &Path) -> Gitignore {
    let mut builder = GitignoreBuilder::new(root);
    for name in [".gitignore", IGNORE_FILE] {
        let path = root.join(name);
        if path.is_file() {
            if let Some(e) = builder.add(&path) {
                warn!(path = %path.display(), error = %e, "bad ignore file");
            }
        }
    }
    builder.build().unwrap_or_else(|e| {
        warn!(error = %e, "ignore rules unavailable");
        Gitignore::empty()
    })
}

impl DocumentSource for FsStore {
    fn extension(&self) -> &str {
        &self.extension
    }

    async fn list(&self) -> Result<Vec<String>> {
        Ok(self.list_ids())
    }

    async fn fetch(&self, id: &str) -> Result<Option<NoteDocument>> {
        self.read_document(id)
    }

    async fn fetch_all(&self) -> Result<Vec<NoteDocument>> {
        let store = self.clone();
        tokio::task::spawn_blocking(move || store.read_all())
            .await
            .map_err(|e| NoteGraphError::Io(std::io::Error::other(e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn vault() -> (tempfile::TempDir, FsStore) {
        let dir = tempdir().unwrap();
        let store = FsStore::open(dir.path(), "md").unwrap();
        (dir, store)
    }

    #[test]
    fn test_open_missing_vault() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("nope");
        assert!(matches!(
            FsStore::open(&missing, "md"),
            Err(NoteGraphError::VaultNotFound(_))
        ));
    }

    #[test]
    fn test_list_respects_ignores() {
        let (_dir, store) = vault();
        store.write_note("index.md", "# Index").unwrap();
        store.write_note("projects/alpha.md", "alpha").unwrap();
        store.write_note("drafts/wip.md", "wip").unwrap();
        store.write_note("archive/old.md", "old").unwrap();

        fs::write(store.root().join("readme.txt"), "not a note").unwrap();
        fs::create_dir_all(store.root().join(".obsidian")).unwrap();
        fs::write(store.root().join(".obsidian/workspace.md"), "hidden").unwrap();
        fs::write(store.root().join(".gitignore"), "archive/\n").unwrap();
        fs::write(store.root().join(IGNORE_FILE), "drafts/\n").unwrap();

        assert_eq!(store.list_ids(), vec!["index.md", "projects/alpha.md"]);

        // Ignore rules are read at open time.
        let reopened = FsStore::open(store.root(), "md").unwrap();
        assert!(reopened.is_ignored("drafts/wip.md"));
        assert!(reopened.is_ignored("archive/old.md"));
        assert!(!reopened.is_ignored("projects/alpha.md"));
    }

    #[test]
    fn test_write_read_delete() {
        let (_dir, store) = vault();

        let id = store.write_note("notes/idea", "# Idea\n[[other]] #draft").unwrap();
        assert_eq!(id, "notes/idea.md");
        assert!(store.root().join("notes/idea.md").is_file());
        assert!(!store.root().join("notes/idea.md.tmp").exists());

        let doc = store.read_document("notes/idea.md").unwrap().unwrap();
        assert_eq!(doc.title, "Idea");
        assert_eq!(doc.outlinks, vec!["other"]);
        assert!(doc.updated.is_some());

        store.delete_note("notes/idea.md").unwrap();
        assert!(store.read_document("notes/idea.md").unwrap().is_none());
        assert!(matches!(
            store.delete_note("notes/idea.md"),
            Err(NoteGraphError::DocumentNotFound(_))
        ));
    }

    #[test]
    fn test_frontmatter_timestamp_wins_over_mtime() {
        let (_dir, store) = vault();
        store
            .write_note("dated.md", "---\nupdated: 2024-01-02\n---\nbody")
            .unwrap();
        let doc = store.read_document("dated.md").unwrap().unwrap();
        assert_eq!(
            doc.updated.map(|t| t.format("%Y-%m-%d").to_string()),
            Some("2024-01-02".to_string())
        );
    }

    #[test]
    fn test_invalid_ids_rejected() {
        let (_dir, store) = vault();
        for id in ["", "   ", "../escape.md", "/abs.md", "a//b.md", "a/./b.md", "a\\b.md"] {
            assert!(
                matches!(store.write_note(id, "x"), Err(NoteGraphError::InvalidDocumentId(_))),
                "accepted {id:?}"
            );
        }
    }

    #[test]
    fn test_id_for_path() {
        let (_dir, store) = vault();
        let root = store.root().to_path_buf();

        assert_eq!(store.id_for_path(&root.join("a/b.md")), Some("a/b.md".to_string()));
        assert_eq!(store.id_for_path(&root.join("a/b.txt")), None);
        assert_eq!(store.id_for_path(&root.join(".git/x.md")), None);
        assert_eq!(store.id_for_path(&root.join("a/b.md.tmp")), None);
        assert_eq!(store.id_for_path(Path::new("/elsewhere/c.md")), None);
    }

    #[tokio::test]
    async fn test_fetch_all_reads_every_note() {
        let (_dir, store) = vault();
        for i in 0..20 {
            store
                .write_note(&format!("n{i:02}.md"), &format!("note {i} [[n00]]"))
                .unwrap();
        }

        let mut ids: Vec<String> = store
            .fetch_all()
            .await
            .unwrap()
            .into_iter()
            .map(|d| d.id)
            .collect();
        ids.sort();
        assert_eq!(ids.len(), 20);
        assert_eq!(ids[0], "n00.md");
        assert!(store.fetch("n99.md").await.unwrap().is_none());
    }
}
