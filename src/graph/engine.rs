//
//  engine.rs
//  notegraph
//
//  Created by hak (tharun)
//

use std::collections::HashMap;

use super::resolve::resolve;
use super::table::NodeTable;
use super::types::*;
use crate::search::SearchIndex;

/// The knowledge graph: node table, resolved edges and the embedded search index.
pub struct NoteGraph {
    /// Id-keyed node arena.
    pub(crate) table: NodeTable,
    /// Resolved edges: source id -> distinct target ids, in outlink order.
    /// Derived from the table by `relink`; never edited by hand elsewhere.
    pub(crate) edges: HashMap<String, Vec<String>>,
    /// Lexical index over note text.
    pub(crate) search: SearchIndex,
}

impl NoteGraph {
    /// Create an empty graph for notes with the default `md` extension.
    pub fn new() -> Self {
        Self::with_extension("md")
    }

    /// Create an empty graph for notes with the given extension.
    pub fn with_extension(extension: &str) -> Self {
        Self {
            table: NodeTable::new(extension),
            edges: HashMap::new(),
            search: SearchIndex::new(),
        }
    }

    /// Read-only access to the node table.
    pub fn nodes(&self) -> &NodeTable {
        &self.table
    }

    /// Read-only access to the search index.
    pub fn search_index(&self) -> &SearchIndex {
        &self.search
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Resolve a free-form reference (id, id without extension, base name or title).
    pub fn resolve(&self, reference: &str) -> Option<&GraphNode> {
        resolve(&self.table, reference)
    }

    /// Resolved targets of a node's outlinks, in outlink order.
    pub fn resolved_targets(&self, id: &str) -> &[String] {
        self.edges.get(id).map(Vec::as_slice).unwrap_or_default()
    }

    /// Undirected neighbours: resolved targets first, then inlinks. No self, no repeats.
    pub(crate) fn neighbors(&self, id: &str) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        let Some(node) = self.table.get(id) else {
            return seen;
        };
        for other in self.resolved_targets(id).iter().chain(node.inlinks.iter()) {
            if other != id && !seen.contains(&other.as_str()) {
                seen.push(other);
            }
        }
        seen
    }

    // ─── Edge Maintenance ───────────────────────────────────────

    /// Resolve every outlink of `node` against the current table.
    fn fresh_targets(&self, node: &GraphNode) -> Vec<String> {
        let mut targets: Vec<String> = Vec::new();
        for outlink in &node.outlinks {
            if let Some(target) = resolve(&self.table, outlink) {
                if !targets.contains(&target.id) {
                    targets.push(target.id.clone());
                }
            }
        }
        targets
    }

    /// Drop every edge contributed by `id`, stripping it from its targets' inlinks.
    pub(crate) fn unlink_source(&mut self, id: &str) {
        if let Some(targets) = self.edges.remove(id) {
            for target in targets {
                self.remove_inlink(&target, id);
            }
        }
    }

    /// Re-resolve every outlink in the table and apply the differences.
    ///
    /// A node change can move references held by unrelated nodes (a new note
    /// can shadow a title match, a removed one can uncover another base-name
    /// match), so all sources are checked. Returns the number of sources whose
    /// edges changed.
    pub(crate) fn relink(&mut self) -> usize {
        let changes: Vec<(String, Vec<String>)> = self
            .table
            .iter()
            .filter_map(|node| {
                let fresh = self.fresh_targets(node);
                if fresh.as_slice() == self.resolved_targets(&node.id) {
                    None
                } else {
                    Some((node.id.clone(), fresh))
                }
            })
            .collect();

        let changed = changes.len();
        for (source, fresh) in changes {
            let old = self.edges.remove(&source).unwrap_or_default();
            for target in old.iter().filter(|t| !fresh.contains(t)) {
                self.remove_inlink(target, &source);
            }
            for target in fresh.iter().filter(|t| !old.contains(t)) {
                if let Some(node) = self.table.get_mut(target) {
                    node.inlinks.push(source.clone());
                }
            }
            if !fresh.is_empty() {
                self.edges.insert(source, fresh);
            }
        }
        changed
    }

    fn remove_inlink(&mut self, target: &str, source: &str) {
        if let Some(node) = self.table.get_mut(target) {
            if let Some(pos) = node.inlinks.iter().position(|s| s == source) {
                node.inlinks.remove(pos);
            }
        }
    }
}

impl Default for NoteGraph {
    fn default() -> Self {
        Self::new()
    }
}
