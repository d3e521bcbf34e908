//
//  types.rs
//  notegraph
//
//  Created by hak (tharun)
//

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeSet;

use crate::note::NoteDocument;

/// One note in the graph.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphNode {
    /// Canonical id (vault-relative path).
    pub id: String,
    pub title: String,
    pub tags: BTreeSet<String>,
    /// Raw link targets as authored. Never normalized: what they resolve to
    /// depends on the whole node set.
    pub outlinks: Vec<String>,
    /// Canonical ids of nodes with a resolved link to this one.
    pub inlinks: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated: Option<DateTime<Utc>>,
}

impl GraphNode {
    /// A fresh node with no inlinks yet.
    pub fn from_document(doc: &NoteDocument) -> Self {
        Self {
            id: doc.id.clone(),
            title: doc.title.clone(),
            tags: doc.tags.clone(),
            outlinks: doc.outlinks.clone(),
            inlinks: Vec::new(),
            updated: doc.updated,
        }
    }

    /// `|inlinks| + |outlinks|`, dangling outlinks included.
    pub fn degree(&self) -> usize {
        self.inlinks.len() + self.outlinks.len()
    }

    pub fn is_orphan(&self) -> bool {
        self.inlinks.is_empty() && self.outlinks.is_empty()
    }
}

/// A resolved directed link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphEdge {
    pub source: String,
    pub target: String,
}

/// A node ranked by degree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HubNote {
    pub id: String,
    pub title: String,
    pub degree: usize,
}

/// Summary statistics for the whole graph.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphStats {
    pub total_nodes: usize,
    /// Resolved directed edges only.
    pub total_edges: usize,
    /// Nodes with no inlinks and no outlinks.
    pub orphaned_nodes: usize,
    pub average_connections: f64,
    /// `total_edges / (n * (n - 1))`, 0 for fewer than two nodes.
    pub density: f64,
    /// Connected components of the undirected graph.
    pub components: usize,
}

/// Full graph dump: every node plus every resolved edge.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphExport {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}
