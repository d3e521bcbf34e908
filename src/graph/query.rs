//
//  query.rs
//  notegraph
//
//  Created by hak (tharun)
//

use std::collections::{HashMap, HashSet, VecDeque};

use super::engine::NoteGraph;
use super::types::*;
use crate::note::normalize_tag;
use crate::search::SearchHit;

impl NoteGraph {
    /// Look up a node by any reference the resolver accepts.
    pub fn get_node(&self, reference: &str) -> Option<&GraphNode> {
        self.resolve(reference)
    }

    /// Nodes linking to the referenced node. Empty for unknown references.
    pub fn get_backlinks(&self, reference: &str) -> Vec<&GraphNode> {
        let Some(node) = self.resolve(reference) else {
            return Vec::new();
        };
        node.inlinks
            .iter()
            .filter_map(|id| self.table.get(id))
            .collect()
    }

    /// Nodes the referenced node links to (resolved outlinks only).
    pub fn get_forward_links(&self, reference: &str) -> Vec<&GraphNode> {
        let Some(node) = self.resolve(reference) else {
            return Vec::new();
        };
        self.resolved_targets(&node.id)
            .iter()
            .filter_map(|id| self.table.get(id))
            .collect()
    }

    /// Breadth-first neighbourhood, ignoring link direction.
    ///
    /// Returns every node first reached at depth `1..=depth`, in BFS order.
    /// The start node is never included.
    pub fn get_connected_nodes(&self, reference: &str, depth: usize) -> Vec<&GraphNode> {
        let Some(start) = self.resolve(reference) else {
            return Vec::new();
        };

        let mut visited: HashSet<&str> = HashSet::from([start.id.as_str()]);
        let mut queue: VecDeque<(&str, usize)> = VecDeque::from([(start.id.as_str(), 0)]);
        let mut result = Vec::new();

        while let Some((id, current_depth)) = queue.pop_front() {
            if current_depth >= depth {
                continue;
            }
            for next in self.neighbors(id) {
                if visited.insert(next) {
                    if let Some(node) = self.table.get(next) {
                        result.push(node);
                    }
                    queue.push_back((next, current_depth + 1));
                }
            }
        }

        result
    }

    /// Shortest undirected path between two references, both ends included.
    ///
    /// `None` when either end does not resolve or the nodes are disconnected.
    pub fn find_shortest_path(&self, source: &str, target: &str) -> Option<Vec<String>> {
        let from = self.resolve(source)?.id.as_str();
        let to = self.resolve(target)?.id.as_str();
        if from == to {
            return Some(vec![from.to_string()]);
        }

        let mut parent: HashMap<&str, &str> = HashMap::new();
        let mut queue: VecDeque<&str> = VecDeque::from([from]);
        parent.insert(from, from);

        while let Some(id) = queue.pop_front() {
            for next in self.neighbors(id) {
                if parent.contains_key(next) {
                    continue;
                }
                parent.insert(next, id);
                if next == to {
                    return Some(walk_back(&parent, from, to));
                }
                queue.push_back(next);
            }
        }

        None
    }

    /// The `limit` best-connected nodes by `|inlinks| + |outlinks|`.
    pub fn get_hub_notes(&self, limit: usize) -> Vec<HubNote> {
        let mut hubs: Vec<HubNote> = self
            .table
            .iter()
            .map(|node| HubNote {
                id: node.id.clone(),
                title: node.title.clone(),
                degree: node.degree(),
            })
            .collect();
        hubs.sort_by(|a, b| b.degree.cmp(&a.degree));
        hubs.truncate(limit);
        hubs
    }

    /// Nodes carrying a tag (matched after normalization, so `#Rust` == `rust`).
    pub fn get_nodes_by_tag(&self, tag: &str) -> Vec<&GraphNode> {
        let Some(tag) = normalize_tag(tag) else {
            return Vec::new();
        };
        self.table
            .iter()
            .filter(|node| node.tags.contains(&tag))
            .collect()
    }

    /// Nodes with no inlinks and no outlinks.
    pub fn get_orphans(&self) -> Vec<&GraphNode> {
        self.table.iter().filter(|node| node.is_orphan()).collect()
    }

    /// Keyword search over note text.
    pub fn search(&self, query: &str, limit: usize) -> Vec<SearchHit> {
        self.search.search(query, limit)
    }

    /// Notes lexically similar to the referenced note.
    pub fn find_similar(&self, reference: &str, limit: usize) -> Vec<SearchHit> {
        match self.resolve(reference) {
            Some(node) => self.search.find_similar(&node.id, limit),
            None => Vec::new(),
        }
    }
}

fn walk_back(parent: &HashMap<&str, &str>, from: &str, to: &str) -> Vec<String> {
    let mut path = vec![to.to_string()];
    let mut current = to;
    while current != from {
        match parent.get(current) {
            Some(&prev) => {
                path.push(prev.to_string());
                current = prev;
            }
            None => break,
        }
    }
    path.reverse();
    path
}
