//
//  table.rs
//  notegraph
//
//  Created by hak (tharun)
//

use std::collections::{BTreeMap, BTreeSet, HashMap};

use super::types::GraphNode;
use crate::note::base_name;

/// Id-keyed node arena plus the lookup indexes the resolver needs.
///
/// Iteration is always in id order, which makes every "first match" and
/// every tie-break deterministic.
#[derive(Debug, Clone)]
pub struct NodeTable {
    nodes: BTreeMap<String, GraphNode>,
    /// Index: lowercased base name -> ids.
    by_base_name: HashMap<String, BTreeSet<String>>,
    /// Index: lowercased title -> ids.
    by_title: HashMap<String, BTreeSet<String>>,
    /// Note extension without the dot.
    extension: String,
}

impl NodeTable {
    pub fn new(extension: &str) -> Self {
        Self {
            nodes: BTreeMap::new(),
            by_base_name: HashMap::new(),
            by_title: HashMap::new(),
            extension: extension.trim_start_matches('.').to_string(),
        }
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.get(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &GraphNode> {
        self.nodes.values()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.nodes.keys().map(String::as_str)
    }

    /// First id (in table order) whose base name matches, ignoring case.
    pub fn find_by_base_name(&self, name: &str) -> Option<&GraphNode> {
        first_in(&self.by_base_name, name).and_then(|id| self.nodes.get(id))
    }

    /// First id (in table order) whose title matches, ignoring case.
    pub fn find_by_title(&self, title: &str) -> Option<&GraphNode> {
        first_in(&self.by_title, title).and_then(|id| self.nodes.get(id))
    }

    pub(crate) fn get_mut(&mut self, id: &str) -> Option<&mut GraphNode> {
        self.nodes.get_mut(id)
    }

    /// Insert or replace a node, keeping the indexes in step.
    pub(crate) fn insert(&mut self, node: GraphNode) -> Option<GraphNode> {
        let previous = self.remove(&node.id);
        let base = base_name(&node.id, &self.extension).to_lowercase();
        self.by_base_name
            .entry(base)
            .or_default()
            .insert(node.id.clone());
        self.by_title
            .entry(node.title.to_lowercase())
            .or_default()
            .insert(node.id.clone());
        self.nodes.insert(node.id.clone(), node);
        previous
    }

    pub(crate) fn remove(&mut self, id: &str) -> Option<GraphNode> {
        let node = self.nodes.remove(id)?;
        let base = base_name(&node.id, &self.extension).to_lowercase();
        unindex(&mut self.by_base_name, &base, id);
        unindex(&mut self.by_title, &node.title.to_lowercase(), id);
        Some(node)
    }

    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
        self.by_base_name.clear();
        self.by_title.clear();
    }
}

fn first_in<'a>(index: &'a HashMap<String, BTreeSet<String>>, key: &str) -> Option<&'a str> {
    index
        .get(&key.to_lowercase())
        .and_then(|ids| ids.iter().next())
        .map(String::as_str)
}

fn unindex(index: &mut HashMap<String, BTreeSet<String>>, key: &str, id: &str) {
    if let Some(ids) = index.get_mut(key) {
        ids.remove(id);
        if ids.is_empty() {
            index.remove(key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: &str, title: &str) -> GraphNode {
        GraphNode {
            id: id.to_string(),
            title: title.to_string(),
            tags: Default::default(),
            outlinks: Vec::new(),
            inlinks: Vec::new(),
            updated: None,
        }
    }

    #[test]
    fn test_indexes_follow_insert_and_remove() {
        let mut table = NodeTable::new(".md");
        assert_eq!(table.extension(), "md");

        table.insert(node("notes/Rust.md", "Ownership"));
        assert!(table.find_by_base_name("rust").is_some());
        assert!(table.find_by_title("OWNERSHIP").is_some());

        table.remove("notes/Rust.md");
        assert!(table.find_by_base_name("rust").is_none());
        assert!(table.find_by_title("ownership").is_none());
        assert!(table.is_empty());
    }

    #[test]
    fn test_replace_drops_stale_title() {
        let mut table = NodeTable::new("md");
        table.insert(node("a.md", "Old"));
        let previous = table.insert(node("a.md", "New"));

        assert_eq!(previous.map(|n| n.title), Some("Old".to_string()));
        assert!(table.find_by_title("old").is_none());
        assert_eq!(table.find_by_title("new").map(|n| n.id.as_str()), Some("a.md"));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_shared_base_name_prefers_first_id() {
        let mut table = NodeTable::new("md");
        table.insert(node("z/topic.md", "Z"));
        table.insert(node("a/Topic.md", "A"));
        assert_eq!(
            table.find_by_base_name("TOPIC").map(|n| n.id.as_str()),
            Some("a/Topic.md")
        );
    }
}
