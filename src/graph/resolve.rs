//
//  resolve.rs
//  notegraph
//
//  Created by hak (tharun)
//

use super::table::NodeTable;
use super::types::GraphNode;

/// One way of matching a free-form reference to a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveStrategy {
    /// The reference is a canonical id.
    ExactId,
    /// The reference is a canonical id without the note extension.
    WithExtension,
    /// Case-insensitive match on the last path segment minus extension.
    BaseName,
    /// Case-insensitive match on the note title.
    Title,
}

impl ResolveStrategy {
    /// Precedence order; the first strategy that matches wins.
    pub const ORDER: [ResolveStrategy; 4] = [
        ResolveStrategy::ExactId,
        ResolveStrategy::WithExtension,
        ResolveStrategy::BaseName,
        ResolveStrategy::Title,
    ];

    pub fn apply<'t>(self, table: &'t NodeTable, reference: &str) -> Option<&'t GraphNode> {
        match self {
            ResolveStrategy::ExactId => table.get(reference),
            ResolveStrategy::WithExtension => {
                let suffix = format!(".{}", table.extension());
                if reference.ends_with(&suffix) {
                    None
                } else {
                    table.get(&format!("{reference}{suffix}"))
                }
            }
            ResolveStrategy::BaseName => table.find_by_base_name(reference),
            ResolveStrategy::Title => table.find_by_title(reference),
        }
    }
}

/// Resolve a reference to a node, reporting which strategy matched.
pub fn resolve_with_strategy<'t>(
    table: &'t NodeTable,
    reference: &str,
) -> Option<(ResolveStrategy, &'t GraphNode)> {
    if reference.trim().is_empty() {
        return None;
    }
    ResolveStrategy::ORDER
        .iter()
        .find_map(|&strategy| strategy.apply(table, reference).map(|node| (strategy, node)))
}

/// Resolve a reference to a node. Dangling references yield `None`.
pub fn resolve<'t>(table: &'t NodeTable, reference: &str) -> Option<&'t GraphNode> {
    resolve_with_strategy(table, reference).map(|(_, node)| node)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> NodeTable {
        let mut table = NodeTable::new("md");
        for (id, title) in [
            ("Projects.md", "Index of work"),
            ("notes/projects.md", "Projects Archive"),
            ("notes/rust.md", "Ownership"),
            ("ideas/Graph Theory.md", "Graphs"),
        ] {
            table.insert(GraphNode {
                id: id.to_string(),
                title: title.to_string(),
                tags: Default::default(),
                outlinks: Vec::new(),
                inlinks: Vec::new(),
                updated: None,
            });
        }
        table
    }

    fn strategy_for(table: &NodeTable, reference: &str) -> Option<(ResolveStrategy, String)> {
        resolve_with_strategy(table, reference).map(|(s, n)| (s, n.id.clone()))
    }

    #[test]
    fn test_exact_id_first() {
        let table = table();
        assert_eq!(
            strategy_for(&table, "notes/rust.md"),
            Some((ResolveStrategy::ExactId, "notes/rust.md".to_string()))
        );
    }

    #[test]
    fn test_extension_appended() {
        let table = table();
        assert_eq!(
            strategy_for(&table, "notes/rust"),
            Some((ResolveStrategy::WithExtension, "notes/rust.md".to_string()))
        );
        // Already has the extension: no second attempt.
        assert!(ResolveStrategy::WithExtension
            .apply(&table, "notes/missing.md")
            .is_none());
    }

    #[test]
    fn test_extension_beats_base_name() {
        let table = table();
        // "Projects" + ".md" is an exact id even though two nodes share the base name.
        assert_eq!(
            strategy_for(&table, "Projects"),
            Some((ResolveStrategy::WithExtension, "Projects.md".to_string()))
        );
        assert_eq!(
            strategy_for(&table, "PROJECTS"),
            Some((ResolveStrategy::BaseName, "Projects.md".to_string()))
        );
    }

    #[test]
    fn test_base_name_ignores_case_and_folders() {
        let table = table();
        assert_eq!(
            strategy_for(&table, "graph theory"),
            Some((ResolveStrategy::BaseName, "ideas/Graph Theory.md".to_string()))
        );
    }

    #[test]
    fn test_title_is_last_resort() {
        let table = table();
        assert_eq!(
            strategy_for(&table, "ownership"),
            Some((ResolveStrategy::Title, "notes/rust.md".to_string()))
        );
    }

    #[test]
    fn test_dangling_and_empty() {
        let table = table();
        assert!(resolve(&table, "Nowhere").is_none());
        assert!(resolve(&table, "").is_none());
        assert!(resolve(&table, "   ").is_none());
    }
}
