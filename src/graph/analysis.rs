//
//  analysis.rs
//  notegraph
//
//  Created by hak (tharun)
//

use std::collections::{HashMap, HashSet};

use petgraph::algo::connected_components;
use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::unionfind::UnionFind;

use super::engine::NoteGraph;
use super::types::*;

/// Undirected view of the resolved edges. Node index `i` is the `i`-th id in
/// table order; each connected pair gets one edge and self-links are dropped.
pub(crate) struct Snapshot<'g> {
    pub graph: UnGraph<&'g str, ()>,
}

impl<'g> Snapshot<'g> {
    fn id(&self, index: usize) -> &'g str {
        self.graph[NodeIndex::new(index)]
    }

    fn adjacency(&self) -> Vec<Vec<usize>> {
        self.graph
            .node_indices()
            .map(|n| self.graph.neighbors(n).map(|m| m.index()).collect())
            .collect()
    }
}

impl NoteGraph {
    pub(crate) fn snapshot(&self) -> Snapshot<'_> {
        let mut graph = UnGraph::with_capacity(self.table.len(), self.edge_count());
        let mut index: HashMap<&str, NodeIndex> = HashMap::with_capacity(self.table.len());
        for id in self.table.ids() {
            index.insert(id, graph.add_node(id));
        }

        let mut seen: HashSet<(NodeIndex, NodeIndex)> = HashSet::new();
        for (source, targets) in &self.edges {
            let Some(&a) = index.get(source.as_str()) else {
                continue;
            };
            for target in targets {
                let Some(&b) = index.get(target.as_str()) else {
                    continue;
                };
                if a == b {
                    continue;
                }
                let pair = if a < b { (a, b) } else { (b, a) };
                if seen.insert(pair) {
                    graph.add_edge(pair.0, pair.1, ());
                }
            }
        }

        Snapshot { graph }
    }

    /// Number of connected components, ignoring link direction.
    pub fn components(&self) -> usize {
        connected_components(&self.snapshot().graph)
    }

    /// Connected components with at least `min_size` members.
    ///
    /// Members are listed in table order; clusters are sorted largest first,
    /// ties kept in order of their first member.
    pub fn get_clusters(&self, min_size: usize) -> Vec<Vec<String>> {
        let snapshot = self.snapshot();
        let n = snapshot.graph.node_count();

        let mut sets = UnionFind::<usize>::new(n);
        for edge in snapshot.graph.raw_edges() {
            sets.union(edge.source().index(), edge.target().index());
        }

        let mut clusters: Vec<Vec<String>> = Vec::new();
        let mut slot: HashMap<usize, usize> = HashMap::new();
        for (i, label) in sets.into_labeling().into_iter().enumerate() {
            let at = *slot.entry(label).or_insert_with(|| {
                clusters.push(Vec::new());
                clusters.len() - 1
            });
            clusters[at].push(snapshot.id(i).to_string());
        }

        clusters.retain(|members| members.len() >= min_size);
        clusters.sort_by(|a, b| b.len().cmp(&a.len()));
        clusters
    }

    /// Nodes whose removal splits their component (articulation points).
    ///
    /// Iterative Tarjan DFS, so deep chains do not overflow the stack.
    /// Results are in table order.
    pub fn find_bridge_notes(&self) -> Vec<&GraphNode> {
        let snapshot = self.snapshot();
        let adjacency = snapshot.adjacency();
        let n = adjacency.len();

        // disc == 0 means unvisited.
        let mut disc = vec![0usize; n];
        let mut low = vec![0usize; n];
        let mut is_cut = vec![false; n];
        let mut timer = 1;

        for root in 0..n {
            if disc[root] != 0 {
                continue;
            }
            disc[root] = timer;
            low[root] = timer;
            timer += 1;

            let mut root_children = 0;
            // (vertex, parent, next neighbour position)
            let mut stack: Vec<(usize, usize, usize)> = vec![(root, usize::MAX, 0)];

            while let Some(frame) = stack.last_mut() {
                let (v, parent) = (frame.0, frame.1);
                if frame.2 < adjacency[v].len() {
                    let w = adjacency[v][frame.2];
                    frame.2 += 1;
                    if disc[w] == 0 {
                        disc[w] = timer;
                        low[w] = timer;
                        timer += 1;
                        if v == root {
                            root_children += 1;
                        }
                        stack.push((w, v, 0));
                    } else if w != parent {
                        low[v] = low[v].min(disc[w]);
                    }
                } else {
                    stack.pop();
                    if let Some(&(p, _, _)) = stack.last() {
                        low[p] = low[p].min(low[v]);
                        if p != root && low[v] >= disc[p] {
                            is_cut[p] = true;
                        }
                    }
                }
            }

            if root_children > 1 {
                is_cut[root] = true;
            }
        }

        (0..n)
            .filter(|&i| is_cut[i])
            .filter_map(|i| self.table.get(snapshot.id(i)))
            .collect()
    }

    /// Summary statistics.
    pub fn get_stats(&self) -> GraphStats {
        let total_nodes = self.table.len();
        let total_edges = self.edge_count();
        let orphaned_nodes = self.table.iter().filter(|n| n.is_orphan()).count();

        let average_connections = if total_nodes == 0 {
            0.0
        } else {
            let degrees: usize = self.table.iter().map(GraphNode::degree).sum();
            degrees as f64 / total_nodes as f64
        };

        let density = if total_nodes <= 1 {
            0.0
        } else {
            total_edges as f64 / (total_nodes * (total_nodes - 1)) as f64
        };

        GraphStats {
            total_nodes,
            total_edges,
            orphaned_nodes,
            average_connections,
            density,
            components: self.components(),
        }
    }

    /// Every node plus every resolved edge, both in table order.
    pub fn export_graph(&self) -> GraphExport {
        let nodes: Vec<GraphNode> = self.table.iter().cloned().collect();
        let edges = self
            .table
            .ids()
            .flat_map(|source| {
                self.resolved_targets(source).iter().map(move |target| GraphEdge {
                    source: source.to_string(),
                    target: target.clone(),
                })
            })
            .collect();
        GraphExport { nodes, edges }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph(texts: &[(&str, &str)]) -> NoteGraph {
        let mut graph = NoteGraph::new();
        graph.build_from_texts(texts.iter().copied());
        graph
    }

    fn bridge_ids(graph: &NoteGraph) -> Vec<String> {
        graph
            .find_bridge_notes()
            .into_iter()
            .map(|n| n.id.clone())
            .collect()
    }

    /// Articulation points by definition: remove each node, recount.
    fn naive_bridges(graph: &NoteGraph) -> Vec<String> {
        let snapshot = graph.snapshot();
        let baseline = connected_components(&snapshot.graph);
        snapshot
            .graph
            .node_indices()
            .filter(|&idx| {
                let mut without = snapshot.graph.clone();
                without.remove_node(idx);
                connected_components(&without) > baseline
            })
            .map(|idx| snapshot.graph[idx].to_string())
            .collect()
    }

    #[test]
    fn test_triangle_has_no_bridges() {
        let g = graph(&[("a.md", "[[b]]"), ("b.md", "[[c]]"), ("c.md", "[[a]]")]);
        assert!(g.find_bridge_notes().is_empty());
    }

    #[test]
    fn test_chain_bridge_is_middle() {
        let g = graph(&[("a.md", "[[b]]"), ("b.md", "[[c]]"), ("c.md", "")]);
        assert_eq!(bridge_ids(&g), vec!["b.md"]);
    }

    #[test]
    fn test_isolated_and_leaf_nodes_are_not_bridges() {
        let g = graph(&[("a.md", "[[b]]"), ("b.md", ""), ("lonely.md", "")]);
        assert!(g.find_bridge_notes().is_empty());
    }

    #[test]
    fn test_bridges_match_naive_definition() {
        let g = graph(&[
            // Two triangles joined through "hinge", plus a tail and a separate pair.
            ("a.md", "[[b]] [[c]]"),
            ("b.md", "[[c]]"),
            ("c.md", "[[hinge]]"),
            ("hinge.md", "[[d]]"),
            ("d.md", "[[e]] [[f]]"),
            ("e.md", "[[f]]"),
            ("f.md", "[[tail]]"),
            ("tail.md", "[[end]]"),
            ("end.md", ""),
            ("x.md", "[[y]]"),
            ("y.md", "[[x]]"),
            ("self.md", "[[self]]"),
        ]);
        let fast = bridge_ids(&g);
        assert_eq!(fast, naive_bridges(&g));
        assert_eq!(fast, vec!["c.md", "d.md", "f.md", "hinge.md", "tail.md"]);
    }

    #[test]
    fn test_two_pairs_make_two_components() {
        let g = graph(&[("a.md", "[[b]]"), ("b.md", ""), ("c.md", "[[d]]"), ("d.md", "")]);
        let stats = g.get_stats();
        assert_eq!(stats.components, 2);
        assert_eq!(stats.total_edges, 2);
        assert_eq!(stats.orphaned_nodes, 0);
        assert_eq!(stats.average_connections, 1.0);
        assert!((stats.density - 2.0 / 12.0).abs() < 1e-9);
    }

    #[test]
    fn test_density_zero_without_edges() {
        let g = graph(&[("a.md", "no links"), ("b.md", "[[ghost]]")]);
        let stats = g.get_stats();
        assert_eq!(stats.total_edges, 0);
        assert_eq!(stats.density, 0.0);
        assert_eq!(stats.components, 2);
        // b has a dangling outlink, so only a is orphaned.
        assert_eq!(stats.orphaned_nodes, 1);

        let single = graph(&[("only.md", "[[only]]")]);
        assert_eq!(single.get_stats().density, 0.0);
    }

    #[test]
    fn test_clusters_partition_nodes() {
        let g = graph(&[
            ("a.md", "[[b]]"),
            ("b.md", "[[c]]"),
            ("c.md", ""),
            ("x.md", "[[y]]"),
            ("y.md", ""),
            ("lonely.md", ""),
        ]);

        let all = g.get_clusters(1);
        assert_eq!(
            all,
            vec![
                vec!["a.md".to_string(), "b.md".to_string(), "c.md".to_string()],
                vec!["x.md".to_string(), "y.md".to_string()],
                vec!["lonely.md".to_string()],
            ]
        );
        let mut members: Vec<String> = all.into_iter().flatten().collect();
        members.sort();
        let mut ids: Vec<String> = g.nodes().ids().map(String::from).collect();
        ids.sort();
        assert_eq!(members, ids);

        assert_eq!(g.get_clusters(2).len(), 2);
        assert_eq!(g.get_clusters(3).len(), 1);
        assert!(g.get_clusters(4).is_empty());
    }

    #[test]
    fn test_export_lists_resolved_edges() {
        let g = graph(&[("a.md", "[[b]] [[ghost]]"), ("b.md", "[[a]]")]);
        let export = g.export_graph();
        assert_eq!(export.nodes.len(), 2);
        assert_eq!(
            export.edges,
            vec![
                GraphEdge { source: "a.md".into(), target: "b.md".into() },
                GraphEdge { source: "b.md".into(), target: "a.md".into() },
            ]
        );
        let json = serde_json::to_value(&export).unwrap();
        assert_eq!(json["edges"][0]["source"], "a.md");
    }
}
