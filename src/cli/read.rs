//! Read operations: graph queries and search.
//!
//! Human output is one line per note (`id  title`); `--json` prints the
//! underlying records instead.

use anyhow::Result;
use serde::Serialize;

use super::print_json;
use crate::graph::{GraphNode, GraphStats, NoteGraph};
use crate::search::SearchHit;

/// Print graph statistics.
pub fn stats(graph: &NoteGraph, json: bool) -> Result<()> {
    let stats = graph.get_stats();
    if json {
        return print_json(&stats);
    }
    print_stats(&stats);
    Ok(())
}

pub fn print_stats(stats: &GraphStats) {
    println!("notes        {}", stats.total_nodes);
    println!("links        {}", stats.total_edges);
    println!("orphans      {}", stats.orphaned_nodes);
    println!("avg links    {:.2}", stats.average_connections);
    println!("density      {:.4}", stats.density);
    println!("components   {}", stats.components);
}

#[derive(Serialize)]
struct NoteView<'g> {
    #[serde(flatten)]
    node: &'g GraphNode,
    resolved: &'g [String],
}

/// Show one note: title, tags, outlinks (marking dangling ones) and backlinks.
pub fn note(graph: &NoteGraph, reference: &str, json: bool) -> Result<()> {
    let Some(node) = graph.get_node(reference) else {
        println!("Note '{}' not found", reference);
        return Ok(());
    };
    let resolved = graph.resolved_targets(&node.id);

    if json {
        return print_json(&NoteView { node, resolved });
    }

    println!("{}  {}", node.id, node.title);
    if !node.tags.is_empty() {
        let tags: Vec<String> = node.tags.iter().map(|t| format!("#{t}")).collect();
        println!("tags: {}", tags.join(" "));
    }
    if let Some(updated) = node.updated {
        println!("updated: {}", updated.to_rfc3339());
    }
    for outlink in &node.outlinks {
        match graph.get_node(outlink) {
            Some(target) => println!("> {} ({})", outlink, target.id),
            None => println!("> {} (dangling)", outlink),
        }
    }
    for source in &node.inlinks {
        println!("< {}", source);
    }
    Ok(())
}

/// Print a list of nodes, or a message when empty.
pub fn nodes(nodes: &[&GraphNode], empty: &str, json: bool) -> Result<()> {
    if json {
        return print_json(nodes);
    }
    if nodes.is_empty() {
        println!("{}", empty);
        return Ok(());
    }
    for node in nodes {
        println!("{}  {}", node.id, node.title);
    }
    Ok(())
}

pub fn path(graph: &NoteGraph, from: &str, to: &str, json: bool) -> Result<()> {
    let path = graph.find_shortest_path(from, to);
    if json {
        return print_json(&path);
    }
    match path {
        Some(ids) => println!("{}", ids.join(" -> ")),
        None => println!("No path between '{}' and '{}'", from, to),
    }
    Ok(())
}

pub fn hubs(graph: &NoteGraph, limit: usize, json: bool) -> Result<()> {
    let hubs = graph.get_hub_notes(limit);
    if json {
        return print_json(&hubs);
    }
    for hub in &hubs {
        println!("{:>4}  {}  {}", hub.degree, hub.id, hub.title);
    }
    Ok(())
}

pub fn clusters(graph: &NoteGraph, min_size: usize, json: bool) -> Result<()> {
    let clusters = graph.get_clusters(min_size);
    if json {
        return print_json(&clusters);
    }
    if clusters.is_empty() {
        println!("No clusters of {} or more notes", min_size);
    }
    for (i, members) in clusters.iter().enumerate() {
        println!("#{} ({} notes)", i + 1, members.len());
        for id in members {
            println!("  {}", id);
        }
    }
    Ok(())
}

/// Print search hits with their scores.
pub fn hits(hits: &[SearchHit], empty: &str, json: bool) -> Result<()> {
    if json {
        return print_json(hits);
    }
    if hits.is_empty() {
        println!("{}", empty);
        return Ok(());
    }
    for hit in hits {
        println!("{:.4}  {}", hit.score, hit.id);
    }
    Ok(())
}

/// Export is JSON regardless of `--json`.
pub fn export(graph: &NoteGraph) -> Result<()> {
    print_json(&graph.export_graph())
}
