//! Note graph module, the structural backbone of notegraph.
//!
//! Provides the node table and reference resolver, the graph engine with its
//! build/update/remove mutations, traversal and analysis queries, and vault
//! building.

pub mod analysis;
pub mod builder;
pub mod engine;
pub mod mutation;
pub mod query;
pub mod resolve;
pub mod table;
pub mod types;

pub use builder::build_vault;
pub use engine::NoteGraph;
pub use resolve::{resolve, resolve_with_strategy, ResolveStrategy};
pub use table::NodeTable;
pub use types::{GraphEdge, GraphExport, GraphNode, GraphStats, HubNote};
