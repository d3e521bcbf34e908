//! CLI module for notegraph.
//!
//! Commands:
//! - Graph: build, stats, note, backlinks, neighbors, path, hubs, clusters,
//!   bridges, orphans, tag, export
//! - Search: search, similar
//! - Vault: write, delete, watch

pub mod read;
pub mod write;

use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;

use crate::config::{NotegraphConfig, CONFIG_FILE};

#[derive(Parser)]
#[command(name = "notegraph", version)]
#[command(about = "notegraph - knowledge graph and search over a vault of markdown notes", long_about = None)]
pub struct Cli {
    /// Vault directory (default: from config, else current directory)
    #[arg(long, global = true)]
    pub vault: Option<PathBuf>,

    /// Config file (default: <vault>/notegraph.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Machine-readable JSON output
    #[arg(long, global = true)]
    pub json: bool,

    /// Log at debug level (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    // ─── Graph ────────────────────────────────────────────────────
    /// Build the graph and print statistics
    Build,

    /// Show graph statistics
    Stats,

    /// Show one note with its links and backlinks
    Note {
        /// Id, id without extension, file name or title
        reference: String,
    },

    /// List notes linking to a note
    Backlinks { reference: String },

    /// List notes within a link distance (direction ignored)
    Neighbors {
        reference: String,

        /// Max distance (default: graph.default_depth)
        #[arg(short, long)]
        depth: Option<usize>,
    },

    /// Shortest link path between two notes
    Path { from: String, to: String },

    /// Best-connected notes
    Hubs {
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Connected groups of notes
    Clusters {
        /// Smallest cluster to report (default: graph.min_cluster_size)
        #[arg(short, long)]
        min_size: Option<usize>,
    },

    /// Notes whose removal would split the graph
    Bridges,

    /// Notes with no links in or out
    Orphans,

    /// Notes carrying a tag
    Tag { tag: String },

    /// Dump every node and edge as JSON
    Export,

    // ─── Search ───────────────────────────────────────────────────
    /// Keyword search over note text
    Search {
        query: String,

        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Notes with similar wording
    Similar {
        reference: String,

        #[arg(short, long)]
        limit: Option<usize>,
    },

    // ─── Vault ────────────────────────────────────────────────────
    /// Create or overwrite a note
    Write {
        /// Note id (extension optional)
        id: String,

        /// Note content (or - for stdin)
        content: String,
    },

    /// Delete a note
    Delete { id: String },

    /// Keep the graph live while files change (Ctrl-C to stop)
    Watch,
}

/// Resolved settings for one invocation.
pub struct Context {
    pub config: NotegraphConfig,
    pub root: PathBuf,
    pub json: bool,
}

impl Context {
    /// `--config` wins, then `<vault>/notegraph.toml`; `--vault` overrides `vault.root`.
    pub fn from_cli(cli: &Cli) -> Self {
        let base = cli.vault.clone().unwrap_or_else(|| PathBuf::from("."));
        let config_path = cli.config.clone().unwrap_or_else(|| base.join(CONFIG_FILE));
        let config = NotegraphConfig::load(&config_path);

        let root = match &cli.vault {
            Some(vault) => vault.clone(),
            None => config.resolve_root(&config_path),
        };

        Self {
            config,
            root,
            json: cli.json,
        }
    }
}

/// Print any result record as pretty JSON.
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["notegraph", "neighbors", "ideas", "-d", "3", "--json"]).unwrap();
        assert!(cli.json);
        match cli.command {
            Commands::Neighbors { reference, depth } => {
                assert_eq!(reference, "ideas");
                assert_eq!(depth, Some(3));
            }
            _ => panic!("wrong command"),
        }
    }

    #[test]
    fn test_context_prefers_vault_flag() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "[vault]\nroot = \"elsewhere\"\n[search]\ndefault_limit = 4\n").unwrap();

        let vault = dir.path().to_string_lossy().to_string();
        let cli = Cli::try_parse_from(["notegraph", "--vault", vault.as_str(), "stats"]).unwrap();
        let ctx = Context::from_cli(&cli);
        assert_eq!(ctx.root, dir.path());
        assert_eq!(ctx.config.search.default_limit, 4);
        assert!(!ctx.json);
    }

    #[test]
    fn test_context_uses_config_root() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("custom.toml");
        std::fs::write(&config, "[vault]\nroot = \"notes\"\n").unwrap();

        let path = config.to_string_lossy().to_string();
        let cli = Cli::try_parse_from(["notegraph", "--config", path.as_str(), "orphans"]).unwrap();
        assert_eq!(Context::from_cli(&cli).root, dir.path().join("notes"));
    }
}
