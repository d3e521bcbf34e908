//! notegraph CLI - build and query the knowledge graph of a note vault.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use notegraph::cli::{read, write, Cli, Commands, Context};
use notegraph::graph::build_vault;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Logs go to stderr so --json output stays clean.
    let default_level = if cli.verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let ctx = Context::from_cli(&cli);
    let json = ctx.json;
    let (store, mut graph) = build_vault(&ctx.root, &ctx.config.vault.extension).await?;
    let limits = &ctx.config;

    match cli.command {
        Commands::Build | Commands::Stats => read::stats(&graph, json)?,

        Commands::Note { reference } => read::note(&graph, &reference, json)?,

        Commands::Backlinks { reference } => read::nodes(
            &graph.get_backlinks(&reference),
            &format!("No backlinks to '{}'", reference),
            json,
        )?,

        Commands::Neighbors { reference, depth } => {
            let depth = depth.unwrap_or(limits.graph.default_depth);
            read::nodes(
                &graph.get_connected_nodes(&reference, depth),
                &format!("Nothing within {} links of '{}'", depth, reference),
                json,
            )?
        }

        Commands::Path { from, to } => read::path(&graph, &from, &to, json)?,

        Commands::Hubs { limit } => {
            read::hubs(&graph, limit.unwrap_or(limits.graph.hub_limit), json)?
        }

        Commands::Clusters { min_size } => read::clusters(
            &graph,
            min_size.unwrap_or(limits.graph.min_cluster_size),
            json,
        )?,

        Commands::Bridges => read::nodes(&graph.find_bridge_notes(), "No bridge notes", json)?,

        Commands::Orphans => read::nodes(&graph.get_orphans(), "No orphaned notes", json)?,

        Commands::Tag { tag } => read::nodes(
            &graph.get_nodes_by_tag(&tag),
            &format!("No notes tagged '{}'", tag),
            json,
        )?,

        Commands::Export => read::export(&graph)?,

        Commands::Search { query, limit } => read::hits(
            &graph.search(&query, limit.unwrap_or(limits.search.default_limit)),
            &format!("No results for '{}'", query),
            json,
        )?,

        Commands::Similar { reference, limit } => read::hits(
            &graph.find_similar(&reference, limit.unwrap_or(limits.search.default_limit)),
            &format!("Nothing similar to '{}'", reference),
            json,
        )?,

        Commands::Write { id, content } => {
            write::write(&store, &mut graph, &id, &content, json).await?
        }

        Commands::Delete { id } => write::delete(&store, &mut graph, &id, json)?,

        Commands::Watch => write::watch(store, graph, limits.watch.debounce_ms).await?,
    }

    Ok(())
}
