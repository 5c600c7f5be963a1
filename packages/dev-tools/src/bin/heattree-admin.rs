//! HeatTree Administration CLI
//!
//! Operator tool for the record tree database.
//!
//! # Usage
//!
//! ```bash
//! # Create (or open) the database and its schema
//! heattree-admin --db ./heattree.db init
//!
//! # Print the subtree under node 12 (or every root tree without an id)
//! heattree-admin tree 12
//! heattree-admin tree 12 --json
//!
//! # Compare the closure table and paths with parent_id, then repair
//! heattree-admin verify
//! heattree-admin rebuild
//! ```
//!
//! # Environment Variables
//!
//! - `HEATTREE_DB_PATH`: Database file (overridden by `--db`)
//! - `HEATTREE_BUSY_TIMEOUT_MS`: SQLite busy timeout
//! - `RUST_LOG`: Logging level (e.g., "info", "debug", "trace")

use anyhow::Result;
use clap::{Parser, Subcommand};
use heattree_core::models::{NodeId, NodeTree};
use heattree_core::services::NodeService;
use heattree_core::StoreConfig;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "heattree-admin")]
#[command(author = "HeatTree Team")]
#[command(version = "0.1.0")]
#[command(about = "HeatTree record tree administration tool")]
struct Cli {
    /// JSON config file (missing fields use defaults)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Database file, overrides config file and environment
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create the database file and schema if they do not exist
    Init,

    /// Print a subtree (every root tree when no id is given)
    Tree {
        id: Option<i64>,
        /// Emit JSON instead of an indented listing
        #[arg(long)]
        json: bool,
    },

    /// Check closure rows and paths against parent_id
    Verify {
        #[arg(long)]
        json: bool,
    },

    /// Regenerate closure rows and paths from parent_id
    Rebuild,
}

async fn load_config(cli: &Cli) -> Result<StoreConfig> {
    let mut config = match &cli.config {
        Some(path) => StoreConfig::load(path).await?,
        None => StoreConfig::default(),
    }
    .with_env();

    if let Some(db) = &cli.db {
        config.database_path = db.clone();
    }
    Ok(config)
}

fn print_tree(tree: &NodeTree) {
    for entry in tree.iter() {
        println!(
            "{}{} [{}] #{} ({})",
            "  ".repeat(entry.depth as usize),
            entry.node.name,
            entry.node.node_type,
            entry.node.id,
            entry.node.data_status
        );
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli).await?;

    tracing::debug!("Database: {}", config.database_path.display());
    let service = NodeService::open(&config).await?;

    match cli.command {
        Commands::Init => {
            println!(
                "Database ready at {}",
                service.database().db_path.display()
            );
        }

        Commands::Tree { id, json } => {
            let roots = match id {
                Some(id) => vec![NodeId(id)],
                None => service
                    .list_roots()
                    .await?
                    .into_iter()
                    .map(|node| node.id)
                    .collect(),
            };

            let mut trees = Vec::with_capacity(roots.len());
            for root in roots {
                trees.push(service.subtree(root).await?);
            }

            if json {
                println!("{}", serde_json::to_string_pretty(&trees)?);
            } else if trees.is_empty() {
                println!("(empty)");
            } else {
                trees.iter().for_each(print_tree);
            }
        }

        Commands::Verify { json } => {
            let report = service.verify_closure().await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!(
                    "Checked {} nodes, {} closure rows",
                    report.nodes_checked, report.edges_checked
                );
                for edge in &report.missing_edges {
                    println!(
                        "  missing ({}, {}, {})",
                        edge.ancestor_id, edge.descendant_id, edge.depth
                    );
                }
                for edge in &report.stale_edges {
                    println!(
                        "  stale   ({}, {}, {})",
                        edge.ancestor_id, edge.descendant_id, edge.depth
                    );
                }
                for mismatch in &report.path_mismatches {
                    println!(
                        "  path    #{}: '{}' should be '{}'",
                        mismatch.id, mismatch.stored, mismatch.expected
                    );
                }
                for id in &report.broken_chains {
                    println!("  broken  #{}: parent chain loops or dangles", id);
                }
                println!(
                    "{}",
                    if report.is_consistent() {
                        "Closure table is consistent"
                    } else {
                        "Closure table is INCONSISTENT (run `heattree-admin rebuild`)"
                    }
                );
            }

            if !report.is_consistent() {
                std::process::exit(1);
            }
        }

        Commands::Rebuild => {
            let summary = service.rebuild_closure().await?;
            println!(
                "Rebuilt closure table: {} rows written, {} paths rewritten",
                summary.edges_written, summary.paths_rewritten
            );
        }
    }

    Ok(())
}
