//! Builds the committed merkle tree for a finalized leaderboard and writes
//! the artifact to disk.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use claimtree::merkle_tree::{write_artifact, MerkleTree};
use claimtree_backend::init_logging;

/// Build a merkle tree artifact from a leaderboard JSON file.
#[derive(Parser)]
#[command(name = "cli_builder")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Leaderboard JSON file: an array of { "player", "score" } rows
    #[arg(long)]
    leaderboard: PathBuf,

    /// Where to write the tree artifact
    #[arg(long, default_value = "tree.json")]
    output: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let tree = MerkleTree::from_leaderboard(&cli.leaderboard)
        .with_context(|| format!("building tree from {}", cli.leaderboard.display()))?;
    write_artifact(&cli.output, &tree)
        .with_context(|| format!("writing artifact to {}", cli.output.display()))?;

    println!(
        "committed {} records at root {} -> {}",
        tree.leaf_count(),
        tree.root(),
        cli.output.display()
    );
    Ok(())
}
