//! Loads a tree artifact, proves one recipient's allocation, exports the
//! claim call, and optionally rehearses the whole claim flow against a
//! dry-run ledger.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use claimtree::merkle_tree::read_artifact;
use claimtree::Felt;
use claimtree_backend::apis::coordinator::{ClaimConfig, ClaimCoordinator, ClaimOutcome};
use claimtree_backend::init_logging;
use claimtree_backend::ledger::{ClaimCall, DryRunLedger};

/// Prove and export a claim from a committed tree artifact.
#[derive(Parser)]
#[command(name = "cli_claimer")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Tree artifact produced by cli_builder
    #[arg(long, default_value = "tree.json")]
    tree: PathBuf,

    /// Recipient address, hex
    #[arg(long)]
    recipient: String,

    /// Where to write the claim call JSON; printed to stdout when omitted
    #[arg(long)]
    output: Option<PathBuf>,

    /// Rehearse the full claim flow against an in-process dry-run ledger
    #[arg(long)]
    dry_run: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let tree = read_artifact(&cli.tree)
        .with_context(|| format!("loading artifact {}", cli.tree.display()))?;
    let recipient = Felt::from_hex(&cli.recipient)
        .with_context(|| format!("parsing recipient {:?}", cli.recipient))?;

    let (record, proof) = tree.prove_recipient(&recipient)?;
    anyhow::ensure!(
        tree.verify_proof(&record.compute_leaf(), &proof),
        "artifact layers do not fold back to the committed root"
    );

    let call = ClaimCall::new(record, proof);
    let json = serde_json::to_string_pretty(&call)?;
    match &cli.output {
        Some(path) => {
            std::fs::write(path, &json)
                .with_context(|| format!("writing {}", path.display()))?;
            println!("claim call for {} -> {}", call.recipient, path.display());
        }
        None => println!("{json}"),
    }

    if cli.dry_run {
        let ledger = DryRunLedger::new(tree.root().clone());
        let coordinator = ClaimCoordinator::new(&ledger, ClaimConfig::default());
        let report = coordinator.claim(&tree, &recipient).await;
        match &report.outcome {
            ClaimOutcome::Settled { tx_hash } => println!("dry run settled as {tx_hash}"),
            ClaimOutcome::Failed(reason) => anyhow::bail!("dry run failed: {reason:?}"),
        }
    }

    Ok(())
}
