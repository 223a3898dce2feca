//! Claim orchestration on top of the `claimtree` commitment engine: the
//! external ledger seam, a dry-run ledger for rehearsing claims, and the
//! coordinator that drives a claim from proof to finality.

pub mod apis;
pub mod ledger;

use tracing_subscriber::EnvFilter;

/// Logging init shared by the binaries. `RUST_LOG` wins when set.
pub fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
