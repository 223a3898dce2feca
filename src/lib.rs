//! This crate contains the commitment side of a leaderboard token airdrop:
//! deterministic leaf hashing over a finalized allocation list, merkle tree
//! construction, a persisted tree artifact, and inclusion proof generation
//! and verification against the committed root.

/// Error taxonomy shared across the crate.
pub mod error;
/// Field element scalar type and its canonical and transcript hex forms.
pub mod felt;
/// Utilities to build, store and prove the merkle tree. No ledger calls in here.
pub mod merkle_tree;

pub use error::TreeError;
pub use felt::Felt;
