use thiserror::Error;

/// Errors surfaced by tree construction, storage, and proof lookup.
///
/// Verification failure is deliberately not represented here: a proof that
/// folds to the wrong root is an expected outcome and is reported as
/// `false` by the verifier, never as an error.
#[derive(Debug, Error)]
pub enum TreeError {
    #[error("allocation list is empty")]
    EmptyAllocation,

    #[error("corrupt tree artifact: {0}")]
    CorruptArtifact(String),

    #[error("leaf index {index} out of range for a tree with {leaf_count} leaves")]
    IndexOutOfRange { index: usize, leaf_count: usize },

    #[error("recipient {0} not found in the allocation list")]
    RecipientNotFound(String),

    #[error("malformed allocation record: {0}")]
    MalformedRecord(String),

    #[error("artifact io: {0}")]
    Io(#[from] std::io::Error),
}
