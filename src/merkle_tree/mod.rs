mod allocation;
pub mod store;
mod tree;
pub mod utils;

use serde::{Deserialize, Serialize};

use crate::felt::Felt;

/// Inclusion proof for one leaf: the sibling hash at every layer on the
/// path to the root, together with the leaf index the fold direction is
/// derived from. Sibling order is leaf side first, root side last.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MerkleProof {
    pub leaf_index: usize,
    pub siblings: Vec<Felt>,
}

pub use allocation::{AllocationRecord, SCORE_SCALE_DECIMALS};
pub use store::{
    dump, load, load_from_file, read_artifact, save_to_file, write_artifact, RecordRepr,
    TreeArtifact, ARTIFACT_FORMAT,
};
pub use tree::MerkleTree;
pub use utils::{parse_leaderboard_json, parse_leaderboard_str, verify_proof};
