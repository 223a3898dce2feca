use crate::felt::Felt;
use crate::merkle_tree::utils::hash::keccak_node;
use crate::merkle_tree::MerkleProof;

/// Folds the sibling path back up to a candidate root and compares it with
/// the expected one. A mismatch of any kind is reported as `false`, never
/// as an error: a failing proof is an expected outcome.
pub fn verify_proof(leaf: &Felt, proof: &MerkleProof, root: &Felt) -> bool {
    let mut node = leaf.clone();
    let mut current_index = proof.leaf_index;

    for sibling in &proof.siblings {
        node = if current_index % 2 == 0 {
            keccak_node(&node, sibling)
        } else {
            keccak_node(sibling, &node)
        };
        current_index /= 2;
    }

    node == *root
}
