use crate::error::TreeError;
use crate::felt::Felt;
use crate::merkle_tree::MerkleProof;

/// Collects the sibling hash at every layer on the path from leaf `index`
/// to the root. Where the node is the unpaired last of its layer, the node
/// itself is recorded as the sibling, matching how the layer above was
/// built.
pub fn create_proof(index: usize, layers: &[Vec<Felt>]) -> Result<MerkleProof, TreeError> {
    let leaf_count = layers[0].len();
    if index >= leaf_count {
        return Err(TreeError::IndexOutOfRange { index, leaf_count });
    }

    let mut siblings = Vec::with_capacity(layers.len() - 1);
    let mut current_index = index;

    for level in &layers[..layers.len() - 1] {
        let sibling_index = if current_index % 2 == 0 {
            current_index + 1
        } else {
            current_index - 1
        };
        let sibling = level.get(sibling_index).unwrap_or(&level[current_index]);
        siblings.push(sibling.clone());
        current_index /= 2;
    }

    Ok(MerkleProof {
        leaf_index: index,
        siblings,
    })
}
