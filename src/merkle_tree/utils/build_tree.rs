use rayon::prelude::*;

use crate::error::TreeError;
use crate::felt::Felt;
use crate::merkle_tree::utils::hash::keccak_node;
use crate::merkle_tree::AllocationRecord;

/// Builds every layer of the tree, leaves first, top layer (the root) last.
/// The shape is a pure function of the record list: same records in the
/// same order, same layers.
pub fn build_merkle_tree_from_records(
    records: &[AllocationRecord],
) -> Result<Vec<Vec<Felt>>, TreeError> {
    if records.is_empty() {
        return Err(TreeError::EmptyAllocation);
    }

    let mut layers = vec![build_leaves_level(records)];
    while layers[layers.len() - 1].len() > 1 {
        let next_level = build_middle_level(&layers[layers.len() - 1]);
        layers.push(next_level);
    }

    Ok(layers)
}

fn build_leaves_level(records: &[AllocationRecord]) -> Vec<Felt> {
    records
        .par_iter()
        .map(|record| record.compute_leaf())
        .collect()
}

/// Hashes pairs `(2i, 2i + 1)` of the previous layer. An unpaired last
/// node is hashed with a copy of itself rather than a padding constant.
fn build_middle_level(previous: &[Felt]) -> Vec<Felt> {
    previous
        .par_chunks(2)
        .map(|pair| {
            let left = &pair[0];
            let right = pair.get(1).unwrap_or(left);
            keccak_node(left, right)
        })
        .collect()
}
