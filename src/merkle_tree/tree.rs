use std::path::Path;

use crate::error::TreeError;
use crate::felt::Felt;
use crate::merkle_tree::utils::{
    build_merkle_tree_from_records, create_proof, index_of, parse_leaderboard_json, verify_proof,
};
use crate::merkle_tree::{AllocationRecord, MerkleProof};

/// A committed allocation list: the ordered records, their leaf hashes and
/// every internal layer, and the root. Record order is significant; a
/// record's position in the list is its leaf index.
///
/// All layers are kept in memory so that proof generation is a walk up the
/// stored layers instead of a rebuild.
#[derive(Debug)]
pub struct MerkleTree {
    root: Felt,
    layers: Vec<Vec<Felt>>,
    records: Vec<AllocationRecord>,
}

impl MerkleTree {
    /// Builds the full tree from an already validated record list.
    pub fn from_records(records: Vec<AllocationRecord>) -> Result<Self, TreeError> {
        let layers = build_merkle_tree_from_records(&records)?;
        let root = layers[layers.len() - 1][0].clone();
        tracing::debug!(
            leaves = records.len(),
            depth = layers.len() - 1,
            root = %root,
            "built merkle tree"
        );
        Ok(MerkleTree {
            root,
            layers,
            records,
        })
    }

    /// Parses a leaderboard JSON file and builds the tree over it.
    pub fn from_leaderboard<P: AsRef<Path>>(path: P) -> Result<Self, TreeError> {
        let records = parse_leaderboard_json(path)?;
        MerkleTree::from_records(records)
    }

    pub fn root(&self) -> &Felt {
        &self.root
    }

    /// Number of hashing levels above the leaves.
    pub fn depth(&self) -> usize {
        self.layers.len() - 1
    }

    pub fn leaves(&self) -> &[Felt] {
        &self.layers[0]
    }

    pub fn leaf_count(&self) -> usize {
        self.layers[0].len()
    }

    pub fn layers(&self) -> &[Vec<Felt>] {
        &self.layers
    }

    pub fn records(&self) -> &[AllocationRecord] {
        &self.records
    }

    /// Leaf index of a recipient, scanning the allocation list in order.
    pub fn index_of(&self, recipient: &Felt) -> Option<usize> {
        index_of(recipient, &self.records)
    }

    /// Generates the inclusion proof for the leaf at `index`.
    pub fn generate_proof(&self, index: usize) -> Result<MerkleProof, TreeError> {
        create_proof(index, &self.layers)
    }

    /// Looks a recipient up by address and returns its record together with
    /// a fresh inclusion proof.
    pub fn prove_recipient(
        &self,
        recipient: &Felt,
    ) -> Result<(&AllocationRecord, MerkleProof), TreeError> {
        let index = self
            .index_of(recipient)
            .ok_or_else(|| TreeError::RecipientNotFound(recipient.to_hex()))?;
        let proof = self.generate_proof(index)?;
        Ok((&self.records[index], proof))
    }

    /// Checks a proof against this tree's root.
    pub fn verify_proof(&self, leaf: &Felt, proof: &MerkleProof) -> bool {
        verify_proof(leaf, proof, &self.root)
    }

    pub(crate) fn from_parts(
        root: Felt,
        layers: Vec<Vec<Felt>>,
        records: Vec<AllocationRecord>,
    ) -> Self {
        MerkleTree {
            root,
            layers,
            records,
        }
    }
}
