use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use num_bigint::BigUint;
use serde::{Deserialize, Serialize};

use crate::error::TreeError;
use crate::felt::Felt;
use crate::merkle_tree::{AllocationRecord, MerkleTree};

/// Format tag embedded in every artifact. Readers reject anything else, so
/// bump it whenever the layout changes.
pub const ARTIFACT_FORMAT: &str = "claimtree-tree-v1";

/// On-disk form of a built tree: the ordered allocation list, every layer
/// of hashes (leaves first, root layer last), and the root. The artifact
/// is replace-whole: any change to the allocation list means a rebuild and
/// a rewrite, never an in-place edit.
#[derive(Debug, Serialize, Deserialize)]
pub struct TreeArtifact {
    pub format: String,
    pub root: Felt,
    pub layers: Vec<Vec<Felt>>,
    pub records: Vec<RecordRepr>,
}

/// On-disk form of one allocation record. The amount is a decimal string
/// so it survives JSON readers that truncate large numbers.
#[derive(Debug, Serialize, Deserialize)]
pub struct RecordRepr {
    pub recipient: String,
    pub amount: String,
}

/// Snapshot of a tree as a serializable artifact.
pub fn dump(tree: &MerkleTree) -> TreeArtifact {
    TreeArtifact {
        format: ARTIFACT_FORMAT.to_string(),
        root: tree.root().clone(),
        layers: tree.layers().to_vec(),
        records: tree
            .records()
            .iter()
            .map(|record| RecordRepr {
                recipient: record.recipient().to_hex(),
                amount: record.amount().to_str_radix(10),
            })
            .collect(),
    }
}

/// Rebuilds a [`MerkleTree`] from an artifact after structural validation.
///
/// Validation is structural only: layer sizes must follow from the leaf
/// count, the top layer must be the stored root, and every record must
/// parse. Hashes are not recomputed here; use proof verification against
/// the root when cryptographic assurance is needed.
pub fn load(artifact: &TreeArtifact) -> Result<MerkleTree, TreeError> {
    if artifact.format != ARTIFACT_FORMAT {
        return Err(TreeError::CorruptArtifact(format!(
            "unknown format {:?}, expected {:?}",
            artifact.format, ARTIFACT_FORMAT
        )));
    }

    let layers = &artifact.layers;
    if layers.is_empty() || layers[0].is_empty() {
        return Err(TreeError::CorruptArtifact(
            "artifact has no leaf layer".to_string(),
        ));
    }

    for (level, pair) in layers.windows(2).enumerate() {
        if pair[0].len() < 2 {
            return Err(TreeError::CorruptArtifact(format!(
                "layer {level} has a single node but is not the top layer"
            )));
        }
        let expected = (pair[0].len() + 1) / 2;
        if pair[1].len() != expected {
            return Err(TreeError::CorruptArtifact(format!(
                "layer {} has {} nodes, expected {} from the layer below",
                level + 1,
                pair[1].len(),
                expected
            )));
        }
    }

    let top = &layers[layers.len() - 1];
    if top.len() != 1 {
        return Err(TreeError::CorruptArtifact(format!(
            "top layer has {} nodes, expected 1",
            top.len()
        )));
    }
    if top[0] != artifact.root {
        return Err(TreeError::CorruptArtifact(
            "stored root does not match the top layer".to_string(),
        ));
    }
    if artifact.records.len() != layers[0].len() {
        return Err(TreeError::CorruptArtifact(format!(
            "{} records for {} leaves",
            artifact.records.len(),
            layers[0].len()
        )));
    }

    let records = artifact
        .records
        .iter()
        .map(record_from_repr)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(MerkleTree::from_parts(
        artifact.root.clone(),
        artifact.layers.clone(),
        records,
    ))
}

fn record_from_repr(repr: &RecordRepr) -> Result<AllocationRecord, TreeError> {
    let recipient = Felt::from_hex(&repr.recipient).map_err(|err| {
        TreeError::CorruptArtifact(format!("record recipient {:?}: {err}", repr.recipient))
    })?;
    let amount = BigUint::parse_bytes(repr.amount.as_bytes(), 10).ok_or_else(|| {
        TreeError::CorruptArtifact(format!(
            "record amount {:?} is not a decimal integer",
            repr.amount
        ))
    })?;
    AllocationRecord::new(recipient, amount).map_err(|err| TreeError::CorruptArtifact(err.to_string()))
}

pub fn save_to_file<P: AsRef<Path>, T: Serialize>(path: P, data: &T) -> Result<(), TreeError> {
    let serialized = serde_json::to_string(data).map_err(std::io::Error::from)?;
    let mut file = File::create(path)?;
    file.write_all(serialized.as_bytes())?;
    Ok(())
}

pub fn load_from_file<P: AsRef<Path>, T: for<'de> Deserialize<'de>>(
    path: P,
) -> Result<T, TreeError> {
    let mut file = File::open(path)?;
    let mut data = String::new();
    file.read_to_string(&mut data)?;
    serde_json::from_str(&data).map_err(|err| TreeError::CorruptArtifact(err.to_string()))
}

/// Dumps a tree and writes the artifact to `path` as JSON.
pub fn write_artifact<P: AsRef<Path>>(path: P, tree: &MerkleTree) -> Result<(), TreeError> {
    let artifact = dump(tree);
    save_to_file(&path, &artifact)?;
    tracing::info!(
        path = %path.as_ref().display(),
        root = %artifact.root,
        "wrote tree artifact"
    );
    Ok(())
}

/// Reads a JSON artifact from `path` and rebuilds the tree.
pub fn read_artifact<P: AsRef<Path>>(path: P) -> Result<MerkleTree, TreeError> {
    let artifact: TreeArtifact = load_from_file(path)?;
    load(&artifact)
}
