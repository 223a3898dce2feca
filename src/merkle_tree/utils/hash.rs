use num_bigint::BigUint;
use sha3::{Digest, Keccak256};

use crate::felt::Felt;
use crate::merkle_tree::utils::operation_helpers::big_uint_to_be_bytes32;

/// Hash of two child nodes, fed as transcript bytes.
pub fn keccak_node(left: &Felt, right: &Felt) -> Felt {
    let digest = Keccak256::new()
        .chain_update(left.to_transcript_bytes())
        .chain_update(right.to_transcript_bytes())
        .finalize();
    Felt::from_be_bytes_reduce(&digest)
}

/// Two-stage leaf hash. The inner stage binds the record fields at fixed
/// width; the outer stage pairs the inner hash with a zero tag, so a leaf
/// can never collide with an internal node.
pub fn keccak_entry(recipient: &Felt, amount: &BigUint) -> Felt {
    let digest = Keccak256::new()
        .chain_update(recipient.to_be_bytes32())
        .chain_update(big_uint_to_be_bytes32(amount))
        .finalize();
    let inner = Felt::from_be_bytes_reduce(&digest);
    keccak_node(&Felt::zero(), &inner)
}
