mod build_tree;
mod create_proof;
mod hash;
mod index_of;
mod json_parser;
mod operation_helpers;
mod proof_verification;

pub use build_tree::build_merkle_tree_from_records;
pub use create_proof::create_proof;
pub use hash::{keccak_entry, keccak_node};
pub use index_of::index_of;
pub use json_parser::{parse_leaderboard_json, parse_leaderboard_str};
pub use operation_helpers::big_uint_to_be_bytes32;
pub use proof_verification::verify_proof;
