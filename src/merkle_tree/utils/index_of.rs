use crate::felt::Felt;
use crate::merkle_tree::AllocationRecord;

/// Position of a recipient in the allocation list, scanning in list order.
/// The list is the committed order, so the position is also the leaf index.
pub fn index_of(recipient: &Felt, records: &[AllocationRecord]) -> Option<usize> {
    records
        .iter()
        .position(|record| record.recipient() == recipient)
}
