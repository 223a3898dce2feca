use num_bigint::BigUint;

use crate::error::TreeError;
use crate::felt::{modulus, Felt};
use crate::merkle_tree::utils::keccak_entry;

/// Fractional digits folded into an integer amount. Leaderboard scores are
/// multiplied by `10^SCORE_SCALE_DECIMALS` and floored; the same factor
/// must be used by anything that re-derives an amount, or leaf hashes will
/// not line up with the committed root.
pub const SCORE_SCALE_DECIMALS: u32 = 6;

/// One row of the finalized allocation list: who may claim and how much.
/// Construction validates; a value of this type is always field-safe.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AllocationRecord {
    recipient: Felt,
    amount: BigUint,
}

impl AllocationRecord {
    pub fn new(recipient: Felt, amount: BigUint) -> Result<Self, TreeError> {
        if &amount >= modulus() {
            return Err(TreeError::MalformedRecord(format!(
                "amount for {recipient} does not fit in the field"
            )));
        }
        Ok(AllocationRecord { recipient, amount })
    }

    /// Builds a record from a raw leaderboard row. The fractional score is
    /// scaled to an integer amount; scaling truncates, it never rounds up.
    pub fn from_score(player: &str, score: f64) -> Result<Self, TreeError> {
        let recipient = Felt::from_hex(player)
            .map_err(|err| TreeError::MalformedRecord(format!("recipient {player:?}: {err}")))?;
        let amount = scale_score(score)?;
        AllocationRecord::new(recipient, amount)
    }

    pub fn recipient(&self) -> &Felt {
        &self.recipient
    }

    pub fn amount(&self) -> &BigUint {
        &self.amount
    }

    /// The leaf hash committed for this record, a pure function of
    /// `(recipient, amount)`.
    pub fn compute_leaf(&self) -> Felt {
        keccak_entry(&self.recipient, &self.amount)
    }
}

/// `floor(score * 10^SCORE_SCALE_DECIMALS)` as an unsigned integer.
fn scale_score(score: f64) -> Result<BigUint, TreeError> {
    if !score.is_finite() || score < 0.0 {
        return Err(TreeError::MalformedRecord(format!(
            "score {score} is not a finite non-negative number"
        )));
    }
    let scaled = (score * 10f64.powi(SCORE_SCALE_DECIMALS as i32)).floor();
    if scaled >= u128::MAX as f64 {
        return Err(TreeError::MalformedRecord(format!(
            "score {score} is out of range"
        )));
    }
    Ok(BigUint::from(scaled as u128))
}
