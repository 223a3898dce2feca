//! External ledger seam: the calldata a claim carries, the trait a real
//! transport would implement, and a dry-run ledger that verifies claims
//! in-process and records what would have been submitted.

use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use claimtree::merkle_tree::utils::keccak_entry;
use claimtree::merkle_tree::{verify_proof, AllocationRecord, MerkleProof};
use claimtree::Felt;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("ledger transport: {0}")]
    Transport(String),
    #[error("transaction {tx_hash} is not known to the ledger")]
    UnknownTransaction { tx_hash: String },
}

/// One claim, shaped exactly as the on-ledger entrypoint expects it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimCall {
    pub recipient: Felt,
    pub amount: Felt,
    pub proof: MerkleProof,
}

impl ClaimCall {
    pub fn new(record: &AllocationRecord, proof: MerkleProof) -> Self {
        // amounts are range checked at record construction, so the
        // reduction here is the identity
        let amount = Felt::from_be_bytes_reduce(&record.amount().to_bytes_be());
        ClaimCall {
            recipient: record.recipient().clone(),
            amount,
            proof,
        }
    }

    /// Flat field-element form in the wire order of the claim entrypoint:
    /// recipient first, amount second, then the proof.
    pub fn to_calldata(&self) -> Vec<Felt> {
        let mut calldata = Vec::with_capacity(3 + self.proof.siblings.len());
        calldata.push(self.recipient.clone());
        calldata.push(self.amount.clone());
        calldata.push(Felt::from(self.proof.leaf_index as u64));
        calldata.extend(self.proof.siblings.iter().cloned());
        calldata
    }

    /// Leaf hash this call commits to, recomputed from its own fields.
    pub fn leaf(&self) -> Felt {
        keccak_entry(&self.recipient, self.amount.as_biguint())
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TransactionReceipt {
    pub tx_hash: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FinalityStatus {
    Pending,
    Accepted,
    Rejected,
}

/// The claim side of an external ledger.
#[async_trait::async_trait]
pub trait ClaimLedger: Send + Sync {
    /// Simulates the claim against the committed root without spending it.
    async fn verify(&self, call: &ClaimCall) -> Result<bool, LedgerError>;

    /// Submits the claim transaction. Submission spends the claim: callers
    /// must treat one call as final and never resubmit.
    async fn claim(&self, call: &ClaimCall) -> Result<TransactionReceipt, LedgerError>;

    /// Current finality of a previously submitted transaction.
    async fn finality_status(&self, tx_hash: &str) -> Result<FinalityStatus, LedgerError>;
}

/// In-process ledger for rehearsals and tests. Verifies calls against a
/// fixed committed root and records every submission instead of sending it
/// anywhere.
pub struct DryRunLedger {
    root: Felt,
    finality: FinalityStatus,
    fail_verify: bool,
    submissions: Mutex<Vec<ClaimCall>>,
}

impl DryRunLedger {
    pub fn new(root: Felt) -> Self {
        DryRunLedger {
            root,
            finality: FinalityStatus::Accepted,
            fail_verify: false,
            submissions: Mutex::new(Vec::new()),
        }
    }

    /// Finality reported for every submitted transaction.
    pub fn with_finality(mut self, finality: FinalityStatus) -> Self {
        self.finality = finality;
        self
    }

    /// Makes `verify` fail with a transport error.
    pub fn with_faulty_verify(mut self) -> Self {
        self.fail_verify = true;
        self
    }

    /// All recorded submissions.
    pub fn submissions(&self) -> Vec<ClaimCall> {
        self.submissions.lock().unwrap().clone()
    }

    pub fn submission_count(&self) -> usize {
        self.submissions.lock().unwrap().len()
    }
}

#[async_trait::async_trait]
impl ClaimLedger for DryRunLedger {
    async fn verify(&self, call: &ClaimCall) -> Result<bool, LedgerError> {
        if self.fail_verify {
            return Err(LedgerError::Transport(
                "verify endpoint unavailable".to_string(),
            ));
        }
        Ok(verify_proof(&call.leaf(), &call.proof, &self.root))
    }

    async fn claim(&self, call: &ClaimCall) -> Result<TransactionReceipt, LedgerError> {
        let mut submissions = self.submissions.lock().unwrap();
        submissions.push(call.clone());
        let tx_hash = format!("dryrun-{:04}", submissions.len());
        info!(
            %tx_hash,
            recipient = %call.recipient,
            calldata_len = call.to_calldata().len(),
            "dry run: recorded claim"
        );
        Ok(TransactionReceipt { tx_hash })
    }

    async fn finality_status(&self, tx_hash: &str) -> Result<FinalityStatus, LedgerError> {
        let count = self.submissions.lock().unwrap().len();
        let index: Option<usize> = tx_hash
            .strip_prefix("dryrun-")
            .and_then(|rest| rest.parse().ok());
        match index {
            Some(i) if i >= 1 && i <= count => Ok(self.finality),
            _ => Err(LedgerError::UnknownTransaction {
                tx_hash: tx_hash.to_string(),
            }),
        }
    }
}
