//! Claim coordinator: drives one claim from local proof generation through
//! ledger submission to observed finality, and reports what happened.

use std::time::Duration;

use num_bigint::BigUint;
use serde::Serialize;
use tokio::time;
use tracing::{debug, info, warn};

use claimtree::merkle_tree::MerkleTree;
use claimtree::Felt;

use crate::ledger::{ClaimCall, ClaimLedger, FinalityStatus};

/// Knobs for one claim attempt.
#[derive(Debug, Clone)]
pub struct ClaimConfig {
    /// Ask the ledger to verify the proof before spending a transaction.
    pub preflight: bool,
    /// How long to wait for finality before giving up on observation.
    pub finality_timeout: Duration,
    /// Delay between finality polls.
    pub poll_interval: Duration,
}

impl Default for ClaimConfig {
    fn default() -> Self {
        ClaimConfig {
            preflight: true,
            finality_timeout: Duration::from_secs(120),
            poll_interval: Duration::from_secs(5),
        }
    }
}

/// Phases a claim moves through, in order. The machine is linear: every
/// phase is entered at most once and there is no path back.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum ClaimPhase {
    Proving,
    PreflightVerifying,
    Submitting,
    AwaitingFinality,
    Settled,
    Failed,
}

/// Terminal failure causes. `FinalityUnknown` keeps the transaction hash:
/// the transaction may still land, so the claim must not be resubmitted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum FailureReason {
    RecipientNotFound,
    ProofInvalid,
    PreflightRejected,
    PreflightError(String),
    SubmissionError(String),
    RejectedOnLedger { tx_hash: String },
    FinalityUnknown { tx_hash: String },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum ClaimOutcome {
    Settled { tx_hash: String },
    Failed(FailureReason),
}

/// What happened to one claim: who claimed what, every phase entered in
/// order, and the terminal outcome.
#[derive(Clone, Debug, Serialize)]
pub struct ClaimReport {
    pub recipient: String,
    /// Decimal base units; absent when the recipient had no allocation.
    pub amount: Option<String>,
    pub phases: Vec<ClaimPhase>,
    pub outcome: ClaimOutcome,
}

/// Drives claims through a ledger. Holds a borrowed ledger handle so one
/// connection can serve many claims.
pub struct ClaimCoordinator<'a, L: ClaimLedger> {
    ledger: &'a L,
    config: ClaimConfig,
}

impl<'a, L: ClaimLedger> ClaimCoordinator<'a, L> {
    pub fn new(ledger: &'a L, config: ClaimConfig) -> Self {
        ClaimCoordinator { ledger, config }
    }

    /// Claims `recipient`'s allocation from `tree`. Terminal either way:
    /// the report says what happened, and nothing is retried.
    pub async fn claim(&self, tree: &MerkleTree, recipient: &Felt) -> ClaimReport {
        let mut phases = vec![ClaimPhase::Proving];

        let (record, proof) = match tree.prove_recipient(recipient) {
            Ok(found) => found,
            Err(err) => {
                warn!(recipient = %recipient, %err, "no provable allocation");
                return report(
                    recipient,
                    None,
                    phases,
                    ClaimOutcome::Failed(FailureReason::RecipientNotFound),
                );
            }
        };
        let amount = record.amount();

        // A fresh proof must fold back to the root before it leaves the
        // process. This also catches loaded artifacts whose layers no
        // longer hash up to the root along this path.
        if !tree.verify_proof(&record.compute_leaf(), &proof) {
            warn!(recipient = %recipient, "freshly generated proof does not fold to the root");
            return report(
                recipient,
                Some(amount),
                phases,
                ClaimOutcome::Failed(FailureReason::ProofInvalid),
            );
        }
        let call = ClaimCall::new(record, proof);

        if self.config.preflight {
            phases.push(ClaimPhase::PreflightVerifying);
            match self.ledger.verify(&call).await {
                Ok(true) => debug!(recipient = %recipient, "preflight verified"),
                Ok(false) => {
                    warn!(recipient = %recipient, "ledger rejected the proof in preflight");
                    return report(
                        recipient,
                        Some(amount),
                        phases,
                        ClaimOutcome::Failed(FailureReason::PreflightRejected),
                    );
                }
                Err(err) => {
                    warn!(recipient = %recipient, %err, "preflight could not run");
                    return report(
                        recipient,
                        Some(amount),
                        phases,
                        ClaimOutcome::Failed(FailureReason::PreflightError(err.to_string())),
                    );
                }
            }
        }

        // Submission spends the claim: past this point the claim is never
        // sent again, whatever the outcome.
        phases.push(ClaimPhase::Submitting);
        let receipt = match self.ledger.claim(&call).await {
            Ok(receipt) => receipt,
            Err(err) => {
                warn!(recipient = %recipient, %err, "claim submission failed");
                return report(
                    recipient,
                    Some(amount),
                    phases,
                    ClaimOutcome::Failed(FailureReason::SubmissionError(err.to_string())),
                );
            }
        };
        info!(recipient = %recipient, tx_hash = %receipt.tx_hash, "claim submitted");

        phases.push(ClaimPhase::AwaitingFinality);
        let deadline = time::Instant::now() + self.config.finality_timeout;
        let outcome = loop {
            match self.ledger.finality_status(&receipt.tx_hash).await {
                Ok(FinalityStatus::Accepted) => {
                    break ClaimOutcome::Settled {
                        tx_hash: receipt.tx_hash.clone(),
                    };
                }
                Ok(FinalityStatus::Rejected) => {
                    break ClaimOutcome::Failed(FailureReason::RejectedOnLedger {
                        tx_hash: receipt.tx_hash.clone(),
                    });
                }
                Ok(FinalityStatus::Pending) => {
                    debug!(tx_hash = %receipt.tx_hash, "transaction still pending");
                }
                Err(err) => {
                    // the transaction is already out; polling errors are
                    // worth retrying until the deadline
                    warn!(tx_hash = %receipt.tx_hash, %err, "finality poll failed");
                }
            }
            if time::Instant::now() >= deadline {
                warn!(tx_hash = %receipt.tx_hash, "gave up waiting for finality");
                break ClaimOutcome::Failed(FailureReason::FinalityUnknown {
                    tx_hash: receipt.tx_hash.clone(),
                });
            }
            time::sleep(self.config.poll_interval).await;
        };

        match &outcome {
            ClaimOutcome::Settled { tx_hash } => {
                info!(recipient = %recipient, %tx_hash, "claim settled")
            }
            ClaimOutcome::Failed(reason) => {
                warn!(recipient = %recipient, ?reason, "claim failed")
            }
        }
        report(recipient, Some(amount), phases, outcome)
    }
}

fn report(
    recipient: &Felt,
    amount: Option<&BigUint>,
    mut phases: Vec<ClaimPhase>,
    outcome: ClaimOutcome,
) -> ClaimReport {
    phases.push(match outcome {
        ClaimOutcome::Settled { .. } => ClaimPhase::Settled,
        ClaimOutcome::Failed(_) => ClaimPhase::Failed,
    });
    ClaimReport {
        recipient: recipient.to_hex(),
        amount: amount.map(|value| value.to_str_radix(10)),
        phases,
        outcome,
    }
}
