//! Outcome of applying a transaction.

use ballot_types::{BallotId, TxHash, VoterId};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ReceiptStatus {
    Applied,
    /// A precondition failed; ballot state is unchanged.
    Reverted { code: String, reason: String },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    pub tx_hash: TxHash,
    pub ballot: BallotId,
    pub sender: VoterId,
    #[serde(flatten)]
    pub status: ReceiptStatus,
}

impl Receipt {
    pub fn applied(tx_hash: TxHash, ballot: BallotId, sender: VoterId) -> Self {
        Self {
            tx_hash,
            ballot,
            sender,
            status: ReceiptStatus::Applied,
        }
    }

    pub fn reverted(
        tx_hash: TxHash,
        ballot: BallotId,
        sender: VoterId,
        code: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            tx_hash,
            ballot,
            sender,
            status: ReceiptStatus::Reverted {
                code: code.into(),
                reason: reason.into(),
            },
        }
    }

    pub fn is_applied(&self) -> bool {
        matches!(self.status, ReceiptStatus::Applied)
    }
}
