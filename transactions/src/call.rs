//! The operations a transaction can carry.

use ballot_types::{ProposalName, VoterId};
use serde::{Deserialize, Serialize};

/// One ballot operation. The caller is always the transaction signer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BallotCall {
    /// Create a new ballot. `salt` lets one signer deploy identical ballots
    /// under distinct ids.
    Deploy {
        proposals: Vec<ProposalName>,
        salt: u64,
    },
    GiveRightToVote { voter: VoterId },
    Delegate { to: VoterId },
    Vote { proposal: usize },
}

impl BallotCall {
    /// Operation name, as used in logs and receipts.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Deploy { .. } => "deploy",
            Self::GiveRightToVote { .. } => "give_right_to_vote",
            Self::Delegate { .. } => "delegate",
            Self::Vote { .. } => "vote",
        }
    }

    pub fn is_deploy(&self) -> bool {
        matches!(self, Self::Deploy { .. })
    }
}
