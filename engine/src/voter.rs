//! Per-identity voter records.

use ballot_types::VoterId;
use serde::{Deserialize, Serialize};

/// A voter's state on one ballot.
///
/// Records are created lazily: an identity the ballot has never touched reads
/// as `Voter::default()` (weight 0, not voted, no delegate).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Voter {
    /// Vote weight; 1 after a rights grant, more once others delegate here.
    pub weight: u64,
    /// Set once the voter voted directly or delegated. Never reset.
    pub voted: bool,
    /// Final delegate this voter handed its weight to.
    pub delegate: Option<VoterId>,
    /// Proposal index of a direct vote.
    pub vote: Option<usize>,
}

impl Voter {
    /// Whether the voter can still cast a direct vote.
    pub fn can_vote(&self) -> bool {
        self.weight != 0 && !self.voted
    }

    /// The proposal this voter's weight went to, if it voted directly.
    pub fn direct_vote(&self) -> Option<usize> {
        if self.voted && self.delegate.is_none() {
            self.vote
        } else {
            None
        }
    }
}
