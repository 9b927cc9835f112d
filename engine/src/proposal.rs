//! Ballot proposals.

use ballot_types::ProposalName;
use serde::{Deserialize, Serialize};

/// One option on the ballot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proposal {
    /// Fixed at construction.
    pub name: ProposalName,
    /// Accumulated weight of every vote cast for this proposal.
    pub vote_count: u64,
}

impl Proposal {
    pub fn new(name: ProposalName) -> Self {
        Self {
            name,
            vote_count: 0,
        }
    }
}
