//! Delegate chain resolution.
//!
//! A voter who delegated stores the final delegate it resolved at the time.
//! Later delegators to that voter follow the stored link onward, so a chain
//! A→B→C always lands on the last identity with no delegate of its own.

use crate::error::BallotError;
use crate::voter::Voter;
use ballot_types::VoterId;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Where a delegator's weight ended up.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DelegationOutcome {
    /// The final delegate has not voted yet; its weight grew.
    WeightTransferred { delegate: VoterId, weight: u64 },
    /// The final delegate already voted; the weight went straight to its proposal.
    VoteCounted {
        delegate: VoterId,
        proposal: usize,
        weight: u64,
    },
}

impl DelegationOutcome {
    /// The identity at the end of the chain.
    pub fn delegate(&self) -> &VoterId {
        match self {
            Self::WeightTransferred { delegate, .. } | Self::VoteCounted { delegate, .. } => {
                delegate
            }
        }
    }
}

/// Follow `.delegate` links from `target` to the end of the chain.
///
/// Fails with `DelegationLoop` if the walk reaches `caller` or revisits any
/// identity. Each step is a key lookup; the visited set bounds the walk by
/// the number of registered voters.
pub fn resolve_chain(
    voters: &HashMap<VoterId, Voter>,
    caller: &VoterId,
    target: &VoterId,
) -> Result<VoterId, BallotError> {
    let mut visited = HashSet::new();
    visited.insert(*caller);
    let mut current = *target;
    loop {
        if !visited.insert(current) {
            return Err(BallotError::DelegationLoop);
        }
        match voters.get(&current).and_then(|v| v.delegate) {
            Some(next) => current = next,
            None => return Ok(current),
        }
    }
}
