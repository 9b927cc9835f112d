//! Serializable ballot state for persistence.

use crate::engine::BallotEngine;
use crate::error::BallotError;
use crate::proposal::Proposal;
use crate::voter::Voter;
use ballot_types::VoterId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Full state of one ballot. Voters are kept in a `BTreeMap` so the encoded
/// bytes are deterministic.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BallotSnapshot {
    pub chairperson: VoterId,
    pub proposals: Vec<Proposal>,
    pub voters: BTreeMap<VoterId, Voter>,
}

impl BallotSnapshot {
    /// Check the structural invariants a live engine always upholds.
    pub fn validate(&self) -> Result<(), BallotError> {
        let corrupt = |msg: String| -> Result<(), BallotError> {
            Err(BallotError::CorruptSnapshot(msg))
        };

        if self.proposals.is_empty() {
            return Err(BallotError::NoProposals);
        }
        match self.voters.get(&self.chairperson) {
            Some(chair) if chair.weight >= 1 => {}
            _ => return corrupt("chairperson has no weight".to_string()),
        }
        for (id, voter) in &self.voters {
            if let Some(index) = voter.vote {
                if index >= self.proposals.len() {
                    return corrupt(format!("{id} voted for missing proposal {index}"));
                }
                if !voter.voted || voter.delegate.is_some() {
                    return corrupt(format!("{id} has a vote but is not a direct voter"));
                }
            } else if voter.voted && voter.delegate.is_none() {
                return corrupt(format!("{id} voted without a proposal or delegate"));
            }
            if voter.delegate.is_some() && !voter.voted {
                return corrupt(format!("{id} delegated but is not marked voted"));
            }
        }
        Ok(())
    }
}

impl BallotEngine {
    pub fn snapshot(&self) -> BallotSnapshot {
        BallotSnapshot {
            chairperson: self.chairperson,
            proposals: self.proposals.clone(),
            voters: self.voters.iter().map(|(k, v)| (*k, *v)).collect(),
        }
    }

    pub fn from_snapshot(snapshot: BallotSnapshot) -> Result<Self, BallotError> {
        snapshot.validate()?;
        Ok(Self {
            chairperson: snapshot.chairperson,
            proposals: snapshot.proposals,
            voters: snapshot.voters.into_iter().collect(),
        })
    }

    /// Encode the ballot with bincode.
    pub fn save_state(&self) -> Result<Vec<u8>, BallotError> {
        bincode::serialize(&self.snapshot()).map_err(|e| BallotError::Encoding(e.to_string()))
    }

    /// Decode and validate a ballot produced by [`BallotEngine::save_state`].
    pub fn load_state(data: &[u8]) -> Result<Self, BallotError> {
        let snapshot: BallotSnapshot = bincode::deserialize(data)
            .map_err(|e| BallotError::CorruptSnapshot(e.to_string()))?;
        Self::from_snapshot(snapshot)
    }
}
