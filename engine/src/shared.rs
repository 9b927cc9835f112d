//! Thread-safe handle to one ballot.
//!
//! Mutations take the write lock, so at most one `give_right_to_vote`,
//! `delegate` or `vote` runs per ballot at a time. Queries share the read lock.

use crate::delegation::DelegationOutcome;
use crate::engine::BallotEngine;
use crate::error::BallotError;
use crate::proposal::Proposal;
use crate::snapshot::BallotSnapshot;
use crate::voter::Voter;
use ballot_types::{ProposalName, VoterId};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Clone)]
pub struct SharedBallot {
    inner: Arc<RwLock<BallotEngine>>,
}

impl SharedBallot {
    pub fn new(engine: BallotEngine) -> Self {
        Self {
            inner: Arc::new(RwLock::new(engine)),
        }
    }

    // Engine methods never leave partial writes behind, so state behind a
    // poisoned lock is still consistent.
    fn read(&self) -> RwLockReadGuard<'_, BallotEngine> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, BallotEngine> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn give_right_to_vote(&self, caller: &VoterId, target: &VoterId) -> Result<(), BallotError> {
        self.write().give_right_to_vote(caller, target)
    }

    pub fn delegate(
        &self,
        caller: &VoterId,
        target: &VoterId,
    ) -> Result<DelegationOutcome, BallotError> {
        self.write().delegate(caller, target)
    }

    pub fn vote(&self, caller: &VoterId, proposal: usize) -> Result<(), BallotError> {
        self.write().vote(caller, proposal)
    }

    pub fn chairperson(&self) -> VoterId {
        *self.read().chairperson()
    }

    pub fn proposal(&self, index: usize) -> Option<Proposal> {
        self.read().proposal(index).cloned()
    }

    pub fn proposals(&self) -> Vec<Proposal> {
        self.read().proposals().to_vec()
    }

    pub fn voter(&self, id: &VoterId) -> Voter {
        self.read().voter(id)
    }

    pub fn winning_proposal(&self) -> usize {
        self.read().winning_proposal()
    }

    pub fn winner_name(&self) -> ProposalName {
        self.read().winner_name().clone()
    }

    pub fn snapshot(&self) -> BallotSnapshot {
        self.read().snapshot()
    }

    /// Run `f` under the read lock, for compound queries that must see one state.
    pub fn with_engine<R>(&self, f: impl FnOnce(&BallotEngine) -> R) -> R {
        f(&*self.read())
    }

    /// Swap in `engine`, returning the state it replaced.
    pub fn replace(&self, engine: BallotEngine) -> BallotEngine {
        std::mem::replace(&mut *self.write(), engine)
    }
}
