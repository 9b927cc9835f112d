//! Core ballot engine: rights, delegation, voting, tally.
//!
//! Every operation checks all of its preconditions before touching state, so
//! a failed call leaves the ballot exactly as it was.

use crate::delegation::{resolve_chain, DelegationOutcome};
use crate::error::BallotError;
use crate::proposal::Proposal;
use crate::voter::Voter;
use ballot_types::{ProposalName, VoterId};
use std::collections::HashMap;
use tracing::{debug, info};

/// One ballot instance: ordered proposals, a voter registry and the chairperson.
#[derive(Clone, Debug)]
pub struct BallotEngine {
    pub(crate) chairperson: VoterId,
    pub(crate) proposals: Vec<Proposal>,
    pub(crate) voters: HashMap<VoterId, Voter>,
}

impl BallotEngine {
    /// Create a ballot. The creator becomes chairperson with weight 1.
    pub fn new(
        proposal_names: impl IntoIterator<Item = ProposalName>,
        creator: VoterId,
    ) -> Result<Self, BallotError> {
        let proposals: Vec<Proposal> = proposal_names.into_iter().map(Proposal::new).collect();
        if proposals.is_empty() {
            return Err(BallotError::NoProposals);
        }

        let mut voters = HashMap::new();
        voters.insert(
            creator,
            Voter {
                weight: 1,
                ..Default::default()
            },
        );

        info!(
            chairperson = %creator,
            proposals = proposals.len(),
            "ballot created"
        );

        Ok(Self {
            chairperson: creator,
            proposals,
            voters,
        })
    }

    pub fn chairperson(&self) -> &VoterId {
        &self.chairperson
    }

    pub fn proposals(&self) -> &[Proposal] {
        &self.proposals
    }

    pub fn proposal(&self, index: usize) -> Option<&Proposal> {
        self.proposals.get(index)
    }

    pub fn proposal_count(&self) -> usize {
        self.proposals.len()
    }

    /// The voter record for `id`, or the default record if it was never touched.
    pub fn voter(&self, id: &VoterId) -> Voter {
        self.voters.get(id).copied().unwrap_or_default()
    }

    /// Sum of all proposal vote counts.
    pub fn total_votes(&self) -> u64 {
        self.proposals.iter().map(|p| p.vote_count).sum()
    }

    /// Grant `target` weight 1. Chairperson only.
    pub fn give_right_to_vote(
        &mut self,
        caller: &VoterId,
        target: &VoterId,
    ) -> Result<(), BallotError> {
        if caller != &self.chairperson {
            return Err(BallotError::Unauthorized { caller: *caller });
        }
        let voter = self.voter(target);
        if voter.voted {
            return Err(BallotError::AlreadyVoted(*target));
        }
        if voter.weight != 0 {
            return Err(BallotError::AlreadyHasRights(*target));
        }

        self.voters.entry(*target).or_default().weight = 1;
        info!(voter = %target, "voting right granted");
        Ok(())
    }

    /// Delegate the caller's vote to `target`, following its delegate chain.
    pub fn delegate(
        &mut self,
        caller: &VoterId,
        target: &VoterId,
    ) -> Result<DelegationOutcome, BallotError> {
        let sender = self.voter(caller);
        if sender.voted {
            return Err(BallotError::AlreadyVoted(*caller));
        }
        if caller == target {
            return Err(BallotError::SelfDelegation);
        }

        let resolved = resolve_chain(&self.voters, caller, target)?;
        let delegate = self.voter(&resolved);
        let weight = sender.weight;

        // Compute the effect first so an overflow aborts before any write.
        let (outcome, new_value) = match delegate.direct_vote() {
            Some(proposal) => {
                let count = self.proposals[proposal]
                    .vote_count
                    .checked_add(weight)
                    .ok_or(BallotError::Overflow)?;
                (
                    DelegationOutcome::VoteCounted {
                        delegate: resolved,
                        proposal,
                        weight,
                    },
                    count,
                )
            }
            None => {
                let new_weight = delegate
                    .weight
                    .checked_add(weight)
                    .ok_or(BallotError::Overflow)?;
                (
                    DelegationOutcome::WeightTransferred {
                        delegate: resolved,
                        weight,
                    },
                    new_weight,
                )
            }
        };

        let entry = self.voters.entry(*caller).or_default();
        entry.voted = true;
        entry.delegate = Some(resolved);

        match outcome {
            DelegationOutcome::VoteCounted { proposal, .. } => {
                self.proposals[proposal].vote_count = new_value;
            }
            DelegationOutcome::WeightTransferred { .. } => {
                self.voters.entry(resolved).or_default().weight = new_value;
            }
        }

        info!(from = %caller, to = %resolved, weight, "vote delegated");
        Ok(outcome)
    }

    /// Cast the caller's full weight for `proposal`.
    pub fn vote(&mut self, caller: &VoterId, proposal: usize) -> Result<(), BallotError> {
        let sender = self.voter(caller);
        if !sender.can_vote() {
            return Err(if sender.weight == 0 {
                BallotError::NoRightToVote(*caller)
            } else {
                BallotError::AlreadyVoted(*caller)
            });
        }
        let count = self.proposals.len();
        let target = self
            .proposals
            .get(proposal)
            .ok_or(BallotError::InvalidProposal {
                index: proposal,
                count,
            })?;
        let new_count = target
            .vote_count
            .checked_add(sender.weight)
            .ok_or(BallotError::Overflow)?;

        let entry = self.voters.entry(*caller).or_default();
        entry.voted = true;
        entry.vote = Some(proposal);
        self.proposals[proposal].vote_count = new_count;

        info!(voter = %caller, proposal, weight = sender.weight, "vote cast");
        Ok(())
    }

    /// Index of the proposal with the most votes; ties go to the lowest index.
    pub fn winning_proposal(&self) -> usize {
        let mut winner = 0;
        let mut best = 0u64;
        for (index, proposal) in self.proposals.iter().enumerate() {
            if proposal.vote_count > best {
                best = proposal.vote_count;
                winner = index;
            }
        }
        debug!(winner, votes = best, "winning proposal computed");
        winner
    }

    /// Name of the winning proposal.
    pub fn winner_name(&self) -> &ProposalName {
        &self.proposals[self.winning_proposal()].name
    }
}
