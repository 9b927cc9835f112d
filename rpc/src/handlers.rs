//! RPC request handlers.
//!
//! Every request is a JSON object with an `"action"` field; the remaining
//! fields are the action's parameters.

use crate::error::RpcError;
use crate::pagination::{PaginationMeta, PaginationParams};
use crate::registry::BallotRegistry;
use ballot_engine::{Proposal, Voter};
use ballot_transactions::SignedTransaction;
use ballot_types::{BallotId, ProposalName, VoterId};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

#[derive(Debug, Deserialize)]
pub struct RpcRequest {
    pub action: String,
    #[serde(flatten)]
    pub params: Value,
}

// ── Transaction ──────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct SubmitRequest {
    pub transaction: SignedTransaction,
}

// ── Ballot ───────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct BallotRequest {
    pub ballot: BallotId,
}

#[derive(Serialize, Deserialize)]
pub struct ChairpersonResponse {
    pub chairperson: VoterId,
}

#[derive(Deserialize)]
pub struct ProposalRequest {
    pub ballot: BallotId,
    pub index: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposalInfo {
    pub index: usize,
    pub name: ProposalName,
    pub vote_count: u64,
}

impl ProposalInfo {
    pub fn new(index: usize, proposal: Proposal) -> Self {
        Self {
            index,
            name: proposal.name,
            vote_count: proposal.vote_count,
        }
    }
}

#[derive(Serialize, Deserialize)]
pub struct ProposalsResponse {
    pub proposals: Vec<ProposalInfo>,
}

#[derive(Serialize, Deserialize)]
pub struct WinningProposalResponse {
    pub index: usize,
}

#[derive(Serialize, Deserialize)]
pub struct WinnerNameResponse {
    pub name: ProposalName,
}

// ── Voter ────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct VoterRequest {
    pub ballot: BallotId,
    pub voter: VoterId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoterInfo {
    pub voter: VoterId,
    pub weight: u64,
    pub voted: bool,
    pub delegate: Option<VoterId>,
    pub vote: Option<usize>,
}

impl VoterInfo {
    pub fn new(id: VoterId, voter: Voter) -> Self {
        Self {
            voter: id,
            weight: voter.weight,
            voted: voter.voted,
            delegate: voter.delegate,
            vote: voter.vote,
        }
    }
}

// ── Listing ──────────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct BallotsResponse {
    pub ballots: Vec<BallotId>,
    #[serde(flatten)]
    pub pagination: PaginationMeta,
}

fn params<T: DeserializeOwned>(action: &str, params: Value) -> Result<T, RpcError> {
    serde_json::from_value(params)
        .map_err(|e| RpcError::InvalidRequest(format!("{action}: {e}")))
}

fn to_value<T: Serialize>(value: T) -> Result<Value, RpcError> {
    serde_json::to_value(value).map_err(|e| RpcError::Server(e.to_string()))
}

/// Run one action against the registry and return its JSON result.
pub async fn dispatch(
    registry: &BallotRegistry,
    action: &str,
    body: Value,
) -> Result<Value, RpcError> {
    debug!(action, "rpc request");
    match action {
        "submit" => {
            let req: SubmitRequest = params(action, body)?;
            to_value(registry.submit(req.transaction).await?)
        }
        "chairperson" => {
            let req: BallotRequest = params(action, body)?;
            let chairperson = registry.ballot(&req.ballot).await?.chairperson();
            to_value(ChairpersonResponse { chairperson })
        }
        "proposal" => {
            let req: ProposalRequest = params(action, body)?;
            let ballot = registry.ballot(&req.ballot).await?;
            let proposal = ballot.proposal(req.index).ok_or_else(|| {
                RpcError::InvalidRequest(format!("proposal {} does not exist", req.index))
            })?;
            to_value(ProposalInfo::new(req.index, proposal))
        }
        "proposals" => {
            let req: BallotRequest = params(action, body)?;
            let proposals = registry
                .ballot(&req.ballot)
                .await?
                .proposals()
                .into_iter()
                .enumerate()
                .map(|(i, p)| ProposalInfo::new(i, p))
                .collect();
            to_value(ProposalsResponse { proposals })
        }
        "voter" => {
            let req: VoterRequest = params(action, body)?;
            let voter = registry.ballot(&req.ballot).await?.voter(&req.voter);
            to_value(VoterInfo::new(req.voter, voter))
        }
        "winning_proposal" => {
            let req: BallotRequest = params(action, body)?;
            let index = registry.ballot(&req.ballot).await?.winning_proposal();
            to_value(WinningProposalResponse { index })
        }
        "winner_name" => {
            let req: BallotRequest = params(action, body)?;
            let name = registry.ballot(&req.ballot).await?.winner_name();
            to_value(WinnerNameResponse { name })
        }
        "ballots" => {
            let req: PaginationParams = params(action, body)?;
            let (ballots, pagination) = req.page(&registry.ballot_ids().await);
            to_value(BallotsResponse {
                ballots,
                pagination,
            })
        }
        other => Err(RpcError::InvalidRequest(format!("unknown action: {other}"))),
    }
}
