//! Registry of live ballots hosted by a node.
//!
//! The map lock is held only to look up or insert a ballot handle. Engine
//! mutations run under the per-ballot lock inside [`SharedBallot`], so
//! transactions against different ballots never wait on each other.

use crate::error::RpcError;
use crate::storage::StateDir;
use ballot_crypto::derive_ballot_id;
use ballot_engine::{BallotEngine, BallotError, DelegationOutcome, SharedBallot};
use ballot_transactions::{
    validate_transaction, BallotCall, Receipt, SignedTransaction, TransactionError,
};
use ballot_types::{BallotId, ProposalName, TxHash, VoterId};
use std::collections::HashMap;
use std::path::PathBuf;
use tokio::sync::{Mutex, MutexGuard, RwLock};
use tracing::{debug, info, warn};

/// What a failed snapshot write does to the transaction that caused it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Durability {
    /// Keep the change in memory and log the failure. The next applied
    /// transaction on the ballot rewrites its snapshot.
    #[default]
    BestEffort,
    /// Roll the change back and fail the submission with a storage error.
    Strict,
}

pub struct BallotRegistry {
    ballots: RwLock<HashMap<BallotId, SharedBallot>>,
    state: Option<StateDir>,
    durability: Durability,
    /// Serialises snapshot writes so an older state never overwrites a newer one.
    persist_lock: Mutex<()>,
}

impl BallotRegistry {
    pub fn in_memory() -> Self {
        Self {
            ballots: RwLock::new(HashMap::new()),
            state: None,
            durability: Durability::BestEffort,
            persist_lock: Mutex::new(()),
        }
    }

    /// Open a registry backed by `state_dir`, loading every stored ballot.
    pub fn open(state_dir: impl Into<PathBuf>) -> Result<Self, RpcError> {
        Self::open_with(state_dir, Durability::BestEffort)
    }

    pub fn open_with(
        state_dir: impl Into<PathBuf>,
        durability: Durability,
    ) -> Result<Self, RpcError> {
        let state = StateDir::open(state_dir)?;
        let ballots: HashMap<_, _> = state
            .load_all()?
            .into_iter()
            .map(|(id, engine)| (id, SharedBallot::new(engine)))
            .collect();
        info!(
            dir = %state.path().display(),
            ballots = ballots.len(),
            ?durability,
            "ballot registry opened"
        );
        Ok(Self {
            ballots: RwLock::new(ballots),
            state: Some(state),
            durability,
            persist_lock: Mutex::new(()),
        })
    }

    pub async fn ballot(&self, id: &BallotId) -> Result<SharedBallot, RpcError> {
        self.ballots
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or(RpcError::BallotNotFound(*id))
    }

    /// All hosted ballot ids, sorted.
    pub async fn ballot_ids(&self) -> Vec<BallotId> {
        let mut ids: Vec<_> = self.ballots.read().await.keys().copied().collect();
        ids.sort();
        ids
    }

    pub async fn len(&self) -> usize {
        self.ballots.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Verify and apply a signed transaction.
    ///
    /// Malformed or badly signed transactions, unknown ballots and duplicate
    /// deploys are errors. A call whose ballot precondition fails yields a
    /// reverted receipt and leaves the ballot untouched.
    pub async fn submit(&self, tx: SignedTransaction) -> Result<Receipt, RpcError> {
        validate_transaction(&tx)?;
        let tx_hash = tx.hash()?;
        let sender = tx.sender();
        debug!(call = tx.call.name(), %sender, %tx_hash, "transaction received");

        let call_name = tx.call.name();
        let id = match tx.call {
            BallotCall::Deploy { proposals, .. } => {
                return self.deploy(tx_hash, sender, proposals).await;
            }
            _ => tx
                .ballot
                .ok_or(TransactionError::MissingBallot { call: call_name })?,
        };

        let ballot = self.ballot(&id).await?;
        let strict = self.strict_guard().await;
        let before = strict.as_ref().map(|_| ballot.with_engine(BallotEngine::clone));
        let result = match tx.call {
            BallotCall::GiveRightToVote { voter } => ballot
                .give_right_to_vote(&sender, &voter)
                .map(|()| info!(ballot = %id, chairperson = %sender, %voter, "right to vote granted")),
            BallotCall::Delegate { to } => ballot.delegate(&sender, &to).map(|outcome| {
                log_delegation(&id, &sender, &outcome);
            }),
            BallotCall::Vote { proposal } => ballot
                .vote(&sender, proposal)
                .map(|()| info!(ballot = %id, voter = %sender, proposal, "vote cast")),
            BallotCall::Deploy { .. } => return Err(TransactionError::UnexpectedBallot.into()),
        };
        if let Err(e) = result {
            return Ok(reverted(tx_hash, id, sender, call_name, &e));
        }

        match (strict, before) {
            (Some(_guard), Some(before)) => {
                if let Err(e) = self.write_snapshot(&id, &ballot).await {
                    ballot.replace(before);
                    warn!(ballot = %id, error = %e, "snapshot write failed, transaction rolled back");
                    return Err(e);
                }
            }
            _ => self.persist(&id, &ballot).await,
        }
        Ok(Receipt::applied(tx_hash, id, sender))
    }

    async fn deploy(
        &self,
        tx_hash: TxHash,
        sender: VoterId,
        proposals: Vec<ProposalName>,
    ) -> Result<Receipt, RpcError> {
        let id = derive_ballot_id(&tx_hash);
        let count = proposals.len();
        let engine = match BallotEngine::new(proposals, sender) {
            Ok(engine) => engine,
            Err(e) => return Ok(reverted(tx_hash, id, sender, "deploy", &e)),
        };
        let ballot = SharedBallot::new(engine);
        let strict = self.strict_guard().await;
        {
            let mut ballots = self.ballots.write().await;
            if ballots.contains_key(&id) {
                return Err(RpcError::BallotExists(id));
            }
            ballots.insert(id, ballot.clone());
        }

        if strict.is_some() {
            if let Err(e) = self.write_snapshot(&id, &ballot).await {
                self.ballots.write().await.remove(&id);
                warn!(ballot = %id, error = %e, "snapshot write failed, deploy rolled back");
                return Err(e);
            }
        } else {
            self.persist(&id, &ballot).await;
        }
        info!(ballot = %id, chairperson = %sender, proposals = count, "ballot deployed");
        Ok(Receipt::applied(tx_hash, id, sender))
    }

    /// Held across a mutation and its snapshot write under strict durability.
    async fn strict_guard(&self) -> Option<MutexGuard<'_, ()>> {
        match (&self.state, self.durability) {
            (Some(_), Durability::Strict) => Some(self.persist_lock.lock().await),
            _ => None,
        }
    }

    async fn write_snapshot(&self, id: &BallotId, ballot: &SharedBallot) -> Result<(), RpcError> {
        let Some(state) = &self.state else {
            return Ok(());
        };
        let bytes = ballot
            .with_engine(BallotEngine::save_state)
            .map_err(|e| RpcError::Storage(e.to_string()))?;
        state.save(id, bytes).await
    }

    async fn persist(&self, id: &BallotId, ballot: &SharedBallot) {
        if self.state.is_none() {
            return;
        }
        let _guard = self.persist_lock.lock().await;
        if let Err(e) = self.write_snapshot(id, ballot).await {
            warn!(ballot = %id, error = %e, "failed to persist snapshot");
        }
    }
}

fn reverted(
    tx_hash: TxHash,
    ballot: BallotId,
    sender: VoterId,
    call: &str,
    error: &BallotError,
) -> Receipt {
    warn!(%ballot, %sender, call, code = error.code(), "transaction reverted: {error}");
    Receipt::reverted(tx_hash, ballot, sender, error.code(), error.to_string())
}

fn log_delegation(ballot: &BallotId, sender: &VoterId, outcome: &DelegationOutcome) {
    match outcome {
        DelegationOutcome::WeightTransferred { delegate, weight } => {
            info!(%ballot, voter = %sender, %delegate, weight, "vote delegated");
        }
        DelegationOutcome::VoteCounted {
            delegate,
            proposal,
            weight,
        } => {
            info!(%ballot, voter = %sender, %delegate, proposal, weight, "vote delegated to decided voter");
        }
    }
}
