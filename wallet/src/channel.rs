//! Transaction submission channels.

use crate::error::WalletError;
use ballot_rpc::{BallotRegistry, ProposalInfo, VoterInfo};
use ballot_transactions::{Receipt, SignedTransaction};
use ballot_types::{BallotId, ProposalName, VoterId};
use std::future::Future;
use std::sync::Arc;

/// Where signed transactions go and where ballot state is read from.
///
/// `submit` resolves once the node has applied or reverted the transaction.
pub trait TransactionChannel: Send + Sync {
    fn submit(
        &self,
        tx: SignedTransaction,
    ) -> impl Future<Output = Result<Receipt, WalletError>> + Send;

    fn chairperson(
        &self,
        ballot: &BallotId,
    ) -> impl Future<Output = Result<VoterId, WalletError>> + Send;

    fn proposals(
        &self,
        ballot: &BallotId,
    ) -> impl Future<Output = Result<Vec<ProposalInfo>, WalletError>> + Send;

    fn voter(
        &self,
        ballot: &BallotId,
        voter: &VoterId,
    ) -> impl Future<Output = Result<VoterInfo, WalletError>> + Send;

    fn winning_proposal(
        &self,
        ballot: &BallotId,
    ) -> impl Future<Output = Result<usize, WalletError>> + Send;

    fn winner_name(
        &self,
        ballot: &BallotId,
    ) -> impl Future<Output = Result<ProposalName, WalletError>> + Send;
}

/// Channel straight into an in-process registry.
#[derive(Clone)]
pub struct LocalChannel {
    registry: Arc<BallotRegistry>,
}

impl LocalChannel {
    pub fn new(registry: Arc<BallotRegistry>) -> Self {
        Self { registry }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(BallotRegistry::in_memory()))
    }

    pub fn registry(&self) -> &Arc<BallotRegistry> {
        &self.registry
    }
}

impl TransactionChannel for LocalChannel {
    async fn submit(&self, tx: SignedTransaction) -> Result<Receipt, WalletError> {
        Ok(self.registry.submit(tx).await?)
    }

    async fn chairperson(&self, ballot: &BallotId) -> Result<VoterId, WalletError> {
        Ok(self.registry.ballot(ballot).await?.chairperson())
    }

    async fn proposals(&self, ballot: &BallotId) -> Result<Vec<ProposalInfo>, WalletError> {
        let proposals = self.registry.ballot(ballot).await?.proposals();
        Ok(proposals
            .into_iter()
            .enumerate()
            .map(|(index, p)| ProposalInfo::new(index, p))
            .collect())
    }

    async fn voter(&self, ballot: &BallotId, voter: &VoterId) -> Result<VoterInfo, WalletError> {
        let state = self.registry.ballot(ballot).await?.voter(voter);
        Ok(VoterInfo::new(*voter, state))
    }

    async fn winning_proposal(&self, ballot: &BallotId) -> Result<usize, WalletError> {
        Ok(self.registry.ballot(ballot).await?.winning_proposal())
    }

    async fn winner_name(&self, ballot: &BallotId) -> Result<ProposalName, WalletError> {
        Ok(self.registry.ballot(ballot).await?.winner_name())
    }
}
