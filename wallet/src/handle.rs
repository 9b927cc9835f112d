//! One ballot seen through one signer.

use crate::channel::TransactionChannel;
use crate::error::WalletError;
use crate::signer::Signer;
use ballot_rpc::{ProposalInfo, VoterInfo};
use ballot_transactions::{BallotCall, Receipt, ReceiptStatus};
use ballot_types::{BallotId, ProposalName, VoterId};
use tracing::info;

pub struct BallotHandle<C> {
    channel: C,
    signer: Signer,
    ballot: BallotId,
}

impl<C> std::fmt::Debug for BallotHandle<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BallotHandle")
            .field("signer", &self.signer)
            .field("ballot", &self.ballot)
            .finish_non_exhaustive()
    }
}

impl<C: TransactionChannel> BallotHandle<C> {
    pub fn new(channel: C, signer: Signer, ballot: BallotId) -> Self {
        Self {
            channel,
            signer,
            ballot,
        }
    }

    /// Deploy a new ballot with `signer` as chairperson.
    pub async fn deploy(
        channel: C,
        signer: Signer,
        proposals: Vec<ProposalName>,
    ) -> Result<Self, WalletError> {
        Self::deploy_with_salt(channel, signer, proposals, rand::random()).await
    }

    /// Deploy with a fixed salt; the same signer, proposals and salt always
    /// map to the same ballot id.
    pub async fn deploy_with_salt(
        channel: C,
        signer: Signer,
        proposals: Vec<ProposalName>,
        salt: u64,
    ) -> Result<Self, WalletError> {
        let tx = signer.sign(None, BallotCall::Deploy { proposals, salt })?;
        let receipt = ensure_applied(channel.submit(tx).await?)?;
        info!(ballot = %receipt.ballot, chairperson = %signer.identity(), "ballot deployed");
        Ok(Self::new(channel, signer, receipt.ballot))
    }

    pub fn id(&self) -> &BallotId {
        &self.ballot
    }

    pub fn signer(&self) -> &Signer {
        &self.signer
    }

    pub fn channel(&self) -> &C {
        &self.channel
    }

    /// Same ballot and channel, different signer.
    pub fn with_signer(&self, signer: Signer) -> Self
    where
        C: Clone,
    {
        Self::new(self.channel.clone(), signer, self.ballot)
    }

    async fn send(&self, call: BallotCall) -> Result<Receipt, WalletError> {
        let tx = self.signer.sign(Some(self.ballot), call)?;
        ensure_applied(self.channel.submit(tx).await?)
    }

    pub async fn give_right_to_vote(&self, voter: &VoterId) -> Result<Receipt, WalletError> {
        self.send(BallotCall::GiveRightToVote { voter: *voter }).await
    }

    pub async fn delegate(&self, to: &VoterId) -> Result<Receipt, WalletError> {
        self.send(BallotCall::Delegate { to: *to }).await
    }

    pub async fn vote(&self, proposal: usize) -> Result<Receipt, WalletError> {
        self.send(BallotCall::Vote { proposal }).await
    }

    pub async fn chairperson(&self) -> Result<VoterId, WalletError> {
        self.channel.chairperson(&self.ballot).await
    }

    pub async fn proposals(&self) -> Result<Vec<ProposalInfo>, WalletError> {
        self.channel.proposals(&self.ballot).await
    }

    /// State of `voter`, or of the signer when `None`.
    pub async fn voter(&self, voter: Option<&VoterId>) -> Result<VoterInfo, WalletError> {
        let id = voter.copied().unwrap_or_else(|| self.signer.identity());
        self.channel.voter(&self.ballot, &id).await
    }

    pub async fn winning_proposal(&self) -> Result<usize, WalletError> {
        self.channel.winning_proposal(&self.ballot).await
    }

    pub async fn winner_name(&self) -> Result<ProposalName, WalletError> {
        self.channel.winner_name(&self.ballot).await
    }
}

fn ensure_applied(receipt: Receipt) -> Result<Receipt, WalletError> {
    match receipt.status {
        ReceiptStatus::Applied => Ok(receipt),
        ReceiptStatus::Reverted { code, reason } => Err(WalletError::Reverted { code, reason }),
    }
}
