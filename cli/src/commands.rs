//! Client subcommands, run against any transaction channel.

use ballot_types::{BallotId, ProposalName, VoterId};
use ballot_wallet::{BallotHandle, Signer, TransactionChannel};
use std::io::Write;

/// Client commands that act on ballots through a signer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Deploy {
        proposals: Vec<ProposalName>,
        salt: Option<u64>,
    },
    GiveRightToVote {
        ballot: BallotId,
        voter: VoterId,
    },
    Delegate {
        ballot: BallotId,
        delegate: VoterId,
    },
    Vote {
        ballot: BallotId,
        proposal: usize,
    },
    Results {
        ballot: BallotId,
    },
    Voter {
        ballot: BallotId,
        voter: VoterId,
    },
}

pub async fn run<C, W>(channel: C, signer: Signer, action: Action, out: &mut W) -> anyhow::Result<()>
where
    C: TransactionChannel,
    W: Write,
{
    match action {
        Action::Deploy { proposals, salt } => {
            writeln!(out, "Chairperson: {}", signer.identity())?;
            let handle = match salt {
                Some(salt) => BallotHandle::deploy_with_salt(channel, signer, proposals, salt).await?,
                None => BallotHandle::deploy(channel, signer, proposals).await?,
            };
            writeln!(out, "Ballot deployed: {}", handle.id())?;
        }
        Action::GiveRightToVote { ballot, voter } => {
            let handle = BallotHandle::new(channel, signer, ballot);
            writeln!(out, "Giving right to vote to: {voter}")?;
            handle.give_right_to_vote(&voter).await?;
            writeln!(out, "{voter} can now vote")?;
        }
        Action::Delegate { ballot, delegate } => {
            let handle = BallotHandle::new(channel, signer, ballot);
            let me = handle.voter(None).await?;
            writeln!(out, "Voter: {} (weight {})", me.voter, me.weight)?;
            writeln!(out, "Delegating vote to: {delegate}")?;
            writeln!(out, "Delegating vote...")?;
            handle.delegate(&delegate).await?;
            writeln!(out, "Your vote delegated to: {delegate}")?;
        }
        Action::Vote { ballot, proposal } => {
            let handle = BallotHandle::new(channel, signer, ballot);
            writeln!(out, "Voting for proposal {proposal}...")?;
            handle.vote(proposal).await?;
            writeln!(out, "Your vote was cast for proposal {proposal}")?;
        }
        Action::Results { ballot } => {
            let handle = BallotHandle::new(channel, signer, ballot);
            writeln!(out, "Chairperson: {}", handle.chairperson().await?)?;
            for p in handle.proposals().await? {
                writeln!(out, "  [{}] {}: {}", p.index, p.name, p.vote_count)?;
            }
            let winner = handle.winning_proposal().await?;
            writeln!(out, "Winner: [{winner}] {}", handle.winner_name().await?)?;
        }
        Action::Voter { ballot, voter } => {
            let handle = BallotHandle::new(channel, signer, ballot);
            let info = handle.voter(Some(&voter)).await?;
            writeln!(out, "Voter: {}", info.voter)?;
            writeln!(out, "  weight: {}", info.weight)?;
            writeln!(out, "  voted: {}", info.voted)?;
            if let Some(delegate) = info.delegate {
                writeln!(out, "  delegate: {delegate}")?;
            }
            if let Some(vote) = info.vote {
                writeln!(out, "  vote: {vote}")?;
            }
        }
    }
    Ok(())
}
