use ballot_types::VoterId;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BallotError {
    #[error("{caller} is not the chairperson")]
    Unauthorized { caller: VoterId },

    #[error("{0} has already voted")]
    AlreadyVoted(VoterId),

    #[error("{0} already has the right to vote")]
    AlreadyHasRights(VoterId),

    #[error("self-delegation is disallowed")]
    SelfDelegation,

    #[error("found loop in delegation")]
    DelegationLoop,

    #[error("{0} has no right to vote")]
    NoRightToVote(VoterId),

    #[error("proposal {index} does not exist ({count} proposals)")]
    InvalidProposal { index: usize, count: usize },

    #[error("a ballot needs at least one proposal")]
    NoProposals,

    #[error("weight overflow")]
    Overflow,

    #[error("corrupt snapshot: {0}")]
    CorruptSnapshot(String),

    #[error("snapshot encoding failed: {0}")]
    Encoding(String),
}

impl BallotError {
    /// Stable machine-readable name of the error kind.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Unauthorized { .. } => "Unauthorized",
            Self::AlreadyVoted(_) => "AlreadyVoted",
            Self::AlreadyHasRights(_) => "AlreadyHasRights",
            Self::SelfDelegation => "SelfDelegation",
            Self::DelegationLoop => "DelegationLoop",
            Self::NoRightToVote(_) => "NoRightToVote",
            Self::InvalidProposal { .. } => "InvalidProposal",
            Self::NoProposals => "NoProposals",
            Self::Overflow => "Overflow",
            Self::CorruptSnapshot(_) => "CorruptSnapshot",
            Self::Encoding(_) => "Encoding",
        }
    }
}
