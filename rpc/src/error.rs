//! RPC error types.

use ballot_transactions::TransactionError;
use ballot_types::BallotId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RpcError {
    #[error("ballot not found: {0}")]
    BallotNotFound(BallotId),

    #[error("ballot already exists: {0}")]
    BallotExists(BallotId),

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("storage error: {0}")]
    Storage(String),

    #[error(transparent)]
    Transaction(#[from] TransactionError),

    #[error("server error: {0}")]
    Server(String),
}

impl RpcError {
    /// Stable machine-readable code sent alongside the error message.
    pub fn code(&self) -> &'static str {
        match self {
            Self::BallotNotFound(_) => "BallotNotFound",
            Self::BallotExists(_) => "BallotExists",
            Self::InvalidRequest(_) => "InvalidRequest",
            Self::Storage(_) => "Storage",
            Self::Transaction(_) => "Transaction",
            Self::Server(_) => "Server",
        }
    }
}

impl From<std::io::Error> for RpcError {
    fn from(e: std::io::Error) -> Self {
        RpcError::Storage(e.to_string())
    }
}
