use ballot_rpc::RpcError;
use ballot_transactions::TransactionError;
use ballot_types::TypesError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WalletError {
    #[error("node RPC error: {0}")]
    Node(String),

    /// The node refused the request; `code` is its `RpcError` code.
    #[error("node rejected request ({code}): {message}")]
    Rejected { code: String, message: String },

    #[error("node unreachable: {0}")]
    Unreachable(String),

    #[error("transaction reverted ({code}): {reason}")]
    Reverted { code: String, reason: String },

    #[error("invalid private key: {0}")]
    InvalidKey(String),

    #[error(transparent)]
    Types(#[from] TypesError),

    #[error(transparent)]
    Transaction(#[from] TransactionError),

    #[error(transparent)]
    Rpc(#[from] RpcError),
}

impl WalletError {
    /// Machine-readable code of a node-side rejection, whichever channel
    /// carried it.
    pub fn rejection_code(&self) -> Option<&str> {
        match self {
            Self::Rejected { code, .. } => Some(code.as_str()),
            Self::Rpc(e) => Some(e.code()),
            _ => None,
        }
    }
}
