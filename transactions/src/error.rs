use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransactionError {
    #[error("invalid signature on transaction from {sender}")]
    InvalidSignature { sender: String },

    #[error("{call} transaction must name a ballot")]
    MissingBallot { call: &'static str },

    #[error("deploy transaction must not name a ballot")]
    UnexpectedBallot,

    #[error("encoding error: {0}")]
    Encoding(String),
}
