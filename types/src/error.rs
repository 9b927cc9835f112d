//! Parse and validation errors for the fundamental types.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TypesError {
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("proposal name is {len} bytes, at most {max} allowed")]
    NameTooLong { len: usize, max: usize },

    #[error("invalid proposal name: {0}")]
    InvalidName(String),

    #[error("invalid hex: {0}")]
    InvalidHex(String),

    #[error("invalid key: {0}")]
    InvalidKey(String),
}
