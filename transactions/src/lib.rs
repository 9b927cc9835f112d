//! Ballot transactions and receipts.
//!
//! A transaction is one [`BallotCall`] signed by the caller's Ed25519 key.
//! The node derives the caller identity from the public key, so a voter can
//! only ever act as itself. Call types:
//! - **Deploy**: create a ballot; the signer becomes chairperson
//! - **GiveRightToVote**: chairperson grants weight 1
//! - **Delegate**: hand the signer's vote to another voter
//! - **Vote**: cast the signer's weight for a proposal

pub mod call;
pub mod error;
pub mod receipt;
pub mod signed;
pub mod validation;

pub use call::BallotCall;
pub use error::TransactionError;
pub use receipt::{Receipt, ReceiptStatus};
pub use signed::SignedTransaction;
pub use validation::validate_transaction;
