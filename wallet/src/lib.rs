//! Client side of the ballot node.
//!
//! - [`Signer`]: the caller identity, backed by an Ed25519 key
//! - [`TransactionChannel`]: submits signed transactions and reads ballot state,
//!   either over HTTP ([`NodeClient`]) or in process ([`LocalChannel`])
//! - [`BallotHandle`]: one ballot seen through one signer

pub mod channel;
pub mod client;
pub mod error;
pub mod handle;
pub mod signer;

pub use channel::{LocalChannel, TransactionChannel};
pub use client::NodeClient;
pub use error::WalletError;
pub use handle::BallotHandle;
pub use signer::Signer;
