//! Fundamental types for the ballot.
//!
//! This crate defines the core types shared across every other crate in the workspace:
//! voter identities, ballot instance ids, proposal names, hashes and key material.

pub mod address;
pub mod error;
pub mod hash;
pub mod keys;
pub mod name;

pub use address::{BallotId, VoterId};
pub use error::TypesError;
pub use hash::TxHash;
pub use keys::{KeyPair, PrivateKey, PublicKey, Signature};
pub use name::ProposalName;
