//! Cryptographic primitives for the ballot.
//!
//! - **Ed25519** signatures over domain-tagged transaction payloads
//! - **Blake2b-256** for transaction hashes and ballot ids
//! - Voter identity derivation: `0x` + last 20 bytes of Blake2b-256(public key)

pub mod address;
pub mod digest;
pub mod sign;

pub use address::{derive_ballot_id, derive_voter_id};
pub use digest::{transaction_hash, TRANSACTION_DOMAIN};
pub use sign::{
    generate_keypair, keypair_from_private, keypair_from_seed, sign_transaction,
    verify_transaction,
};
