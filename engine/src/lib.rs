//! Weighted ballot with chairperson-granted voting rights.
//!
//! The chairperson (the creator of the ballot) grants weight 1 to voters.
//! A voter either votes for a proposal directly or delegates to another
//! voter; delegation follows the delegate chain to its end and either adds
//! weight to the final delegate or, if that delegate already voted, adds it
//! straight to the chosen proposal. The tally is therefore independent of
//! the order in which votes and delegations arrive.

pub mod delegation;
pub mod engine;
pub mod error;
pub mod proposal;
pub mod shared;
pub mod snapshot;
pub mod voter;

pub use delegation::DelegationOutcome;
pub use engine::BallotEngine;
pub use error::BallotError;
pub use proposal::Proposal;
pub use shared::SharedBallot;
pub use snapshot::BallotSnapshot;
pub use voter::Voter;
