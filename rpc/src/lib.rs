//! Ballot node.
//!
//! Hosts any number of ballots and serves them over JSON/HTTP:
//! - `POST /` with an `"action"` field: `submit`, `chairperson`, `proposal`,
//!   `proposals`, `voter`, `winning_proposal`, `winner_name`, `ballots`
//! - `GET /health`
//!
//! Ballots can be persisted to a state directory and reloaded on start.

pub mod error;
pub mod handlers;
pub mod pagination;
pub mod registry;
pub mod server;
pub mod storage;

pub use error::RpcError;
pub use handlers::{dispatch, ProposalInfo, VoterInfo};
pub use registry::{BallotRegistry, Durability};
pub use server::{router, RpcConfig, RpcServer};
pub use storage::StateDir;
