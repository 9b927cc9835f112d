//! Shared utilities for the ballot binaries.

pub mod logging;

pub use logging::{init_logging, LogFormat, ParseLogFormatError};
