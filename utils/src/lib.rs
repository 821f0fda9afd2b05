//! Shared utilities for the custody ledger workspace.

pub mod logging;

pub use logging::{init_logging, LogFormat, LoggingError};
