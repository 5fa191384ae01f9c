//! Shared utilities for Hybrid DAO binaries.

pub mod logging;

pub use logging::{init_logging, LogFormat, LoggingError};
