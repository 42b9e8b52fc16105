//! Logging utilities.
//!
//! Centralizes logger initialization behind the standard `log` facade so the
//! host and player crates only ever call `log::info!` and friends.

mod init;

pub use init::{init_logging, LoggingConfig};
