//! CLI command handlers for Bitscope.
//!
//! Each subcommand is a clap `Args` struct with an `execute` method returning
//! [`common::CliResult`], so the binary only maps errors to exit codes.

pub mod common;
pub mod config;
pub mod decode;
pub mod hit;
pub mod inspect;
#[cfg(feature = "net")]
pub mod listen;

// Re-export types used by main.rs and tests
pub use common::{CliError, CliResult, ExitCode};
pub use config::ConfigArgs;
pub use decode::DecodeArgs;
pub use hit::HitArgs;
pub use inspect::InspectArgs;
#[cfg(feature = "net")]
pub use listen::ListenArgs;
