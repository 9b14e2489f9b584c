//! Bitscope Library
//!
//! This library maps bits of a device's packet stream onto a 2D layout:
//! it parses layout descriptions, assigns a bit position to every region,
//! frames raw bytes into packets and tracks the on/off state of each bit so a
//! renderer can draw and hit-test the layout.

// Module declarations
pub mod cli;
pub mod config;
pub mod constants;
pub mod models;
pub mod parser;
pub mod services;
#[cfg(feature = "net")]
pub mod transport;
