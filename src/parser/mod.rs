//! Parsing for layout description files.

pub mod layout_file;

// Re-export commonly used functions
pub use layout_file::{parse_layout_file, parse_layout_str, LayoutEntry, LayoutFormat, ParsedLayout};
