//! Shared CLI types: error/exit-code handling and layout loading.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::constants::APP_BINARY_NAME;
use crate::models::{BitAddress, BitPosition, Rect};
use crate::services::{PacketizerConfig, Session};
use serde::Serialize;

/// Process exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Command succeeded
    Success = 0,
    /// Input was understood but rejected (warnings in strict mode, no hit, bad values)
    Validation = 1,
    /// A file, socket or configuration could not be read or written
    Io = 2,
}

/// Error returned by CLI commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliError {
    /// Exit code category
    pub code: ExitCode,
    /// Message printed to stderr
    pub message: String,
}

impl CliError {
    /// An I/O failure (exit code 2).
    pub fn io(message: impl Into<String>) -> Self {
        Self {
            code: ExitCode::Io,
            message: message.into(),
        }
    }

    /// A validation failure (exit code 1).
    pub fn validation(message: impl Into<String>) -> Self {
        Self {
            code: ExitCode::Validation,
            message: message.into(),
        }
    }

    /// Numeric process exit code.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        self.code as i32
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

/// Result type of CLI commands.
pub type CliResult<T> = Result<T, CliError>;

/// Resolves the layout path from the flag or the configured default.
pub fn resolve_layout_path(flag: Option<&Path>, config: &Config) -> CliResult<PathBuf> {
    flag.map(Path::to_path_buf)
        .or_else(|| config.paths.layout.clone())
        .ok_or_else(|| {
            CliError::validation(format!(
                "No layout given: pass --layout FILE or run `{APP_BINARY_NAME} config set --layout FILE`"
            ))
        })
}

/// Loads the layout at `path` into a new session.
pub fn load_session(path: &Path, packetizer: PacketizerConfig) -> CliResult<Session> {
    Session::load(path, packetizer).map_err(|e| CliError::io(format!("Failed to load layout: {e:#}")))
}

/// Loads the config, falling back to defaults if it cannot be read.
pub fn load_config() -> Config {
    Config::load().unwrap_or_else(|e| {
        tracing::warn!("Ignoring unreadable configuration: {:#}", e);
        Config::default()
    })
}

/// JSON shape of one region in command output.
#[derive(Debug, Clone, Serialize)]
pub struct RegionOutput {
    /// Owning bit position
    pub position: BitPosition,
    /// Owning bit as `byte:bit`
    pub address: String,
    /// Display name
    pub name: String,
    /// Rectangle in layout units
    pub bounds: Rect,
}

impl RegionOutput {
    /// Builds the output record for a region.
    pub fn new(position: BitPosition, name: &str, bounds: Rect) -> Self {
        Self {
            position,
            address: position.address().to_string(),
            name: name.to_string(),
            bounds,
        }
    }
}

/// Formats a rectangle as `(x, y) wxh`.
#[must_use]
pub fn format_rect(rect: &Rect) -> String {
    format!("({}, {}) {}x{}", rect.x, rect.y, rect.w, rect.h)
}

/// Prints `value` as pretty JSON on stdout.
pub fn print_json<T: Serialize>(value: &T) -> CliResult<()> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| CliError::io(format!("Failed to serialize JSON: {e}")))?;
    println!("{json}");
    Ok(())
}

/// Parses a byte value written as decimal, `0x` hex or `0b` binary.
pub fn parse_byte(value: &str) -> CliResult<u8> {
    let value = value.trim();
    let parsed = if let Some(hex) = value.strip_prefix("0x").or_else(|| value.strip_prefix("0X")) {
        u8::from_str_radix(hex, 16)
    } else if let Some(bin) = value.strip_prefix("0b") {
        u8::from_str_radix(bin, 2)
    } else {
        value.parse()
    };

    parsed.map_err(|_| CliError::validation(format!("Invalid byte value: '{}'", value)))
}

/// Parses a `byte:bit` address argument.
pub fn parse_address(value: &str) -> CliResult<BitAddress> {
    value
        .parse()
        .map_err(|e| CliError::validation(format!("{e:#}")))
}
