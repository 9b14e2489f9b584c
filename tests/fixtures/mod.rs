//! Shared test fixtures for E2E CLI tests.
#![allow(dead_code)] // Not every test binary uses every fixture

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

/// A small panel: a 2x4 grid over bytes 0 and 1, two single bits in byte 2.
///
/// | Region     | Bit       | Rect          |
/// |------------|-----------|---------------|
/// | `Grid 0/r` | 0:r       | (0, r) 1x1    |
/// | `Grid 1/r` | 1:r       | (1, r) 1x1    |
/// | `Power`    | 2:0       | (4, 0) 1x1    |
/// | `Fault`    | 2:3       | (4, 2) 1x2    |
pub const PANEL_LAYOUT: &str = r#"[
    {"kind": "grid", "name": "Grid", "pos": {"x": 0, "y": 0},
     "size": {"w": 2, "h": 4}, "tile": {"w": 1, "h": 1}, "address": "0:0"},
    {"kind": "single", "name": "Power", "pos": {"x": 4, "y": 0},
     "size": {"w": 1, "h": 1}, "address": "2:0"},
    {"kind": "single", "name": "Fault", "pos": {"x": 4, "y": 2},
     "size": {"w": 1, "h": 2}, "address": "2:3"}
]"#;

/// A layout with one good record and three that produce warnings.
pub const WARNING_LAYOUT: &str = r#"[
    {"kind": "single", "name": "Good", "pos": {"x": 0, "y": 0},
     "size": {"w": 1, "h": 1}, "address": "0:0"},
    {"kind": "ring", "name": "Dial"},
    {"kind": "single", "name": "Bad", "pos": {"x": 1, "y": 0},
     "size": {"w": 1, "h": 1}, "address": "0:9"},
    {"kind": "grid", "name": "Strip", "pos": {"x": 0, "y": 2},
     "size": {"w": 3, "h": 1}, "tile": {"w": 2, "h": 1}, "address": "1:0"}
]"#;

/// The same panel written with the legacy field names in JSON5.
pub const LEGACY_LAYOUT_JSON5: &str = r#"{
    // exported from the desktop tool
    items: [
        {type: "grid", name: "Grid", pos: {x: 0, y: 0}, size: {x: 2, y: 4},
         tile: {x: 1, y: 1}, address: "0:0", invx: true},
        {type: "tile", name: "Power", pos: {x: 4, y: 0}, size: {x: 1, y: 1}, packet: "2:0"},
    ],
}"#;

/// Path to the bitscope binary
pub fn bitscope_bin() -> &'static str {
    env!("CARGO_BIN_EXE_bitscope")
}

/// Writes `content` to `name` inside a fresh temp dir.
///
/// The returned `TempDir` must be kept alive for the file to exist.
pub fn write_layout(name: &str, content: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join(name);
    fs::write(&path, content).expect("Failed to write layout");
    (temp_dir, path)
}

/// Writes the panel layout into a fresh temp dir.
pub fn panel_layout() -> (TempDir, PathBuf) {
    write_layout("panel.json", PANEL_LAYOUT)
}

/// Creates a Command with an isolated config directory.
pub fn bitscope_command(args: &[&str], config_dir: &Path) -> Command {
    let mut cmd = Command::new(bitscope_bin());
    cmd.env("BITSCOPE_CONFIG_DIR", config_dir);
    cmd.env_remove("RUST_LOG");
    cmd.args(args);
    cmd
}

/// Parses stdout as JSON, failing the test with stderr on error.
pub fn stdout_json(output: &std::process::Output) -> serde_json::Value {
    let stdout = String::from_utf8_lossy(&output.stdout);
    serde_json::from_str(&stdout).unwrap_or_else(|e| {
        panic!(
            "Invalid JSON ({e}): {stdout}\nstderr: {}",
            String::from_utf8_lossy(&output.stderr)
        )
    })
}
