//! End-to-end tests for `bitscope inspect`.

use tempfile::TempDir;

mod fixtures;
use fixtures::*;

#[test]
fn test_inspect_human_output() {
    let config_dir = TempDir::new().unwrap();
    let (_dir, layout) = panel_layout();

    let output = bitscope_command(&["inspect", "--layout", layout.to_str().unwrap()], config_dir.path())
        .output()
        .expect("Failed to execute command");

    assert_eq!(
        output.status.code(),
        Some(0),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Bounds: (0, 0) 5x4"));
    assert!(stdout.contains("Regions: 10 over 10 bit positions"));
    assert!(stdout.contains("Grid 1/3"));
    assert!(stdout.contains("Fault"));
    assert!(!stdout.contains("Warnings:"));
}

#[test]
fn test_inspect_json_regions_in_declaration_order() {
    let config_dir = TempDir::new().unwrap();
    let (_dir, layout) = panel_layout();

    let output = bitscope_command(
        &["inspect", "--layout", layout.to_str().unwrap(), "--json"],
        config_dir.path(),
    )
    .output()
    .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(0));
    let result = stdout_json(&output);

    assert_eq!(result["region_count"], 10);
    assert_eq!(result["position_count"], 10);
    assert_eq!(result["bounds"]["w"], 5.0);
    assert_eq!(result["bounds"]["h"], 4.0);

    let regions = result["regions"].as_array().unwrap();
    assert_eq!(regions[0]["name"], "Grid 0/0");
    assert_eq!(regions[0]["address"], "0:0");
    // Second column starts on a fresh byte
    assert_eq!(regions[4]["name"], "Grid 1/0");
    assert_eq!(regions[4]["address"], "1:0");
    assert_eq!(regions[4]["position"], 8);
    assert_eq!(regions[8]["name"], "Power");
    assert_eq!(regions[8]["position"], 16);
    assert_eq!(regions[9]["bounds"]["h"], 2.0);
    assert!(result["warnings"].as_array().unwrap().is_empty());
}

#[test]
fn test_inspect_reports_warnings() {
    let config_dir = TempDir::new().unwrap();
    let (_dir, layout) = write_layout("warnings.json", WARNING_LAYOUT);

    let output = bitscope_command(
        &["inspect", "--layout", layout.to_str().unwrap(), "--json"],
        config_dir.path(),
    )
    .output()
    .expect("Failed to execute command");

    // Warnings never abort construction
    assert_eq!(output.status.code(), Some(0));
    let result = stdout_json(&output);

    let warnings = result["warnings"].as_array().unwrap();
    assert_eq!(warnings.len(), 3);
    assert_eq!(warnings[0]["item_index"], 1);
    assert_eq!(warnings[0]["kind"]["type"], "unknown_kind");
    assert_eq!(warnings[0]["kind"]["kind"], "ring");
    assert_eq!(warnings[1]["item_name"], "Bad");
    assert_eq!(warnings[1]["kind"]["type"], "invalid_address");
    assert_eq!(warnings[2]["kind"]["type"], "truncated_grid");
    assert_eq!(warnings[2]["kind"]["cols"], 1);

    // Good plus the one whole cell of Strip
    assert_eq!(result["region_count"], 2);
}

#[test]
fn test_inspect_strict_fails_on_warnings() {
    let config_dir = TempDir::new().unwrap();
    let (_dir, layout) = write_layout("warnings.json", WARNING_LAYOUT);

    let output = bitscope_command(
        &["inspect", "--layout", layout.to_str().unwrap(), "--strict"],
        config_dir.path(),
    )
    .output()
    .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("unknown item kind 'ring'"));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("3 warning(s)"));
}

#[test]
fn test_inspect_strict_passes_clean_layout() {
    let config_dir = TempDir::new().unwrap();
    let (_dir, layout) = panel_layout();

    let output = bitscope_command(
        &["inspect", "--layout", layout.to_str().unwrap(), "--strict"],
        config_dir.path(),
    )
    .output()
    .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(0));
}

#[test]
fn test_inspect_legacy_json5_layout() {
    let config_dir = TempDir::new().unwrap();
    let (_dir, layout) = write_layout("legacy.json5", LEGACY_LAYOUT_JSON5);

    let output = bitscope_command(
        &["inspect", "--layout", layout.to_str().unwrap(), "--json"],
        config_dir.path(),
    )
    .output()
    .expect("Failed to execute command");

    assert_eq!(
        output.status.code(),
        Some(0),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let result = stdout_json(&output);
    assert_eq!(result["region_count"], 9);

    // invx: the right-hand column receives byte 0
    let regions = result["regions"].as_array().unwrap();
    assert_eq!(regions[0]["name"], "Grid 1/0");
    assert_eq!(regions[0]["address"], "0:0");
    assert_eq!(regions[0]["bounds"]["x"], 1.0);
    assert_eq!(regions[8]["name"], "Power");
}

#[test]
fn test_inspect_missing_file() {
    let config_dir = TempDir::new().unwrap();

    let output = bitscope_command(
        &["inspect", "--layout", "/nonexistent/panel.json"],
        config_dir.path(),
    )
    .output()
    .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Failed to load layout"));
}

#[test]
fn test_inspect_without_layout_is_validation_error() {
    let config_dir = TempDir::new().unwrap();

    let output = bitscope_command(&["inspect"], config_dir.path())
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("--layout"));
}

#[test]
fn test_inspect_uses_configured_layout() {
    let config_dir = TempDir::new().unwrap();
    let (_dir, layout) = panel_layout();

    let output = bitscope_command(
        &["config", "set", "--layout", layout.to_str().unwrap()],
        config_dir.path(),
    )
    .output()
    .expect("Failed to execute command");
    assert_eq!(output.status.code(), Some(0));

    let output = bitscope_command(&["inspect", "--json"], config_dir.path())
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout_json(&output)["region_count"], 10);
}
