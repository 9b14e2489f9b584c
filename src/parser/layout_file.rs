//! Layout description parser.
//!
//! A layout description is an ordered list of records, each either a single
//! bit or a grid of bits:
//!
//! ```json
//! [
//!   { "kind": "single", "name": "Power", "pos": {"x": 0, "y": 0},
//!     "size": {"w": 1, "h": 1}, "address": "0:0" },
//!   { "kind": "grid", "name": "Matrix", "pos": {"x": 2, "y": 0},
//!     "size": {"w": 4, "h": 2}, "tile": {"w": 1, "h": 1},
//!     "invertRows": true, "address": "1:0" }
//! ]
//! ```
//!
//! The older field names are accepted too: `type` for `kind`, `"tile"` for
//! `"single"`, `packet` for `address`, `invx`/`invy` for the inversion flags
//! and `{x, y}` for sizes. The top level may also be an object with an
//! `items` array.
//!
//! Records that cannot be understood are skipped and reported as
//! [`LayoutWarning`]s; they never fail the whole file.

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;
use std::fs;
use std::path::Path;

use crate::models::{
    BitAddress, BitGrid, LayoutItem, LayoutWarning, LayoutWarningKind, Point, SingleBit, Size,
};

/// Source syntax of a layout description.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutFormat {
    /// Strict JSON
    Json,
    /// JSON5 (comments, trailing commas, unquoted keys)
    Json5,
}

impl LayoutFormat {
    /// Picks the format from a file extension; anything but `.json5` is JSON.
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json5") => Self::Json5,
            _ => Self::Json,
        }
    }
}

/// One accepted record with its position in the description.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutEntry {
    /// Index of the record in the description
    pub index: usize,
    /// The parsed item
    pub item: LayoutItem,
}

/// Result of reading a layout description.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedLayout {
    /// Accepted records in declaration order
    pub entries: Vec<LayoutEntry>,
    /// Records that were skipped
    pub warnings: Vec<LayoutWarning>,
}

impl ParsedLayout {
    /// The accepted items in declaration order.
    pub fn items(&self) -> impl Iterator<Item = &LayoutItem> {
        self.entries.iter().map(|entry| &entry.item)
    }
}

#[derive(Debug, Deserialize)]
struct RawSize {
    #[serde(alias = "x")]
    w: f64,
    #[serde(alias = "y")]
    h: f64,
}

impl From<RawSize> for Size {
    fn from(raw: RawSize) -> Self {
        Self::new(raw.w, raw.h)
    }
}

#[derive(Debug, Deserialize)]
struct RawSingle {
    name: String,
    pos: Point,
    size: RawSize,
    #[serde(alias = "packet")]
    address: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawGrid {
    name: String,
    pos: Point,
    size: RawSize,
    tile: RawSize,
    #[serde(alias = "packet")]
    address: String,
    #[serde(default, alias = "invy")]
    invert_rows: bool,
    #[serde(default, alias = "invx")]
    invert_cols: bool,
}

/// Reads a layout description from a `.json` or `.json5` file.
pub fn parse_layout_file(path: &Path) -> Result<ParsedLayout> {
    let content = fs::read_to_string(path)
        .context(format!("Failed to read layout file: {}", path.display()))?;

    parse_layout_str(&content, LayoutFormat::from_path(path))
        .context(format!("Failed to parse layout file: {}", path.display()))
}

/// Parses a layout description from text.
pub fn parse_layout_str(content: &str, format: LayoutFormat) -> Result<ParsedLayout> {
    let document: Value = match format {
        LayoutFormat::Json => serde_json::from_str(content).context("Invalid JSON")?,
        LayoutFormat::Json5 => json5::from_str(content).context("Invalid JSON5")?,
    };

    let records = match document {
        Value::Array(records) => records,
        Value::Object(mut object) => match object.remove("items") {
            Some(Value::Array(records)) => records,
            _ => anyhow::bail!("Layout object must contain an 'items' array"),
        },
        _ => anyhow::bail!("Layout description must be an array of items"),
    };

    Ok(parse_records(records))
}

/// Converts raw records into layout items, collecting warnings for the ones
/// that are skipped.
pub fn parse_records(records: Vec<Value>) -> ParsedLayout {
    let mut parsed = ParsedLayout::default();

    for (index, record) in records.into_iter().enumerate() {
        let name = record
            .get("name")
            .and_then(Value::as_str)
            .map(str::to_string);

        match parse_record(record) {
            Ok(item) => parsed.entries.push(LayoutEntry { index, item }),
            Err(kind) => {
                let warning = LayoutWarning::new(index, name, kind);
                tracing::warn!("Skipping layout {}", warning);
                parsed.warnings.push(warning);
            }
        }
    }

    parsed
}

fn parse_record(record: Value) -> Result<LayoutItem, LayoutWarningKind> {
    let kind = record
        .get("kind")
        .or_else(|| record.get("type"))
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    match kind.as_str() {
        "single" | "tile" => {
            let raw: RawSingle = deserialize(record)?;
            Ok(LayoutItem::SingleBit(SingleBit {
                name: raw.name,
                pos: raw.pos,
                size: raw.size.into(),
                address: parse_address(&raw.address)?,
            }))
        }
        "grid" => {
            let raw: RawGrid = deserialize(record)?;
            Ok(LayoutItem::BitGrid(BitGrid {
                name: raw.name,
                pos: raw.pos,
                size: raw.size.into(),
                tile: raw.tile.into(),
                address: parse_address(&raw.address)?,
                invert_rows: raw.invert_rows,
                invert_cols: raw.invert_cols,
            }))
        }
        _ => Err(LayoutWarningKind::UnknownKind { kind }),
    }
}

fn deserialize<T: serde::de::DeserializeOwned>(record: Value) -> Result<T, LayoutWarningKind> {
    serde_json::from_value(record).map_err(|e| LayoutWarningKind::MalformedItem {
        reason: e.to_string(),
    })
}

fn parse_address(address: &str) -> Result<BitAddress, LayoutWarningKind> {
    address
        .parse()
        .map_err(|_| LayoutWarningKind::InvalidAddress {
            address: address.to_string(),
        })
}
