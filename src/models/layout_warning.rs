//! Non-fatal problems found while reading or building a layout.

use serde::Serialize;
use std::fmt;

/// What went wrong with a layout entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LayoutWarningKind {
    /// The record's kind tag is not a known item type
    UnknownKind {
        /// The tag as written, or empty if missing
        kind: String,
    },
    /// The record is missing fields or has fields of the wrong type
    MalformedItem {
        /// Deserializer message
        reason: String,
    },
    /// The `address` field is not a valid `byte:bit` string
    InvalidAddress {
        /// The address as written
        address: String,
    },
    /// The tile does not evenly divide the grid; partial cells were dropped
    TruncatedGrid {
        /// Whole columns kept
        cols: u32,
        /// Whole rows kept
        rows: u32,
    },
    /// The grid has no whole cells (zero or negative tile or grid size)
    EmptyGrid,
    /// The grid has more cells than a layout may register
    GridTooLarge {
        /// Whole cells the grid would have
        cells: u64,
        /// Largest accepted cell count
        limit: u64,
    },
    /// Bit addresses ran past the last byte; the remaining cells were dropped
    AddressOverflow {
        /// Cells registered before the address space ran out
        registered: u64,
    },
}

/// A configuration warning tied to one entry of the layout description.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutWarning {
    /// Index of the record in the layout description
    pub item_index: usize,
    /// Declared name of the record, if it had one
    pub item_name: Option<String>,
    /// The problem
    pub kind: LayoutWarningKind,
}

impl LayoutWarning {
    /// Creates a new `LayoutWarning`.
    pub fn new(item_index: usize, item_name: Option<String>, kind: LayoutWarningKind) -> Self {
        Self {
            item_index,
            item_name,
            kind,
        }
    }

    /// Returns true if the item was dropped entirely.
    #[must_use]
    pub const fn is_skipped(&self) -> bool {
        !matches!(
            self.kind,
            LayoutWarningKind::TruncatedGrid { .. } | LayoutWarningKind::AddressOverflow { .. }
        )
    }
}

impl fmt::Display for LayoutWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.item_name.as_deref().unwrap_or("<unnamed>");
        write!(f, "item {} ({}): ", self.item_index, name)?;
        match &self.kind {
            LayoutWarningKind::UnknownKind { kind } if kind.is_empty() => {
                write!(f, "missing item kind, skipped")
            }
            LayoutWarningKind::UnknownKind { kind } => {
                write!(f, "unknown item kind '{}', skipped", kind)
            }
            LayoutWarningKind::MalformedItem { reason } => {
                write!(f, "malformed item, skipped: {}", reason)
            }
            LayoutWarningKind::InvalidAddress { address } => {
                write!(f, "invalid bit address '{}', skipped", address)
            }
            LayoutWarningKind::TruncatedGrid { cols, rows } => write!(
                f,
                "tile size does not divide grid size, truncated to {}x{} cells",
                cols, rows
            ),
            LayoutWarningKind::EmptyGrid => write!(f, "grid has no whole cells, skipped"),
            LayoutWarningKind::GridTooLarge { cells, limit } => write!(
                f,
                "grid has {} cells, more than the limit of {}, skipped",
                cells, limit
            ),
            LayoutWarningKind::AddressOverflow { registered } => write!(
                f,
                "bit addresses run past the last byte, truncated to {} cells",
                registered
            ),
        }
    }
}
