//! Declared layout entries.

use crate::models::bit_address::BitAddress;
use crate::models::region::{Point, Rect};
use serde::{Deserialize, Serialize};

/// Width and height in layout units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    /// Width
    pub w: f64,
    /// Height
    pub h: f64,
}

impl Size {
    /// Creates a new `Size`.
    #[must_use]
    pub const fn new(w: f64, h: f64) -> Self {
        Self { w, h }
    }
}

/// One explicitly placed bit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SingleBit {
    /// Display name, used verbatim for the region
    pub name: String,
    /// Lower-left corner
    pub pos: Point,
    /// Region size
    pub size: Size,
    /// Bit driving this region
    pub address: BitAddress,
}

impl SingleBit {
    /// Rectangle covered by this bit.
    #[must_use]
    pub const fn rect(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, self.size.w, self.size.h)
    }
}

/// A repeated 2-D grid of bits filled column by column.
///
/// # Cell Count
///
/// `cols = floor(size.w / tile.w)` and `rows = floor(size.h / tile.h)`. A tile
/// that does not evenly divide the grid truncates the partial column or row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BitGrid {
    /// Display name prefix; cells are named `"<name> <col>/<row>"`
    pub name: String,
    /// Lower-left corner of cell (0, 0)
    pub pos: Point,
    /// Total grid size
    pub size: Size,
    /// Size of one cell
    pub tile: Size,
    /// First bit address (assigned to the first visited cell)
    pub address: BitAddress,
    /// Visit rows from last to first
    #[serde(default)]
    pub invert_rows: bool,
    /// Visit columns from last to first
    #[serde(default)]
    pub invert_cols: bool,
}

impl BitGrid {
    /// Number of whole columns that fit in the grid.
    #[must_use]
    pub fn cols(&self) -> u32 {
        whole_cells(self.size.w, self.tile.w)
    }

    /// Number of whole rows that fit in the grid.
    #[must_use]
    pub fn rows(&self) -> u32 {
        whole_cells(self.size.h, self.tile.h)
    }

    /// Returns true if the tile size leaves a remainder on either axis.
    #[must_use]
    pub fn is_truncated(&self) -> bool {
        let covered_w = f64::from(self.cols()) * self.tile.w;
        let covered_h = f64::from(self.rows()) * self.tile.h;
        covered_w < self.size.w || covered_h < self.size.h
    }
}

fn whole_cells(total: f64, tile: f64) -> u32 {
    if tile <= 0.0 || total <= 0.0 {
        return 0;
    }
    (total / tile).floor() as u32
}

/// One entry of a layout description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum LayoutItem {
    /// A single explicitly placed bit
    #[serde(rename = "single")]
    SingleBit(SingleBit),
    /// A grid of bits
    #[serde(rename = "grid")]
    BitGrid(BitGrid),
}

impl LayoutItem {
    /// Declared name of the item.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::SingleBit(bit) => &bit.name,
            Self::BitGrid(grid) => &grid.name,
        }
    }
}
