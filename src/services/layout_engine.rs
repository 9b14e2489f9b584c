//! Layout engine: turns layout items into a region index.
//!
//! # Grid Fill Order
//!
//! Grids are filled column-major: every row of a column receives consecutive
//! bit addresses before the next column starts. Each column starts on a fresh
//! byte, so a column never shares a byte with its neighbour even if bits are
//! left unused. `invert_cols` / `invert_rows` only change which cell receives
//! which address; a cell's rectangle is always computed from its unreversed
//! column and row number.

use crate::constants::MAX_GRID_CELLS;
use crate::models::{
    BitAddress, BitGrid, LayoutItem, LayoutWarning, LayoutWarningKind, Rect, Region, SingleBit,
};
use crate::parser::ParsedLayout;
use crate::services::region_index::RegionIndex;

/// A built layout plus everything that was skipped or truncated on the way.
#[derive(Debug, Clone, Default)]
pub struct LayoutBuild {
    /// Region index for the accepted items
    pub index: RegionIndex,
    /// Configuration warnings, ordered by item index
    pub warnings: Vec<LayoutWarning>,
}

/// Builds region indexes from layout items.
pub struct LayoutEngine;

impl LayoutEngine {
    /// Builds a layout from items in declaration order.
    ///
    /// Warning indices refer to positions in `items`.
    pub fn build<'a>(items: impl IntoIterator<Item = &'a LayoutItem>) -> LayoutBuild {
        Self::build_entries(items.into_iter().enumerate())
    }

    /// Builds a layout from a parsed description, carrying over the parser's
    /// warnings for skipped records.
    pub fn build_parsed(parsed: &ParsedLayout) -> LayoutBuild {
        let mut build = Self::build_entries(
            parsed
                .entries
                .iter()
                .map(|entry| (entry.index, &entry.item)),
        );
        build.warnings.extend(parsed.warnings.iter().cloned());
        build.warnings.sort_by_key(|warning| warning.item_index);
        build
    }

    fn build_entries<'a>(entries: impl Iterator<Item = (usize, &'a LayoutItem)>) -> LayoutBuild {
        let mut build = LayoutBuild::default();

        for (item_index, item) in entries {
            match item {
                LayoutItem::SingleBit(bit) => add_single(&mut build.index, bit),
                LayoutItem::BitGrid(grid) => {
                    for warning in add_grid(&mut build.index, item_index, grid) {
                        tracing::warn!("Layout {}", warning);
                        build.warnings.push(warning);
                    }
                }
            }
        }

        tracing::debug!(
            "Built layout: {} regions over {} bit positions, {} warnings",
            build.index.region_count(),
            build.index.position_count(),
            build.warnings.len()
        );

        build
    }
}

fn add_single(index: &mut RegionIndex, bit: &SingleBit) {
    index.register(bit.address.position(), Region::new(bit.rect(), bit.name.clone()));
}

/// Registers every cell of `grid`; returns warnings if the grid was
/// truncated, too large, or had no cells.
fn add_grid(index: &mut RegionIndex, item_index: usize, grid: &BitGrid) -> Vec<LayoutWarning> {
    let cols = grid.cols();
    let rows = grid.rows();
    let warning = |kind| LayoutWarning::new(item_index, Some(grid.name.clone()), kind);

    if cols == 0 || rows == 0 {
        return vec![warning(LayoutWarningKind::EmptyGrid)];
    }

    let cells = u64::from(cols) * u64::from(rows);
    if cells > MAX_GRID_CELLS {
        return vec![warning(LayoutWarningKind::GridTooLarge {
            cells,
            limit: MAX_GRID_CELLS,
        })];
    }

    let mut warnings = Vec::new();
    if grid.is_truncated() {
        warnings.push(warning(LayoutWarningKind::TruncatedGrid { cols, rows }));
    }

    let mut address = Some(grid.address);
    let mut registered = 0u64;
    'columns: for col in traversal(cols, grid.invert_cols) {
        for row in traversal(rows, grid.invert_rows) {
            let Some(current) = address else {
                warnings.push(warning(LayoutWarningKind::AddressOverflow { registered }));
                break 'columns;
            };

            let bounds = Rect::new(
                grid.pos.x + f64::from(col) * grid.tile.w,
                grid.pos.y + f64::from(row) * grid.tile.h,
                grid.tile.w,
                grid.tile.h,
            );
            let name = format!("{} {}/{}", grid.name, col, row);
            index.register(current.position(), Region::new(bounds, name));
            registered += 1;

            address = current.next();
        }

        // Columns never share a byte
        address = address.and_then(BitAddress::align_to_byte);
    }

    warnings
}

fn traversal(count: u32, inverted: bool) -> Vec<u32> {
    if inverted {
        (0..count).rev().collect()
    } else {
        (0..count).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BitPosition, Point, Size};

    fn addr(byte: u32, bit: u8) -> BitPosition {
        BitAddress::new(byte, bit).unwrap().position()
    }

    fn grid(size: Size, tile: Size, invert_rows: bool, invert_cols: bool) -> LayoutItem {
        LayoutItem::BitGrid(BitGrid {
            name: "Grid".to_string(),
            pos: Point::new(0.0, 0.0),
            size,
            tile,
            address: BitAddress::new(0, 0).unwrap(),
            invert_rows,
            invert_cols,
        })
    }

    #[test]
    fn test_single_bit_region() {
        let item = LayoutItem::SingleBit(SingleBit {
            name: "Power".to_string(),
            pos: Point::new(2.0, 3.0),
            size: Size::new(1.0, 2.0),
            address: BitAddress::new(1, 4).unwrap(),
        });

        let build = LayoutEngine::build([&item]);
        let regions = build.index.regions_for(addr(1, 4));
        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].bounds, Rect::new(2.0, 3.0, 1.0, 2.0));
        assert_eq!(regions[0].display_name, "Power");
        assert!(build.warnings.is_empty());
    }

    #[test]
    fn test_grid_column_major_with_byte_per_column() {
        let item = grid(Size::new(4.0, 2.0), Size::new(2.0, 1.0), false, false);
        let build = LayoutEngine::build([&item]);
        let index = &build.index;

        assert_eq!(index.region_count(), 4);
        assert_eq!(index.regions_for(addr(0, 0))[0].bounds, Rect::new(0.0, 0.0, 2.0, 1.0));
        assert_eq!(index.regions_for(addr(0, 1))[0].bounds, Rect::new(0.0, 1.0, 2.0, 1.0));
        assert_eq!(index.regions_for(addr(1, 0))[0].bounds, Rect::new(2.0, 0.0, 2.0, 1.0));
        assert_eq!(index.regions_for(addr(1, 1))[0].bounds, Rect::new(2.0, 1.0, 2.0, 1.0));
        assert!(index.regions_for(addr(0, 2)).is_empty());
        assert_eq!(index.regions_for(addr(1, 1))[0].display_name, "Grid 1/1");
    }

    #[test]
    fn test_invert_cols_swaps_addresses_not_geometry() {
        let plain = LayoutEngine::build([&grid(Size::new(4.0, 2.0), Size::new(2.0, 1.0), false, false)]);
        let inverted = LayoutEngine::build([&grid(Size::new(4.0, 2.0), Size::new(2.0, 1.0), false, true)]);

        // Column 1 now receives byte 0
        assert_eq!(
            inverted.index.regions_for(addr(0, 0))[0].bounds,
            Rect::new(2.0, 0.0, 2.0, 1.0)
        );
        assert_eq!(
            inverted.index.regions_for(addr(1, 0))[0].bounds,
            Rect::new(0.0, 0.0, 2.0, 1.0)
        );

        // Same set of cells in space
        let mut plain_rects: Vec<String> = plain.index.iter().map(|(_, _, r)| format!("{:?}", r.bounds)).collect();
        let mut inverted_rects: Vec<String> = inverted.index.iter().map(|(_, _, r)| format!("{:?}", r.bounds)).collect();
        plain_rects.sort();
        inverted_rects.sort();
        assert_eq!(plain_rects, inverted_rects);
        assert_eq!(plain.index.bounds(), inverted.index.bounds());
    }

    #[test]
    fn test_invert_rows() {
        let build = LayoutEngine::build([&grid(Size::new(1.0, 3.0), Size::new(1.0, 1.0), true, false)]);
        assert_eq!(build.index.regions_for(addr(0, 0))[0].bounds.y, 2.0);
        assert_eq!(build.index.regions_for(addr(0, 2))[0].bounds.y, 0.0);
    }

    #[test]
    fn test_tall_column_spills_into_next_byte() {
        // 10 rows: column 0 uses 0:0..1:1, column 1 starts at 2:0
        let build = LayoutEngine::build([&grid(Size::new(2.0, 10.0), Size::new(1.0, 1.0), false, false)]);
        let index = &build.index;
        assert_eq!(index.regions_for(addr(1, 1))[0].display_name, "Grid 0/9");
        assert!(index.regions_for(addr(1, 2)).is_empty());
        assert_eq!(index.regions_for(addr(2, 0))[0].display_name, "Grid 1/0");
        assert_eq!(index.regions_for(addr(3, 1))[0].display_name, "Grid 1/9");
    }

    #[test]
    fn test_truncated_grid_warns_but_builds() {
        let build = LayoutEngine::build([&grid(Size::new(5.0, 2.0), Size::new(2.0, 1.0), false, false)]);
        assert_eq!(build.index.region_count(), 4);
        assert_eq!(build.warnings.len(), 1);
        assert_eq!(
            build.warnings[0].kind,
            LayoutWarningKind::TruncatedGrid { cols: 2, rows: 2 }
        );
    }

    #[test]
    fn test_empty_grid_is_skipped() {
        let build = LayoutEngine::build([&grid(Size::new(4.0, 2.0), Size::new(0.0, 1.0), false, false)]);
        assert!(build.index.is_empty());
        assert_eq!(build.warnings[0].kind, LayoutWarningKind::EmptyGrid);
    }

    #[test]
    fn test_grid_at_last_byte_stops_at_address_space_end() {
        let mut item = grid(Size::new(1.0, 4.0), Size::new(1.0, 1.0), false, false);
        if let LayoutItem::BitGrid(g) = &mut item {
            g.address = BitAddress::new(u32::MAX, 6).unwrap();
        }

        let build = LayoutEngine::build([&item]);
        assert_eq!(build.index.region_count(), 2);
        assert_eq!(build.index.regions_for(addr(u32::MAX, 7))[0].display_name, "Grid 0/1");
        assert_eq!(build.warnings.len(), 1);
        assert_eq!(
            build.warnings[0].kind,
            LayoutWarningKind::AddressOverflow { registered: 2 }
        );
    }

    #[test]
    fn test_grid_overflow_only_when_a_cell_lacks_an_address() {
        let mut item = grid(Size::new(2.0, 1.0), Size::new(1.0, 1.0), false, false);
        if let LayoutItem::BitGrid(g) = &mut item {
            g.address = BitAddress::new(u32::MAX, 0).unwrap();
        }

        // Column 1 needs a byte after the last one
        let build = LayoutEngine::build([&item]);
        assert_eq!(build.index.region_count(), 1);
        assert_eq!(
            build.warnings[0].kind,
            LayoutWarningKind::AddressOverflow { registered: 1 }
        );

        let mut single_cell = grid(Size::new(1.0, 8.0), Size::new(1.0, 1.0), false, false);
        if let LayoutItem::BitGrid(g) = &mut single_cell {
            g.address = BitAddress::new(u32::MAX, 0).unwrap();
        }
        let build = LayoutEngine::build([&single_cell]);
        assert_eq!(build.index.region_count(), 8);
        assert!(build.warnings.is_empty());
    }

    #[test]
    fn test_oversized_grid_is_skipped() {
        let build = LayoutEngine::build([&grid(
            Size::new(1e6, 1e6),
            Size::new(1.0, 1.0),
            false,
            false,
        )]);
        assert!(build.index.is_empty());
        assert_eq!(
            build.warnings[0].kind,
            LayoutWarningKind::GridTooLarge {
                cells: 1_000_000_000_000,
                limit: MAX_GRID_CELLS,
            }
        );
        assert!(build.warnings[0].is_skipped());
    }
}
