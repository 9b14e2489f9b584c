//! Region index and hit testing.

use std::collections::BTreeMap;

use crate::models::{BitPosition, LayoutBounds, Point, Rect, Region};

/// Stable handle to a region inside a [`RegionIndex`].
///
/// Handles are registration order: a larger handle was declared later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RegionHandle(usize);

impl RegionHandle {
    /// Registration order of the region (0-based).
    #[must_use]
    pub const fn ordinal(self) -> usize {
        self.0
    }
}

/// Result of a successful hit test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegionHit<'a> {
    /// Bit that owns the region
    pub position: BitPosition,
    /// Handle of the region
    pub handle: RegionHandle,
    /// The region itself
    pub region: &'a Region,
}

#[derive(Debug, Clone)]
struct RegionSlot {
    position: BitPosition,
    region: Region,
}

/// Owned arena of regions indexed by bit position.
///
/// # Structure
///
/// - `arena` holds every region in registration order
/// - `by_position` maps a bit position to the arena indices of its regions
/// - `bounds` covers every region and is fixed once construction finishes
///
/// One bit position may own many regions; a region belongs to exactly one
/// bit position.
#[derive(Debug, Clone, Default)]
pub struct RegionIndex {
    arena: Vec<RegionSlot>,
    by_position: BTreeMap<BitPosition, Vec<usize>>,
    bounds: LayoutBounds,
}

impl RegionIndex {
    /// Creates an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a region owned by `position` and grows the bounds to cover it.
    pub(crate) fn register(&mut self, position: BitPosition, region: Region) -> RegionHandle {
        let handle = RegionHandle(self.arena.len());
        self.bounds.expand(&region.bounds);
        self.by_position
            .entry(position)
            .or_default()
            .push(handle.0);
        self.arena.push(RegionSlot { position, region });
        handle
    }

    /// All regions of a bit position in registration order; empty if undeclared.
    #[must_use]
    pub fn regions_for(&self, position: BitPosition) -> Vec<&Region> {
        self.by_position
            .get(&position)
            .map(|indices| indices.iter().map(|&i| &self.arena[i].region).collect())
            .unwrap_or_default()
    }

    /// Handles of all regions of a bit position in registration order.
    #[must_use]
    pub fn handles_for(&self, position: BitPosition) -> Vec<RegionHandle> {
        self.by_position
            .get(&position)
            .map(|indices| indices.iter().copied().map(RegionHandle).collect())
            .unwrap_or_default()
    }

    /// Finds the region under `point`.
    ///
    /// When regions overlap, the one registered last wins.
    #[must_use]
    pub fn hit_test(&self, point: Point) -> Option<RegionHit<'_>> {
        self.arena
            .iter()
            .enumerate()
            .rev()
            .find(|(_, slot)| slot.region.bounds.contains(point))
            .map(|(i, slot)| RegionHit {
                position: slot.position,
                handle: RegionHandle(i),
                region: &slot.region,
            })
    }

    /// Looks up a region by handle.
    #[must_use]
    pub fn region(&self, handle: RegionHandle) -> Option<&Region> {
        self.arena.get(handle.0).map(|slot| &slot.region)
    }

    /// Bit position owning the region behind `handle`.
    #[must_use]
    pub fn position_of(&self, handle: RegionHandle) -> Option<BitPosition> {
        self.arena.get(handle.0).map(|slot| slot.position)
    }

    /// Returns true if at least one region is declared for `position`.
    #[must_use]
    pub fn is_declared(&self, position: BitPosition) -> bool {
        self.by_position.contains_key(&position)
    }

    /// Declared bit positions in ascending order.
    pub fn positions(&self) -> impl Iterator<Item = BitPosition> + '_ {
        self.by_position.keys().copied()
    }

    /// Every region with its owner, in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (RegionHandle, BitPosition, &Region)> + '_ {
        self.arena
            .iter()
            .enumerate()
            .map(|(i, slot)| (RegionHandle(i), slot.position, &slot.region))
    }

    /// Number of declared bit positions.
    #[must_use]
    pub fn position_count(&self) -> usize {
        self.by_position.len()
    }

    /// Number of registered regions.
    #[must_use]
    pub fn region_count(&self) -> usize {
        self.arena.len()
    }

    /// Returns true if no region is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Smallest rectangle covering every region.
    #[must_use]
    pub fn bounds(&self) -> Rect {
        self.bounds.rect()
    }
}
