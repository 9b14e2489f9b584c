//! Monitoring session: layout, bit state and packetizer wired together.
//!
//! The packetizer emits a packet, the packet's bits update the state store,
//! and renderers query regions and state through the same session. All calls
//! happen on one logical task, so nothing here is locked.

use anyhow::Result;
use serde::Serialize;
use std::path::Path;
use std::time::Duration;

use crate::models::{BitAddress, BitPosition, LayoutWarning, Point, RawPacket, Rect, Region};
use crate::parser;
use crate::services::bit_state::BitStateStore;
use crate::services::layout_engine::{LayoutBuild, LayoutEngine};
use crate::services::packetizer::{FramingStats, Packetizer, PacketizerConfig};
use crate::services::region_index::{RegionHandle, RegionIndex};

/// Everything a tooltip needs about the region under a point.
#[derive(Debug, Clone, Serialize)]
pub struct HitInfo<'a> {
    /// Owning bit position
    pub position: BitPosition,
    /// Owning bit as `byte:bit`
    pub address: BitAddress,
    /// Region handle
    #[serde(skip)]
    pub handle: RegionHandle,
    /// The region under the point
    pub region: &'a Region,
    /// Current state of the owning bit
    pub active: bool,
}

/// A layout being driven by a live packet stream.
#[derive(Debug, Clone)]
pub struct Session {
    index: RegionIndex,
    states: BitStateStore,
    packetizer: Packetizer,
    warnings: Vec<LayoutWarning>,
    packets_applied: u64,
}

impl Session {
    /// Creates a session for a built layout.
    pub fn new(build: LayoutBuild, config: PacketizerConfig) -> Result<Self> {
        let states = BitStateStore::for_index(&build.index);
        Ok(Self {
            index: build.index,
            states,
            packetizer: Packetizer::new(config)?,
            warnings: build.warnings,
            packets_applied: 0,
        })
    }

    /// Reads a layout description and creates a session for it.
    pub fn load(layout_path: &Path, config: PacketizerConfig) -> Result<Self> {
        let parsed = parser::parse_layout_file(layout_path)?;
        Self::new(LayoutEngine::build_parsed(&parsed), config)
    }

    /// Feeds one byte; if it closes a packet, the packet is decoded into the
    /// bit state and returned.
    pub fn feed_byte(&mut self, byte: u8, at: Duration) -> Option<RawPacket> {
        let packet = self.packetizer.feed_byte(byte, at)?;
        self.apply_packet(&packet);
        Some(packet)
    }

    /// Feeds a chunk of bytes that arrived together.
    pub fn feed(&mut self, bytes: &[u8], at: Duration) -> Vec<RawPacket> {
        bytes
            .iter()
            .filter_map(|&byte| self.feed_byte(byte, at))
            .collect()
    }

    /// Decodes an already framed packet into the bit state.
    pub fn apply_packet(&mut self, packet: &RawPacket) -> usize {
        self.packets_applied += 1;
        self.states.decode_packet(packet)
    }

    /// Turns every bit off.
    pub fn clear(&mut self) {
        self.states.clear();
    }

    /// Ends the byte stream; returns how many buffered bytes were discarded.
    pub fn finish(&mut self) -> usize {
        self.packetizer.finish()
    }

    /// Whether a bit is on.
    #[must_use]
    pub fn is_active(&self, position: BitPosition) -> bool {
        self.states.is_active(position)
    }

    /// Regions of a bit position.
    #[must_use]
    pub fn regions_for(&self, position: BitPosition) -> Vec<&Region> {
        self.index.regions_for(position)
    }

    /// Regions of a bit address, used to highlight a bit picked elsewhere.
    #[must_use]
    pub fn regions_for_address(&self, address: BitAddress) -> Vec<&Region> {
        self.index.regions_for(address.position())
    }

    /// Region under `point` with its bit and state.
    #[must_use]
    pub fn hit_test(&self, point: Point) -> Option<HitInfo<'_>> {
        self.index.hit_test(point).map(|hit| HitInfo {
            position: hit.position,
            address: hit.position.address(),
            handle: hit.handle,
            region: hit.region,
            active: self.states.is_active(hit.position),
        })
    }

    /// Layout bounding box.
    #[must_use]
    pub fn bounds(&self) -> Rect {
        self.index.bounds()
    }

    /// Regions whose bit is currently on, in registration order.
    pub fn active_regions(&self) -> impl Iterator<Item = (BitPosition, &Region)> + '_ {
        self.index
            .iter()
            .filter(|(_, position, _)| self.states.is_active(*position))
            .map(|(_, position, region)| (position, region))
    }

    /// The region index.
    #[must_use]
    pub const fn index(&self) -> &RegionIndex {
        &self.index
    }

    /// The bit state store.
    #[must_use]
    pub const fn states(&self) -> &BitStateStore {
        &self.states
    }

    /// Warnings produced while building the layout.
    #[must_use]
    pub fn warnings(&self) -> &[LayoutWarning] {
        &self.warnings
    }

    /// Framing counters of the packetizer.
    #[must_use]
    pub const fn framing_stats(&self) -> FramingStats {
        self.packetizer.stats()
    }

    /// Packets decoded so far, framed or pre-framed.
    #[must_use]
    pub const fn packets_applied(&self) -> u64 {
        self.packets_applied
    }
}
