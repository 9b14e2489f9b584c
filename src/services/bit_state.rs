//! Current on/off state of every declared bit.

use std::collections::BTreeMap;

use crate::models::{BitPosition, RawPacket};
use crate::services::region_index::RegionIndex;

/// On/off state per declared bit position.
///
/// Entries exist only for positions declared by the layout and live as long as
/// the layout. Updates to undeclared positions are ignored; packets routinely
/// carry bits no region displays.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BitStateStore {
    states: BTreeMap<BitPosition, bool>,
}

impl BitStateStore {
    /// Creates a store with every position declared in `index` set to off.
    #[must_use]
    pub fn for_index(index: &RegionIndex) -> Self {
        Self::with_positions(index.positions())
    }

    /// Creates a store for an explicit set of positions, all off.
    pub fn with_positions(positions: impl IntoIterator<Item = BitPosition>) -> Self {
        Self {
            states: positions.into_iter().map(|position| (position, false)).collect(),
        }
    }

    /// Sets one bit; returns true if the position is declared.
    pub fn update(&mut self, position: BitPosition, active: bool) -> bool {
        match self.states.get_mut(&position) {
            Some(state) => {
                *state = active;
                true
            }
            None => false,
        }
    }

    /// Applies every bit of `packet`; returns how many declared bits it touched.
    pub fn decode_packet(&mut self, packet: &RawPacket) -> usize {
        packet
            .bits()
            .filter(|&(position, active)| self.update(position, active))
            .count()
    }

    /// Turns every declared bit off.
    pub fn clear(&mut self) {
        for state in self.states.values_mut() {
            *state = false;
        }
    }

    /// State of a bit; undeclared positions read as off.
    #[must_use]
    pub fn is_active(&self, position: BitPosition) -> bool {
        self.states.get(&position).copied().unwrap_or(false)
    }

    /// Declared positions that are currently on, ascending.
    pub fn active_positions(&self) -> impl Iterator<Item = BitPosition> + '_ {
        self.states
            .iter()
            .filter(|(_, &active)| active)
            .map(|(&position, _)| position)
    }

    /// Number of declared positions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Returns true if no position is declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> BitStateStore {
        BitStateStore::with_positions((0..8).map(BitPosition))
    }

    #[test]
    fn test_decode_packet_sets_declared_bits() {
        let mut store = store();
        let touched = store.decode_packet(&RawPacket::new(vec![0b0000_0101]));

        assert_eq!(touched, 8);
        assert!(store.is_active(BitPosition(0)));
        assert!(store.is_active(BitPosition(2)));
        for off in [1, 3, 4, 5, 6, 7] {
            assert!(!store.is_active(BitPosition(off)));
        }
    }

    #[test]
    fn test_update_ignores_undeclared() {
        let mut store = store();
        assert!(!store.update(BitPosition(42), true));
        assert!(!store.is_active(BitPosition(42)));
        assert_eq!(store.len(), 8);
    }

    #[test]
    fn test_decode_ignores_extra_bytes() {
        let mut store = store();
        let touched = store.decode_packet(&RawPacket::new(vec![0xFF, 0xFF, 0xFF]));
        assert_eq!(touched, 8);
        assert_eq!(store.active_positions().count(), 8);
    }

    #[test]
    fn test_short_packet_leaves_later_bits_untouched() {
        let mut store = BitStateStore::with_positions([BitPosition(0), BitPosition(9)]);
        store.update(BitPosition(9), true);
        store.decode_packet(&RawPacket::new(vec![0x00]));
        assert!(store.is_active(BitPosition(9)));
    }

    #[test]
    fn test_clear_is_idempotent() {
        let mut store = store();
        store.decode_packet(&RawPacket::new(vec![0xAA]));
        store.clear();
        let once = store.clone();
        store.clear();
        assert_eq!(store, once);
        assert_eq!(store.active_positions().count(), 0);
    }
}
