//! Packets emitted by the stream packetizer.

use crate::models::bit_address::{BitPosition, BITS_PER_BYTE};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// An ordered, immutable sequence of bytes forming one frame.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawPacket(Vec<u8>);

impl RawPacket {
    /// Wraps a byte vector as a packet.
    #[must_use]
    pub const fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// Parses a text packet of comma-separated decimal byte values, e.g. `"1, 2, 255"`.
    ///
    /// This is how socket transports deliver already-framed packets.
    pub fn from_text(text: &str) -> Result<Self> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Ok(Self::default());
        }

        trimmed
            .split(',')
            .enumerate()
            .map(|(idx, value)| {
                value.trim().parse::<u8>().with_context(|| {
                    format!("Invalid byte value '{}' at index {}", value.trim(), idx)
                })
            })
            .collect::<Result<Vec<_>>>()
            .map(Self)
    }

    /// The packet bytes.
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.0
    }

    /// Number of bytes in the packet.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the packet has no bytes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Every bit of the packet as `(position, value)`, byte by byte, bit 0 first.
    pub fn bits(&self) -> impl Iterator<Item = (BitPosition, bool)> + '_ {
        self.0.iter().enumerate().flat_map(|(byte_idx, &byte)| {
            (0..BITS_PER_BYTE).map(move |bit| {
                (
                    BitPosition::from_parts(byte_idx, bit),
                    (byte >> bit) & 0x01 == 1,
                )
            })
        })
    }
}

impl From<Vec<u8>> for RawPacket {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl From<&[u8]> for RawPacket {
    fn from(bytes: &[u8]) -> Self {
        Self(bytes.to_vec())
    }
}
