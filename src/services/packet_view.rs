//! Packet explorer view: hex and bit dump of a raw packet.
//!
//! Bytes are laid out in rows of [`BYTES_PER_ROW`], each row prefixed by its
//! byte offset. Bits are printed most significant first, so the character at
//! index `c` of byte `b` is bit position `8 * b + (7 - c)`.

use serde::Serialize;
use std::fmt::Write;

use crate::models::{BitPosition, RawPacket, BITS_PER_BYTE};

/// Bytes shown per row.
pub const BYTES_PER_ROW: usize = 4;

/// One byte of a packet as shown in the explorer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ByteView {
    /// Byte offset in the packet
    pub index: usize,
    /// Upper-case two-digit hex
    pub hex: String,
    /// Eight characters, most significant bit first
    pub bits: String,
    /// Bit positions that are set in this byte, ascending
    pub active: Vec<BitPosition>,
}

/// Serializable explorer view of a packet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PacketView {
    /// Packet length in bytes
    pub len: usize,
    /// Every byte in order
    pub bytes: Vec<ByteView>,
}

impl PacketView {
    /// Builds the view for `packet`.
    #[must_use]
    pub fn new(packet: &RawPacket) -> Self {
        let bytes = packet
            .bytes()
            .iter()
            .enumerate()
            .map(|(index, &byte)| ByteView {
                index,
                hex: format!("{:02X}", byte),
                bits: format!("{:08b}", byte),
                active: (0..BITS_PER_BYTE)
                    .filter(|&bit| (byte >> bit) & 0x01 == 1)
                    .map(|bit| BitPosition::from_parts(index, bit))
                    .collect(),
            })
            .collect();

        Self {
            len: packet.len(),
            bytes,
        }
    }
}

/// Bit position under character `char_index` of byte `byte_index`'s bit string.
///
/// Returns `None` if `char_index` is past the eighth character.
#[must_use]
pub fn bit_position_at(byte_index: usize, char_index: usize) -> Option<BitPosition> {
    let last = usize::from(BITS_PER_BYTE) - 1;
    (char_index <= last).then(|| BitPosition::from_parts(byte_index, (last - char_index) as u8))
}

/// Renders `packet` as text rows: `0x00  05 00000101  FF 11111111 ...`.
#[must_use]
pub fn format_packet(packet: &RawPacket) -> String {
    let mut output = String::new();

    for (row, chunk) in packet.bytes().chunks(BYTES_PER_ROW).enumerate() {
        let _ = write!(output, "0x{:02x}", row * BYTES_PER_ROW);
        for byte in chunk {
            let _ = write!(output, "  {:02X} {:08b}", byte, byte);
        }
        output.push('\n');
    }

    output
}
