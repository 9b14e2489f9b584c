//! Bit addressing inside a packet.

use anyhow::{Context, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of bits carried by one packet byte.
pub const BITS_PER_BYTE: u8 = 8;

/// A declared bit address, written as `"byte:bit"` in layout files.
///
/// # Validation
///
/// - `bit` must be in `0..=7`
/// - `byte` is any non-negative index into the packet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BitAddress {
    /// Byte offset inside the packet
    pub byte: u32,
    /// Bit index inside the byte (0 = least significant)
    pub bit: u8,
}

impl BitAddress {
    /// Creates a new `BitAddress`.
    ///
    /// Returns `None` if `bit` is not a valid bit index.
    #[must_use]
    pub const fn new(byte: u32, bit: u8) -> Option<Self> {
        if bit < BITS_PER_BYTE {
            Some(Self { byte, bit })
        } else {
            None
        }
    }

    /// Canonical position of this address: `8 * byte + bit`.
    #[must_use]
    pub const fn position(self) -> BitPosition {
        BitPosition(self.byte as u64 * BITS_PER_BYTE as u64 + self.bit as u64)
    }

    /// Returns the address that follows this one, carrying into the next byte
    /// after bit 7.
    ///
    /// Returns `None` past the last bit of the last addressable byte.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        if self.bit + 1 < BITS_PER_BYTE {
            return Some(Self {
                byte: self.byte,
                bit: self.bit + 1,
            });
        }
        match self.byte.checked_add(1) {
            Some(byte) => Some(Self { byte, bit: 0 }),
            None => None,
        }
    }

    /// Moves to bit 0 of the next byte unless already on a byte boundary.
    ///
    /// Returns `None` if there is no next byte.
    #[must_use]
    pub const fn align_to_byte(self) -> Option<Self> {
        if self.bit == 0 {
            return Some(self);
        }
        match self.byte.checked_add(1) {
            Some(byte) => Some(Self { byte, bit: 0 }),
            None => None,
        }
    }
}

impl fmt::Display for BitAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.byte, self.bit)
    }
}

impl FromStr for BitAddress {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let address_regex = Regex::new(r"^\s*(\d+)\s*:\s*(\d+)\s*$")
            .context("Failed to compile bit address pattern")?;

        let captures = address_regex
            .captures(s)
            .with_context(|| format!("Invalid bit address '{}': expected 'byte:bit'", s))?;

        let byte: u32 = captures[1]
            .parse()
            .with_context(|| format!("Byte index out of range in '{}'", s))?;
        let bit: u8 = captures[2]
            .parse()
            .with_context(|| format!("Bit index out of range in '{}'", s))?;

        Self::new(byte, bit)
            .with_context(|| format!("Bit index {} in '{}' must be between 0 and 7", bit, s))
    }
}

/// Canonical bit key: `8 * byte + bit`.
///
/// Positions form a total order but need not be contiguous; undeclared
/// positions are simply absent from the layout index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BitPosition(pub u64);

impl BitPosition {
    /// Builds a position from a byte offset and bit index without validation.
    #[must_use]
    pub const fn from_parts(byte: usize, bit: u8) -> Self {
        Self(byte as u64 * BITS_PER_BYTE as u64 + bit as u64)
    }

    /// Splits the position back into its `(byte, bit)` address.
    #[must_use]
    pub const fn address(self) -> BitAddress {
        BitAddress {
            byte: (self.0 / BITS_PER_BYTE as u64) as u32,
            bit: (self.0 % BITS_PER_BYTE as u64) as u8,
        }
    }
}

impl fmt::Display for BitPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<BitAddress> for BitPosition {
    fn from(address: BitAddress) -> Self {
        address.position()
    }
}
