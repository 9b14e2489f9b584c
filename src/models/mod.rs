//! Data models for bit addresses, layout items, geometry and packets.
//!
//! Models are plain data and are independent of the engines in `services`.

pub mod bit_address;
pub mod layout_item;
pub mod layout_warning;
pub mod packet;
pub mod region;

// Re-export all model types
pub use bit_address::{BitAddress, BitPosition, BITS_PER_BYTE};
pub use layout_item::{BitGrid, LayoutItem, SingleBit, Size};
pub use layout_warning::{LayoutWarning, LayoutWarningKind};
pub use packet::RawPacket;
pub use region::{LayoutBounds, Point, Rect, Region};
