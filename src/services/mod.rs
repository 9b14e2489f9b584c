//! Service layer: the layout engine, region index, bit state and packetizer.
//!
//! This module contains the engines that turn a layout description and a
//! byte stream into queryable bit state and geometry.

pub mod bit_state;
pub mod layout_engine;
pub mod packet_view;
pub mod packetizer;
pub mod region_index;
pub mod session;

// Re-export commonly used types
pub use bit_state::BitStateStore;
pub use layout_engine::{LayoutBuild, LayoutEngine};
pub use packet_view::{format_packet, PacketView};
pub use packetizer::{FlushReason, FramingStats, Packetizer, PacketizerConfig, PacketizerState};
pub use region_index::{RegionHandle, RegionHit, RegionIndex};
pub use session::{HitInfo, Session};
