//! Stream packetizer: framing without a length header or delimiter.
//!
//! Bytes arrive with monotonic timestamps. A packet ends when either
//!
//! - the buffer reaches `max_len` bytes (a full frame), or
//! - the next byte arrives more than `gap` after the previous one (the old
//!   buffer is flushed and the new byte starts the next frame).
//!
//! If a late byte would also complete a full frame, the size rule wins and the
//! byte joins the current frame. A trailing partial frame that never saw a gap
//! is discarded when the stream ends; [`Packetizer::finish`] reports how many
//! bytes were dropped.
//!
//! Timestamps that go backwards never trigger a timeout, and the last-arrival
//! time only moves forward.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::models::RawPacket;

/// Default bytes per full frame.
pub const DEFAULT_MAX_LEN: usize = 32;

/// Default quiet period that ends a frame.
pub const DEFAULT_GAP: Duration = Duration::from_millis(20);

/// Framing constants supplied by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PacketizerConfig {
    /// Bytes in a full frame (at least 1)
    pub max_len: usize,
    /// Inter-byte gap above which the current frame is closed
    pub gap: Duration,
}

impl PacketizerConfig {
    /// Creates a new `PacketizerConfig`.
    #[must_use]
    pub const fn new(max_len: usize, gap: Duration) -> Self {
        Self { max_len, gap }
    }

    /// Checks the framing constants.
    pub fn validate(&self) -> Result<()> {
        if self.max_len == 0 {
            anyhow::bail!("Packet length must be at least 1 byte");
        }
        Ok(())
    }
}

impl Default for PacketizerConfig {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_LEN, DEFAULT_GAP)
    }
}

/// Whether bytes are currently buffered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PacketizerState {
    /// Buffer empty
    Idle,
    /// Buffer holds a partial frame
    Accumulating,
}

/// Why a packet was emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlushReason {
    /// Buffer reached `max_len`
    Full,
    /// A gap longer than the threshold followed the last byte
    Timeout,
}

/// Counters describing framing decisions so far.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FramingStats {
    /// Packets emitted because the buffer filled up
    pub full_packets: u64,
    /// Packets emitted because of an inter-byte gap
    pub timeout_packets: u64,
    /// Bytes discarded as a trailing partial frame
    pub dropped_bytes: u64,
}

impl FramingStats {
    /// Total packets emitted.
    #[must_use]
    pub const fn packets(&self) -> u64 {
        self.full_packets + self.timeout_packets
    }
}

/// Splits a timestamped byte stream into packets.
#[derive(Debug, Clone)]
pub struct Packetizer {
    config: PacketizerConfig,
    buffer: Vec<u8>,
    last_arrival: Option<Duration>,
    last_flush: Option<FlushReason>,
    stats: FramingStats,
}

impl Packetizer {
    /// Creates a packetizer; fails if the config is invalid.
    pub fn new(config: PacketizerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            buffer: Vec::with_capacity(config.max_len),
            last_arrival: None,
            last_flush: None,
            stats: FramingStats::default(),
        })
    }

    /// Handles one byte arriving at `at`; returns a packet if this arrival
    /// closed one.
    pub fn feed_byte(&mut self, byte: u8, at: Duration) -> Option<RawPacket> {
        let timed_out = match self.last_arrival {
            Some(last) if !self.buffer.is_empty() => at > last && at - last > self.config.gap,
            _ => false,
        };
        self.last_arrival = Some(self.last_arrival.map_or(at, |last| last.max(at)));

        let completes_frame = self.buffer.len() + 1 >= self.config.max_len;
        if timed_out && !completes_frame {
            let packet = self.flush(FlushReason::Timeout);
            self.buffer.push(byte);
            return Some(packet);
        }

        self.buffer.push(byte);
        tracing::trace!("Buffered byte {:#04x} ({} pending)", byte, self.buffer.len());

        if self.buffer.len() >= self.config.max_len {
            return Some(self.flush(FlushReason::Full));
        }

        None
    }

    /// Handles a chunk of bytes that all arrived at `at`.
    pub fn feed(&mut self, bytes: &[u8], at: Duration) -> Vec<RawPacket> {
        bytes
            .iter()
            .filter_map(|&byte| self.feed_byte(byte, at))
            .collect()
    }

    /// Ends the stream, discarding any partial frame; returns the number of
    /// bytes dropped.
    pub fn finish(&mut self) -> usize {
        let dropped = self.buffer.len();
        if dropped > 0 {
            tracing::debug!("Dropping {} trailing bytes of an incomplete frame", dropped);
            self.stats.dropped_bytes += dropped as u64;
            self.buffer.clear();
        }
        self.last_arrival = None;
        dropped
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> PacketizerState {
        if self.buffer.is_empty() {
            PacketizerState::Idle
        } else {
            PacketizerState::Accumulating
        }
    }

    /// Number of buffered bytes not yet emitted.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }

    /// Why the most recent packet was emitted.
    #[must_use]
    pub const fn last_flush(&self) -> Option<FlushReason> {
        self.last_flush
    }

    /// Framing counters.
    #[must_use]
    pub const fn stats(&self) -> FramingStats {
        self.stats
    }

    /// Framing constants in use.
    #[must_use]
    pub const fn config(&self) -> PacketizerConfig {
        self.config
    }

    fn flush(&mut self, reason: FlushReason) -> RawPacket {
        let take = self.buffer.len().min(self.config.max_len);
        let packet: Vec<u8> = self.buffer.drain(..take).collect();

        match reason {
            FlushReason::Full => self.stats.full_packets += 1,
            FlushReason::Timeout => self.stats.timeout_packets += 1,
        }
        self.last_flush = Some(reason);

        tracing::debug!("Emitting {}-byte packet ({:?})", packet.len(), reason);
        RawPacket::new(packet)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    fn packetizer() -> Packetizer {
        Packetizer::new(PacketizerConfig::new(32, ms(20))).unwrap()
    }

    #[test]
    fn test_full_frame_on_last_byte() {
        let mut p = packetizer();
        for i in 0..31u8 {
            assert!(p.feed_byte(i, ms(u64::from(i))).is_none());
        }
        let packet = p.feed_byte(31, ms(31)).unwrap();
        assert_eq!(packet.len(), 32);
        assert_eq!(packet.bytes()[31], 31);
        assert_eq!(p.state(), PacketizerState::Idle);
        assert_eq!(p.last_flush(), Some(FlushReason::Full));
    }

    #[test]
    fn test_gap_flushes_previous_bytes() {
        let mut p = packetizer();
        for i in 0..10u8 {
            assert!(p.feed_byte(i, ms(u64::from(i))).is_none());
        }
        let packet = p.feed_byte(0xAA, ms(9 + 25)).unwrap();
        assert_eq!(packet.bytes(), &[0, 1, 2, 3, 4, 5, 6, 7, 8, 9]);
        assert_eq!(p.pending(), 1);
        assert_eq!(p.state(), PacketizerState::Accumulating);
        assert_eq!(p.stats().timeout_packets, 1);
    }

    #[test]
    fn test_gap_equal_to_threshold_does_not_flush() {
        let mut p = packetizer();
        p.feed_byte(1, ms(0));
        assert!(p.feed_byte(2, ms(20)).is_none());
        assert_eq!(p.pending(), 2);
    }

    #[test]
    fn test_gap_while_idle_does_not_emit_empty_packet() {
        let mut p = packetizer();
        assert!(p.feed_byte(1, ms(0)).is_none());
        assert!(p.feed_byte(2, ms(1000)).is_some());
        // Buffer holds the new byte only
        assert_eq!(p.pending(), 1);

        let mut q = Packetizer::new(PacketizerConfig::new(1, ms(20))).unwrap();
        assert_eq!(q.feed_byte(1, ms(0)).unwrap().bytes(), &[1]);
        assert_eq!(q.feed_byte(2, ms(500)).unwrap().bytes(), &[2]);
        assert_eq!(q.stats().timeout_packets, 0);
    }

    #[test]
    fn test_size_wins_over_timeout() {
        let mut p = Packetizer::new(PacketizerConfig::new(4, ms(20))).unwrap();
        p.feed(&[1, 2, 3], ms(0));
        let packet = p.feed_byte(4, ms(100)).unwrap();
        assert_eq!(packet.bytes(), &[1, 2, 3, 4]);
        assert_eq!(p.last_flush(), Some(FlushReason::Full));
        assert_eq!(p.state(), PacketizerState::Idle);
    }

    #[test]
    fn test_backwards_timestamp_is_tolerated() {
        let mut p = packetizer();
        p.feed_byte(1, ms(100));
        // Out of order: no spurious timeout
        assert!(p.feed_byte(2, ms(10)).is_none());
        // Gap measured from the latest timestamp (100), not 10
        assert!(p.feed_byte(3, ms(115)).is_none());
        assert!(p.feed_byte(4, ms(136)).is_some());
    }

    #[test]
    fn test_feed_chunk_splits_into_frames() {
        let mut p = Packetizer::new(PacketizerConfig::new(4, ms(20))).unwrap();
        let packets = p.feed(&[0, 1, 2, 3, 4, 5, 6, 7, 8], ms(0));
        assert_eq!(packets.len(), 2);
        assert_eq!(packets[1].bytes(), &[4, 5, 6, 7]);
        assert_eq!(p.pending(), 1);
    }

    #[test]
    fn test_finish_drops_partial_frame() {
        let mut p = packetizer();
        p.feed(&[1, 2, 3], ms(0));
        assert_eq!(p.finish(), 3);
        assert_eq!(p.state(), PacketizerState::Idle);
        assert_eq!(p.stats().dropped_bytes, 3);
        assert_eq!(p.stats().packets(), 0);
        assert_eq!(p.finish(), 0);
    }

    #[test]
    fn test_zero_length_rejected() {
        assert!(Packetizer::new(PacketizerConfig::new(0, ms(20))).is_err());
    }
}
