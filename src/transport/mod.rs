//! Byte transports feeding a [`Session`].
//!
//! The transport owns the connection (stdin, a capture file or a TCP socket)
//! and hands every received chunk to the session with the chunk's arrival
//! time. Framing is entirely the packetizer's job; this module does not know
//! where packet boundaries are.
//!
//! Text sockets are the exception: they deliver one packet per line as
//! comma-separated decimal bytes, which bypass the packetizer.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use serde::Serialize;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncRead, AsyncReadExt};
use tracing::{debug, info, warn};

use crate::models::RawPacket;
use crate::services::Session;

/// Size of one read from the transport.
const READ_CHUNK: usize = 1024;

/// Source of arrival timestamps, measured from an arbitrary fixed start.
pub trait Clock {
    /// Time elapsed since the clock's start.
    fn now(&self) -> Duration;
}

/// Wall-clock-independent clock backed by [`Instant`].
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    start: Instant,
}

impl MonotonicClock {
    /// Starts a clock at the current instant.
    #[must_use]
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> Duration {
        self.start.elapsed()
    }
}

/// Where bytes come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ByteSource {
    /// Standard input (e.g. piped from a serial device)
    Stdin,
    /// A capture file read to the end
    File(PathBuf),
    /// A raw TCP byte stream
    Tcp(String),
}

impl std::fmt::Display for ByteSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Stdin => write!(f, "stdin"),
            Self::File(path) => write!(f, "file {}", path.display()),
            Self::Tcp(addr) => write!(f, "tcp {}", addr),
        }
    }
}

/// Totals for one transport run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PumpSummary {
    /// Bytes or lines received
    pub received: u64,
    /// Packets decoded
    pub packets: u64,
    /// Trailing bytes discarded as an incomplete frame
    pub dropped_bytes: u64,
}

/// Opens a byte source for reading.
pub async fn open(source: &ByteSource) -> Result<Box<dyn AsyncRead + Unpin + Send>> {
    let reader: Box<dyn AsyncRead + Unpin + Send> = match source {
        ByteSource::Stdin => Box::new(tokio::io::stdin()),
        ByteSource::File(path) => Box::new(
            tokio::fs::File::open(path)
                .await
                .with_context(|| format!("Failed to open capture file: {}", path.display()))?,
        ),
        ByteSource::Tcp(addr) => Box::new(
            tokio::net::TcpStream::connect(addr)
                .await
                .with_context(|| format!("Failed to connect to {}", addr))?,
        ),
    };

    info!("Connected to {}", source);
    Ok(reader)
}

/// Reads `reader` to the end, feeding every byte to `session` and calling
/// `on_packet` for each packet the session decodes.
///
/// At end of stream the session's partial frame is discarded.
pub async fn pump<R, C, F>(
    mut reader: R,
    session: &mut Session,
    clock: &C,
    mut on_packet: F,
) -> Result<PumpSummary>
where
    R: AsyncRead + Unpin,
    C: Clock,
    F: FnMut(&RawPacket, &Session),
{
    let mut summary = PumpSummary::default();
    let mut buf = vec![0u8; READ_CHUNK];

    loop {
        let n = reader
            .read(&mut buf)
            .await
            .context("Failed to read from transport")?;
        if n == 0 {
            break;
        }

        let at = clock.now();
        debug!("Received {} bytes at {:?}", n, at);
        summary.received += n as u64;

        for &byte in &buf[..n] {
            if let Some(packet) = session.feed_byte(byte, at) {
                summary.packets += 1;
                on_packet(&packet, session);
            }
        }
    }

    let dropped = session.finish();
    if dropped > 0 {
        info!("Stream ended with {} bytes of an incomplete frame", dropped);
    }
    summary.dropped_bytes = dropped as u64;

    info!(
        "Transport closed: {} bytes, {} packets",
        summary.received, summary.packets
    );
    Ok(summary)
}

/// Reads text packets, one per line, and applies each to `session`.
///
/// Lines that do not parse are logged and skipped.
pub async fn pump_lines<R, F>(reader: R, session: &mut Session, mut on_packet: F) -> Result<PumpSummary>
where
    R: AsyncBufRead + Unpin,
    F: FnMut(&RawPacket, &Session),
{
    let mut summary = PumpSummary::default();
    let mut lines = reader.lines();

    while let Some(line) = lines
        .next_line()
        .await
        .context("Failed to read from transport")?
    {
        summary.received += 1;
        if line.trim().is_empty() {
            continue;
        }

        match RawPacket::from_text(&line) {
            Ok(packet) => {
                session.apply_packet(&packet);
                summary.packets += 1;
                on_packet(&packet, session);
            }
            Err(e) => warn!("Ignoring malformed text packet: {:#}", e),
        }
    }

    info!("Transport closed: {} lines, {} packets", summary.received, summary.packets);
    Ok(summary)
}
