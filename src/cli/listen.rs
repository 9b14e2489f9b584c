//! Listen command: frame a live byte stream and report each packet.

use crate::cli::common::{load_config, load_session, resolve_layout_path, CliError, CliResult};
use crate::config::Config;
use crate::models::RawPacket;
use crate::services::{PacketizerConfig, Session};
use crate::transport::{self, ByteSource, MonotonicClock, PumpSummary};
use chrono::{DateTime, Utc};
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;
use tokio::io::BufReader;

/// Decode a live byte stream against a layout
#[derive(Debug, Clone, Args)]
pub struct ListenArgs {
    /// Path to layout description (JSON or JSON5)
    #[arg(short, long, value_name = "FILE")]
    pub layout: Option<PathBuf>,

    /// Read bytes from a capture file instead of stdin
    #[arg(long, value_name = "PATH", group = "source")]
    pub file: Option<PathBuf>,

    /// Read raw bytes from a TCP socket (defaults to transport.host)
    #[arg(long, value_name = "ADDR", num_args = 0..=1, default_missing_value = "", group = "source")]
    pub tcp: Option<String>,

    /// Read text packets ("1,2,255" per line) from a TCP socket
    #[arg(long, value_name = "ADDR", num_args = 0..=1, default_missing_value = "", group = "source")]
    pub text_tcp: Option<String>,

    /// Bytes per full frame (overrides stream.max_len)
    #[arg(long, value_name = "N")]
    pub max_len: Option<usize>,

    /// Quiet period in milliseconds that ends a frame (overrides stream.gap_ms)
    #[arg(long, value_name = "MS")]
    pub gap_ms: Option<u64>,

    /// Print one JSON object per packet
    #[arg(long)]
    pub json: bool,
}

/// One line of `--json` output.
#[derive(Debug, Serialize)]
struct PacketRecord<'a> {
    received_at: DateTime<Utc>,
    sequence: u64,
    bytes: &'a RawPacket,
    active: Vec<&'a str>,
}

impl ListenArgs {
    /// Execute the listen command
    pub fn execute(&self) -> CliResult<()> {
        let config = load_config();
        let path = resolve_layout_path(self.layout.as_deref(), &config)?;
        let packetizer = self.packetizer_config(&config);
        packetizer
            .validate()
            .map_err(|e| CliError::validation(format!("{e:#}")))?;

        let mut session = load_session(&path, packetizer)?;
        let (source, text) = self.source(&config)?;

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| CliError::io(format!("Failed to start async runtime: {e}")))?;

        let summary = runtime
            .block_on(self.run(&source, text, &mut session))
            .map_err(|e| CliError::io(format!("{e:#}")))?;

        if !self.json {
            let stats = session.framing_stats();
            println!();
            println!(
                "Received {} {} from {}, {} packets",
                summary.received,
                if text { "lines" } else { "bytes" },
                source,
                summary.packets
            );
            if !text {
                println!(
                    "  Full frames: {}  Timeout frames: {}  Dropped bytes: {}",
                    stats.full_packets, stats.timeout_packets, stats.dropped_bytes
                );
            }
        }

        Ok(())
    }

    fn packetizer_config(&self, config: &Config) -> PacketizerConfig {
        let mut stream = config.stream.clone();
        if let Some(max_len) = self.max_len {
            stream.max_len = max_len;
        }
        if let Some(gap_ms) = self.gap_ms {
            stream.gap_ms = gap_ms;
        }
        stream.packetizer_config()
    }

    /// Resolves the byte source and whether it carries text packets.
    fn source(&self, config: &Config) -> CliResult<(ByteSource, bool)> {
        let host = |flag: &str| -> CliResult<String> {
            if !flag.is_empty() {
                return Ok(flag.to_string());
            }
            config.transport.host.clone().ok_or_else(|| {
                CliError::validation("No address given and transport.host is not configured")
            })
        };

        if let Some(path) = &self.file {
            Ok((ByteSource::File(path.clone()), false))
        } else if let Some(addr) = &self.tcp {
            Ok((ByteSource::Tcp(host(addr.as_str())?), false))
        } else if let Some(addr) = &self.text_tcp {
            Ok((ByteSource::Tcp(host(addr.as_str())?), true))
        } else {
            Ok((ByteSource::Stdin, false))
        }
    }

    async fn run(
        &self,
        source: &ByteSource,
        text: bool,
        session: &mut Session,
    ) -> anyhow::Result<PumpSummary> {
        let reader = transport::open(source).await?;
        let mut sequence = 0u64;
        let on_packet = |packet: &RawPacket, session: &Session| {
            sequence += 1;
            self.report(sequence, packet, session);
        };

        if text {
            transport::pump_lines(BufReader::new(reader), session, on_packet).await
        } else {
            transport::pump(reader, session, &MonotonicClock::start(), on_packet).await
        }
    }

    fn report(&self, sequence: u64, packet: &RawPacket, session: &Session) {
        let received_at = Utc::now();
        let active: Vec<&str> = session
            .active_regions()
            .map(|(_, region)| region.display_name.as_str())
            .collect();

        if self.json {
            let record = PacketRecord {
                received_at,
                sequence,
                bytes: packet,
                active,
            };
            match serde_json::to_string(&record) {
                Ok(line) => println!("{line}"),
                Err(e) => tracing::warn!("Failed to serialize packet record: {}", e),
            }
        } else {
            let bytes: Vec<String> = packet.bytes().iter().map(|b| format!("{b:02X}")).collect();
            println!(
                "[{}] #{} {}  active: {}",
                received_at.format("%H:%M:%S%.3f"),
                sequence,
                bytes.join(" "),
                if active.is_empty() {
                    "-".to_string()
                } else {
                    active.join(", ")
                }
            );
        }
    }
}
