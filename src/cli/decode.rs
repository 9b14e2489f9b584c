//! Decode command: apply one packet to a layout and show what lights up.

use crate::cli::common::{
    load_config, load_session, parse_byte, print_json, resolve_layout_path, CliError, CliResult,
    RegionOutput,
};
use crate::models::RawPacket;
use crate::services::{format_packet, PacketView};
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

/// Decode a single packet against a layout
#[derive(Debug, Clone, Args)]
pub struct DecodeArgs {
    /// Path to layout description (JSON or JSON5)
    #[arg(short, long, value_name = "FILE")]
    pub layout: Option<PathBuf>,

    /// Packet as comma-separated decimal bytes (e.g. "5,0,255")
    #[arg(long, value_name = "TEXT", conflicts_with = "bytes")]
    pub text: Option<String>,

    /// Packet bytes (decimal, 0x hex or 0b binary)
    #[arg(value_name = "BYTES")]
    pub bytes: Vec<String>,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

/// JSON response of the decode command.
#[derive(Debug, Serialize)]
struct DecodeResponse {
    packet: PacketView,
    undeclared_bits: usize,
    active: Vec<RegionOutput>,
}

impl DecodeArgs {
    /// Execute the decode command
    pub fn execute(&self) -> CliResult<()> {
        let packet = self.packet()?;

        let config = load_config();
        let path = resolve_layout_path(self.layout.as_deref(), &config)?;
        let mut session = load_session(&path, config.stream.packetizer_config())?;

        let declared = session.apply_packet(&packet);
        let active: Vec<RegionOutput> = session
            .active_regions()
            .map(|(position, region)| {
                RegionOutput::new(position, &region.display_name, region.bounds)
            })
            .collect();

        if self.json {
            let response = DecodeResponse {
                packet: PacketView::new(&packet),
                undeclared_bits: packet.len() * 8 - declared,
                active,
            };
            return print_json(&response);
        }

        print!("{}", format_packet(&packet));
        println!();
        if active.is_empty() {
            println!("No active regions");
        } else {
            println!("Active regions:");
            for region in &active {
                println!("  {:>7}  {}", region.address, region.name);
            }
        }

        Ok(())
    }

    fn packet(&self) -> CliResult<RawPacket> {
        if let Some(text) = &self.text {
            return RawPacket::from_text(text).map_err(|e| CliError::validation(format!("{e:#}")));
        }

        if self.bytes.is_empty() {
            return Err(CliError::validation(
                "No packet given: pass BYTES... or --text",
            ));
        }

        self.bytes
            .iter()
            .map(|value| parse_byte(value))
            .collect::<CliResult<Vec<u8>>>()
            .map(RawPacket::new)
    }
}
