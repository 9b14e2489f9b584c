//! Hit command: find the region under a point, or the regions of a bit.

use crate::cli::common::{
    format_rect, load_config, load_session, parse_address, print_json, resolve_layout_path,
    CliError, CliResult, RegionOutput,
};
use crate::models::{BitAddress, Point};
use crate::services::Session;
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

/// Hit-test a point against the layout, or highlight the regions of a bit
#[derive(Debug, Clone, Args)]
pub struct HitArgs {
    /// Path to layout description (JSON or JSON5)
    #[arg(short, long, value_name = "FILE")]
    pub layout: Option<PathBuf>,

    /// X coordinate in layout units
    #[arg(long, allow_hyphen_values = true, requires = "y", conflicts_with = "address")]
    pub x: Option<f64>,

    /// Y coordinate in layout units
    #[arg(long, allow_hyphen_values = true, requires = "x")]
    pub y: Option<f64>,

    /// Bit address as BYTE:BIT; lists every region of that bit
    #[arg(long, value_name = "BYTE:BIT")]
    pub address: Option<String>,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

/// JSON response for a point query.
#[derive(Debug, Serialize)]
struct HitResponse {
    x: f64,
    y: f64,
    hit: Option<RegionOutput>,
}

/// JSON response for an address query.
#[derive(Debug, Serialize)]
struct HighlightResponse {
    address: BitAddress,
    regions: Vec<RegionOutput>,
}

impl HitArgs {
    /// Execute the hit command
    pub fn execute(&self) -> CliResult<()> {
        let config = load_config();
        let path = resolve_layout_path(self.layout.as_deref(), &config)?;
        let session = load_session(&path, config.stream.packetizer_config())?;

        match (&self.address, self.x, self.y) {
            (Some(address), _, _) => self.highlight(&session, parse_address(address)?),
            (None, Some(x), Some(y)) => self.hit(&session, Point::new(x, y)),
            _ => Err(CliError::validation(
                "Either --x and --y, or --address must be given",
            )),
        }
    }

    fn hit(&self, session: &Session, point: Point) -> CliResult<()> {
        let hit = session.hit_test(point).map(|info| {
            RegionOutput::new(info.position, &info.region.display_name, info.region.bounds)
        });

        if self.json {
            let response = HitResponse {
                x: point.x,
                y: point.y,
                hit,
            };
            print_json(&response)?;
            return Ok(());
        }

        match hit {
            Some(region) => {
                println!("{} ({})", region.name, region.address);
                println!("  Position: {}", region.position);
                println!("  Bounds:   {}", format_rect(&region.bounds));
                Ok(())
            }
            None => Err(CliError::validation(format!(
                "No region at ({}, {})",
                point.x, point.y
            ))),
        }
    }

    fn highlight(&self, session: &Session, address: BitAddress) -> CliResult<()> {
        let position = address.position();
        let regions: Vec<RegionOutput> = session
            .regions_for_address(address)
            .into_iter()
            .map(|region| RegionOutput::new(position, &region.display_name, region.bounds))
            .collect();

        if self.json {
            print_json(&HighlightResponse { address, regions })?;
            return Ok(());
        }

        if regions.is_empty() {
            return Err(CliError::validation(format!(
                "Bit {address} is not declared by the layout"
            )));
        }

        println!("Bit {} (position {}):", address, position);
        for region in &regions {
            println!("  {:<24} {}", region.name, format_rect(&region.bounds));
        }
        Ok(())
    }
}
