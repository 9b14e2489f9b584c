//! Inspect command: build a layout and report its regions and warnings.

use crate::cli::common::{
    format_rect, load_config, load_session, print_json, resolve_layout_path, CliError,
    CliResult, RegionOutput,
};
use crate::models::{LayoutWarning, Rect};
use crate::services::Session;
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

/// Build a layout description and list its bit regions
#[derive(Debug, Clone, Args)]
pub struct InspectArgs {
    /// Path to layout description (JSON or JSON5)
    #[arg(short, long, value_name = "FILE")]
    pub layout: Option<PathBuf>,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,

    /// Treat layout warnings as errors (exit non-zero)
    #[arg(long)]
    pub strict: bool,
}

/// JSON response of the inspect command.
#[derive(Debug, Serialize)]
struct InspectResponse<'a> {
    bounds: Rect,
    position_count: usize,
    region_count: usize,
    regions: Vec<RegionOutput>,
    warnings: &'a [LayoutWarning],
}

impl InspectArgs {
    /// Execute the inspect command
    pub fn execute(&self) -> CliResult<()> {
        let config = load_config();
        let path = resolve_layout_path(self.layout.as_deref(), &config)?;
        let session = load_session(&path, config.stream.packetizer_config())?;

        let response = build_response(&session);

        if self.json {
            print_json(&response)?;
        } else {
            println!("Layout: {}", path.display());
            println!("Bounds: {}", format_rect(&response.bounds));
            println!(
                "Regions: {} over {} bit positions",
                response.region_count, response.position_count
            );

            if !response.regions.is_empty() {
                println!();
                for region in &response.regions {
                    println!(
                        "  {:>7}  {:<24} {}",
                        region.address,
                        region.name,
                        format_rect(&region.bounds)
                    );
                }
            }

            if !response.warnings.is_empty() {
                println!("\nWarnings:");
                for warning in response.warnings {
                    println!("  ⚠ {warning}");
                }
            }
        }

        if self.strict && !session.warnings().is_empty() {
            return Err(CliError::validation(format!(
                "Layout has {} warning(s)",
                session.warnings().len()
            )));
        }

        Ok(())
    }
}

fn build_response(session: &Session) -> InspectResponse<'_> {
    let index = session.index();
    let regions = index
        .iter()
        .map(|(_, position, region)| {
            RegionOutput::new(position, &region.display_name, region.bounds)
        })
        .collect();

    InspectResponse {
        bounds: session.bounds(),
        position_count: index.position_count(),
        region_count: index.region_count(),
        regions,
        warnings: session.warnings(),
    }
}
