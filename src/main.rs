//! Bitscope - bit-level monitor for device packet streams
//!
//! Maps each bit of a packet onto a region of a 2D layout and reports which
//! regions are active.
//!
//! # Usage
//!
//! ```bash
//! # Show the regions a layout declares
//! bitscope inspect --layout panel.json
//!
//! # Decode one packet
//! bitscope decode --layout panel.json 0x05 0 255
//!
//! # Frame a live stream from a serial bridge
//! bitscope listen --layout panel.json --tcp 127.0.0.1:3000
//! ```

use bitscope::cli::{ConfigArgs, DecodeArgs, HitArgs, InspectArgs};
#[cfg(feature = "net")]
use bitscope::cli::ListenArgs;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Bitscope - bit-level monitor for device packet streams
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build a layout and list its bit regions
    Inspect(InspectArgs),
    /// Hit-test a point or highlight a bit
    Hit(HitArgs),
    /// Decode a single packet
    Decode(DecodeArgs),
    /// Decode a live byte stream
    #[cfg(feature = "net")]
    Listen(ListenArgs),
    /// Manage configuration
    Config(ConfigArgs),
}

fn main() {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let result = match &cli.command {
        Command::Inspect(args) => args.execute(),
        Command::Hit(args) => args.execute(),
        Command::Decode(args) => args.execute(),
        #[cfg(feature = "net")]
        Command::Listen(args) => args.execute(),
        Command::Config(args) => args.execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(e.exit_code());
    }
}
