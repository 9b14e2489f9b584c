//! Configuration management CLI commands.

use crate::cli::common::{print_json, CliError, CliResult};
use crate::config::Config;
use crate::constants::APP_NAME;
use clap::{Args, Subcommand};
use std::path::PathBuf;

/// Configuration management commands
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Display current configuration
    Show(ConfigShowArgs),
    /// Print the configuration file location
    Path,
    /// Set stream framing values
    SetStream(ConfigSetStreamArgs),
    /// Set default paths and transport
    Set(ConfigSetArgs),
}

/// Display current configuration
#[derive(Args, Debug)]
pub struct ConfigShowArgs {
    /// Output as JSON
    #[arg(long)]
    json: bool,
}

/// Set stream framing values
#[derive(Args, Debug)]
pub struct ConfigSetStreamArgs {
    /// Bytes per full frame
    #[arg(long, value_name = "N")]
    max_len: Option<usize>,

    /// Quiet period in milliseconds that ends a frame
    #[arg(long, value_name = "MS")]
    gap_ms: Option<u64>,
}

/// Set default paths and transport
#[derive(Args, Debug)]
pub struct ConfigSetArgs {
    /// Default layout description
    #[arg(long, value_name = "FILE")]
    layout: Option<PathBuf>,

    /// Default socket address for listen
    #[arg(long, value_name = "ADDR")]
    host: Option<String>,
}

impl ConfigArgs {
    /// Execute config subcommand
    pub fn execute(&self) -> CliResult<()> {
        match &self.command {
            ConfigCommand::Show(args) => args.execute(),
            ConfigCommand::Path => {
                let path = Config::config_file_path()
                    .map_err(|e| CliError::io(format!("{e:#}")))?;
                println!("{}", path.display());
                Ok(())
            }
            ConfigCommand::SetStream(args) => args.execute(),
            ConfigCommand::Set(args) => args.execute(),
        }
    }
}

impl ConfigShowArgs {
    /// Execute show command
    pub fn execute(&self) -> CliResult<()> {
        let config = Config::load()
            .map_err(|e| CliError::validation(format!("Failed to load configuration: {e:#}")))?;

        if self.json {
            print_json(&config)
        } else {
            output_human_readable(&config);
            Ok(())
        }
    }
}

impl ConfigSetStreamArgs {
    /// Execute set-stream command
    pub fn execute(&self) -> CliResult<()> {
        if self.max_len.is_none() && self.gap_ms.is_none() {
            return Err(CliError::validation(
                "At least one stream option must be specified: --max-len or --gap-ms",
            ));
        }

        let mut config = Config::load().unwrap_or_default();
        if let Some(max_len) = self.max_len {
            config.stream.max_len = max_len;
        }
        if let Some(gap_ms) = self.gap_ms {
            config.stream.gap_ms = gap_ms;
        }

        save(&config)
    }
}

impl ConfigSetArgs {
    /// Execute set command
    pub fn execute(&self) -> CliResult<()> {
        if self.layout.is_none() && self.host.is_none() {
            return Err(CliError::validation(
                "At least one configuration option must be specified: --layout or --host",
            ));
        }

        let mut config = Config::load().unwrap_or_default();

        if let Some(layout) = &self.layout {
            if !layout.exists() {
                return Err(CliError::validation(format!(
                    "Layout file does not exist: {}",
                    layout.display()
                )));
            }
            config.paths.layout = Some(layout.clone());
        }

        if let Some(host) = &self.host {
            config.transport.host = Some(host.clone());
        }

        save(&config)
    }
}

fn save(config: &Config) -> CliResult<()> {
    config.validate().map_err(|e| CliError::validation(format!("{e:#}")))?;
    config
        .save()
        .map_err(|e| CliError::io(format!("Failed to save configuration: {e:#}")))?;

    println!("Configuration updated successfully.");
    Ok(())
}

/// Output configuration in human-readable format
fn output_human_readable(config: &Config) {
    let title = format!("{APP_NAME} Configuration");
    println!("{title}");
    println!("{}", "=".repeat(title.len()));
    println!();

    println!("Stream:");
    println!("  Max Length: {} bytes", config.stream.max_len);
    println!("  Gap:        {} ms", config.stream.gap_ms);
    println!();

    println!("Paths:");
    match &config.paths.layout {
        Some(layout) => println!("  Layout: {}", layout.display()),
        None => println!("  Layout: (not configured)"),
    }
    println!();

    println!("Transport:");
    println!(
        "  Host: {}",
        config.transport.host.as_deref().unwrap_or("(not configured)")
    );
}
