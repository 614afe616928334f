//! Command-line argument parsing for the scene renderer
//!
//! Supports:
//! - Rendering a scene file as ASCII, JSON or a PPM image
//! - Loading a highlight config file
//! - Running several ticks to exercise the refresh throttle
//! - Printing the default config

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Config file picked up from the working directory when `--config` is absent
pub const DEFAULT_CONFIG_FILE: &str = "range-highlight.yaml";

/// Render range highlights for a farm scene
#[derive(Parser, Debug)]
#[command(
    name = "range-highlight",
    version,
    about = "Render range highlights for a farm scene"
)]
pub struct CliArgs {
    /// Scene file (YAML)
    #[arg(value_name = "SCENE")]
    pub scene: Option<PathBuf>,

    /// Highlight config file (YAML)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Ascii)]
    pub format: OutputFormat,

    /// Write output to FILE instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Number of host ticks to simulate
    #[arg(long, value_name = "N", default_value_t = 1)]
    pub ticks: u32,

    /// Pixels per tile for PPM output
    #[arg(long, value_name = "PX", default_value_t = 16)]
    pub tile_size: usize,

    /// Also write debug logs to DIR
    #[arg(long, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,

    /// Print the default config as YAML and exit
    #[arg(long)]
    pub print_default_config: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Character grid, one letter per category, `*` for overlaps
    Ascii,
    /// Covered tiles as a JSON array
    Json,
    /// Binary PPM image
    Ppm,
}

/// What to do, derived from CLI arguments
#[derive(Debug, Clone)]
pub enum Command {
    PrintDefaultConfig,
    Render(RenderJob),
}

#[derive(Debug, Clone)]
pub struct RenderJob {
    pub scene: PathBuf,
    pub config: Option<PathBuf>,
    pub format: OutputFormat,
    pub output: Option<PathBuf>,
    pub ticks: u32,
    pub tile_size: usize,
}

impl CliArgs {
    /// Validate the arguments and decide what to run
    pub fn into_command(self) -> Result<Command, String> {
        if self.print_default_config {
            return Ok(Command::PrintDefaultConfig);
        }

        let scene = self
            .scene
            .ok_or_else(|| "A scene file is required".to_string())?;

        if self.ticks == 0 {
            return Err("--ticks must be at least 1".to_string());
        }
        if self.tile_size == 0 {
            return Err("--tile-size must be at least 1".to_string());
        }

        Ok(Command::Render(RenderJob {
            scene,
            config: self.config,
            format: self.format,
            output: self.output,
            ticks: self.ticks,
            tile_size: self.tile_size,
        }))
    }
}
