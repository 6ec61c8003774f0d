//! Command-line interface for Combocast
//!
//! Supports both graphical (default) and headless modes.

use clap::Parser;
use std::path::PathBuf;

/// Combo-driven sorcerer ability sandbox
#[derive(Parser, Debug)]
#[command(name = "combocast")]
#[command(about = "Combo-driven sorcerer ability sandbox")]
#[command(version)]
pub struct Args {
    /// Run in headless mode with the specified JSON scenario file
    #[arg(long, value_name = "SCENARIO_FILE")]
    pub headless: Option<PathBuf>,

    /// Output path for the combat log (headless mode only)
    #[arg(long, value_name = "OUTPUT_PATH")]
    pub output: Option<PathBuf>,

    /// Maximum scenario duration in seconds (headless mode only)
    #[arg(long, default_value = "30")]
    pub max_duration: f32,
}

pub fn parse_args() -> Args {
    Args::parse()
}
