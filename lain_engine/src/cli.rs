use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    about = "Headless host that drives the site scenes frame by frame",
    version
)]
pub struct Args {
    /// Site content JSON (defaults to the bundled demo layouts)
    #[arg(long)]
    pub site_data: Option<PathBuf>,

    /// Optional engine config JSON; absent fields keep their defaults
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Input script JSON: a list of { "frame": N, "keys": [...] }
    #[arg(long)]
    pub script: Option<PathBuf>,

    /// Number of frames to run (default: one past the script's last frame)
    #[arg(long)]
    pub frames: Option<u64>,

    /// Override the configured frame rate
    #[arg(long)]
    pub fps: Option<u32>,

    /// Override the configured time multiplier
    #[arg(long)]
    pub time_multiplier: Option<f32>,

    /// Save file for the pause menu and boot loader (default: in-memory slot)
    #[arg(long)]
    pub save_path: Option<PathBuf>,

    /// Path to write the per-frame trace as JSON
    #[arg(long)]
    pub trace_json: Option<PathBuf>,

    /// Log scene internals at debug level
    #[arg(long)]
    pub verbose: bool,
}

#[derive(Debug)]
pub struct RunArgs {
    pub site_data: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub script: Option<PathBuf>,
    pub frames: Option<u64>,
    pub fps: Option<u32>,
    pub time_multiplier: Option<f32>,
    pub save_path: Option<PathBuf>,
    pub trace_json: Option<PathBuf>,
    pub verbose: bool,
}

pub fn parse() -> Result<RunArgs> {
    let args = Args::parse();
    args.into_run_args()
}

impl Args {
    fn into_run_args(self) -> Result<RunArgs> {
        if self.fps == Some(0) {
            bail!("--fps must be at least 1");
        }
        if let Some(multiplier) = self.time_multiplier {
            if !(multiplier.is_finite() && multiplier > 0.0) {
                bail!("--time-multiplier must be a positive number, got {multiplier}");
            }
        }
        if self.frames.is_none() && self.script.is_none() {
            bail!("--frames is required when no --script is given");
        }

        Ok(RunArgs {
            site_data: self.site_data,
            config: self.config,
            script: self.script,
            frames: self.frames,
            fps: self.fps,
            time_multiplier: self.time_multiplier,
            save_path: self.save_path,
            trace_json: self.trace_json,
            verbose: self.verbose,
        })
    }
}
