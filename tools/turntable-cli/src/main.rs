//! Turntable CLI: command-line interface for 360° image sequences.
//!
//! Usage:
//!   turntable play <DIR>         Run a live viewer session over a frame directory
//!   turntable simulate <SCRIPT>  Replay an input script in virtual time
//!   turntable check <DIR>        Check a frame directory for missing stills
//!   turntable config             Show or initialize the configuration file

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use turntable_common::config::{AppConfig, ViewerConfig};

mod commands;

#[derive(Parser)]
#[command(
    name = "turntable",
    about = "Drag-to-rotate viewer for 360° image sequences",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file (defaults to $XDG_CONFIG_HOME/turntable/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Overrides for the viewer section of the config file.
#[derive(Args, Debug, Clone, Default)]
pub struct ViewerArgs {
    /// Frames in one full rotation
    #[arg(long)]
    frames: Option<usize>,

    /// Drag sensitivity multiplier
    #[arg(long)]
    speed: Option<f64>,

    /// Minimum milliseconds between processed pointer samples
    #[arg(long)]
    sampling_ms: Option<u64>,

    /// Animation tick rate (Hz)
    #[arg(long)]
    tick_hz: Option<u32>,

    /// Target frame for the spin played after loading (0 disables it)
    #[arg(long, allow_hyphen_values = true)]
    intro_spin: Option<i64>,

    /// Scale applied to detector x coordinates
    #[arg(long)]
    detector_scale: Option<f64>,
}

impl ViewerArgs {
    pub fn apply(&self, base: &ViewerConfig) -> ViewerConfig {
        ViewerConfig {
            total_frames: self.frames.unwrap_or(base.total_frames),
            speed_multiplier: self.speed.unwrap_or(base.speed_multiplier),
            sampling_interval_ms: self.sampling_ms.unwrap_or(base.sampling_interval_ms),
            tick_rate_hz: self.tick_hz.unwrap_or(base.tick_rate_hz),
            intro_spin_frames: self.intro_spin.unwrap_or(base.intro_spin_frames),
            detector_scale: self.detector_scale.unwrap_or(base.detector_scale),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Run a live viewer session over a directory of stills
    Play {
        /// Directory holding the frame sequence
        dir: PathBuf,

        /// JSONL input script to feed the session
        #[arg(short, long)]
        script: Option<PathBuf>,

        /// Playback rate for the script (2.0 = twice as fast)
        #[arg(long, default_value = "1.0")]
        rate: f64,

        /// Record forwarded input events to this JSONL file
        #[arg(long)]
        record: Option<PathBuf>,

        /// Width of the drag surface in pixels
        #[arg(long, default_value = "640")]
        width: f64,

        /// Frame file name prefix
        #[arg(long, default_value = "threesixty_")]
        prefix: String,

        /// Frame file extension
        #[arg(long, default_value = "jpg")]
        ext: String,

        #[command(flatten)]
        viewer: ViewerArgs,
    },

    /// Replay an input script in virtual time and report where it lands
    Simulate {
        /// JSONL input script
        script: PathBuf,

        /// Width of the drag surface in pixels
        #[arg(long, default_value = "640")]
        width: f64,

        /// Print the full report as JSON
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        viewer: ViewerArgs,
    },

    /// Check a frame directory for missing or stray stills
    Check {
        /// Directory holding the frame sequence
        dir: PathBuf,

        /// Frame file name prefix
        #[arg(long, default_value = "threesixty_")]
        prefix: String,

        /// Frame file extension
        #[arg(long, default_value = "jpg")]
        ext: String,

        #[command(flatten)]
        viewer: ViewerArgs,
    },

    /// Show the effective configuration
    Config {
        /// Write the effective configuration to the config file
        #[arg(long)]
        init: bool,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => AppConfig::load_from(path),
        None => AppConfig::load(),
    };
    if cli.verbose {
        config.logging.level = "debug".to_string();
    }
    turntable_common::logging::init_logging(&config.logging)?;

    match cli.command {
        Commands::Play {
            dir,
            script,
            rate,
            record,
            width,
            prefix,
            ext,
            viewer,
        } => {
            let options = commands::play::PlayOptions {
                dir,
                script,
                rate,
                record,
                width,
                prefix,
                ext,
            };
            commands::play::run(options, viewer.apply(&config.viewer)).await
        }
        Commands::Simulate {
            script,
            width,
            json,
            viewer,
        } => commands::simulate::run(script, width, json, viewer.apply(&config.viewer)),
        Commands::Check {
            dir,
            prefix,
            ext,
            viewer,
        } => commands::check::run(dir, prefix, ext, viewer.apply(&config.viewer)),
        Commands::Config { init } => commands::config::run(config, cli.config, init),
    }
}
