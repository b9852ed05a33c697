//! Folio CLI: offline tools for the motion engine.
//!
//! Usage:
//!   folio spring [OPTIONS]          Step a spring toward a target
//!   folio marquee [OPTIONS]         Step a marquee strip
//!   folio replay <EVENTS> [OPTIONS] Replay a recorded session into a frame trace
//!   folio prefs show|toggle|set     Inspect or change the animation preference
//!   folio probe <PATH>              Classify a selector path for the cursor

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use folio_common::config::{MotionConfig, SpringParams};

mod commands;

#[derive(Parser)]
#[command(
    name = "folio",
    about = "Pointer-reactive motion engine tools",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Motion config file (defaults to the per-user config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Step a damped spring from rest toward a target
    Spring {
        /// Spring preset from the config (cursor_ring, magnetic, parallax, ...)
        #[arg(long)]
        preset: Option<String>,

        #[arg(long, default_value = "700")]
        stiffness: f64,

        #[arg(long, default_value = "25")]
        damping: f64,

        #[arg(long, default_value = "1")]
        mass: f64,

        /// Target value
        #[arg(long, default_value = "100")]
        target: f64,

        /// Frame delta in milliseconds
        #[arg(long, default_value = "16")]
        dt: f64,

        /// Maximum number of frames to step
        #[arg(long, default_value = "120")]
        frames: u32,
    },

    /// Step a marquee strip at a constant velocity factor
    Marquee {
        /// Base velocity (defaults to the configured one)
        #[arg(long, allow_hyphen_values = true)]
        base_velocity: Option<f64>,

        /// Track length the offset wraps within
        #[arg(long, default_value = "100")]
        length: f64,

        /// Constant scroll velocity factor
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        velocity_factor: f64,

        /// Frame delta in milliseconds
        #[arg(long, default_value = "16")]
        dt: f64,

        #[arg(long, default_value = "60")]
        frames: u32,
    },

    /// Replay a recorded session (JSONL) through the engine
    Replay {
        /// Path to the session events file
        events: PathBuf,

        /// Output trace file
        #[arg(short, long, default_value = "trace.jsonl")]
        output: PathBuf,

        /// Frames per second of the replay clock
        #[arg(long, default_value = "60")]
        fps: u32,

        /// Replay with animations switched off
        #[arg(long = "static")]
        static_motion: bool,

        /// Replay as if the platform requested reduced motion
        #[arg(long)]
        reduced_motion: bool,
    },

    /// Inspect or change the persisted animation preference
    Prefs {
        /// Preference file (defaults to the per-user preferences.json)
        #[arg(long, global = true)]
        store: Option<PathBuf>,

        #[command(subcommand)]
        action: PrefsAction,
    },

    /// Classify a selector path such as `a>span` for the cursor hover probe
    Probe {
        /// Selector path, outermost element first
        path: String,
    },
}

#[derive(Subcommand)]
enum PrefsAction {
    /// Print the current preference
    Show {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Flip the animation toggle
    Toggle,
    /// Set the animation toggle
    Set {
        #[arg(action = clap::ArgAction::Set)]
        enabled: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => MotionConfig::load_from(path)
            .map_err(|e| anyhow::anyhow!("Failed to load config {}: {e}", path.display()))?,
        None => MotionConfig::load(),
    };

    // Initialize logging
    let mut logging = config.logging.clone();
    if cli.verbose {
        logging.level = "debug".to_string();
    }
    folio_common::logging::init_logging(&logging);

    match cli.command {
        Commands::Spring {
            preset,
            stiffness,
            damping,
            mass,
            target,
            dt,
            frames,
        } => {
            let params = SpringParams {
                stiffness,
                damping,
                mass,
            };
            commands::spring::run(&config, preset.as_deref(), params, target, dt, frames)
        }
        Commands::Marquee {
            base_velocity,
            length,
            velocity_factor,
            dt,
            frames,
        } => commands::marquee::run(&config, base_velocity, length, velocity_factor, dt, frames),
        Commands::Replay {
            events,
            output,
            fps,
            static_motion,
            reduced_motion,
        } => commands::replay::run(&config, events, output, fps, static_motion, reduced_motion),
        Commands::Prefs { store, action } => match action {
            PrefsAction::Show { json } => commands::prefs::show(store, json),
            PrefsAction::Toggle => commands::prefs::toggle(store),
            PrefsAction::Set { enabled } => commands::prefs::set(store, enabled),
        },
        Commands::Probe { path } => commands::probe::run(&path),
    }
}
