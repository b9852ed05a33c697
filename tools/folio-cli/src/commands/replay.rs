//! Replay a recorded session into a frame trace.

use std::path::PathBuf;

use folio_common::config::MotionConfig;
use folio_input_model::event::parse_session;
use folio_motion_core::trace::read_trace;
use folio_motion_core::{ReplayOptions, SessionReplay};
use folio_preferences::AnimationPreference;

pub fn run(
    config: &MotionConfig,
    events: PathBuf,
    output: PathBuf,
    fps: u32,
    static_motion: bool,
    reduced_motion: bool,
) -> anyhow::Result<()> {
    if fps == 0 {
        anyhow::bail!("fps must be positive");
    }
    println!("Replaying session: {}", events.display());

    let content = std::fs::read_to_string(&events)
        .map_err(|_| anyhow::anyhow!("Events file not found: {}", events.display()))?;
    let session =
        parse_session(&content).map_err(|e| anyhow::anyhow!("Failed to parse session: {e}"))?;

    println!("  Loaded {} events", session.events.len());
    println!(
        "  Viewport: {}x{}",
        session.header.viewport.width, session.header.viewport.height
    );
    println!("  Elements: {}", session.header.elements.len());

    let preference = AnimationPreference {
        enabled: !static_motion,
        reduced_motion_requested: reduced_motion,
    };
    let options = ReplayOptions {
        frame_interval_ms: 1000.0 / f64::from(fps),
        ..ReplayOptions::default()
    };

    tracing::debug!(?preference, frame_interval_ms = options.frame_interval_ms, "Starting replay");
    let replay = SessionReplay::new(&session, config, preference, options)?;
    let header = replay.header();
    let frames = replay.run_to_file(output.clone())?;

    println!();
    println!("Trace written to: {}", output.display());
    println!("  Frames: {frames} @ {fps}fps");
    println!("  Cursor: {}", if header.cursor_enabled { "custom" } else { "platform" });
    println!("  Animations: {}", if header.should_animate { "on" } else { "off" });

    let (_, traces) = read_trace(&output)?;
    if let Some(last) = traces.last() {
        println!("  Final intro phase: {:?}", last.intro.phase);
        let offsets: Vec<String> = last
            .marquees
            .iter()
            .map(|m| format!("{:.2}", m.translate_x))
            .collect();
        println!("  Final marquee offsets: [{}]", offsets.join(", "));
    }
    let peak_factor = traces
        .iter()
        .map(|f| f.scroll_velocity_factor.abs())
        .fold(0.0, f64::max);
    println!("  Peak scroll velocity factor: {peak_factor:.3}");

    Ok(())
}
