//! Step a marquee strip at a constant velocity factor.

use folio_common::config::MotionConfig;
use folio_motion_core::marquee::{advance_marquee, MarqueeState, MarqueeTrack};

pub fn run(
    config: &MotionConfig,
    base_velocity: Option<f64>,
    length: f64,
    velocity_factor: f64,
    dt: f64,
    frames: u32,
) -> anyhow::Result<()> {
    if !(length > 0.0) {
        anyhow::bail!("Track length must be positive");
    }
    let base_velocity = base_velocity.unwrap_or(config.marquee.base_velocity);
    let track = MarqueeTrack::from_defaults(length, &config.marquee);

    println!(
        "Marquee: base velocity {base_velocity}/s, track {length}, velocity factor {velocity_factor}"
    );
    println!(
        "  Multiplier range: [{}, {}]",
        track.min_multiplier, track.max_multiplier
    );
    println!();

    let mut state = MarqueeState::new(base_velocity);
    for frame in 1..=frames {
        state = advance_marquee(state, &track, dt, velocity_factor);
        println!(
            "{:>5}  t={:>8.1} ms  offset={:>10.4}  direction={:?}",
            frame,
            frame as f64 * dt,
            state.offset,
            state.direction
        );
    }

    Ok(())
}
