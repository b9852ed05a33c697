//! Step a spring and print its trajectory.

use folio_common::config::{MotionConfig, SpringParams};
use folio_motion_core::spring::Spring;

/// Resolve a named preset from the config.
fn preset(config: &MotionConfig, name: &str) -> Option<SpringParams> {
    let springs = &config.springs;
    let params = match name {
        "cursor_ring" => springs.cursor_ring,
        "cursor_ring_reduced" => springs.cursor_ring_reduced,
        "cursor_dot" => springs.cursor_dot,
        "cursor_dot_reduced" => springs.cursor_dot_reduced,
        "magnetic" => springs.magnetic,
        "parallax" => springs.parallax,
        "scroll_velocity" => springs.scroll_velocity,
        _ => return None,
    };
    Some(params)
}

/// How far `peak` went past `target`, in the direction of travel from 0.
/// Zero when the spring never reached the target.
fn overshoot(peak: f64, target: f64) -> f64 {
    let past = if target >= 0.0 { peak - target } else { target - peak };
    past.max(0.0)
}

pub fn run(
    config: &MotionConfig,
    preset_name: Option<&str>,
    params: SpringParams,
    target: f64,
    dt: f64,
    frames: u32,
) -> anyhow::Result<()> {
    let params = match preset_name {
        Some(name) => {
            preset(config, name).ok_or_else(|| anyhow::anyhow!("Unknown spring preset: {name}"))?
        }
        None => params,
    };
    if !(params.stiffness > 0.0 && params.mass > 0.0 && params.damping >= 0.0) {
        anyhow::bail!("Spring needs stiffness > 0, mass > 0 and damping >= 0");
    }
    if !(dt > 0.0) {
        anyhow::bail!("Frame delta must be positive");
    }

    println!(
        "Spring: stiffness={} damping={} mass={} (damping ratio {:.3})",
        params.stiffness,
        params.damping,
        params.mass,
        params.damping_ratio()
    );
    println!("  Target: {target}, dt: {dt} ms");
    println!();

    let mut spring = Spring::new(params);
    spring.set_target(target);

    let mut peak = spring.position();
    let mut settled_at = None;
    for frame in 1..=frames {
        let position = spring.advance(dt);
        peak = if target >= 0.0 {
            peak.max(position)
        } else {
            peak.min(position)
        };
        println!(
            "{:>5}  t={:>8.1} ms  x={:>10.4}  v={:>10.4}",
            frame,
            frame as f64 * dt,
            position,
            spring.velocity()
        );
        if spring.is_at_rest() {
            settled_at = Some(frame);
            break;
        }
    }

    println!();
    println!("  Peak: {peak:.4} (overshoot {:.4})", overshoot(peak, target));
    match settled_at {
        Some(frame) => println!("  Settled after {frame} frames ({:.1} ms)", frame as f64 * dt),
        None => println!("  Still moving after {frames} frames"),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overshoot_ignores_undershoot() {
        assert!((overshoot(1.2, 1.0) - 0.2).abs() < 1e-12);
        assert_eq!(overshoot(0.8, 1.0), 0.0);
        assert_eq!(overshoot(-1.5, -1.0), 0.5);
        assert_eq!(overshoot(-0.5, -1.0), 0.0);
    }

    #[test]
    fn test_unknown_preset() {
        assert!(preset(&MotionConfig::default(), "wobbly").is_none());
        assert!(preset(&MotionConfig::default(), "parallax").is_some());
    }
}
