//! Motion configuration.
//!
//! Every tunable constant of the engine lives here so a deployment can
//! override them from `config.json` without recompiling. The defaults are
//! the tuned production values.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{FolioError, FolioResult};

/// Global motion configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct MotionConfig {
    /// Spring constants per element class.
    pub springs: SpringPresets,

    /// Marquee behaviour.
    pub marquee: MarqueeDefaults,

    /// Cursor replacement behaviour.
    pub cursor: CursorDefaults,

    /// Scroll-reveal behaviour.
    pub reveal: RevealDefaults,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Stiffness/damping/mass triple for a damped spring.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpringParams {
    pub stiffness: f64,
    pub damping: f64,
    #[serde(default = "default_mass")]
    pub mass: f64,
}

fn default_mass() -> f64 {
    1.0
}

impl SpringParams {
    pub const fn new(stiffness: f64, damping: f64) -> Self {
        Self {
            stiffness,
            damping,
            mass: 1.0,
        }
    }

    /// Damping coefficient that makes a spring of this stiffness/mass
    /// critically damped.
    pub fn critical_damping(stiffness: f64, mass: f64) -> f64 {
        2.0 * (stiffness.max(0.0001) * mass.max(0.0001)).sqrt()
    }

    /// Damping ratio ζ (1.0 = critical, < 1.0 = overshoots).
    pub fn damping_ratio(&self) -> f64 {
        self.damping / Self::critical_damping(self.stiffness, self.mass)
    }
}

/// Named spring constants.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpringPresets {
    /// Large trailing cursor ring.
    pub cursor_ring: SpringParams,
    /// Cursor ring when animations should be reduced.
    pub cursor_ring_reduced: SpringParams,
    /// Small cursor dot.
    pub cursor_dot: SpringParams,
    /// Cursor dot when animations should be reduced.
    pub cursor_dot_reduced: SpringParams,
    /// Elements pulled toward the pointer.
    pub magnetic: SpringParams,
    /// Elements parallaxing against the whole viewport.
    pub parallax: SpringParams,
    /// Smoothing applied to raw scroll velocity.
    pub scroll_velocity: SpringParams,
}

impl Default for SpringPresets {
    fn default() -> Self {
        Self {
            cursor_ring: SpringParams::new(700.0, 25.0),
            cursor_ring_reduced: SpringParams::new(400.0, 50.0),
            cursor_dot: SpringParams::new(1000.0, 50.0),
            cursor_dot_reduced: SpringParams::new(800.0, 100.0),
            magnetic: SpringParams::new(150.0, 15.0),
            parallax: SpringParams::new(700.0, 25.0),
            scroll_velocity: SpringParams::new(400.0, 50.0),
        }
    }
}

/// Marquee parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarqueeDefaults {
    /// Drift speed in track units per second.
    pub base_velocity: f64,

    /// How many copies of the content the renderer should lay out.
    pub copies: u32,

    /// Lower bound of the scroll-driven speed multiplier.
    pub min_multiplier: f64,

    /// Upper bound of the scroll-driven speed multiplier.
    pub max_multiplier: f64,

    /// Smoothed scroll velocity (px/s) that maps to `velocity_factor_max`.
    pub velocity_input_range: f64,

    /// Velocity factor produced at `velocity_input_range`.
    pub velocity_factor_max: f64,
}

impl Default for MarqueeDefaults {
    fn default() -> Self {
        Self {
            base_velocity: -6.0,
            copies: 6,
            min_multiplier: 0.0,
            max_multiplier: 10.0,
            velocity_input_range: 1000.0,
            velocity_factor_max: 5.0,
        }
    }
}

/// Cursor replacement parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CursorDefaults {
    /// Pointer-move throttle interval.
    pub throttle_ms: u64,

    /// Throttle interval when animations should be reduced.
    pub reduced_throttle_ms: u64,

    /// Viewports at or below this width count as mobile.
    pub mobile_max_width: f64,

    /// Click ripple lifetime.
    pub ripple_duration_ms: f64,

    /// Final ripple diameter.
    pub ripple_size: f64,
}

impl Default for CursorDefaults {
    fn default() -> Self {
        Self {
            throttle_ms: 16,
            reduced_throttle_ms: 32,
            mobile_max_width: 768.0,
            ripple_duration_ms: 600.0,
            ripple_size: 100.0,
        }
    }
}

/// Scroll-reveal parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RevealDefaults {
    pub duration_secs: f64,
    pub offset_y: f64,
    pub threshold: f64,
    /// Viewport inset (px) applied to the top and bottom before the
    /// intersection test.
    pub margin_px: f64,
}

impl Default for RevealDefaults {
    fn default() -> Self {
        Self {
            duration_secs: 0.6,
            offset_y: 50.0,
            threshold: 0.1,
            margin_px: 100.0,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "folio=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl MotionConfig {
    /// Load config from the standard location, falling back to defaults.
    pub fn load() -> Self {
        let config_path = config_file_path();
        if !config_path.exists() {
            return Self::default();
        }
        match Self::load_from(&config_path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Failed to load config at {:?}: {}", config_path, e);
                Self::default()
            }
        }
    }

    /// Load config from an explicit path.
    pub fn load_from(path: &Path) -> FolioResult<Self> {
        if !path.exists() {
            return Err(FolioError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save config to the standard location.
    pub fn save(&self) -> FolioResult<()> {
        self.save_to(&config_file_path())
    }

    /// Save config to an explicit path.
    pub fn save_to(&self, path: &Path) -> FolioResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Reject values the engine cannot integrate.
    pub fn validate(&self) -> FolioResult<()> {
        let springs = [
            ("cursor_ring", self.springs.cursor_ring),
            ("cursor_ring_reduced", self.springs.cursor_ring_reduced),
            ("cursor_dot", self.springs.cursor_dot),
            ("cursor_dot_reduced", self.springs.cursor_dot_reduced),
            ("magnetic", self.springs.magnetic),
            ("parallax", self.springs.parallax),
            ("scroll_velocity", self.springs.scroll_velocity),
        ];
        for (name, params) in springs {
            if !(params.stiffness > 0.0 && params.damping >= 0.0 && params.mass > 0.0) {
                return Err(FolioError::config(format!(
                    "spring `{name}` needs stiffness > 0, damping >= 0, mass > 0"
                )));
            }
        }
        if self.marquee.min_multiplier > self.marquee.max_multiplier {
            return Err(FolioError::config(
                "marquee.min_multiplier exceeds marquee.max_multiplier",
            ));
        }
        if self.marquee.velocity_input_range <= 0.0 {
            return Err(FolioError::config(
                "marquee.velocity_input_range must be positive",
            ));
        }
        Ok(())
    }
}

/// Base directory for Folio's per-user files.
pub fn config_dir() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("folio")
}

/// Standard config file location.
fn config_file_path() -> PathBuf {
    config_dir().join("config.json")
}
