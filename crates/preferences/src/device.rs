//! Device capability profiling.
//!
//! Capability absence is handled once, up front: a touch-primary or
//! small-viewport device never gets the cursor replacement, and low-end
//! hardware gets the softer "reduced" spring presets.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Viewports at or below this width count as mobile.
pub const DEFAULT_MOBILE_MAX_WIDTH: f64 = 768.0;

/// Core count and memory reported when the platform does not say.
const ASSUMED_CORES: u32 = 4;
const ASSUMED_MEMORY_GB: f64 = 4.0;

fn mobile_user_agent() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)mobile|android|iphone|ipad|phone").expect("static pattern compiles")
    })
}

/// What the runtime environment reported about itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceProfile {
    #[serde(default)]
    pub user_agent: String,

    pub viewport_width: f64,

    /// Logical cores, if reported.
    #[serde(default)]
    pub hardware_concurrency: Option<u32>,

    /// Device memory in GB, if reported.
    #[serde(default)]
    pub device_memory_gb: Option<f64>,

    /// Primary pointer is a touch screen.
    #[serde(default)]
    pub touch_primary: bool,

    /// Platform reduced-motion signal.
    #[serde(default)]
    pub prefers_reduced_motion: bool,

    #[serde(default = "default_mobile_max_width")]
    pub mobile_max_width: f64,
}

fn default_mobile_max_width() -> f64 {
    DEFAULT_MOBILE_MAX_WIDTH
}

impl Default for DeviceProfile {
    fn default() -> Self {
        Self {
            user_agent: String::new(),
            viewport_width: 1920.0,
            hardware_concurrency: None,
            device_memory_gb: None,
            touch_primary: false,
            prefers_reduced_motion: false,
            mobile_max_width: DEFAULT_MOBILE_MAX_WIDTH,
        }
    }
}

impl DeviceProfile {
    /// A desktop with a mouse and a large viewport.
    pub fn desktop(viewport_width: f64) -> Self {
        Self {
            viewport_width,
            ..Self::default()
        }
    }

    /// Mobile user agent or a narrow viewport.
    pub fn is_mobile(&self) -> bool {
        mobile_user_agent().is_match(&self.user_agent) || self.viewport_width <= self.mobile_max_width
    }

    /// Fewer than four cores or less than 4 GB of memory.
    pub fn is_low_end(&self) -> bool {
        let cores = self.hardware_concurrency.unwrap_or(ASSUMED_CORES);
        let memory = self.device_memory_gb.unwrap_or(ASSUMED_MEMORY_GB);
        cores < 4 || memory < 4.0
    }

    /// Use the softer spring presets and slower throttles.
    pub fn should_reduce_animations(&self) -> bool {
        self.is_mobile() || self.is_low_end() || self.prefers_reduced_motion
    }

    /// Whether the custom cursor may replace the platform pointer.
    pub fn supports_custom_cursor(&self) -> bool {
        !self.is_mobile() && !self.touch_primary
    }

    /// Record a viewport resize.
    pub fn resize(&mut self, viewport_width: f64) {
        self.viewport_width = viewport_width;
    }
}
