//! Damped spring smoothing.
//!
//! A spring moves `position` toward `target` with the discrete update
//!
//! ```text
//! velocity += ((target - position) * stiffness - velocity * damping) / mass * dt
//! position += velocity * dt
//! ```
//!
//! [`step`] is the raw rule. [`advance`] is what frame callbacks use: it
//! clamps the frame delta and splits it into sub-steps no longer than
//! [`MAX_SUBSTEP_SECS`], so stiff springs stay stable when frames drop.

use serde::{Deserialize, Serialize};

use folio_common::config::SpringParams;
use folio_input_model::geometry::Point2D;

/// Longest single integration step.
pub const MAX_SUBSTEP_SECS: f64 = 1.0 / 120.0;

/// Longest frame delta integrated in one `advance` call.
pub const MAX_FRAME_SECS: f64 = 0.1;

/// Distance from target below which a spring may come to rest.
pub const DEFAULT_REST_DELTA: f64 = 0.01;

/// Speed below which a spring may come to rest.
pub const DEFAULT_REST_SPEED: f64 = 0.01;

/// Per-axis spring state.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SpringState {
    pub position: f64,
    pub velocity: f64,
    pub target: f64,
}

impl SpringState {
    pub fn at(position: f64) -> Self {
        Self {
            position,
            velocity: 0.0,
            target: position,
        }
    }

    pub fn is_at_rest(&self, rest_delta: f64, rest_speed: f64) -> bool {
        (self.position - self.target).abs() < rest_delta && self.velocity.abs() < rest_speed
    }
}

/// One semi-implicit Euler step of `dt_secs`.
pub fn step(state: SpringState, params: &SpringParams, dt_secs: f64) -> SpringState {
    let mass = params.mass.max(0.0001);
    let acceleration =
        ((state.target - state.position) * params.stiffness - state.velocity * params.damping) / mass;
    let velocity = state.velocity + acceleration * dt_secs;
    SpringState {
        position: state.position + velocity * dt_secs,
        velocity,
        target: state.target,
    }
}

/// Advance a spring by a whole frame of `dt_secs`.
///
/// Non-positive or non-finite deltas leave the state untouched.
pub fn advance(state: SpringState, params: &SpringParams, dt_secs: f64) -> SpringState {
    if !(dt_secs > 0.0) || !dt_secs.is_finite() {
        return state;
    }
    let dt = dt_secs.min(MAX_FRAME_SECS);
    let substeps = (dt / MAX_SUBSTEP_SECS).ceil().max(1.0) as u32;
    let h = dt / substeps as f64;
    (0..substeps).fold(state, |s, _| step(s, params, h))
}

/// A single animated value with rest detection.
#[derive(Debug, Clone, PartialEq)]
pub struct Spring {
    state: SpringState,
    params: SpringParams,
    rest_delta: f64,
    rest_speed: f64,
    resting: bool,
}

impl Spring {
    pub fn new(params: SpringParams) -> Self {
        Self::with_position(params, 0.0)
    }

    pub fn with_position(params: SpringParams, position: f64) -> Self {
        Self {
            state: SpringState::at(position),
            params,
            rest_delta: DEFAULT_REST_DELTA,
            rest_speed: DEFAULT_REST_SPEED,
            resting: true,
        }
    }

    /// Override the rest thresholds.
    pub fn with_rest_thresholds(mut self, rest_delta: f64, rest_speed: f64) -> Self {
        self.rest_delta = rest_delta;
        self.rest_speed = rest_speed;
        self
    }

    pub fn set_target(&mut self, target: f64) {
        if !target.is_finite() {
            tracing::debug!(target, "Ignoring non-finite spring target");
            return;
        }
        if target != self.state.target {
            self.state.target = target;
            self.resting = false;
        }
    }

    /// Move instantly to `value` and stop.
    pub fn jump_to(&mut self, value: f64) {
        if value.is_finite() {
            self.state = SpringState::at(value);
            self.resting = true;
        }
    }

    pub fn set_params(&mut self, params: SpringParams) {
        self.params = params;
    }

    /// Advance by `dt_ms` and return the new position. Springs at rest are
    /// not integrated.
    pub fn advance(&mut self, dt_ms: f64) -> f64 {
        if self.resting {
            return self.state.position;
        }
        self.state = advance(self.state, &self.params, dt_ms / 1000.0);
        if self.state.is_at_rest(self.rest_delta, self.rest_speed) {
            self.state = SpringState::at(self.state.target);
            self.resting = true;
        }
        self.state.position
    }

    pub fn position(&self) -> f64 {
        self.state.position
    }

    pub fn velocity(&self) -> f64 {
        self.state.velocity
    }

    pub fn target(&self) -> f64 {
        self.state.target
    }

    pub fn state(&self) -> SpringState {
        self.state
    }

    pub fn params(&self) -> SpringParams {
        self.params
    }

    pub fn is_at_rest(&self) -> bool {
        self.resting
    }
}

/// Two springs sharing parameters, for x/y offsets.
#[derive(Debug, Clone, PartialEq)]
pub struct Spring2D {
    pub x: Spring,
    pub y: Spring,
}

impl Spring2D {
    pub fn new(params: SpringParams) -> Self {
        Self {
            x: Spring::new(params),
            y: Spring::new(params),
        }
    }

    pub fn set_target(&mut self, target: Point2D) {
        self.x.set_target(target.x);
        self.y.set_target(target.y);
    }

    pub fn jump_to(&mut self, value: Point2D) {
        self.x.jump_to(value.x);
        self.y.jump_to(value.y);
    }

    pub fn set_params(&mut self, params: SpringParams) {
        self.x.set_params(params);
        self.y.set_params(params);
    }

    pub fn advance(&mut self, dt_ms: f64) -> Point2D {
        Point2D::new(self.x.advance(dt_ms), self.y.advance(dt_ms))
    }

    pub fn position(&self) -> Point2D {
        Point2D::new(self.x.position(), self.y.position())
    }

    pub fn target(&self) -> Point2D {
        Point2D::new(self.x.target(), self.y.target())
    }

    pub fn is_at_rest(&self) -> bool {
        self.x.is_at_rest() && self.y.is_at_rest()
    }
}
