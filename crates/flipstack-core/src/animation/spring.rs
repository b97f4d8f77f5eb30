#![forbid(unsafe_code)]

//! Damped harmonic oscillator used for card settle animations.
//!
//!   a = -stiffness × (position - 1) - damping × velocity
//!
//! Springs are usually built from a [`SpringSpec`] (nominal duration plus
//! damping ratio, the way UI toolkits describe springs) with
//! [`Spring::from_spec`]. The nominal duration is treated as the *response*:
//! the period of the undamped oscillation, giving
//! `stiffness = (2π / response)²` and `damping = 4π·ζ / response` for unit mass.
//!
//! Card springs run in a normalized domain: position 0 is where the animation
//! started, 1 is the target, and the initial velocity is expressed in
//! "animated distance per second".
//!
//! # Invariants
//!
//! 1. Stiffness is at least `MIN_STIFFNESS` and damping is non-negative.
//! 2. Once at rest the spring ignores further ticks.
//! 3. Integration steps never exceed 4 ms; larger `dt` is subdivided.
//!
//! # Failure Modes
//!
//! - Zero or negative response: falls back to the card-settle duration.
//! - Zero damping ratio: oscillates without settling; `is_complete()` may
//!   never return true.

use std::f64::consts::TAU;
use std::time::Duration;

use super::Animation;
use crate::driver::SpringSpec;

/// Maximum dt per integration step.
const MAX_STEP_SECS: f64 = 0.004;

/// Distance from the target below which the spring may come to rest.
const REST_DISTANCE: f64 = 0.001;

/// Speed below which the spring may come to rest.
const REST_SPEED: f64 = 0.01;

/// Floor for stiffness so a huge response cannot stall the spring.
const MIN_STIFFNESS: f64 = 0.1;

/// Normalized 0 → 1 spring, integrated with semi-implicit Euler.
#[derive(Debug, Clone)]
pub struct Spring {
    position: f64,
    velocity: f64,
    stiffness: f64,
    damping: f64,
    at_rest: bool,
}

impl Spring {
    /// Spring shaped by `spec`, starting at 0 with `spec.initial_velocity`.
    ///
    /// Non-finite initial velocities start the spring from standstill.
    #[must_use]
    pub fn from_spec(spec: &SpringSpec) -> Self {
        let response = if spec.duration_secs.is_finite() && spec.duration_secs > 0.0 {
            spec.duration_secs
        } else {
            SpringSpec::CARD_SETTLE.duration_secs
        };
        let omega = TAU / response;
        let velocity = if spec.initial_velocity.is_finite() {
            spec.initial_velocity
        } else {
            0.0
        };
        Self {
            position: 0.0,
            velocity,
            stiffness: (omega * omega).max(MIN_STIFFNESS),
            damping: (2.0 * spec.damping_ratio * omega).max(0.0),
            at_rest: false,
        }
    }

    /// Current position (unclamped; overshoot shows up as values past 1).
    #[inline]
    #[must_use]
    pub fn position(&self) -> f64 {
        self.position
    }

    #[inline]
    #[must_use]
    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    #[inline]
    #[must_use]
    pub fn stiffness(&self) -> f64 {
        self.stiffness
    }

    /// ζ = c / (2√k).
    #[must_use]
    pub fn damping_ratio(&self) -> f64 {
        self.damping / (2.0 * self.stiffness.sqrt())
    }

    fn step(&mut self, dt: f64) {
        let acceleration = -self.stiffness * (self.position - 1.0) - self.damping * self.velocity;
        self.velocity += acceleration * dt;
        self.position += self.velocity * dt;
    }
}

impl Animation for Spring {
    fn tick(&mut self, dt: Duration) {
        if self.at_rest {
            return;
        }
        let mut remaining = dt.as_secs_f64();
        while remaining > 0.0 {
            let step_dt = remaining.min(MAX_STEP_SECS);
            self.step(step_dt);
            remaining -= step_dt;
        }
        if (self.position - 1.0).abs() < REST_DISTANCE && self.velocity.abs() < REST_SPEED {
            self.position = 1.0;
            self.velocity = 0.0;
            self.at_rest = true;
        }
    }

    fn is_complete(&self) -> bool {
        self.at_rest
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS_16: Duration = Duration::from_millis(16);

    fn simulate(spring: &mut Spring, frames: usize) {
        for _ in 0..frames {
            spring.tick(MS_16);
        }
    }

    fn max_position(spring: &mut Spring, frames: usize) -> f64 {
        let mut max = f64::MIN;
        for _ in 0..frames {
            spring.tick(MS_16);
            max = max.max(spring.position());
        }
        max
    }

    #[test]
    fn spec_maps_to_damping_ratio() {
        let spring = Spring::from_spec(&SpringSpec::CARD_SETTLE);
        assert!((spring.damping_ratio() - 0.9).abs() < 1e-9);
        let spring = Spring::from_spec(&SpringSpec::FRAME_SETTLE);
        assert!((spring.damping_ratio() - 0.4).abs() < 1e-9);
    }

    #[test]
    fn spec_carries_initial_velocity() {
        let spring = Spring::from_spec(&SpringSpec::FRAME_SETTLE);
        assert_eq!(spring.velocity(), 1.0);
    }

    #[test]
    fn card_settle_converges_without_visible_overshoot() {
        let mut spring = Spring::from_spec(&SpringSpec::CARD_SETTLE);
        let max = max_position(&mut spring, 200);
        assert!(max < 1.01, "overshoot {max}");
        assert!(spring.is_complete());
        assert_eq!(spring.position(), 1.0);
    }

    #[test]
    fn frame_settle_bounces_then_rests() {
        let mut spring = Spring::from_spec(&SpringSpec::FRAME_SETTLE);
        let max = max_position(&mut spring, 300);
        assert!(max > 1.1, "underdamped spring should overshoot, max {max}");
        assert!(spring.is_complete());
    }

    #[test]
    fn higher_initial_velocity_moves_further_first_frame() {
        let mut slow = Spring::from_spec(&SpringSpec::CARD_SETTLE);
        let mut fast = Spring::from_spec(&SpringSpec::CARD_SETTLE.with_initial_velocity(8.0));
        slow.tick(MS_16);
        fast.tick(MS_16);
        assert!(fast.position() > slow.position());
    }

    #[test]
    fn invalid_duration_falls_back() {
        let spec = SpringSpec {
            duration_secs: 0.0,
            damping_ratio: 0.9,
            initial_velocity: 0.0,
        };
        let fallback = Spring::from_spec(&SpringSpec::CARD_SETTLE);
        assert_eq!(Spring::from_spec(&spec).stiffness(), fallback.stiffness());
    }

    #[test]
    fn non_finite_velocity_starts_from_standstill() {
        let spring = Spring::from_spec(&SpringSpec::CARD_SETTLE.with_initial_velocity(f64::NAN));
        assert_eq!(spring.velocity(), 0.0);
    }

    #[test]
    fn large_dt_subdivided() {
        let mut spring = Spring::from_spec(&SpringSpec::CARD_SETTLE);
        spring.tick(Duration::from_secs(5));
        assert!((spring.position() - 1.0).abs() < 0.01);
    }

    #[test]
    fn at_rest_spring_ignores_ticks() {
        let mut spring = Spring::from_spec(&SpringSpec::CARD_SETTLE);
        simulate(&mut spring, 200);
        assert!(spring.is_complete());
        spring.tick(MS_16);
        assert_eq!(spring.position(), 1.0);
    }

    #[test]
    fn deterministic_across_runs() {
        let run = || {
            let mut spring = Spring::from_spec(&SpringSpec::FRAME_SETTLE);
            (0..40)
                .map(|_| {
                    spring.tick(MS_16);
                    spring.position()
                })
                .collect::<Vec<_>>()
        };
        assert_eq!(run(), run());
    }
}
