#![forbid(unsafe_code)]

//! Pan recognition: raw pointer samples → [`PanEvent`]s.
//!
//! [`PanRecognizer`] is a small state machine that watches a single pointer
//! and reports a pan once it has moved far enough from where it went down.
//! It also estimates release velocity over a short horizon, which the session
//! needs to pick a direction and a spring velocity.
//!
//! # State Machine
//!
//! ```text
//! Idle --Down--> Pressed --Move (>= slop)--> Panning --Up--> Idle
//!                   |                            |
//!                   +-----------Up---------------+-- (no event for a tap)
//! ```
//!
//! # Invariants
//!
//! 1. Every `Began` is followed by zero or more `Changed` and exactly one
//!    `Ended`, unless [`PanRecognizer::reset`] is called in between.
//! 2. A press released before crossing the slop produces no events.
//! 3. Velocity is zero if the pointer was still for longer than
//!    [`PanConfig::stopped_after`] before release.

use std::collections::VecDeque;
use std::time::Duration;

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};
use web_time::Instant;

use crate::geometry::{Point, Velocity};

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// Pan gesture phases consumed by [`crate::session::FlipSession::handle`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(tag = "phase", rename_all = "snake_case"))]
pub enum PanEvent {
    Began { point: Point },
    Changed { point: Point, velocity: Velocity },
    Ended { velocity: Velocity },
}

/// Raw pointer phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(rename_all = "snake_case"))]
pub enum PointerPhase {
    Down,
    Move,
    Up,
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Thresholds for pan recognition.
#[derive(Debug, Clone)]
pub struct PanConfig {
    /// Distance the pointer must travel before a pan begins (default: 10).
    pub slop: f64,
    /// Window of samples used for velocity (default: 100ms).
    pub velocity_horizon: Duration,
    /// Stillness before release after which velocity is zero (default: 40ms).
    pub stopped_after: Duration,
}

impl Default for PanConfig {
    fn default() -> Self {
        Self {
            slop: 10.0,
            velocity_horizon: Duration::from_millis(100),
            stopped_after: Duration::from_millis(40),
        }
    }
}

// ---------------------------------------------------------------------------
// PanRecognizer
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
struct Press {
    start: Point,
    panning: bool,
}

/// Single-pointer pan recognizer.
#[derive(Debug, Clone, Default)]
pub struct PanRecognizer {
    config: PanConfig,
    press: Option<Press>,
    samples: VecDeque<(Instant, Point)>,
}

impl PanRecognizer {
    #[must_use]
    pub fn new(config: PanConfig) -> Self {
        Self {
            config,
            press: None,
            samples: VecDeque::with_capacity(16),
        }
    }

    /// Feed one pointer sample.
    pub fn process(&mut self, phase: PointerPhase, point: Point, now: Instant) -> Option<PanEvent> {
        match phase {
            PointerPhase::Down => {
                self.samples.clear();
                self.push_sample(now, point);
                self.press = Some(Press {
                    start: point,
                    panning: false,
                });
                None
            }
            PointerPhase::Move => {
                let press = self.press.as_mut()?;
                let panning = press.panning;
                let start = press.start;
                if !panning {
                    let dx = point.x - start.x;
                    let dy = point.y - start.y;
                    if dx.hypot(dy) < self.config.slop {
                        self.push_sample(now, point);
                        return None;
                    }
                    if let Some(press) = self.press.as_mut() {
                        press.panning = true;
                    }
                    self.push_sample(now, point);
                    return Some(PanEvent::Began { point });
                }
                self.push_sample(now, point);
                Some(PanEvent::Changed {
                    point,
                    velocity: self.velocity(now),
                })
            }
            PointerPhase::Up => {
                let press = self.press.take()?;
                if !press.panning {
                    self.samples.clear();
                    return None;
                }
                let velocity = self.release_velocity(now, point);
                self.samples.clear();
                Some(PanEvent::Ended { velocity })
            }
        }
    }

    /// Whether a pan is in progress.
    #[inline]
    #[must_use]
    pub fn is_panning(&self) -> bool {
        self.press.as_ref().is_some_and(|p| p.panning)
    }

    /// Drop all state without emitting anything.
    pub fn reset(&mut self) {
        self.press = None;
        self.samples.clear();
    }

    #[inline]
    #[must_use]
    pub fn config(&self) -> &PanConfig {
        &self.config
    }

    fn push_sample(&mut self, now: Instant, point: Point) {
        self.samples.push_back((now, point));
        let horizon = self.config.velocity_horizon;
        while let Some(&(time, _)) = self.samples.front() {
            if now.duration_since(time) > horizon && self.samples.len() > 1 {
                self.samples.pop_front();
            } else {
                break;
            }
        }
    }

    fn velocity(&self, now: Instant) -> Velocity {
        let (Some(&(first_time, first)), Some(&(_, last))) =
            (self.samples.front(), self.samples.back())
        else {
            return Velocity::ZERO;
        };
        let secs = now.duration_since(first_time).as_secs_f64();
        if secs <= 0.0 {
            return Velocity::ZERO;
        }
        Velocity::new((last.x - first.x) / secs, (last.y - first.y) / secs)
    }

    fn release_velocity(&mut self, now: Instant, point: Point) -> Velocity {
        let stopped = self
            .samples
            .back()
            .is_none_or(|&(time, _)| now.duration_since(time) > self.config.stopped_after);
        if stopped {
            return Velocity::ZERO;
        }
        self.push_sample(now, point);
        self.velocity(now)
    }
}
