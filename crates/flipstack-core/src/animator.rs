#![forbid(unsafe_code)]

//! Reference [`AnimationDriver`] that runs card animations with springs.
//!
//! Each card owns at most one progress spring and one frame spring. A new
//! request for a card replaces the running spring and starts from wherever the
//! card currently is, so interrupted animations never jump. Call
//! [`SpringAnimator::tick`] once per frame and read the results back with
//! [`SpringAnimator::snapshot`]. Snapshots carry the card's projected
//! transform for the animator's perspective distance.

use std::time::Duration;

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::animation::{Animation, Spring};
use crate::card::CardStack;
use crate::completion::CardState;
use crate::config::VisualConfig;
use crate::driver::{AnimationDriver, SpringSpec};
use crate::geometry::Rect;
use crate::visual::{CardVisual, Matrix4};

#[derive(Debug, Clone)]
struct ProgressTween {
    from: f64,
    to: f64,
    spring: Spring,
}

#[derive(Debug, Clone)]
struct FrameTween {
    from: Rect,
    to: Rect,
    spring: Spring,
}

#[derive(Debug, Clone)]
struct CardTrack {
    progress: f64,
    visual: CardVisual,
    frame: Rect,
    progress_tween: Option<ProgressTween>,
    frame_tween: Option<FrameTween>,
}

impl CardTrack {
    fn new(frame: Rect) -> Self {
        Self {
            progress: 0.0,
            visual: CardVisual::NEUTRAL,
            frame,
            progress_tween: None,
            frame_tween: None,
        }
    }

    fn tick(&mut self, dt: Duration) {
        if let Some(tween) = self.progress_tween.as_mut() {
            tween.spring.tick(dt);
            let t = tween.spring.position();
            self.progress = tween.from + (tween.to - tween.from) * t;
            self.visual = CardVisual::interpolated(self.progress);
            if tween.spring.is_complete() {
                self.progress = tween.to;
                self.visual = CardVisual::interpolated(tween.to);
                self.progress_tween = None;
            }
        }
        if let Some(tween) = self.frame_tween.as_mut() {
            tween.spring.tick(dt);
            self.frame = tween.from.lerp(&tween.to, tween.spring.position());
            if tween.spring.is_complete() {
                self.frame = tween.to;
                self.frame_tween = None;
            }
        }
    }

    fn is_animating(&self) -> bool {
        self.progress_tween.is_some() || self.frame_tween.is_some()
    }
}

/// Current appearance of one card.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
pub struct CardSnapshot {
    pub card: usize,
    /// Local progress the appearance corresponds to (may overshoot).
    pub progress: f64,
    pub visual: CardVisual,
    /// `visual` with perspective applied.
    pub transform: Matrix4,
    pub frame: Rect,
    pub animating: bool,
}

/// Spring-driven [`AnimationDriver`].
#[derive(Debug, Clone)]
pub struct SpringAnimator {
    tracks: Vec<CardTrack>,
    perspective_distance: f64,
    elapsed: Duration,
}

impl SpringAnimator {
    /// One idle track per card, each resting in its slot.
    #[must_use]
    pub fn new(stack: &CardStack) -> Self {
        Self {
            tracks: stack.iter().map(|card| CardTrack::new(card.slot())).collect(),
            perspective_distance: VisualConfig::default().perspective_distance,
            elapsed: Duration::ZERO,
        }
    }

    /// Project snapshots with `m34 = -1 / distance` (builder pattern).
    #[must_use]
    pub fn with_perspective_distance(mut self, distance: f64) -> Self {
        self.perspective_distance = distance;
        self
    }

    #[inline]
    #[must_use]
    pub fn perspective_distance(&self) -> f64 {
        self.perspective_distance
    }

    /// Advance every running spring by `dt`.
    pub fn tick(&mut self, dt: Duration) {
        self.elapsed += dt;
        for track in &mut self.tracks {
            track.tick(dt);
        }
    }

    /// Tick in `frame` steps until idle or `limit` has elapsed. Returns the
    /// number of frames run.
    pub fn settle(&mut self, frame: Duration, limit: Duration) -> usize {
        if frame.is_zero() {
            return 0;
        }
        let mut spent = Duration::ZERO;
        let mut frames = 0;
        while !self.is_idle() && spent < limit {
            self.tick(frame);
            spent += frame;
            frames += 1;
        }
        frames
    }

    /// Whether no spring is running.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        !self.tracks.iter().any(CardTrack::is_animating)
    }

    /// Total time ticked so far.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Appearance of `card`, if it exists.
    #[must_use]
    pub fn snapshot(&self, card: usize) -> Option<CardSnapshot> {
        self.tracks.get(card).map(|track| CardSnapshot {
            card,
            progress: track.progress,
            visual: track.visual,
            transform: track.visual.transform(self.perspective_distance),
            frame: track.frame,
            animating: track.is_animating(),
        })
    }

    /// Appearance of every card, top to bottom.
    #[must_use]
    pub fn snapshots(&self) -> Vec<CardSnapshot> {
        (0..self.tracks.len())
            .filter_map(|card| self.snapshot(card))
            .collect()
    }

    fn track_mut(&mut self, card: usize) -> Option<&mut CardTrack> {
        let len = self.tracks.len();
        let track = self.tracks.get_mut(card);
        if track.is_none() {
            warn!(card, len, "animation command for unknown card ignored");
        }
        track
    }
}

impl AnimationDriver for SpringAnimator {
    fn set_card_visual(&mut self, card: usize, visual: CardVisual) {
        if let Some(track) = self.track_mut(card) {
            track.progress_tween = None;
            track.progress = 1.0 - visual.opacity;
            track.visual = visual;
        }
    }

    fn animate_card(&mut self, card: usize, target: CardState, spring: SpringSpec) {
        if let Some(track) = self.track_mut(card) {
            track.progress_tween = Some(ProgressTween {
                from: track.progress,
                to: target.progress(),
                spring: Spring::from_spec(&spring),
            });
        }
    }

    fn animate_card_frame(&mut self, card: usize, frame: Rect, spring: SpringSpec) {
        if let Some(track) = self.track_mut(card) {
            track.frame_tween = Some(FrameTween {
                from: track.frame,
                to: frame,
                spring: Spring::from_spec(&spring),
            });
        }
    }
}
