#![forbid(unsafe_code)]

//! Gesture-end decision: does the active card finish or spring back?
//!
//! # State Machine
//!
//! Each gesture on the active card ends in exactly one of two outcomes:
//!
//! - [`Completion::Finished`]: the card flips away and the cumulative progress
//!   advances to the next integer boundary (`floor(c + 1)`).
//! - [`Completion::Cancelled`]: the card springs back and the cumulative
//!   progress retreats to the previous integer boundary (`ceil(c - 1)`).
//!
//! The outcome depends on the card's local progress and the release
//! direction. Releasing upward needs more progress to finish than releasing
//! downward. The last card in the stack always cancels.
//!
//! # Invariants
//!
//! 1. The last card never finishes through [`CompletionDecider::decide`].
//! 2. [`settle_cumulative`] always returns an integer in `[0, card_count]`.
//! 3. [`spring_velocity`] is never negative.

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};

use crate::config::CompletionConfig;
use crate::geometry::Velocity;

/// Vertical direction of the drag at the moment it is sampled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
pub enum PanDirection {
    Upwards,
    Downwards,
}

impl PanDirection {
    /// `Upwards` if the vertical velocity is negative, otherwise `Downwards`.
    #[must_use]
    pub fn from_velocity(velocity: Velocity) -> Self {
        if velocity.y < 0.0 {
            Self::Upwards
        } else {
            Self::Downwards
        }
    }
}

/// Terminal visual state of a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
pub enum CardState {
    /// Resting in its slot, fully visible (progress 0).
    Initial,
    /// Flipped away, fully transparent (progress 1).
    Finished,
}

impl CardState {
    /// Local progress that corresponds to this state.
    #[inline]
    #[must_use]
    pub const fn progress(self) -> f64 {
        match self {
            Self::Initial => 0.0,
            Self::Finished => 1.0,
        }
    }
}

/// Outcome of one gesture on the active card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
pub enum Completion {
    Finished,
    Cancelled,
}

impl Completion {
    /// State the active card animates to.
    #[inline]
    #[must_use]
    pub const fn card_state(self) -> CardState {
        match self {
            Self::Finished => CardState::Finished,
            Self::Cancelled => CardState::Initial,
        }
    }
}

/// Threshold rule for finishing a gesture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompletionDecider {
    upward_threshold: f64,
    downward_threshold: f64,
}

impl Default for CompletionDecider {
    fn default() -> Self {
        Self::from_config(&CompletionConfig::default())
    }
}

impl CompletionDecider {
    #[must_use]
    pub fn new(upward_threshold: f64, downward_threshold: f64) -> Self {
        Self {
            upward_threshold,
            downward_threshold,
        }
    }

    #[must_use]
    pub fn from_config(config: &CompletionConfig) -> Self {
        Self::new(config.upward_threshold, config.downward_threshold)
    }

    /// Decide the outcome for a release at `local_progress` moving in
    /// `direction`. `is_last_card` forces [`Completion::Cancelled`].
    #[must_use]
    pub fn decide(
        &self,
        local_progress: f64,
        direction: PanDirection,
        is_last_card: bool,
    ) -> Completion {
        if is_last_card {
            return Completion::Cancelled;
        }
        let threshold = match direction {
            PanDirection::Upwards => self.upward_threshold,
            PanDirection::Downwards => self.downward_threshold,
        };
        // NaN progress compares false and cancels.
        if local_progress >= threshold {
            Completion::Finished
        } else {
            Completion::Cancelled
        }
    }
}

/// Snap `cumulative` to the integer boundary implied by `completion`, then
/// clamp into `[0, card_count]`.
///
/// Cancelling uses `ceil(c - 1)` rather than `floor(c)`: a release exactly on
/// a boundary (local progress 0) steps back one whole card.
#[must_use]
pub fn settle_cumulative(cumulative: f64, completion: Completion, card_count: usize) -> f64 {
    let snapped = match completion {
        Completion::Cancelled => (cumulative - 1.0).ceil(),
        Completion::Finished => (cumulative + 1.0).floor(),
    };
    if snapped.is_nan() {
        return 0.0;
    }
    // `+ 0.0` folds `-0.0` from `ceil(-0.x)` into `0.0`.
    snapped.clamp(0.0, card_count as f64) + 0.0
}

/// Convert a gesture velocity (touch units per second) into a spring
/// initial velocity in the 0..1 progress domain.
#[must_use]
pub fn spring_velocity(gesture_velocity: f64, reference_distance: f64) -> f64 {
    if !(reference_distance.is_finite() && reference_distance > 0.0) {
        return 0.0;
    }
    let converted = (gesture_velocity / reference_distance).abs();
    if converted.is_finite() { converted } else { 0.0 }
}
