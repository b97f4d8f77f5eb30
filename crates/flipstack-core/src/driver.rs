#![forbid(unsafe_code)]

//! Contract between the session and whatever renders/animates the cards.
//!
//! The session never animates anything itself. It pushes immediate visual
//! updates during a drag and issues fire-and-forget spring requests when a
//! gesture settles. Implementations must tolerate a new request for a card
//! whose previous animation is still running: the new animation starts from
//! the card's *current* visual state and supersedes the old one.
//!
//! [`RecordingDriver`] just records the commands; [`crate::animator::SpringAnimator`]
//! runs them with spring physics.

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};

use crate::completion::CardState;
use crate::geometry::Rect;
use crate::visual::CardVisual;

/// Parameters of a spring animation request.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
pub struct SpringSpec {
    /// Nominal duration in seconds.
    pub duration_secs: f64,
    /// 1.0 = critically damped, below 1.0 bounces.
    pub damping_ratio: f64,
    /// Initial velocity in units of the animated distance per second.
    #[cfg_attr(feature = "config", serde(default))]
    pub initial_velocity: f64,
}

impl Default for SpringSpec {
    fn default() -> Self {
        Self::CARD_SETTLE
    }
}

impl SpringSpec {
    /// Active card settling to its terminal state. The initial velocity is
    /// replaced per gesture.
    pub const CARD_SETTLE: Self = Self {
        duration_secs: 0.6,
        damping_ratio: 0.9,
        initial_velocity: 0.0,
    };

    /// Next card moving between slots.
    pub const FRAME_SETTLE: Self = Self {
        duration_secs: 0.5,
        damping_ratio: 0.4,
        initial_velocity: 1.0,
    };

    /// Copy with a different initial velocity.
    #[must_use]
    pub const fn with_initial_velocity(mut self, initial_velocity: f64) -> Self {
        self.initial_velocity = initial_velocity;
        self
    }
}

/// Receiver of the session's visual commands.
pub trait AnimationDriver {
    /// Apply `visual` to `card` immediately.
    fn set_card_visual(&mut self, card: usize, visual: CardVisual);

    /// Spring `card` from its current appearance to `target`.
    fn animate_card(&mut self, card: usize, target: CardState, spring: SpringSpec);

    /// Spring `card` from its current frame to `frame`.
    fn animate_card_frame(&mut self, card: usize, frame: Rect, spring: SpringSpec);
}

impl<D: AnimationDriver + ?Sized> AnimationDriver for &mut D {
    fn set_card_visual(&mut self, card: usize, visual: CardVisual) {
        (**self).set_card_visual(card, visual);
    }

    fn animate_card(&mut self, card: usize, target: CardState, spring: SpringSpec) {
        (**self).animate_card(card, target, spring);
    }

    fn animate_card_frame(&mut self, card: usize, frame: Rect, spring: SpringSpec) {
        (**self).animate_card_frame(card, frame, spring);
    }
}

/// One command issued through [`AnimationDriver`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(tag = "command", rename_all = "snake_case"))]
pub enum DriverCommand {
    SetVisual {
        card: usize,
        visual: CardVisual,
    },
    AnimateCard {
        card: usize,
        target: CardState,
        spring: SpringSpec,
    },
    AnimateFrame {
        card: usize,
        frame: Rect,
        spring: SpringSpec,
    },
}

impl DriverCommand {
    /// Card the command addresses.
    #[must_use]
    pub fn card(&self) -> usize {
        match *self {
            Self::SetVisual { card, .. }
            | Self::AnimateCard { card, .. }
            | Self::AnimateFrame { card, .. } => card,
        }
    }
}

/// Driver that stores every command in order.
#[derive(Debug, Clone, Default)]
pub struct RecordingDriver {
    commands: Vec<DriverCommand>,
}

impl RecordingDriver {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Commands recorded so far.
    #[must_use]
    pub fn commands(&self) -> &[DriverCommand] {
        &self.commands
    }

    /// Remove and return all recorded commands.
    pub fn drain(&mut self) -> Vec<DriverCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Most recent command, if any.
    #[must_use]
    pub fn last(&self) -> Option<&DriverCommand> {
        self.commands.last()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }
}

impl AnimationDriver for RecordingDriver {
    fn set_card_visual(&mut self, card: usize, visual: CardVisual) {
        self.commands.push(DriverCommand::SetVisual { card, visual });
    }

    fn animate_card(&mut self, card: usize, target: CardState, spring: SpringSpec) {
        self.commands.push(DriverCommand::AnimateCard {
            card,
            target,
            spring,
        });
    }

    fn animate_card_frame(&mut self, card: usize, frame: Rect, spring: SpringSpec) {
        self.commands
            .push(DriverCommand::AnimateFrame { card, frame, spring });
    }
}
