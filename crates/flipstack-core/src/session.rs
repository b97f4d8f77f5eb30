#![forbid(unsafe_code)]

//! The interaction session: one mutable record per screen lifetime.
//!
//! [`FlipSession`] owns the cumulative progress and the progress tracker and
//! orchestrates the tracker, resolver and decider. It is created when the
//! screen appears and dropped when it goes away; there is no global state.
//! The [`AnimationDriver`] is passed into each operation rather than stored,
//! so the caller keeps ownership of whatever renders the cards.
//!
//! # Flow
//!
//! - [`sample_begin`](FlipSession::sample_begin): reset the tracker.
//! - [`sample_changed`](FlipSession::sample_changed): accumulate, resolve the
//!   active card and push its visual to the driver.
//! - [`sample_end`](FlipSession::sample_end): decide finish/cancel, animate
//!   the active and next card, snap the cumulative progress.
//! - [`explicit_advance`](FlipSession::explicit_advance): finish the active
//!   card without a gesture.
//!
//! # Invariants
//!
//! 1. `0 <= cumulative_progress() <= card_count()` after every operation.
//! 2. Live updates address exactly one card, the active one.
//! 3. No operation panics, whatever the sample values.

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::card::{CardStack, StackError};
use crate::completion::{
    CardState, Completion, CompletionDecider, PanDirection, settle_cumulative, spring_velocity,
};
use crate::config::FlipConfig;
use crate::driver::AnimationDriver;
use crate::geometry::{Point, Velocity};
use crate::gesture::PanEvent;
use crate::progress::{ProgressTracker, accumulate};
use crate::resolver::IndexResolver;
use crate::visual::{CardVisual, Matrix4};

/// Result of one intermediate sample.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
pub struct LiveUpdate {
    /// Card that received the visual.
    pub card: usize,
    /// Its local progress (unclamped, as resolved).
    pub local_progress: f64,
    /// Visual pushed to the driver.
    pub visual: CardVisual,
    /// `visual` projected with the configured perspective distance.
    pub transform: Matrix4,
    /// `false` when the local progress was out of range and the card was
    /// reset to neutral instead.
    pub in_range: bool,
}

/// Result of a gesture end or explicit advance.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
pub struct Settlement {
    /// Card that was active when the gesture ended.
    pub card: usize,
    pub completion: Completion,
    /// Local progress at release.
    pub local_progress: f64,
    /// Direction at release.
    pub direction: PanDirection,
    /// Spring velocity handed to the active card's animation.
    pub spring_velocity: f64,
    /// Card moved between slots, if there is one after the active card.
    pub next_card: Option<usize>,
    /// Cumulative progress after snapping.
    pub cumulative_progress: f64,
}

impl Settlement {
    /// Card that is active once the settle animation has started.
    #[must_use]
    pub fn next_active(&self, card_count: usize) -> usize {
        IndexResolver::new(card_count).active_index(self.cumulative_progress)
    }
}

/// What handling a [`PanEvent`] produced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SessionOutput {
    Began,
    Updated(LiveUpdate),
    Settled(Settlement),
}

/// Interaction session over a stack of cards.
#[derive(Debug, Clone)]
pub struct FlipSession {
    stack: CardStack,
    config: FlipConfig,
    tracker: ProgressTracker,
    resolver: IndexResolver,
    decider: CompletionDecider,
    cumulative_progress: f64,
}

impl FlipSession {
    /// Session over `card_count` cards with the default configuration.
    pub fn new(card_count: usize) -> Result<Self, StackError> {
        Self::with_config(card_count, FlipConfig::default())
    }

    /// Session over `card_count` cards.
    pub fn with_config(card_count: usize, config: FlipConfig) -> Result<Self, StackError> {
        let stack = CardStack::new(card_count, config.layout)?;
        Ok(Self {
            resolver: IndexResolver::new(stack.len()),
            tracker: ProgressTracker::new(config.tracking.sensitivity),
            decider: CompletionDecider::from_config(&config.completion),
            stack,
            config,
            cumulative_progress: 0.0,
        })
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    #[inline]
    #[must_use]
    pub fn stack(&self) -> &CardStack {
        &self.stack
    }

    #[inline]
    #[must_use]
    pub fn config(&self) -> &FlipConfig {
        &self.config
    }

    #[inline]
    #[must_use]
    pub fn card_count(&self) -> usize {
        self.stack.len()
    }

    #[inline]
    #[must_use]
    pub fn cumulative_progress(&self) -> f64 {
        self.cumulative_progress
    }

    /// Card currently receiving live updates.
    #[must_use]
    pub fn active_index(&self) -> usize {
        self.resolver.active_index(self.cumulative_progress)
    }

    /// Local progress of the active card.
    #[must_use]
    pub fn local_progress(&self) -> f64 {
        self.resolver.resolve(self.cumulative_progress).1
    }

    /// Point at which progress was last computed.
    #[must_use]
    pub fn last_sample_point(&self) -> Point {
        self.tracker.last_sample_point()
    }

    /// Return to the top of the stack. Does not touch the driver.
    pub fn reset(&mut self) {
        self.cumulative_progress = 0.0;
        self.tracker.begin(Point::ZERO);
    }

    // -----------------------------------------------------------------------
    // Operations
    // -----------------------------------------------------------------------

    /// A drag began at `point`.
    pub fn sample_begin(&mut self, point: Point) {
        debug!(x = point.x, y = point.y, card = self.active_index(), "pan began");
        self.tracker.begin(point);
    }

    /// A drag moved to `point`. Only the vertical component of `point`
    /// matters; `velocity` is accepted for interface parity and ignored.
    pub fn sample_changed(
        &mut self,
        point: Point,
        _velocity: Velocity,
        driver: &mut impl AnimationDriver,
    ) -> LiveUpdate {
        let delta = self.tracker.changed(point);
        self.cumulative_progress =
            accumulate(self.cumulative_progress, delta, self.stack.len());

        let (card, local_progress) = self.resolver.resolve(self.cumulative_progress);
        let update = self.live_update(card, local_progress);

        trace!(
            card,
            delta,
            local_progress,
            cumulative = self.cumulative_progress,
            "pan changed"
        );
        driver.set_card_visual(card, update.visual);
        update
    }

    /// The drag ended with `velocity`.
    pub fn sample_end(
        &mut self,
        velocity: Velocity,
        driver: &mut impl AnimationDriver,
    ) -> Settlement {
        let direction = PanDirection::from_velocity(velocity);
        let (card, local_progress) = self.resolver.resolve(self.cumulative_progress);
        let completion =
            self.decider
                .decide(local_progress, direction, self.stack.is_last(card));
        let spring_velocity = spring_velocity(velocity.y, self.config.completion.reference_distance);
        self.settle(card, local_progress, direction, completion, spring_velocity, driver)
    }

    /// Finish the active card without a gesture.
    ///
    /// Returns `None` and leaves everything untouched when the active card is
    /// the last one, which never finishes.
    pub fn explicit_advance(&mut self, driver: &mut impl AnimationDriver) -> Option<Settlement> {
        let (card, local_progress) = self.resolver.resolve(self.cumulative_progress);
        if self.stack.is_last(card) {
            warn!(card, "explicit advance ignored on last card");
            return None;
        }
        Some(self.settle(
            card,
            local_progress,
            PanDirection::Downwards,
            Completion::Finished,
            0.0,
            driver,
        ))
    }

    /// Dispatch a recognizer event to the matching operation.
    pub fn handle(&mut self, event: PanEvent, driver: &mut impl AnimationDriver) -> SessionOutput {
        match event {
            PanEvent::Began { point } => {
                self.sample_begin(point);
                SessionOutput::Began
            }
            PanEvent::Changed { point, velocity } => {
                SessionOutput::Updated(self.sample_changed(point, velocity, driver))
            }
            PanEvent::Ended { velocity } => SessionOutput::Settled(self.sample_end(velocity, driver)),
        }
    }

    /// Visual for `card` at `local_progress`. Out-of-range progress resets the
    /// card to neutral; clamped accumulation only gets here with values in
    /// `[0, 1]`.
    fn live_update(&self, card: usize, local_progress: f64) -> LiveUpdate {
        let (visual, in_range) = match CardVisual::for_progress(local_progress) {
            Some(visual) => (visual, true),
            None => {
                warn!(
                    card,
                    local_progress,
                    cumulative = self.cumulative_progress,
                    "local progress must be within [0, 1]; resetting card"
                );
                (CardVisual::NEUTRAL, false)
            }
        };
        LiveUpdate {
            card,
            local_progress,
            visual,
            transform: visual.transform(self.config.visual.perspective_distance),
            in_range,
        }
    }

    fn settle(
        &mut self,
        card: usize,
        local_progress: f64,
        direction: PanDirection,
        completion: Completion,
        spring_velocity: f64,
        driver: &mut impl AnimationDriver,
    ) -> Settlement {
        let state = completion.card_state();
        driver.animate_card(
            card,
            state,
            self.config.card_spring.with_initial_velocity(spring_velocity),
        );

        let next_card = card + 1;
        let next_card = self.stack.get(next_card).map(|next| {
            let frame = match state {
                CardState::Finished => self.stack.top_slot(),
                CardState::Initial => next.slot(),
            };
            driver.animate_card_frame(next.index(), frame, self.config.frame_spring);
            next.index()
        });

        let before = self.cumulative_progress;
        self.cumulative_progress = settle_cumulative(before, completion, self.stack.len());

        debug!(
            card,
            ?completion,
            ?direction,
            local_progress,
            spring_velocity,
            cumulative_before = before,
            cumulative_after = self.cumulative_progress,
            "pan settled"
        );

        Settlement {
            card,
            completion,
            local_progress,
            direction,
            spring_velocity,
            next_card,
            cumulative_progress: self.cumulative_progress,
        }
    }
}
