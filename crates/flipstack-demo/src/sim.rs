//! Headless run loop: pointer samples → recognizer → session → animator.
//!
//! The simulation keeps a virtual clock that advances in whole display
//! frames. Before each step is applied the animator is ticked up to the
//! step's timestamp; after the last step the animator runs until every
//! spring is at rest (or a time limit is hit). Stretches where nothing is
//! animating are skipped in one jump, so gaps in a trace cost nothing.

use std::time::Duration;

use flipstack_core::{
    AnimationDriver, CardSnapshot, CardState, CardVisual, Completion, DriverCommand, FlipConfig,
    FlipSession, PanRecognizer, Rect, RecordingDriver, SessionOutput, Settlement, SpringAnimator,
    SpringSpec,
};
use serde::Serialize;
use tracing::{debug, info};
use web_time::Instant;

use crate::error::{DemoError, Result};
use crate::scenario::{Action, Step};

/// Longest the animator may run after the last step.
const SETTLE_LIMIT: Duration = Duration::from_secs(5);

/// One line of simulation output.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "record", rename_all = "snake_case")]
pub enum Record {
    /// Cards whose springs were running during this frame.
    Frame { t_ms: f64, cards: Vec<CardSnapshot> },
    Settled { t_ms: f64, settlement: Settlement },
    Command { t_ms: f64, command: DriverCommand },
    Summary(Summary),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Summary {
    pub cards: usize,
    pub frames: usize,
    pub finished: usize,
    pub cancelled: usize,
    pub active_index: usize,
    pub cumulative_progress: f64,
}

/// Forwards every command to both drivers.
struct Tee<A, B>(A, B);

impl<A: AnimationDriver, B: AnimationDriver> AnimationDriver for Tee<A, B> {
    fn set_card_visual(&mut self, card: usize, visual: CardVisual) {
        self.0.set_card_visual(card, visual);
        self.1.set_card_visual(card, visual);
    }

    fn animate_card(&mut self, card: usize, target: CardState, spring: SpringSpec) {
        self.0.animate_card(card, target, spring);
        self.1.animate_card(card, target, spring);
    }

    fn animate_card_frame(&mut self, card: usize, frame: Rect, spring: SpringSpec) {
        self.0.animate_card_frame(card, frame, spring);
        self.1.animate_card_frame(card, frame, spring);
    }
}

/// Knobs for one run.
#[derive(Debug, Clone, Copy)]
pub struct SimOptions {
    pub fps: f64,
    /// Emit a [`Record::Command`] for every driver command.
    pub commands: bool,
}

impl Default for SimOptions {
    fn default() -> Self {
        Self {
            fps: 60.0,
            commands: false,
        }
    }
}

pub struct Simulation {
    session: FlipSession,
    recognizer: PanRecognizer,
    animator: SpringAnimator,
    recorder: RecordingDriver,
    frame: Duration,
    clock: Duration,
    origin: Instant,
    /// Timestamp of the first step; pointer times are measured from here.
    first_step: Option<Duration>,
    options: SimOptions,
    records: Vec<Record>,
    frames: usize,
}

impl Simulation {
    pub fn new(cards: usize, config: FlipConfig, options: SimOptions) -> Result<Self> {
        if !(options.fps.is_finite() && options.fps > 0.0 && options.fps <= 1000.0) {
            return Err(DemoError::invalid(format!(
                "fps must be in (0, 1000], got {}",
                options.fps
            )));
        }
        let session = FlipSession::with_config(cards, config)?;
        let animator = SpringAnimator::new(session.stack())
            .with_perspective_distance(session.config().visual.perspective_distance);
        Ok(Self {
            session,
            recognizer: PanRecognizer::default(),
            animator,
            recorder: RecordingDriver::new(),
            frame: Duration::from_secs_f64(1.0 / options.fps),
            clock: Duration::ZERO,
            origin: Instant::now(),
            first_step: None,
            options,
            records: Vec::new(),
            frames: 0,
        })
    }

    #[inline]
    #[must_use]
    pub fn session(&self) -> &FlipSession {
        &self.session
    }

    #[inline]
    #[must_use]
    pub fn animator(&self) -> &SpringAnimator {
        &self.animator
    }

    /// Apply every step in order, then let the animator come to rest.
    pub fn run(mut self, steps: &[Step]) -> Vec<Record> {
        for step in steps {
            self.apply(step);
        }
        self.finish()
    }

    /// Apply one step at its timestamp.
    pub fn apply(&mut self, step: &Step) {
        let at = Duration::from_millis(step.t_ms);
        self.tick_until(at);
        let t_ms = millis(at);
        let since_first = at.saturating_sub(*self.first_step.get_or_insert(at));

        let mut driver = Tee(&mut self.animator, &mut self.recorder);
        let settlement = match step.action {
            Action::Pointer(sample) => self
                .recognizer
                .process(sample.phase, sample.point(), self.origin + since_first)
                .and_then(|event| match self.session.handle(event, &mut driver) {
                    SessionOutput::Settled(settlement) => Some(settlement),
                    SessionOutput::Began | SessionOutput::Updated(_) => None,
                }),
            Action::Advance => self.session.explicit_advance(&mut driver),
        };

        for command in self.recorder.drain() {
            if self.options.commands {
                self.records.push(Record::Command { t_ms, command });
            }
        }
        if let Some(settlement) = settlement {
            debug!(t_ms, card = settlement.card, "step settled");
            self.records.push(Record::Settled { t_ms, settlement });
        }
    }

    /// Run the animator to rest and return every record with a summary.
    pub fn finish(mut self) -> Vec<Record> {
        let limit = self.clock + SETTLE_LIMIT;
        while !self.animator.is_idle() && self.clock < limit {
            self.tick_frame();
        }
        if !self.animator.is_idle() {
            info!(limit_ms = millis(SETTLE_LIMIT), "animator still running at time limit");
        }
        let summary = self.summary();
        self.records.push(Record::Summary(summary));
        self.records
    }

    #[must_use]
    pub fn summary(&self) -> Summary {
        let (finished, cancelled) =
            self.records
                .iter()
                .fold((0, 0), |(finished, cancelled), record| match record {
                    Record::Settled { settlement, .. } => match settlement.completion {
                        Completion::Finished => (finished + 1, cancelled),
                        Completion::Cancelled => (finished, cancelled + 1),
                    },
                    _ => (finished, cancelled),
                });
        Summary {
            cards: self.session.card_count(),
            frames: self.frames,
            finished,
            cancelled,
            active_index: self.session.active_index(),
            cumulative_progress: self.session.cumulative_progress(),
        }
    }

    fn tick_until(&mut self, at: Duration) {
        while self.clock + self.frame <= at {
            if self.animator.is_idle() {
                self.skip_idle_frames(at);
                return;
            }
            self.tick_frame();
        }
    }

    /// Move the clock to the last frame boundary at or before `at` without
    /// emitting frames. Only valid while the animator is idle.
    fn skip_idle_frames(&mut self, at: Duration) {
        let frame_nanos = self.frame.as_nanos();
        if frame_nanos == 0 {
            return;
        }
        let whole_frames = at.saturating_sub(self.clock).as_nanos() / frame_nanos;
        let skipped = whole_frames * frame_nanos;
        let skipped = Duration::new(
            (skipped / 1_000_000_000) as u64,
            (skipped % 1_000_000_000) as u32,
        );
        self.animator.tick(skipped);
        self.clock += skipped;
    }

    fn tick_frame(&mut self) {
        let was_idle = self.animator.is_idle();
        self.animator.tick(self.frame);
        self.clock += self.frame;
        if was_idle {
            return;
        }
        self.frames += 1;
        let cards = self
            .animator
            .snapshots()
            .into_iter()
            .filter(|snap| snap.animating || self.recently_settled(snap))
            .collect();
        self.records.push(Record::Frame {
            t_ms: millis(self.clock),
            cards,
        });
    }

    /// A card that came to rest during this frame is still reported once.
    fn recently_settled(&self, snap: &CardSnapshot) -> bool {
        let Some(Record::Frame { cards, .. }) = self
            .records
            .iter()
            .rev()
            .find(|r| matches!(r, Record::Frame { .. }))
        else {
            return false;
        };
        cards.iter().any(|prev| prev.card == snap.card && prev.animating)
    }
}

fn millis(duration: Duration) -> f64 {
    duration.as_secs_f64() * 1000.0
}

/// Convenience: build a simulation and run `steps` through it.
pub fn simulate(
    cards: usize,
    config: FlipConfig,
    options: SimOptions,
    steps: &[Step],
) -> Result<Vec<Record>> {
    Ok(Simulation::new(cards, config, options)?.run(steps))
}
