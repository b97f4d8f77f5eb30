//! Built-in gesture scenarios.
//!
//! Each scenario is a timed list of [`Step`]s generated for a given card
//! count. Pointer steps go through the pan recognizer exactly like a replayed
//! trace, so scenarios and traces exercise the same path.

use flipstack_core::PointerPhase;

use crate::error::{DemoError, Result};
use crate::trace::PointerSample;

/// Interval between generated pointer moves.
const MOVE_INTERVAL_MS: u64 = 16;

/// Pause between consecutive gestures so springs can settle.
const GESTURE_GAP_MS: u64 = 900;

/// Horizontal position of generated drags.
const DRAG_X: f64 = 187.5;

/// Name and one-line description of every built-in scenario.
pub const SCENARIOS: &[(&str, &str)] = &[
    ("flip-one", "drag the top card down past the threshold and release"),
    (
        "cancel-upward",
        "drag halfway down, then back up; the card springs back",
    ),
    (
        "last-card",
        "advance to the last card and try to flip it away",
    ),
    ("flip-all", "flip through every card in the stack"),
    ("advance", "finish the top card without a gesture"),
];

/// What happens at one instant of a scenario.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    Pointer(PointerSample),
    Advance,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Step {
    pub t_ms: u64,
    pub action: Action,
}

impl From<PointerSample> for Step {
    fn from(sample: PointerSample) -> Self {
        Self {
            t_ms: sample.t_ms,
            action: Action::Pointer(sample),
        }
    }
}

/// Steps of the built-in scenario `name` over `cards` cards.
pub fn builtin(name: &str, cards: usize) -> Result<Vec<Step>> {
    let steps = match name {
        "flip-one" => drag(0, 100.0, &[20.0; 10]),
        "cancel-upward" => {
            let mut deltas = vec![20.0; 6];
            deltas.extend([-5.0; 9]);
            drag(0, 100.0, &deltas)
        }
        "last-card" => {
            let mut steps: Vec<Step> = (0..cards.saturating_sub(1))
                .map(|i| Step {
                    t_ms: i as u64 * GESTURE_GAP_MS,
                    action: Action::Advance,
                })
                .collect();
            let start = cards.saturating_sub(1) as u64 * GESTURE_GAP_MS;
            steps.extend(drag(start, 100.0, &[20.0; 10]));
            steps
        }
        "flip-all" => (0..cards)
            .flat_map(|i| drag(i as u64 * GESTURE_GAP_MS, 100.0, &[20.0; 10]))
            .collect(),
        "advance" => vec![Step {
            t_ms: 0,
            action: Action::Advance,
        }],
        _ => {
            return Err(DemoError::UnknownScenario {
                name: name.to_string(),
            });
        }
    };
    Ok(steps)
}

/// Press at `start_y`, move by each of `deltas` at a steady pace, release
/// half an interval after the last move.
fn drag(start_ms: u64, start_y: f64, deltas: &[f64]) -> Vec<Step> {
    let mut steps = Vec::with_capacity(deltas.len() + 2);
    let mut t = start_ms;
    let mut y = start_y;
    steps.push(PointerSample::new(PointerPhase::Down, t, DRAG_X, y).into());
    for delta in deltas {
        t += MOVE_INTERVAL_MS;
        y += delta;
        steps.push(PointerSample::new(PointerPhase::Move, t, DRAG_X, y).into());
    }
    t += MOVE_INTERVAL_MS / 2;
    steps.push(PointerSample::new(PointerPhase::Up, t, DRAG_X, y).into());
    steps
}
