//! Replaying pointer traces end to end through the public demo API.

use std::path::Path;

use flipstack_core::{Completion, FlipConfig, PointerPhase};
use flipstack_demo::scenario::{Step, builtin};
use flipstack_demo::sim::{Record, SimOptions, simulate};
use flipstack_demo::trace::{PointerSample, parse_trace};
use proptest::prelude::*;

fn settlements(records: &[Record]) -> Vec<Completion> {
    records
        .iter()
        .filter_map(|r| match r {
            Record::Settled { settlement, .. } => Some(settlement.completion),
            _ => None,
        })
        .collect()
}

fn run(cards: usize, steps: &[Step]) -> Vec<Record> {
    simulate(cards, FlipConfig::default(), SimOptions::default(), steps).expect("simulation")
}

#[test]
fn serialized_scenario_replays_identically() {
    let steps = builtin("flip-one", 3).unwrap();
    let trace: String = steps
        .iter()
        .map(|step| match step.action {
            flipstack_demo::scenario::Action::Pointer(sample) => {
                serde_json::to_string(&sample).unwrap() + "\n"
            }
            flipstack_demo::scenario::Action::Advance => panic!("flip-one has no advances"),
        })
        .collect();

    let parsed: Vec<Step> = parse_trace(trace.as_bytes(), Path::new("inline"))
        .unwrap()
        .into_iter()
        .map(Step::from)
        .collect();
    assert_eq!(parsed, steps);
    assert_eq!(run(3, &parsed), run(3, &steps));
}

#[test]
fn two_quick_swipes_flip_two_cards() {
    let mut steps: Vec<Step> = Vec::new();
    for (start, base) in [(0u64, 100.0), (400, 100.0)] {
        steps.push(PointerSample::new(PointerPhase::Down, start, 50.0, base).into());
        for i in 1..=8u64 {
            steps.push(
                PointerSample::new(PointerPhase::Move, start + i * 12, 50.0, base + i as f64 * 25.0)
                    .into(),
            );
        }
        steps.push(PointerSample::new(PointerPhase::Up, start + 100, 50.0, base + 200.0).into());
    }
    let records = run(5, &steps);
    assert_eq!(
        settlements(&records),
        vec![Completion::Finished, Completion::Finished]
    );
    let Some(Record::Summary(summary)) = records.last() else {
        panic!("missing summary");
    };
    assert_eq!(summary.active_index, 2);
}

#[test]
fn horizontal_drag_moves_nothing() {
    let steps: Vec<Step> = [
        PointerSample::new(PointerPhase::Down, 0, 0.0, 100.0),
        PointerSample::new(PointerPhase::Move, 16, 60.0, 100.0),
        PointerSample::new(PointerPhase::Move, 32, 120.0, 100.0),
        PointerSample::new(PointerPhase::Up, 40, 120.0, 100.0),
    ]
    .into_iter()
    .map(Step::from)
    .collect();
    let records = run(3, &steps);
    assert_eq!(settlements(&records), vec![Completion::Cancelled]);
    let Some(Record::Summary(summary)) = records.last() else {
        panic!("missing summary");
    };
    assert_eq!(summary.cumulative_progress, 0.0);
}

#[test]
fn wall_clock_trace_replays_promptly() {
    let start: u64 = 1_712_345_678_901;
    let mut lines = vec![format!(r#"{{"event":"down","t_ms":{start},"x":80,"y":100}}"#)];
    for i in 1..=10u64 {
        lines.push(format!(
            r#"{{"event":"move","t_ms":{},"x":80,"y":{}}}"#,
            start + i * 16,
            100 + i * 20
        ));
    }
    lines.push(format!(r#"{{"event":"up","t_ms":{},"x":80,"y":300}}"#, start + 170));
    let steps: Vec<Step> = parse_trace(lines.join("\n").as_bytes(), Path::new("wall-clock"))
        .unwrap()
        .into_iter()
        .map(Step::from)
        .collect();

    let records = run(4, &steps);
    assert_eq!(settlements(&records), vec![Completion::Finished]);
    let Some(Record::Summary(summary)) = records.last() else {
        panic!("missing summary");
    };
    assert_eq!(summary.active_index, 1);
    assert!(summary.frames < 400, "frames {}", summary.frames);
}

// ═══════════════════════════════════════════════════════════════════════
// Arbitrary traces
// ═══════════════════════════════════════════════════════════════════════

fn phase_strategy() -> impl Strategy<Value = PointerPhase> {
    prop_oneof![
        1 => Just(PointerPhase::Down),
        4 => Just(PointerPhase::Move),
        1 => Just(PointerPhase::Up),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn arbitrary_traces_stay_in_bounds(
        cards in 1usize..8,
        samples in prop::collection::vec((phase_strategy(), 0u64..40, -400.0f64..400.0), 0..120),
    ) {
        let mut t = 0;
        let steps: Vec<Step> = samples
            .into_iter()
            .map(|(phase, dt, y)| {
                t += dt;
                PointerSample::new(phase, t, 0.0, y).into()
            })
            .collect();
        let records = run(cards, &steps);
        let Some(Record::Summary(summary)) = records.last() else {
            panic!("missing summary");
        };
        prop_assert!(summary.active_index < cards);
        prop_assert!((0.0..=cards as f64).contains(&summary.cumulative_progress));
    }

    #[test]
    fn garbage_lines_never_panic(lines in prop::collection::vec(".{0,40}", 0..20)) {
        let text = lines.join("\n");
        let _ = parse_trace(text.as_bytes(), Path::new("fuzz"));
    }
}
