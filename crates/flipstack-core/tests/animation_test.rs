//! Integration tests for the animation module.

use flipstack_core::SpringSpec;
use flipstack_core::animation::*;
use std::time::Duration;

const MS_1: Duration = Duration::from_millis(1);
const MS_16: Duration = Duration::from_millis(16);

fn settle_frames(spring: &mut Spring, frame: Duration, max_frames: usize) -> usize {
    for i in 0..max_frames {
        if spring.is_complete() {
            return i;
        }
        spring.tick(frame);
    }
    max_frames
}

#[test]
fn card_settle_completes_near_nominal_duration() {
    let mut spring = Spring::from_spec(&SpringSpec::CARD_SETTLE);
    let frames = settle_frames(&mut spring, MS_16, 600);
    assert!(spring.is_complete(), "card spring should come to rest");
    // Nominal 0.6s; a near-critical spring rests within a couple of periods.
    assert!(frames < 120, "took {frames} frames");
    assert_eq!(spring.position(), 1.0);
}

#[test]
fn frame_settle_overshoots_and_rests() {
    let mut spring = Spring::from_spec(&SpringSpec::FRAME_SETTLE);
    let mut max = f64::MIN;
    for _ in 0..600 {
        spring.tick(MS_16);
        max = max.max(spring.position());
    }
    assert!(max > 1.0, "bouncy frame spring should overshoot, max {max}");
    assert!(spring.is_complete());
}

#[test]
fn tick_granularity_does_not_change_outcome() {
    let mut coarse = Spring::from_spec(&SpringSpec::CARD_SETTLE);
    let mut fine = Spring::from_spec(&SpringSpec::CARD_SETTLE);
    coarse.tick(Duration::from_millis(200));
    for _ in 0..200 {
        fine.tick(MS_1);
    }
    assert!(
        (coarse.position() - fine.position()).abs() < 0.02,
        "coarse {} vs fine {}",
        coarse.position(),
        fine.position()
    );
}

#[test]
fn initial_velocity_speeds_up_progress() {
    let mut still = Spring::from_spec(&SpringSpec::CARD_SETTLE);
    let mut flung = Spring::from_spec(&SpringSpec::CARD_SETTLE.with_initial_velocity(5.0));
    still.tick(Duration::from_millis(50));
    flung.tick(Duration::from_millis(50));
    assert!(flung.position() > still.position());
}

#[test]
fn overshoot_is_reported_unclamped() {
    let mut spring = Spring::from_spec(&SpringSpec::FRAME_SETTLE);
    let mut past_target = false;
    for _ in 0..600 {
        spring.tick(MS_16);
        past_target |= spring.position() > 1.0;
    }
    assert!(past_target, "frame spring position should pass the target");
    assert_eq!(spring.position(), 1.0);
}

#[test]
fn completed_spring_stays_put() {
    let mut spring = Spring::from_spec(&SpringSpec::CARD_SETTLE.with_initial_velocity(2.0));
    settle_frames(&mut spring, MS_16, 600);
    assert!(spring.is_complete());
    spring.tick(Duration::from_secs(1));
    assert_eq!(spring.position(), 1.0);
    assert_eq!(spring.velocity(), 0.0);
}
