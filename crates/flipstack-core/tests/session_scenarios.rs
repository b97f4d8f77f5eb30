//! End-to-end flip scenarios: recognizer → session → driver.
//!
//! These run whole gestures through the public API and check what a renderer
//! would observe, with both the recording driver and the spring animator.

use std::time::Duration;

use flipstack_core::{
    AnimationDriver, CardState, CardVisual, Completion, DriverCommand, FlipConfig, FlipSession,
    PanDirection, PanEvent, PanRecognizer, Point, PointerPhase, RecordingDriver, SessionOutput,
    SpringAnimator, Velocity,
};
use web_time::Instant;

const FRAME: Duration = Duration::from_millis(16);
const LIMIT: Duration = Duration::from_secs(5);

/// Drag from `from_y` to `to_y` and release with vertical velocity `vy`.
fn flick(
    session: &mut FlipSession,
    driver: &mut impl AnimationDriver,
    from_y: f64,
    to_y: f64,
    vy: f64,
) -> Completion {
    session.sample_begin(Point::new(0.0, from_y));
    session.sample_changed(Point::new(0.0, to_y), Velocity::ZERO, &mut *driver);
    session
        .sample_end(Velocity::new(0.0, vy), &mut *driver)
        .completion
}

// ═══════════════════════════════════════════════════════════════════════
// Reference scenario
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn ten_cards_drag_and_finish() {
    let mut session = FlipSession::new(10).unwrap();
    let mut driver = RecordingDriver::new();

    session.sample_begin(Point::new(0.0, 100.0));
    for y in [120.0, 160.0, 200.0, 260.0] {
        session.sample_changed(Point::new(0.0, y), Velocity::new(0.0, 400.0), &mut driver);
    }
    assert!((session.cumulative_progress() - 0.8).abs() < 1e-12);
    assert_eq!(session.active_index(), 0);

    // Every live update went to card 0 with a monotonically growing rotation.
    let rotations: Vec<f64> = driver
        .drain()
        .into_iter()
        .map(|command| match command {
            DriverCommand::SetVisual { card: 0, visual } => visual.rotation,
            other => panic!("unexpected command {other:?}"),
        })
        .collect();
    assert_eq!(rotations.len(), 4);
    assert!(rotations.windows(2).all(|w| w[1] < w[0]));

    let settlement = session.sample_end(Velocity::new(0.0, 600.0), &mut driver);
    assert_eq!(settlement.completion, Completion::Finished);
    assert_eq!(settlement.direction, PanDirection::Downwards);
    assert_eq!(settlement.spring_velocity, 6.0);
    assert_eq!(session.cumulative_progress(), 1.0);
    assert_eq!(session.active_index(), 1);
    assert_eq!(settlement.next_active(10), 1);
}

// ═══════════════════════════════════════════════════════════════════════
// Decision table
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn decision_table() {
    // (drag distance, release velocity, expected)
    let cases = [
        (60.0, 300.0, Completion::Cancelled),   // 0.3 down
        (90.0, 300.0, Completion::Finished),    // 0.45 down
        (120.0, -300.0, Completion::Cancelled), // 0.6 up
        (150.0, -300.0, Completion::Finished),  // 0.75 up
        (150.0, 0.0, Completion::Finished),     // zero velocity counts as down
    ];
    for (distance, vy, expected) in cases {
        let mut session = FlipSession::new(3).unwrap();
        let mut driver = RecordingDriver::new();
        let completion = flick(&mut session, &mut driver, 0.0, distance, vy);
        assert_eq!(completion, expected, "distance {distance}, vy {vy}");
    }
}

#[test]
fn flipping_through_every_card_stops_at_the_last() {
    let mut session = FlipSession::new(4).unwrap();
    let mut driver = RecordingDriver::new();
    for expected in 1..4 {
        assert_eq!(
            flick(&mut session, &mut driver, 0.0, 180.0, 500.0),
            Completion::Finished
        );
        assert_eq!(session.active_index(), expected);
    }
    assert_eq!(
        flick(&mut session, &mut driver, 0.0, 190.0, 2000.0),
        Completion::Cancelled
    );
    assert_eq!(session.active_index(), 3);
    assert_eq!(session.cumulative_progress(), 3.0);
}

#[test]
fn custom_thresholds_change_the_outcome() {
    let mut config = FlipConfig::default();
    config.completion.downward_threshold = 0.9;
    let mut session = FlipSession::with_config(3, config).unwrap();
    let mut driver = RecordingDriver::new();
    assert_eq!(
        flick(&mut session, &mut driver, 0.0, 160.0, 300.0),
        Completion::Cancelled
    );
}

#[test]
fn sensitivity_scales_progress() {
    let mut config = FlipConfig::default();
    config.tracking.sensitivity = 400.0;
    let mut session = FlipSession::with_config(3, config).unwrap();
    let mut driver = RecordingDriver::new();
    session.sample_begin(Point::ZERO);
    let update = session.sample_changed(Point::new(0.0, 100.0), Velocity::ZERO, &mut driver);
    assert_eq!(update.local_progress, 0.25);
}

// ═══════════════════════════════════════════════════════════════════════
// Recognizer → session
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn recognized_pan_drives_session() {
    let mut recognizer = PanRecognizer::default();
    let mut session = FlipSession::new(5).unwrap();
    let mut driver = RecordingDriver::new();
    let t0 = Instant::now();

    let mut outputs = Vec::new();
    let samples = [
        (PointerPhase::Down, 0.0, 0),
        (PointerPhase::Move, 20.0, 16),
        (PointerPhase::Move, 60.0, 32),
        (PointerPhase::Move, 120.0, 48),
        (PointerPhase::Move, 160.0, 64),
        (PointerPhase::Up, 170.0, 72),
    ];
    for (phase, y, ms) in samples {
        let now = t0 + Duration::from_millis(ms);
        if let Some(event) = recognizer.process(phase, Point::new(0.0, y), now) {
            outputs.push(session.handle(event, &mut driver));
        }
    }

    assert!(matches!(outputs.first(), Some(SessionOutput::Began)));
    let Some(SessionOutput::Settled(settlement)) = outputs.last() else {
        panic!("gesture should settle, got {outputs:?}");
    };
    // Began at 20, last change at 160: 0.7 of a card, moving down.
    assert_eq!(settlement.completion, Completion::Finished);
    assert!(settlement.spring_velocity > 0.0);
    assert_eq!(session.active_index(), 1);
}

#[test]
fn tap_leaves_session_untouched() {
    let mut recognizer = PanRecognizer::default();
    let mut session = FlipSession::new(5).unwrap();
    let mut driver = RecordingDriver::new();
    let t0 = Instant::now();
    for (phase, ms) in [(PointerPhase::Down, 0), (PointerPhase::Up, 50)] {
        if let Some(event) =
            recognizer.process(phase, Point::new(0.0, 3.0), t0 + Duration::from_millis(ms))
        {
            session.handle(event, &mut driver);
        }
    }
    assert!(driver.commands().is_empty());
    assert_eq!(session.cumulative_progress(), 0.0);
}

#[test]
fn handle_accepts_hand_built_events() {
    let mut session = FlipSession::new(2).unwrap();
    let mut driver = RecordingDriver::new();
    let events = [
        PanEvent::Began { point: Point::ZERO },
        PanEvent::Changed {
            point: Point::new(0.0, 50.0),
            velocity: Velocity::ZERO,
        },
        PanEvent::Ended {
            velocity: Velocity::new(0.0, -50.0),
        },
    ];
    let outputs: Vec<SessionOutput> = events
        .into_iter()
        .map(|event| session.handle(event, &mut driver))
        .collect();
    assert!(matches!(
        outputs[2],
        SessionOutput::Settled(s) if s.completion == Completion::Cancelled
    ));
}

// ═══════════════════════════════════════════════════════════════════════
// Spring animator
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn animator_follows_finished_flip() {
    let mut session = FlipSession::new(3).unwrap();
    let mut animator = SpringAnimator::new(session.stack());

    flick(&mut session, &mut animator, 0.0, 120.0, 400.0);
    animator.settle(FRAME, LIMIT);
    assert!(animator.is_idle());

    let flipped = animator.snapshot(0).unwrap();
    assert_eq!(flipped.visual, CardVisual::for_state(CardState::Finished));
    let promoted = animator.snapshot(1).unwrap();
    assert_eq!(promoted.frame, session.stack().top_slot());
    let untouched = animator.snapshot(2).unwrap();
    assert_eq!(untouched.frame, session.stack().card_for_index(2).slot());
}

#[test]
fn animator_follows_cancelled_flip() {
    let mut session = FlipSession::new(3).unwrap();
    let mut animator = SpringAnimator::new(session.stack());

    flick(&mut session, &mut animator, 0.0, 40.0, -100.0);
    animator.settle(FRAME, LIMIT);

    let card = animator.snapshot(0).unwrap();
    assert_eq!(card.visual, CardVisual::NEUTRAL);
    assert_eq!(
        animator.snapshot(1).unwrap().frame,
        session.stack().card_for_index(1).slot()
    );
}

#[test]
fn interrupted_settle_restarts_from_live_visual() {
    let mut session = FlipSession::new(3).unwrap();
    let mut animator = SpringAnimator::new(session.stack());

    flick(&mut session, &mut animator, 0.0, 100.0, 400.0);
    for _ in 0..3 {
        animator.tick(FRAME);
    }
    assert!(!animator.is_idle());

    // Grab the stack again and drag the finished card back into view.
    session.sample_begin(Point::new(0.0, 200.0));
    let update = session.sample_changed(Point::new(0.0, 150.0), Velocity::ZERO, &mut animator);
    assert_eq!(update.card, 0);
    let snap = animator.snapshot(0).unwrap();
    assert_eq!(snap.visual, update.visual);
    assert!(!snap.animating);
    // The promoted card keeps moving toward the top slot.
    assert!(animator.snapshot(1).is_some_and(|s| s.animating));
}
