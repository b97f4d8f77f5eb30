#![forbid(unsafe_code)]

//! Touch-to-progress conversion.
//!
//! [`ProgressTracker`] turns each drag sample into an *incremental* progress
//! value: the vertical displacement since the previous sample divided by a
//! fixed sensitivity distance and clamped to `[-1, 1]`. Working per sample
//! rather than from the gesture origin keeps the result independent of the
//! sampling rate and lets the user reverse direction mid-gesture.
//!
//! Accumulation into the session's cumulative progress is done by the caller
//! with [`accumulate`], which keeps the total inside `[0, card_count]`.

use crate::geometry::Point;

/// Default distance (in touch units) that equals one full card of progress.
pub const DEFAULT_SENSITIVITY: f64 = 200.0;

/// Per-sample progress tracker.
#[derive(Debug, Clone)]
pub struct ProgressTracker {
    last_sample_point: Point,
    sensitivity: f64,
}

impl Default for ProgressTracker {
    fn default() -> Self {
        Self::new(DEFAULT_SENSITIVITY)
    }
}

impl ProgressTracker {
    /// Create a tracker. Non-positive or non-finite sensitivities fall back
    /// to [`DEFAULT_SENSITIVITY`].
    #[must_use]
    pub fn new(sensitivity: f64) -> Self {
        let sensitivity = if sensitivity.is_finite() && sensitivity > 0.0 {
            sensitivity
        } else {
            DEFAULT_SENSITIVITY
        };
        Self {
            last_sample_point: Point::ZERO,
            sensitivity,
        }
    }

    /// Start of a gesture: remember where it began.
    pub fn begin(&mut self, point: Point) {
        self.last_sample_point = point;
    }

    /// Intermediate sample: return the incremental progress in `[-1, 1]` and
    /// remember `point` for the next sample.
    pub fn changed(&mut self, point: Point) -> f64 {
        let travelled = self.last_sample_point.vertical_distance_to(point);
        self.last_sample_point = point;
        self.normalize(travelled)
    }

    /// Progress equivalent of a vertical distance, clamped to `[-1, 1]`.
    #[must_use]
    pub fn normalize(&self, distance: f64) -> f64 {
        (distance / self.sensitivity).clamp(-1.0, 1.0)
    }

    /// Point at which progress was last computed.
    #[inline]
    #[must_use]
    pub fn last_sample_point(&self) -> Point {
        self.last_sample_point
    }

    #[inline]
    #[must_use]
    pub fn sensitivity(&self) -> f64 {
        self.sensitivity
    }
}

/// Add `delta` to `cumulative`, clamping the result to `[0, card_count]`.
///
/// A NaN delta leaves `cumulative` unchanged.
#[must_use]
pub fn accumulate(cumulative: f64, delta: f64, card_count: usize) -> f64 {
    if delta.is_nan() {
        return cumulative;
    }
    let upper = card_count as f64;
    let next = cumulative + delta;
    if next < 0.0 {
        0.0
    } else if next > upper {
        upper
    } else {
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delta_is_normalized_by_sensitivity() {
        let mut tracker = ProgressTracker::default();
        tracker.begin(Point::new(0.0, 100.0));
        assert_eq!(tracker.changed(Point::new(0.0, 150.0)), 0.25);
        assert_eq!(tracker.changed(Point::new(0.0, 130.0)), -0.1);
    }

    #[test]
    fn delta_is_clamped() {
        let mut tracker = ProgressTracker::default();
        tracker.begin(Point::ZERO);
        assert_eq!(tracker.changed(Point::new(0.0, 1000.0)), 1.0);
        assert_eq!(tracker.changed(Point::new(0.0, -1000.0)), -1.0);
    }

    #[test]
    fn horizontal_motion_is_ignored() {
        let mut tracker = ProgressTracker::default();
        tracker.begin(Point::new(0.0, 10.0));
        assert_eq!(tracker.changed(Point::new(300.0, 10.0)), 0.0);
    }

    #[test]
    fn changed_updates_last_point() {
        let mut tracker = ProgressTracker::default();
        tracker.begin(Point::new(1.0, 2.0));
        tracker.changed(Point::new(3.0, 4.0));
        assert_eq!(tracker.last_sample_point(), Point::new(3.0, 4.0));
    }

    #[test]
    fn repeated_begin_is_idempotent() {
        let mut once = ProgressTracker::default();
        once.begin(Point::new(0.0, 50.0));

        let mut twice = ProgressTracker::default();
        twice.begin(Point::new(0.0, 50.0));
        twice.begin(Point::new(0.0, 50.0));

        let target = Point::new(0.0, 130.0);
        assert_eq!(once.changed(target), twice.changed(target));
    }

    #[test]
    fn invalid_sensitivity_falls_back() {
        assert_eq!(ProgressTracker::new(0.0).sensitivity(), DEFAULT_SENSITIVITY);
        assert_eq!(ProgressTracker::new(-3.0).sensitivity(), DEFAULT_SENSITIVITY);
        assert_eq!(
            ProgressTracker::new(f64::INFINITY).sensitivity(),
            DEFAULT_SENSITIVITY
        );
        assert_eq!(ProgressTracker::new(50.0).sensitivity(), 50.0);
    }

    #[test]
    fn accumulate_clamps_both_ends() {
        assert_eq!(accumulate(0.2, -0.5, 10), 0.0);
        assert_eq!(accumulate(9.8, 0.5, 10), 10.0);
        assert_eq!(accumulate(3.0, 0.25, 10), 3.25);
        assert_eq!(accumulate(10.0, 0.0, 10), 10.0);
    }

    #[test]
    fn accumulate_ignores_nan() {
        assert_eq!(accumulate(1.5, f64::NAN, 4), 1.5);
    }
}
