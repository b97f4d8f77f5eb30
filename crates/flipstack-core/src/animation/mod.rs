#![forbid(unsafe_code)]

//! Time-stepped animation primitives.
//!
//! Only springs are needed for the card stack: the active card settles to its
//! terminal state with a near-critically damped spring, and the next card
//! bounces between slot frames with an underdamped one.

use std::time::Duration;

pub mod spring;

pub use spring::Spring;

/// A value that advances with time.
pub trait Animation {
    /// Advance by `dt`.
    fn tick(&mut self, dt: Duration);

    /// Whether the animation has settled.
    fn is_complete(&self) -> bool;
}
