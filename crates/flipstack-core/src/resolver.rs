#![forbid(unsafe_code)]

//! Cumulative progress → (active card, local progress).
//!
//! The integer part of the cumulative progress selects the active card, the
//! fractional part is that card's local progress. At the upper boundary
//! (`cumulative == card_count`) the active card is the last one with local
//! progress 1.

/// Resolves active indices for a stack of a fixed size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexResolver {
    card_count: usize,
}

impl IndexResolver {
    /// Resolver for `card_count` cards. A count of zero is treated as one.
    #[must_use]
    pub fn new(card_count: usize) -> Self {
        Self {
            card_count: card_count.max(1),
        }
    }

    #[inline]
    #[must_use]
    pub fn card_count(&self) -> usize {
        self.card_count
    }

    /// `max(0, floor(cumulative))` capped at `card_count - 1`.
    ///
    /// NaN resolves to the first card.
    #[must_use]
    pub fn active_index(&self, cumulative: f64) -> usize {
        floor_index(cumulative).min(self.card_count - 1)
    }

    /// Active index and its local progress in one call.
    #[must_use]
    pub fn resolve(&self, cumulative: f64) -> (usize, f64) {
        let index = self.active_index(cumulative);
        (index, local_progress(index, cumulative))
    }
}

/// `max(0, floor(cumulative))` without the upper cap; reaches `card_count`
/// when the cumulative progress sits on its upper bound.
#[must_use]
pub fn floor_index(cumulative: f64) -> usize {
    let floored = cumulative.floor();
    if floored.is_nan() || floored <= 0.0 {
        0
    } else {
        // `as` saturates for values beyond usize::MAX.
        floored as usize
    }
}

/// Local progress of the card at `index`: `cumulative - index`.
///
/// Not clamped. A mismatched index/cumulative pair yields a value outside
/// `[0, 1]`, which the live-update path rejects.
#[inline]
#[must_use]
pub fn local_progress(index: usize, cumulative: f64) -> f64 {
    cumulative - index as f64
}
