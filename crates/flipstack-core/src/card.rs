#![forbid(unsafe_code)]

//! Card stack model.
//!
//! A [`CardStack`] is an ordered, non-empty sequence of [`Card`]s created once
//! per session. Each card's identity is its 0-based stack index; its slot frame
//! comes from the [`StackLayout`] at creation and never changes afterwards.
//! Rotation and opacity are not stored here: they are always derived from
//! progress (see [`crate::visual`]).
//!
//! # Invariants
//!
//! 1. A stack always holds at least one card.
//! 2. `cards[i].index() == i` for every card.
//! 3. [`CardStack::card_for_index`] never panics: out-of-range indices
//!    saturate to the first or last card.

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geometry::{Point, Rect, Size};

/// Errors from building a [`CardStack`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StackError {
    #[error("a card stack needs at least one card")]
    EmptyStack,
}

/// One card in the stack.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Card {
    index: usize,
    slot: Rect,
    z_position: f64,
}

impl Card {
    /// Stack index (0 = top of stack).
    #[inline]
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Frame originally assigned to this card.
    #[inline]
    #[must_use]
    pub fn slot(&self) -> Rect {
        self.slot
    }

    /// Draw order; larger values are drawn above smaller ones.
    #[inline]
    #[must_use]
    pub fn z_position(&self) -> f64 {
        self.z_position
    }
}

// ---------------------------------------------------------------------------
// Layout
// ---------------------------------------------------------------------------

/// Slot geometry for a stack of cards.
///
/// Card `i` is `base_size - i * shrink` wide/high, centered horizontally on
/// `center`, and lifted by `i * lift` so the stack fans upward behind the top
/// card.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct StackLayout {
    /// Center of the container the stack is laid out in.
    pub center: Point,
    /// Size of the top card.
    pub base_size: Size,
    /// Per-index reduction of width and height.
    pub shrink: Size,
    /// Per-index upward offset.
    pub lift: f64,
}

impl Default for StackLayout {
    fn default() -> Self {
        Self {
            center: Point::new(187.5, 333.5),
            base_size: Size::new(300.0, 200.0),
            shrink: Size::new(10.0, 5.0),
            lift: 10.0,
        }
    }
}

impl StackLayout {
    /// Frame of the slot at `index`.
    #[must_use]
    pub fn frame_for_index(&self, index: usize) -> Rect {
        let i = index as f64;
        let size = Size::new(
            self.base_size.width - i * self.shrink.width,
            self.base_size.height - i * self.shrink.height,
        );
        let origin = Point::new(
            self.center.x - size.width / 2.0,
            self.center.y - size.height / 2.0 - i * self.lift,
        );
        Rect::from_origin_size(origin, size)
    }

    /// Draw order for the card at `index` in a stack of `count` cards.
    ///
    /// Padded by 2.5x the card height so a card rotating about its bottom
    /// edge never intersects its neighbours mid-spring.
    #[must_use]
    pub fn z_position(&self, index: usize, count: usize) -> f64 {
        let height = self.frame_for_index(index).height;
        count.saturating_sub(index) as f64 + 2.5 * height
    }

    /// Rotation anchor in unit coordinates: the bottom edge midpoint.
    #[inline]
    #[must_use]
    pub const fn anchor_point() -> Point {
        Point::new(0.5, 1.0)
    }
}

// ---------------------------------------------------------------------------
// CardStack
// ---------------------------------------------------------------------------

/// Ordered, non-empty sequence of cards.
#[derive(Debug, Clone)]
pub struct CardStack {
    cards: Vec<Card>,
    layout: StackLayout,
}

impl CardStack {
    /// Build `count` cards laid out by `layout`.
    pub fn new(count: usize, layout: StackLayout) -> Result<Self, StackError> {
        if count == 0 {
            return Err(StackError::EmptyStack);
        }
        let cards = (0..count)
            .map(|index| Card {
                index,
                slot: layout.frame_for_index(index),
                z_position: layout.z_position(index, count),
            })
            .collect();
        Ok(Self { cards, layout })
    }

    /// Number of cards (always ≥ 1).
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Always `false`; present for API symmetry with `len`.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn layout(&self) -> &StackLayout {
        &self.layout
    }

    /// Index of the last card.
    #[inline]
    #[must_use]
    pub fn last_index(&self) -> usize {
        self.cards.len() - 1
    }

    /// Whether `index` names the last card.
    #[inline]
    #[must_use]
    pub fn is_last(&self, index: usize) -> bool {
        index == self.last_index()
    }

    /// Saturating lookup: the first card for negative indices, the last card
    /// for indices past the end, otherwise the card at `index`.
    #[must_use]
    pub fn card_for_index(&self, index: isize) -> &Card {
        if index < 0 {
            return &self.cards[0];
        }
        let index = index as usize;
        self.cards.get(index).unwrap_or(&self.cards[self.last_index()])
    }

    /// The card at `index`, if it exists.
    #[inline]
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Card> {
        self.cards.get(index)
    }

    /// Iterate cards from top to bottom.
    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter()
    }

    /// Frame of the top slot; a finished card's successor moves here.
    #[inline]
    #[must_use]
    pub fn top_slot(&self) -> Rect {
        self.cards[0].slot
    }
}
