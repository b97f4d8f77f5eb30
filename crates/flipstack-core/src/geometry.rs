#![forbid(unsafe_code)]

//! Geometric primitives.
//!
//! All coordinates are in the touch/layout domain (origin at top-left, y grows
//! downward), expressed as `f64` so progress math never round-trips through
//! integer cells.

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};

/// A location in the touch/layout domain.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// Origin.
    pub const ZERO: Self = Self::new(0.0, 0.0);

    /// Create a new point.
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Signed vertical displacement from `self` to `other`.
    ///
    /// Positive when `other` lies below `self`.
    #[inline]
    #[must_use]
    pub fn vertical_distance_to(&self, other: Point) -> f64 {
        other.y - self.y
    }
}

/// Pointer velocity in units per second.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
pub struct Velocity {
    pub x: f64,
    pub y: f64,
}

impl Velocity {
    /// No motion.
    pub const ZERO: Self = Self::new(0.0, 0.0);

    /// Create a new velocity.
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Width and height.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    /// Create a new size.
    #[inline]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// An axis-aligned rectangle used for card slot frames.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
pub struct Rect {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    /// Create a new rectangle.
    #[inline]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a rectangle from an origin and a size.
    #[inline]
    pub const fn from_origin_size(origin: Point, size: Size) -> Self {
        Self::new(origin.x, origin.y, size.width, size.height)
    }

    /// Top-left corner.
    #[inline]
    pub const fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    #[inline]
    pub const fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Right edge (exclusive).
    #[inline]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge (exclusive).
    #[inline]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Center point.
    #[inline]
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Check if a point is inside the rectangle.
    #[inline]
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x && point.x < self.right() && point.y >= self.y && point.y < self.bottom()
    }

    /// Linear interpolation of every edge. `t` is not clamped so spring
    /// overshoot carries through to the frame.
    #[must_use]
    pub fn lerp(&self, target: &Rect, t: f64) -> Rect {
        Rect::new(
            self.x + (target.x - self.x) * t,
            self.y + (target.y - self.y) * t,
            self.width + (target.width - self.width) * t,
            self.height + (target.height - self.height) * t,
        )
    }
}
