#![forbid(unsafe_code)]

//! Progress → card appearance.
//!
//! A card at local progress `p` is rotated by `-π·p` about its horizontal
//! axis (falling toward the viewer around its bottom edge) and faded to
//! opacity `1 - p`. Nothing here is stored on the card; appearance is always
//! recomputed from progress.

use std::f64::consts::PI;

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};

use crate::completion::CardState;

/// Row-major 4×4 matrix using the row-vector convention (`v' = v · M`).
pub type Matrix4 = [[f64; 4]; 4];

/// 4×4 identity.
pub const IDENTITY: Matrix4 = [
    [1.0, 0.0, 0.0, 0.0],
    [0.0, 1.0, 0.0, 0.0],
    [0.0, 0.0, 1.0, 0.0],
    [0.0, 0.0, 0.0, 1.0],
];

/// Rotation and opacity of one card.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
pub struct CardVisual {
    /// Rotation about the horizontal axis, in radians.
    pub rotation: f64,
    /// 0 = transparent, 1 = opaque.
    pub opacity: f64,
}

impl Default for CardVisual {
    fn default() -> Self {
        Self::NEUTRAL
    }
}

impl CardVisual {
    /// Untransformed, fully opaque.
    pub const NEUTRAL: Self = Self {
        rotation: 0.0,
        opacity: 1.0,
    };

    /// Appearance at local progress `progress`.
    ///
    /// Returns `None` when `progress` is outside `[0, 1]` (or NaN).
    #[must_use]
    pub fn for_progress(progress: f64) -> Option<Self> {
        if !(0.0..=1.0).contains(&progress) {
            return None;
        }
        Some(Self::interpolated(progress))
    }

    /// Appearance of a terminal state.
    #[must_use]
    pub fn for_state(state: CardState) -> Self {
        Self::interpolated(state.progress())
    }

    /// Appearance at any progress, without range checking. Used while a
    /// spring overshoots its target.
    #[must_use]
    pub fn interpolated(progress: f64) -> Self {
        Self {
            rotation: -PI * progress,
            opacity: 1.0 - progress,
        }
    }

    /// Opacity clamped to `[0, 1]` for renderers that reject overshoot.
    #[inline]
    #[must_use]
    pub fn clamped_opacity(&self) -> f64 {
        self.opacity.clamp(0.0, 1.0)
    }

    /// Perspective-projected rotation about the x axis.
    ///
    /// Equivalent to rotating a perspective matrix whose `m34` is
    /// `-1 / perspective_distance`.
    #[must_use]
    pub fn transform(&self, perspective_distance: f64) -> Matrix4 {
        let mut perspective = IDENTITY;
        if perspective_distance.is_finite() && perspective_distance > 0.0 {
            perspective[2][3] = -1.0 / perspective_distance;
        }
        multiply(&rotation_x(self.rotation), &perspective)
    }
}

/// Rotation about the x axis by `angle` radians.
#[must_use]
pub fn rotation_x(angle: f64) -> Matrix4 {
    let (sin, cos) = angle.sin_cos();
    [
        [1.0, 0.0, 0.0, 0.0],
        [0.0, cos, sin, 0.0],
        [0.0, -sin, cos, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ]
}

/// `a · b`.
#[must_use]
pub fn multiply(a: &Matrix4, b: &Matrix4) -> Matrix4 {
    let mut out = [[0.0; 4]; 4];
    for (i, row) in out.iter_mut().enumerate() {
        for (j, cell) in row.iter_mut().enumerate() {
            *cell = (0..4).map(|k| a[i][k] * b[k][j]).sum();
        }
    }
    out
}
