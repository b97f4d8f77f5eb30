#![forbid(unsafe_code)]

//! Tunable parameters for the flip interaction.
//!
//! Every constant the session, decider, visual mapping and layout use is
//! captured here as a single [`FlipConfig`]. `FlipConfig::default()` is the
//! stock behavior; with the `config` feature a config can also be loaded from
//! TOML or JSON.
//!
//! ```toml
//! # flipstack.toml
//! [tracking]
//! sensitivity = 200.0
//!
//! [completion]
//! upward_threshold = 0.7
//! downward_threshold = 0.4
//!
//! [frame_spring]
//! duration_secs = 0.5
//! damping_ratio = 0.4
//! initial_velocity = 1.0
//! ```
//!
//! Sections and fields that are missing fall back to their defaults.

#[cfg(feature = "config")]
use std::path::Path;

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::card::StackLayout;
use crate::driver::SpringSpec;

/// Errors from loading or validating a [`FlipConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[cfg(feature = "config")]
    #[error("failed to parse TOML config: {0}")]
    Toml(#[from] toml::de::Error),
    #[cfg(feature = "config")]
    #[error("failed to serialize TOML config: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
    #[cfg(feature = "config")]
    #[error("failed to parse JSON config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid config: {}", .0.join("; "))]
    Invalid(Vec<String>),
}

// ---------------------------------------------------------------------------
// Top-level FlipConfig
// ---------------------------------------------------------------------------

/// All tunables for one flip session.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct FlipConfig {
    /// Touch-to-progress normalization.
    pub tracking: TrackingConfig,
    /// Finish/cancel thresholds and velocity conversion.
    pub completion: CompletionConfig,
    /// Spring used when a card settles to its terminal state.
    pub card_spring: SpringSpec,
    /// Spring used when the next card moves between slots.
    pub frame_spring: SpringSpec,
    /// Rotation projection.
    pub visual: VisualConfig,
    /// Slot geometry.
    pub layout: StackLayout,
}

impl Default for FlipConfig {
    fn default() -> Self {
        Self {
            tracking: TrackingConfig::default(),
            completion: CompletionConfig::default(),
            card_spring: SpringSpec::CARD_SETTLE,
            frame_spring: SpringSpec::FRAME_SETTLE,
            visual: VisualConfig::default(),
            layout: StackLayout::default(),
        }
    }
}

impl FlipConfig {
    /// Load from a TOML string.
    #[cfg(feature = "config")]
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Load from a TOML file on disk.
    #[cfg(feature = "config")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    #[cfg(feature = "config")]
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(s)?)
    }

    /// Load from a JSON file on disk.
    #[cfg(feature = "config")]
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&content)
    }

    /// Serialize to pretty TOML.
    #[cfg(feature = "config")]
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Validate all parameters are within acceptable ranges.
    ///
    /// Returns a list of validation errors. An empty list means the config
    /// is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if !positive(self.tracking.sensitivity) {
            errors.push(format!(
                "tracking.sensitivity must be > 0, got {}",
                self.tracking.sensitivity
            ));
        }

        for (name, value) in [
            ("completion.upward_threshold", self.completion.upward_threshold),
            (
                "completion.downward_threshold",
                self.completion.downward_threshold,
            ),
        ] {
            if !(0.0..=1.0).contains(&value) {
                errors.push(format!("{name} must be in [0, 1], got {value}"));
            }
        }

        if !positive(self.completion.reference_distance) {
            errors.push(format!(
                "completion.reference_distance must be > 0, got {}",
                self.completion.reference_distance
            ));
        }

        for (name, spring) in [
            ("card_spring", &self.card_spring),
            ("frame_spring", &self.frame_spring),
        ] {
            if !positive(spring.duration_secs) {
                errors.push(format!(
                    "{name}.duration_secs must be > 0, got {}",
                    spring.duration_secs
                ));
            }
            if !positive(spring.damping_ratio) {
                errors.push(format!(
                    "{name}.damping_ratio must be > 0, got {}",
                    spring.damping_ratio
                ));
            }
            if !spring.initial_velocity.is_finite() {
                errors.push(format!("{name}.initial_velocity must be finite"));
            }
        }

        if !positive(self.visual.perspective_distance) {
            errors.push(format!(
                "visual.perspective_distance must be > 0, got {}",
                self.visual.perspective_distance
            ));
        }

        if !positive(self.layout.base_size.width) || !positive(self.layout.base_size.height) {
            errors.push(format!(
                "layout.base_size must be positive, got {}x{}",
                self.layout.base_size.width, self.layout.base_size.height
            ));
        }

        errors
    }

    /// Return `self` if [`validate`](Self::validate) finds nothing.
    pub fn validated(self) -> Result<Self, ConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(ConfigError::Invalid(errors))
        }
    }
}

fn positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

/// Touch-to-progress normalization.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct TrackingConfig {
    /// Vertical distance that equals one full card of progress.
    pub sensitivity: f64,
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self { sensitivity: 200.0 }
    }
}

/// Finish/cancel decision parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct CompletionConfig {
    /// Minimum local progress to finish when the release moves upward.
    pub upward_threshold: f64,
    /// Minimum local progress to finish when the release moves downward.
    pub downward_threshold: f64,
    /// Divisor converting gesture velocity into spring velocity.
    pub reference_distance: f64,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            upward_threshold: 0.7,
            downward_threshold: 0.4,
            reference_distance: 100.0,
        }
    }
}

/// Rotation projection.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct VisualConfig {
    /// Eye distance for the perspective term (`m34 = -1 / d`).
    pub perspective_distance: f64,
}

impl Default for VisualConfig {
    fn default() -> Self {
        Self {
            perspective_distance: 300.0,
        }
    }
}
