//! Engine configuration: hit-test thresholds, minimum box size, and the two
//! independent overlap ratios used for plate grouping and duplicate detection.
//!
//! Values are validated once, when the configuration is built, so the hot
//! paths (classification, resizing) never re-check them.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use serde::{Deserialize, Serialize};

use crate::consts::{CORNER_THRESHOLD_PX, EDGE_THRESHOLD_PX, GROUP_OVERLAP_RATIO, MAX_OVERLAP_RATIO, MIN_BOX_PX};

/// Error returned when a configuration value is unusable.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// The corner grab zone would be smaller than the edge grab zone.
    #[error("corner threshold ({corner}px) must be >= edge threshold ({edge}px)")]
    CornerBelowEdge { edge: f64, corner: f64 },
    /// A pixel quantity that must be strictly positive is not.
    #[error("{name} must be a positive number of pixels, got {value}")]
    NonPositive { name: &'static str, value: f64 },
    /// A ratio is outside `(0, 1]`.
    #[error("{name} must be in (0, 1], got {value}")]
    RatioOutOfRange { name: &'static str, value: f64 },
    /// An environment variable is set but does not parse.
    #[error("invalid value for {key}: {value:?}")]
    InvalidEnv { key: &'static str, value: String },
}

/// Grab distances used by the hit classifier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HitThresholds {
    edge: f64,
    corner: f64,
}

impl HitThresholds {
    /// Build a threshold pair.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NonPositive`] for a non-positive edge threshold
    /// and [`ConfigError::CornerBelowEdge`] if `corner < edge`.
    pub fn new(edge: f64, corner: f64) -> Result<Self, ConfigError> {
        positive("edge threshold", edge)?;
        if corner.is_nan() || corner < edge {
            return Err(ConfigError::CornerBelowEdge { edge, corner });
        }
        Ok(Self { edge, corner })
    }

    #[must_use]
    pub fn edge(&self) -> f64 {
        self.edge
    }

    #[must_use]
    pub fn corner(&self) -> f64 {
        self.corner
    }
}

impl Default for HitThresholds {
    fn default() -> Self {
        Self { edge: EDGE_THRESHOLD_PX, corner: CORNER_THRESHOLD_PX }
    }
}

/// Tunable parameters of the annotation engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Pixel distance for edge grabs.
    pub edge_threshold_px: f64,
    /// Pixel distance for corner grabs; must be at least `edge_threshold_px`.
    pub corner_threshold_px: f64,
    /// Smallest width/height in pixels for drawn and resized boxes.
    pub min_box_px: f64,
    /// Vertical overlap ratio that joins a box to a plate group.
    pub group_overlap_ratio: f64,
    /// Own-area overlap ratio above which two boxes are flagged as duplicates.
    pub max_overlap_ratio: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            edge_threshold_px: EDGE_THRESHOLD_PX,
            corner_threshold_px: CORNER_THRESHOLD_PX,
            min_box_px: MIN_BOX_PX,
            group_overlap_ratio: GROUP_OVERLAP_RATIO,
            max_overlap_ratio: MAX_OVERLAP_RATIO,
        }
    }
}

impl EngineConfig {
    /// Check every field, returning the config unchanged when it is usable.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found.
    pub fn validate(self) -> Result<Self, ConfigError> {
        HitThresholds::new(self.edge_threshold_px, self.corner_threshold_px)?;
        positive("minimum box size", self.min_box_px)?;
        ratio("group overlap ratio", self.group_overlap_ratio)?;
        ratio("max overlap ratio", self.max_overlap_ratio)?;
        Ok(self)
    }

    /// The classifier thresholds of a validated config.
    #[must_use]
    pub fn thresholds(&self) -> HitThresholds {
        HitThresholds { edge: self.edge_threshold_px, corner: self.corner_threshold_px }
    }

    /// Build a config from environment variables, falling back to defaults.
    ///
    /// - `ANNOTATOR_EDGE_THRESHOLD_PX`: default 8
    /// - `ANNOTATOR_CORNER_THRESHOLD_PX`: default 15
    /// - `ANNOTATOR_MIN_BOX_PX`: default 5
    /// - `ANNOTATOR_GROUP_OVERLAP`: default 0.5
    /// - `ANNOTATOR_MAX_OVERLAP`: default 0.6
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidEnv`] for a value that does not parse and
    /// any validation error for a value that parses but is out of range.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Self {
            edge_threshold_px: env_parse("ANNOTATOR_EDGE_THRESHOLD_PX", defaults.edge_threshold_px)?,
            corner_threshold_px: env_parse("ANNOTATOR_CORNER_THRESHOLD_PX", defaults.corner_threshold_px)?,
            min_box_px: env_parse("ANNOTATOR_MIN_BOX_PX", defaults.min_box_px)?,
            group_overlap_ratio: env_parse("ANNOTATOR_GROUP_OVERLAP", defaults.group_overlap_ratio)?,
            max_overlap_ratio: env_parse("ANNOTATOR_MAX_OVERLAP", defaults.max_overlap_ratio)?,
        }
        .validate()
    }
}

fn env_parse(key: &'static str, default: f64) -> Result<f64, ConfigError> {
    match std::env::var(key) {
        Ok(raw) => parse_value(key, &raw),
        Err(_) => Ok(default),
    }
}

fn parse_value(key: &'static str, raw: &str) -> Result<f64, ConfigError> {
    raw.trim()
        .parse::<f64>()
        .map_err(|_| ConfigError::InvalidEnv { key, value: raw.to_owned() })
}

fn positive(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { name, value })
    }
}

fn ratio(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value > 0.0 && value <= 1.0 {
        Ok(())
    } else {
        Err(ConfigError::RatioOutOfRange { name, value })
    }
}
