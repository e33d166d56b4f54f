use crate::core::config::MapConfig;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How much of the scene gets drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RenderMode {
    /// One dot per room; no tiles, no markers, no hit-testing
    Overview,
    /// Full terrain, grid, borders, labels and interactive markers
    Detail,
}

impl RenderMode {
    /// `Detail` strictly above `threshold`, `Overview` at or below it
    pub fn for_scale(scale: f64, threshold: f64) -> Self {
        if scale > threshold {
            RenderMode::Detail
        } else {
            RenderMode::Overview
        }
    }

    pub fn is_detail(&self) -> bool {
        matches!(self, RenderMode::Detail)
    }

    /// Whether markers can be picked in this mode
    pub fn allows_hit_testing(&self) -> bool {
        self.is_detail()
    }
}

impl fmt::Display for RenderMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderMode::Overview => write!(f, "overview"),
            RenderMode::Detail => write!(f, "detail"),
        }
    }
}

/// Picks the render mode from the current scale.
///
/// Stateless: the mode is recomputed on every scale change, so there is no
/// hysteresis band around the threshold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LevelOfDetail {
    threshold: f64,
}

impl LevelOfDetail {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    pub fn from_config(config: &MapConfig) -> Self {
        Self::new(config.detail_threshold)
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn mode(&self, scale: f64) -> RenderMode {
        RenderMode::for_scale(scale, self.threshold)
    }
}

impl Default for LevelOfDetail {
    fn default() -> Self {
        Self::from_config(MapConfig::shared_default())
    }
}
