//! Configuration for the map engine.
//!
//! A single immutable [`MapConfig`] value is injected into every component
//! that needs geometry, scale limits or colors. Nothing reads ambient globals,
//! so a host can run two maps with different room sizes side by side.

use crate::core::constants::{
    DETAIL_MODE_THRESHOLD, LEGEND_BOTTOM_OFFSET, MARGIN, MAX_SCALE, MIN_SCALE,
    OVERVIEW_ROOM_RADIUS, ROOM_SIZE, TERRAIN_CACHE_CAPACITY, TILE_SIZE, VIEW_PRECISION,
    ZOOM_IN_FACTOR, ZOOM_OUT_FACTOR,
};
use crate::{MapError, Result};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

static DEFAULT_CONFIG: Lazy<MapConfig> = Lazy::new(MapConfig::builtin);

/// A 24-bit RGB color, `0xRRGGBB`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Color(pub u32);

impl Color {
    pub const WHITE: Color = Color(0xffffff);

    pub fn rgb(&self) -> (u8, u8, u8) {
        (
            ((self.0 >> 16) & 0xff) as u8,
            ((self.0 >> 8) & 0xff) as u8,
            (self.0 & 0xff) as u8,
        )
    }
}

/// Colors for terrain, chrome and markers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    pub plain: Color,
    pub wall: Color,
    pub swamp: Color,
    pub grid: Color,
    pub background: Color,
    pub room_border: Color,
    pub room_label: Color,
    pub overview_dot: Color,
    pub spawn: Color,
    pub tower: Color,
    pub extension: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            plain: Color(0x2b2b2b),
            wall: Color(0x111111),
            swamp: Color(0x1a3a1a),
            grid: Color(0x404040),
            background: Color(0x1a1a1a),
            room_border: Color(0x2f2f2f),
            room_label: Color::WHITE,
            overview_dot: Color(0x3ddc84),
            spawn: Color(0xf4d35e),
            tower: Color(0x70d6ff),
            extension: Color(0xf4978e),
        }
    }
}

/// Engine-wide geometry, scale limits and colors
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    /// Lower scale limit, in percent
    pub min_scale: f64,
    /// Upper scale limit, in percent
    pub max_scale: f64,
    /// Scales strictly above this render in detail mode
    pub detail_threshold: f64,
    /// Tiles per room edge
    pub room_size: u32,
    /// Unscaled pixels per tile
    pub tile_size: u32,
    /// World-pixel padding before the first room
    pub margin: f64,
    pub overview_room_radius: f64,
    /// Ratio multiplier for a wheel step towards the user
    pub zoom_in_factor: f64,
    /// Ratio multiplier for a wheel step away from the user
    pub zoom_out_factor: f64,
    /// Decimal places on values reported to the host
    pub view_precision: u32,
    pub legend_bottom_offset: f64,
    pub terrain_cache_capacity: usize,
    pub palette: Palette,
}

impl MapConfig {
    fn builtin() -> Self {
        Self {
            min_scale: MIN_SCALE,
            max_scale: MAX_SCALE,
            detail_threshold: DETAIL_MODE_THRESHOLD,
            room_size: ROOM_SIZE,
            tile_size: TILE_SIZE,
            margin: MARGIN,
            overview_room_radius: OVERVIEW_ROOM_RADIUS,
            zoom_in_factor: ZOOM_IN_FACTOR,
            zoom_out_factor: ZOOM_OUT_FACTOR,
            view_precision: VIEW_PRECISION,
            legend_bottom_offset: LEGEND_BOTTOM_OFFSET,
            terrain_cache_capacity: TERRAIN_CACHE_CAPACITY,
            palette: Palette::default(),
        }
    }

    /// Shared default configuration
    pub fn shared_default() -> &'static MapConfig {
        &DEFAULT_CONFIG
    }

    /// Parses a JSON document; missing fields take their defaults
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: MapConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn with_scale_limits(mut self, min_scale: f64, max_scale: f64) -> Self {
        self.min_scale = min_scale;
        self.max_scale = max_scale;
        self
    }

    pub fn with_detail_threshold(mut self, threshold: f64) -> Self {
        self.detail_threshold = threshold;
        self
    }

    pub fn with_room_geometry(mut self, room_size: u32, tile_size: u32) -> Self {
        self.room_size = room_size;
        self.tile_size = tile_size;
        self
    }

    pub fn with_margin(mut self, margin: f64) -> Self {
        self.margin = margin;
        self
    }

    /// Unscaled pixels along one room edge
    pub fn room_px(&self) -> f64 {
        f64::from(self.room_size) * f64::from(self.tile_size)
    }

    /// Highest valid local tile coordinate inside a room
    pub fn max_local(&self) -> u32 {
        self.room_size.saturating_sub(1)
    }

    /// Checks that the values describe a usable map
    pub fn validate(&self) -> Result<()> {
        if !(self.min_scale.is_finite() && self.min_scale > 0.0) {
            return Err(MapError::Config(format!(
                "min_scale must be positive, got {}",
                self.min_scale
            )));
        }
        if !self.max_scale.is_finite() || self.min_scale > self.max_scale {
            return Err(MapError::Config(format!(
                "scale limits out of order: {}..{}",
                self.min_scale, self.max_scale
            )));
        }
        if !self.detail_threshold.is_finite() {
            return Err(MapError::Config("detail_threshold must be finite".into()));
        }
        if self.room_size == 0 || self.tile_size == 0 {
            return Err(MapError::Config(format!(
                "room geometry must be non-zero, got {}x{}",
                self.room_size, self.tile_size
            )));
        }
        if !self.margin.is_finite() || self.margin < 0.0 {
            return Err(MapError::Config(format!(
                "margin must be a non-negative number, got {}",
                self.margin
            )));
        }
        if !(self.zoom_in_factor > 1.0 && self.zoom_out_factor > 0.0 && self.zoom_out_factor < 1.0)
        {
            return Err(MapError::Config(format!(
                "zoom factors must bracket 1.0, got in={} out={}",
                self.zoom_in_factor, self.zoom_out_factor
            )));
        }
        if self.view_precision > 10 {
            return Err(MapError::Config(format!(
                "view_precision {} is beyond f64 resolution",
                self.view_precision
            )));
        }
        Ok(())
    }
}

impl Default for MapConfig {
    fn default() -> Self {
        DEFAULT_CONFIG.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_constants() {
        let config = MapConfig::default();
        assert_eq!(config.min_scale, 30.0);
        assert_eq!(config.max_scale, 300.0);
        assert_eq!(config.detail_threshold, 100.0);
        assert_eq!(config.room_px(), 500.0);
        assert_eq!(config.max_local(), 49);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = MapConfig::from_json_str(r#"{ "max_scale": 400, "tile_size": 4 }"#).unwrap();
        assert_eq!(config.max_scale, 400.0);
        assert_eq!(config.tile_size, 4);
        assert_eq!(config.room_size, 50);
        assert_eq!(config.palette, Palette::default());
    }

    #[test]
    fn test_json_round_trip() {
        let config = MapConfig::default().with_margin(12.0);
        let json = config.to_json_string().unwrap();
        assert_eq!(MapConfig::from_json_str(&json).unwrap(), config);
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        assert!(MapConfig::default().with_scale_limits(200.0, 100.0).validate().is_err());
        assert!(MapConfig::default().with_scale_limits(0.0, 100.0).validate().is_err());
        assert!(MapConfig::default().with_room_geometry(0, 10).validate().is_err());
        assert!(MapConfig::default().with_margin(-1.0).validate().is_err());
        assert!(matches!(
            MapConfig::from_json_str(r#"{ "zoom_in_factor": 0.5 }"#),
            Err(MapError::Config(_))
        ));
        assert!(matches!(
            MapConfig::from_json_str("{ not json"),
            Err(MapError::Serialization(_))
        ));
    }

    #[test]
    fn test_color_channels() {
        assert_eq!(Color(0x3ddc84).rgb(), (0x3d, 0xdc, 0x84));
    }
}
