//! Core constants for the room-grid map.
//! Keeping them in a single place makes it easier to tweak engine-wide magic numbers.
//! Every value here is the default for the matching [`MapConfig`](crate::core::config::MapConfig) field.

/// Tiles along one room edge.
pub const ROOM_SIZE: u32 = 50;

/// Unscaled pixels per tile.
pub const TILE_SIZE: u32 = 10;

/// Unscaled pixels along one room edge (500).
pub const ROOM_PX: u32 = ROOM_SIZE * TILE_SIZE;

/// Tiles in one room, row-major.
pub const ROOM_AREA: usize = (ROOM_SIZE * ROOM_SIZE) as usize;

/// World-pixel padding between the map origin and the top-left room.
pub const MARGIN: f64 = 40.0;

/// Smallest scale percentage the view may take.
pub const MIN_SCALE: f64 = 30.0;

/// Largest scale percentage the view may take.
pub const MAX_SCALE: f64 = 300.0;

/// Scales strictly above this render in detail mode.
pub const DETAIL_MODE_THRESHOLD: f64 = 100.0;

/// Radius of the per-room dot drawn in overview mode.
pub const OVERVIEW_ROOM_RADIUS: f64 = 6.0;

/// Ratio multiplier for one wheel notch towards the user (zoom in).
pub const ZOOM_IN_FACTOR: f64 = 1.1;

/// Ratio multiplier for one wheel notch away from the user (zoom out).
pub const ZOOM_OUT_FACTOR: f64 = 0.9;

/// Decimal places kept on values reported back to the host.
pub const VIEW_PRECISION: u32 = 2;

/// Distance of the terrain legend from the bottom of the surface.
pub const LEGEND_BOTTOM_OFFSET: f64 = 30.0;

/// Terrain entries kept by the in-memory cache.
pub const TERRAIN_CACHE_CAPACITY: usize = 256;
