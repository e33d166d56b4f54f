use crate::core::{
    bounds::MapBounds,
    config::MapConfig,
    geo::{RoomPos, WorldPoint},
    room::{RoomCoord, RoomName},
};

/// Lays rooms out in world-pixel space.
///
/// World pixels are measured from the top-left room of the loaded set
/// (`bounds.min_x`, `bounds.min_y`) plus a fixed margin, at one unscaled
/// pixel per tile pixel. They do not depend on the current pan or scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoomLayout {
    room_size: u32,
    tile_size: u32,
    margin: f64,
}

impl RoomLayout {
    pub fn new(room_size: u32, tile_size: u32, margin: f64) -> Self {
        Self {
            room_size,
            tile_size,
            margin,
        }
    }

    pub fn from_config(config: &MapConfig) -> Self {
        Self::new(config.room_size, config.tile_size, config.margin)
    }

    pub fn room_size(&self) -> u32 {
        self.room_size
    }

    pub fn tile_size(&self) -> f64 {
        f64::from(self.tile_size)
    }

    pub fn margin(&self) -> f64 {
        self.margin
    }

    /// Unscaled pixels along one room edge
    pub fn room_px(&self) -> f64 {
        f64::from(self.room_size) * f64::from(self.tile_size)
    }

    /// Bounding box of the given rooms in grid units; empty input gives zero bounds
    pub fn bounds_of<'a, I>(&self, rooms: I) -> MapBounds
    where
        I: IntoIterator<Item = &'a RoomName>,
    {
        MapBounds::of_rooms(rooms)
    }

    /// World-pixel origin of a room's top-left tile
    pub fn room_origin(&self, coord: RoomCoord, bounds: &MapBounds) -> WorldPoint {
        self.world_of(
            &RoomPos::new(f64::from(coord.x), f64::from(coord.y)),
            bounds,
        )
    }

    /// World-pixel center of a room's box
    pub fn room_center(&self, coord: RoomCoord, bounds: &MapBounds) -> WorldPoint {
        let half = self.room_px() / 2.0;
        self.room_origin(coord, bounds).offset(half, half)
    }

    /// World-pixel top-left corner of a tile inside a room
    pub fn tile_origin(&self, coord: RoomCoord, bounds: &MapBounds, x: u32, y: u32) -> WorldPoint {
        let tile = self.tile_size();
        self.room_origin(coord, bounds)
            .offset(f64::from(x) * tile, f64::from(y) * tile)
    }

    /// World-pixel center of a tile inside a room
    pub fn tile_center(&self, coord: RoomCoord, bounds: &MapBounds, x: u32, y: u32) -> WorldPoint {
        let half = self.tile_size() / 2.0;
        self.tile_origin(coord, bounds, x, y).offset(half, half)
    }

    /// Room-grid position to world pixels
    pub fn world_of(&self, pos: &RoomPos, bounds: &MapBounds) -> WorldPoint {
        let room_px = self.room_px();
        WorldPoint::new(
            (pos.x - f64::from(bounds.min_x)) * room_px + self.margin,
            (pos.y - f64::from(bounds.min_y)) * room_px + self.margin,
        )
    }

    /// World pixels back to a room-grid position (unrounded)
    pub fn room_pos_of(&self, world: &WorldPoint, bounds: &MapBounds) -> RoomPos {
        let room_px = self.room_px();
        RoomPos::new(
            (world.x - self.margin) / room_px + f64::from(bounds.min_x),
            (world.y - self.margin) / room_px + f64::from(bounds.min_y),
        )
    }
}

impl Default for RoomLayout {
    fn default() -> Self {
        Self::from_config(MapConfig::shared_default())
    }
}
