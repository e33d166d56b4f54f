use crate::{
    core::{
        config::{Color, Palette},
        room::{RoomCoord, RoomName},
    },
    MapError, Result,
};
use serde::{Deserialize, Serialize};

const WALL_MASK: u8 = 1;
const SWAMP_MASK: u8 = 2;

/// Terrain of a single tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TerrainKind {
    Plain,
    Wall,
    Swamp,
}

impl TerrainKind {
    /// Classifies a terrain code by its bits; the wall bit wins over swamp
    pub fn from_code(code: u8) -> Self {
        if code & WALL_MASK != 0 {
            TerrainKind::Wall
        } else if code & SWAMP_MASK != 0 {
            TerrainKind::Swamp
        } else {
            TerrainKind::Plain
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TerrainKind::Plain => "Plain",
            TerrainKind::Wall => "Wall",
            TerrainKind::Swamp => "Swamp",
        }
    }

    pub fn color(&self, palette: &Palette) -> Color {
        match self {
            TerrainKind::Plain => palette.plain,
            TerrainKind::Wall => palette.wall,
            TerrainKind::Swamp => palette.swamp,
        }
    }
}

/// Tile counts per terrain kind
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TerrainCounts {
    pub plain: usize,
    pub wall: usize,
    pub swamp: usize,
}

/// Decoded terrain of one room, row-major `room_size * room_size` tiles
#[derive(Debug, Clone, PartialEq)]
pub struct RoomTerrain {
    name: RoomName,
    room_size: u32,
    tiles: Vec<TerrainKind>,
}

impl RoomTerrain {
    /// Lenient decode: each character is read as a digit (anything else is
    /// plain), short input is padded with plain and extra input is ignored.
    pub fn parse(name: RoomName, encoded: &str, room_size: u32) -> Self {
        let area = (room_size as usize) * (room_size as usize);
        let mut tiles: Vec<TerrainKind> = encoded
            .chars()
            .take(area)
            .map(|c| TerrainKind::from_code(c.to_digit(10).unwrap_or(0) as u8))
            .collect();
        tiles.resize(area, TerrainKind::Plain);
        Self {
            name,
            room_size,
            tiles,
        }
    }

    /// A room of plain tiles only
    pub fn plain(name: RoomName, room_size: u32) -> Self {
        Self::parse(name, "", room_size)
    }

    pub fn name(&self) -> &RoomName {
        &self.name
    }

    pub fn coord(&self) -> RoomCoord {
        self.name.coord()
    }

    pub fn room_size(&self) -> u32 {
        self.room_size
    }

    /// Terrain at local `(x, y)`, `None` outside the room
    pub fn tile(&self, x: u32, y: u32) -> Option<TerrainKind> {
        if x >= self.room_size || y >= self.room_size {
            return None;
        }
        self.tiles
            .get((y as usize) * (self.room_size as usize) + x as usize)
            .copied()
    }

    /// Tiles with their local coordinates, row by row
    pub fn tiles(&self) -> impl Iterator<Item = (u32, u32, TerrainKind)> + '_ {
        let size = self.room_size.max(1);
        self.tiles
            .iter()
            .enumerate()
            .map(move |(i, kind)| ((i as u32) % size, (i as u32) / size, *kind))
    }

    pub fn counts(&self) -> TerrainCounts {
        self.tiles
            .iter()
            .fold(TerrainCounts::default(), |mut counts, kind| {
                match kind {
                    TerrainKind::Plain => counts.plain += 1,
                    TerrainKind::Wall => counts.wall += 1,
                    TerrainKind::Swamp => counts.swamp += 1,
                }
                counts
            })
    }
}

/// Strict check used when terrain comes from a source: exact length, digits only
pub fn validate_encoded(room: &RoomName, encoded: &str, room_size: u32) -> Result<()> {
    let area = (room_size as usize) * (room_size as usize);
    let len = encoded.chars().count();
    if len != area {
        return Err(MapError::InvalidTerrain {
            room: room.to_string(),
            reason: format!("expected {area} tiles, got {len}"),
        });
    }
    if let Some((index, c)) = encoded.chars().enumerate().find(|(_, c)| !c.is_ascii_digit()) {
        return Err(MapError::InvalidTerrain {
            room: room.to_string(),
            reason: format!("non-digit {c:?} at tile {index}"),
        });
    }
    Ok(())
}
