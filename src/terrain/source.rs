use crate::{
    core::room::RoomName,
    prelude::HashMap,
    MapError, Result,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::{
    fmt,
    hash::{Hash, Hasher},
    str::FromStr,
    sync::RwLock,
};

/// A named partition of the game world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Shard {
    #[default]
    Shard0,
    Shard1,
    Shard2,
    Shard3,
}

impl Shard {
    pub const ALL: [Shard; 4] = [Shard::Shard0, Shard::Shard1, Shard::Shard2, Shard::Shard3];

    pub fn as_str(&self) -> &'static str {
        match self {
            Shard::Shard0 => "shard0",
            Shard::Shard1 => "shard1",
            Shard::Shard2 => "shard2",
            Shard::Shard3 => "shard3",
        }
    }
}

impl fmt::Display for Shard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Shard {
    type Err = MapError;

    fn from_str(s: &str) -> Result<Self> {
        Shard::ALL
            .into_iter()
            .find(|shard| shard.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| MapError::Config(format!("unknown shard '{s}'")))
    }
}

/// Anything that can produce the encoded terrain of a room.
///
/// The encoding is one digit per tile, row-major: `0` plain, `1` wall, `2` swamp.
#[async_trait]
pub trait TerrainSource: Send + Sync {
    async fn fetch(&self, room: &RoomName, shard: Shard) -> Result<String>;
}

/// Deterministic generated terrain for demos and offline use.
///
/// Border tiles are walls; interior tiles are picked from a hash of the room
/// name and tile index, roughly 10% wall and 15% swamp.
#[derive(Debug, Clone)]
pub struct DemoTerrainSource {
    room_size: u32,
}

impl DemoTerrainSource {
    pub fn new(room_size: u32) -> Self {
        Self { room_size }
    }

    /// Encoded terrain for a room; identical on every call
    pub fn generate(&self, room: &RoomName, shard: Shard) -> String {
        let size = self.room_size;
        let mut encoded = String::with_capacity((size * size) as usize);
        for y in 0..size {
            for x in 0..size {
                let border = x == 0 || y == 0 || x + 1 == size || y + 1 == size;
                let code = if border {
                    '1'
                } else {
                    match tile_roll(room, shard, y * size + x) {
                        r if r < 100 => '1',
                        r if r < 250 => '2',
                        _ => '0',
                    }
                };
                encoded.push(code);
            }
        }
        encoded
    }
}

impl Default for DemoTerrainSource {
    fn default() -> Self {
        Self::new(crate::core::constants::ROOM_SIZE)
    }
}

/// Stable pseudo-random value in `0..1000` for one tile
fn tile_roll(room: &RoomName, shard: Shard, index: u32) -> u64 {
    let mut hasher = fxhash::FxHasher64::default();
    room.as_str().hash(&mut hasher);
    shard.hash(&mut hasher);
    index.hash(&mut hasher);
    // FxHasher mixes low bits poorly; fold the high half in
    let h = hasher.finish();
    (h ^ (h >> 29) ^ (h >> 47)) % 1000
}

#[async_trait]
impl TerrainSource for DemoTerrainSource {
    async fn fetch(&self, room: &RoomName, shard: Shard) -> Result<String> {
        Ok(self.generate(room, shard))
    }
}

/// Terrain held in memory, keyed by shard and room
#[derive(Debug, Default)]
pub struct MemoryTerrainSource {
    rooms: RwLock<HashMap<(Shard, RoomName), String>>,
}

impl MemoryTerrainSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, shard: Shard, room: RoomName, encoded: impl Into<String>) {
        if let Ok(mut rooms) = self.rooms.write() {
            rooms.insert((shard, room), encoded.into());
        }
    }

    pub fn len(&self) -> usize {
        self.rooms.read().map(|rooms| rooms.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl TerrainSource for MemoryTerrainSource {
    async fn fetch(&self, room: &RoomName, shard: Shard) -> Result<String> {
        let rooms = self.rooms.read().map_err(|_| MapError::TerrainUnavailable {
            room: room.to_string(),
            shard: shard.to_string(),
            reason: "terrain store poisoned".to_string(),
        })?;
        rooms
            .get(&(shard, room.clone()))
            .cloned()
            .ok_or_else(|| MapError::TerrainUnavailable {
                room: room.to_string(),
                shard: shard.to_string(),
                reason: "no terrain stored".to_string(),
            })
    }
}
