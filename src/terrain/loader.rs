use crate::{
    core::{
        config::MapConfig,
        room::{room_grid, RoomCoord, RoomName},
    },
    rendering::lod::RenderMode,
    terrain::{
        cache::TerrainCache,
        parse::{validate_encoded, RoomTerrain},
        source::{Shard, TerrainSource},
    },
    MapError, Result,
};
use futures::future::join_all;
use std::sync::Arc;

/// Neighbour radius worth loading at a scale: one ring when zoomed in, two
/// when zoomed out far enough to see more rooms
pub fn suggested_radius(scale: f64, threshold: f64) -> u32 {
    match RenderMode::for_scale(scale, threshold) {
        RenderMode::Detail => 1,
        RenderMode::Overview => 2,
    }
}

/// A room that could not be loaded
#[derive(Debug)]
pub struct LoadFailure {
    pub room: RoomName,
    pub error: MapError,
}

/// Outcome of loading a grid of rooms; partial success is normal
#[derive(Debug, Default)]
pub struct GridLoad {
    pub rooms: Vec<RoomTerrain>,
    pub failures: Vec<LoadFailure>,
}

impl GridLoad {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Cache-then-source terrain loading
pub struct TerrainLoader {
    source: Arc<dyn TerrainSource>,
    cache: TerrainCache,
    room_size: u32,
}

impl TerrainLoader {
    pub fn new(source: Arc<dyn TerrainSource>, config: &MapConfig) -> Self {
        Self {
            source,
            cache: TerrainCache::new(config.terrain_cache_capacity),
            room_size: config.room_size,
        }
    }

    /// Shares an existing cache, e.g. between loaders for different sources
    pub fn with_cache(mut self, cache: TerrainCache) -> Self {
        self.cache = cache;
        self
    }

    pub fn cache(&self) -> &TerrainCache {
        &self.cache
    }

    /// Terrain of one room: served from the cache when present, otherwise
    /// fetched, validated and cached
    pub async fn load(&self, room: &RoomName, shard: Shard) -> Result<RoomTerrain> {
        if let Some(encoded) = self.cache.get(shard, room) {
            log::trace!("terrain cache hit for {shard}/{room}");
            return Ok(RoomTerrain::parse(room.clone(), &encoded, self.room_size));
        }

        let encoded = self.source.fetch(room, shard).await?;
        validate_encoded(room, &encoded, self.room_size)?;
        let terrain = RoomTerrain::parse(room.clone(), &encoded, self.room_size);
        self.cache.insert(shard, room.clone(), encoded);
        Ok(terrain)
    }

    /// Loads the square of rooms around `center` concurrently
    pub async fn load_grid(&self, center: RoomCoord, radius: u32, shard: Shard) -> GridLoad {
        let names = room_grid(center, radius);
        let results = join_all(names.iter().map(|name| self.load(name, shard))).await;

        let mut grid = GridLoad::default();
        for (room, result) in names.into_iter().zip(results) {
            match result {
                Ok(terrain) => grid.rooms.push(terrain),
                Err(error) => {
                    log::warn!("failed to load terrain for {shard}/{room}: {error}");
                    grid.failures.push(LoadFailure { room, error });
                }
            }
        }
        log::info!(
            "loaded {} of {} rooms around {center} on {shard}",
            grid.rooms.len(),
            grid.rooms.len() + grid.failures.len()
        );
        grid
    }
}
