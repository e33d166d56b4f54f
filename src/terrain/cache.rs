use crate::{core::room::RoomName, terrain::source::Shard};
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex};

type TerrainKey = (Shard, RoomName);

/// In-memory terrain cache using LRU eviction, keyed by shard and room.
///
/// Clones share the same storage.
#[derive(Debug)]
pub struct TerrainCache {
    cache: Arc<Mutex<LruCache<TerrainKey, Arc<str>>>>,
}

impl TerrainCache {
    /// Create a new terrain cache with the given capacity (at least one room)
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            cache: Arc::new(Mutex::new(LruCache::new(capacity))),
        }
    }

    pub fn with_default_capacity() -> Self {
        Self::new(crate::core::constants::TERRAIN_CACHE_CAPACITY)
    }

    pub fn get(&self, shard: Shard, room: &RoomName) -> Option<Arc<str>> {
        self.cache.lock().ok()?.get(&(shard, room.clone())).cloned()
    }

    pub fn insert(&self, shard: Shard, room: RoomName, encoded: impl Into<Arc<str>>) {
        if let Ok(mut cache) = self.cache.lock() {
            cache.put((shard, room), encoded.into());
        }
    }

    pub fn contains(&self, shard: Shard, room: &RoomName) -> bool {
        self.cache
            .lock()
            .ok()
            .map(|cache| cache.contains(&(shard, room.clone())))
            .unwrap_or(false)
    }

    pub fn remove(&self, shard: Shard, room: &RoomName) -> Option<Arc<str>> {
        self.cache.lock().ok()?.pop(&(shard, room.clone()))
    }

    pub fn clear(&self) {
        if let Ok(mut cache) = self.cache.lock() {
            cache.clear();
        }
    }

    /// Get the current number of cached rooms
    pub fn len(&self) -> usize {
        self.cache.lock().ok().map(|cache| cache.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.cache
            .lock()
            .ok()
            .map(|cache| cache.cap().get())
            .unwrap_or(0)
    }
}

impl Clone for TerrainCache {
    fn clone(&self) -> Self {
        Self {
            cache: Arc::clone(&self.cache),
        }
    }
}

impl Default for TerrainCache {
    fn default() -> Self {
        Self::with_default_capacity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn room(name: &str) -> RoomName {
        RoomName::parse(name).unwrap()
    }

    #[test]
    fn test_terrain_cache_basic_operations() {
        let cache = TerrainCache::new(4);
        assert!(cache.is_empty());

        cache.insert(Shard::Shard0, room("W0N0"), "012");
        assert_eq!(cache.len(), 1);
        assert!(cache.contains(Shard::Shard0, &room("W0N0")));
        assert!(!cache.contains(Shard::Shard1, &room("W0N0")));
        assert_eq!(cache.get(Shard::Shard0, &room("W0N0")).as_deref(), Some("012"));

        let shared = cache.clone();
        shared.insert(Shard::Shard1, room("W0N0"), "111");
        assert_eq!(cache.len(), 2);

        assert!(cache.remove(Shard::Shard1, &room("W0N0")).is_some());
        cache.clear();
        assert!(shared.is_empty());
    }

    #[test]
    fn test_terrain_cache_lru_eviction() {
        let cache = TerrainCache::new(2);
        cache.insert(Shard::Shard0, room("W0N0"), "0");
        cache.insert(Shard::Shard0, room("W1N0"), "1");
        // Touch W0N0 so W1N0 becomes the eviction candidate
        assert!(cache.get(Shard::Shard0, &room("W0N0")).is_some());
        cache.insert(Shard::Shard0, room("E0N0"), "2");

        assert_eq!(cache.len(), 2);
        assert!(cache.contains(Shard::Shard0, &room("W0N0")));
        assert!(!cache.contains(Shard::Shard0, &room("W1N0")));
        assert!(cache.contains(Shard::Shard0, &room("E0N0")));
    }

    #[test]
    fn test_zero_capacity_holds_one_room() {
        assert_eq!(TerrainCache::new(0).capacity(), 1);
    }
}
