pub mod cache;
pub mod loader;
pub mod parse;
pub mod source;

pub use cache::TerrainCache;
pub use loader::{suggested_radius, GridLoad, LoadFailure, TerrainLoader};
pub use parse::{RoomTerrain, TerrainCounts, TerrainKind};
pub use source::{DemoTerrainSource, MemoryTerrainSource, Shard, TerrainSource};
