//! # roommap
//!
//! Map projection and viewport interaction for grids of game-world rooms.
//!
//! Rooms are laid out by name on an integer grid, drawn as terrain tiles with
//! building markers on top, and explored by dragging and wheel-zooming. The
//! engine keeps the view (center position plus scale) consistent across three
//! coordinate frames and reports every committed change back to the host.

pub mod core;
pub mod input;
pub mod layers;
pub mod prelude;
pub mod rendering;
pub mod spatial;
pub mod terrain;
pub use crate::core::constants;

// Re-export public API
pub use core::{
    bounds::{Bounds, MapBounds},
    builder::TerrainMapBuilder,
    config::{Color, MapConfig, Palette},
    geo::{Point, RoomPos, ScreenPoint, Size, WorldPoint},
    layout::RoomLayout,
    map::{Selection, SurfaceRequest, TerrainMap},
    room::{RoomCoord, RoomName},
    viewport::{clamp_scale, Transform, ViewState, Viewport},
};

pub use layers::marker::{Marker, MarkerDraft, MarkerKind};

pub use input::{events::InputEvent, events::MapEvent, handler::ViewportController};

pub use rendering::{
    context::{DrawCommand, Frame, RenderContext},
    lod::{LevelOfDetail, RenderMode},
    pipeline::ScenePipeline,
    surface::{RecordingSurface, RecordingSurfaceFactory, RenderSurface, SurfaceFactory},
};

pub use spatial::index::MarkerIndex;

pub use terrain::{RoomTerrain, Shard, TerrainLoader, TerrainSource};

/// Installs `env_logger` as the log backend, honouring `RUST_LOG` and
/// defaulting to `info`. Later calls are no-ops.
#[cfg(feature = "debug")]
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();
}

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, MapError>;

/// Common error types
#[derive(Debug, thiserror::Error)]
pub enum MapError {
    #[error("Invalid room name: {0}")]
    InvalidRoomName(String),

    #[error("Invalid terrain for {room}: {reason}")]
    InvalidTerrain { room: String, reason: String },

    #[error("Terrain unavailable for {shard}/{room}: {reason}")]
    TerrainUnavailable {
        room: String,
        shard: String,
        reason: String,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Surface unavailable: {0}")]
    SurfaceUnavailable(String),

    #[error("Surface setup cancelled")]
    Cancelled,
}

/// Error type alias for convenience
pub type Error = MapError;
