//! Prelude module for common roommap types and traits
//!
//! This module re-exports the most commonly used types, traits, and functions
//! for easy importing with `use roommap::prelude::*;`

pub use crate::core::{
    bounds::{Bounds, MapBounds},
    builder::TerrainMapBuilder,
    config::{Color, MapConfig, Palette},
    geo::{Point, RoomPos, ScreenPoint, Size, WorldPoint},
    layout::RoomLayout,
    map::{Selection, SurfaceRequest, TerrainMap},
    room::{RoomCoord, RoomName},
    viewport::{Transform, ViewState, Viewport},
};

pub use crate::layers::marker::{Marker, MarkerDraft, MarkerKind, MarkerShape};

pub use crate::input::{
    events::{InputEvent, MapEvent},
    handler::{DragState, EventManager, ViewportController},
};

pub use crate::rendering::{
    context::{DrawCommand, Frame},
    lod::{LevelOfDetail, RenderMode},
    pipeline::ScenePipeline,
    surface::{
        CancellationToken, RecordingSurface, RecordingSurfaceFactory, RenderSurface,
        SurfaceFactory,
    },
};

pub use crate::spatial::index::MarkerIndex;

pub use crate::terrain::{
    DemoTerrainSource, GridLoad, RoomTerrain, Shard, TerrainCache, TerrainKind, TerrainLoader,
    TerrainSource,
};

pub use crate::{Error as MapError, Result};

pub use std::sync::Arc;

pub use fxhash::{FxHashMap as HashMap, FxHashSet as HashSet, FxHasher};
