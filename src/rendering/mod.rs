pub mod context;
pub mod lod;
pub mod pipeline;
pub mod surface;

// Re-export main types
pub use context::{DrawCommand, DrawLayer, Frame, RenderContext, Stroke};
pub use lod::{LevelOfDetail, RenderMode};
pub use pipeline::{Scene, ScenePipeline};
pub use surface::{
    initialize_surface, CancellationToken, RecordingSurface, RecordingSurfaceFactory,
    RenderSurface, SurfaceFactory, SurfaceSlot,
};
