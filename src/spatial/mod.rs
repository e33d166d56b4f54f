pub mod index;

pub use index::{tooltip_anchor, MarkerIndex, PlacedMarker, SpatialIndex, SpatialItem};
