pub mod marker;

pub use marker::{Marker, MarkerDraft, MarkerKind, MarkerShape};
