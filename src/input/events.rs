use crate::core::{
    geo::{Point, ScreenPoint, Size},
    viewport::ViewState,
};
use serde::{Deserialize, Serialize};

/// Pointer and surface events delivered by the host, in surface pixels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InputEvent {
    /// Primary button pressed over the surface
    PointerDown { position: ScreenPoint },
    /// Pointer moved over the surface
    PointerMove { position: ScreenPoint },
    /// Primary button released
    PointerUp,
    /// Pointer left the surface
    PointerLeave,
    /// Wheel step; positive `delta` scrolls away from the user
    Wheel { delta: f64 },
    /// Press and release without movement
    Tap { position: ScreenPoint },
    /// The hosting element changed size
    Resize { size: Size },
}

impl InputEvent {
    /// Gets the primary position associated with this event, if any
    pub fn position(&self) -> Option<ScreenPoint> {
        match self {
            InputEvent::PointerDown { position }
            | InputEvent::PointerMove { position }
            | InputEvent::Tap { position } => Some(*position),
            _ => None,
        }
    }

    /// Checks if this is a pointer event (everything except resize)
    pub fn is_pointer_event(&self) -> bool {
        !matches!(self, InputEvent::Resize { .. })
    }
}

/// Events the map reports back to the host
#[derive(Debug, Clone, PartialEq)]
pub enum MapEvent {
    /// A pan, zoom or resize was committed
    ViewChanged { view: ViewState },
    /// A marker was picked; `anchor` is in the host element's frame
    MarkerSelected { marker_id: String, anchor: Point },
    /// The current selection was dropped
    SelectionCleared,
    /// A surface finished setting up and now shows the scene
    SurfaceReady,
}

impl MapEvent {
    /// Listener key for this event
    pub fn event_type(&self) -> &'static str {
        match self {
            MapEvent::ViewChanged { .. } => "viewchanged",
            MapEvent::MarkerSelected { .. } => "markerselected",
            MapEvent::SelectionCleared => "selectioncleared",
            MapEvent::SurfaceReady => "surfaceready",
        }
    }
}
