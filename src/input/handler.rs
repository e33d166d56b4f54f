use crate::{
    core::{
        config::MapConfig,
        geo::{Point, ScreenPoint, Size},
        viewport::{Transform, ViewState, Viewport},
    },
    input::events::{InputEvent, MapEvent},
    prelude::HashMap,
};
use std::collections::VecDeque;

/// Pointer interaction mode
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DragState {
    #[default]
    Idle,
    /// `anchor` is the pointer position minus the container translation at
    /// the moment the button went down
    Dragging { anchor: Point },
}

/// What handling one gesture means for the owner of the controller
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Response {
    /// View to report to the host, if the gesture committed one
    pub view: Option<ViewState>,
    /// Whether the current marker selection must be dropped
    pub clear_selection: bool,
}

impl Response {
    fn reported(view: ViewState, clear_selection: bool) -> Self {
        Self {
            view: Some(view),
            clear_selection,
        }
    }

    fn clearing() -> Self {
        Self {
            view: None,
            clear_selection: true,
        }
    }
}

/// Turns drag and wheel gestures into container transforms and reports the
/// resulting view.
///
/// The controller owns the container transform; the view reported to the
/// host is always derived back from it through the projection, so what the
/// host sees is exactly what is on screen (rounded).
#[derive(Debug, Clone)]
pub struct ViewportController {
    viewport: Viewport,
    transform: Transform,
    drag: DragState,
    zoom_in_factor: f64,
    zoom_out_factor: f64,
}

impl ViewportController {
    pub fn new(config: &MapConfig, viewport: Viewport) -> Self {
        Self {
            viewport,
            transform: Transform::identity(),
            drag: DragState::Idle,
            zoom_in_factor: config.zoom_in_factor,
            zoom_out_factor: config.zoom_out_factor,
        }
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.viewport
    }

    pub fn transform(&self) -> Transform {
        self.transform
    }

    pub fn drag_state(&self) -> DragState {
        self.drag
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.drag, DragState::Dragging { .. })
    }

    /// The view currently on screen, rounded for reporting
    pub fn current_view(&self) -> ViewState {
        self.viewport.view_from_transform(&self.transform)
    }

    /// Re-projects an externally supplied view; leaves the drag state alone
    pub fn apply_view(&mut self, view: &ViewState) -> Transform {
        self.transform = self.viewport.transform_for(view);
        self.transform
    }

    /// Re-applies `view` against a new surface size
    pub fn resize(&mut self, size: Size, view: &ViewState) -> Response {
        self.viewport.set_size(size);
        self.apply_view(view);
        Response::reported(self.current_view(), false)
    }

    pub fn pointer_down(&mut self, position: ScreenPoint) -> Response {
        self.drag = DragState::Dragging {
            anchor: position.minus(&self.transform.translate),
        };
        Response::clearing()
    }

    /// Pans while dragging; every move reports once
    pub fn pointer_move(&mut self, position: ScreenPoint) -> Response {
        let DragState::Dragging { anchor } = self.drag else {
            return Response::default();
        };
        self.transform = self.transform.with_translate(position.minus(&anchor));
        let view = self.current_view();
        #[cfg(feature = "debug")]
        log::trace!("drag moved view to {view:?}");
        Response::reported(view, false)
    }

    pub fn pointer_up(&mut self) -> Response {
        self.drag = DragState::Idle;
        Response::default()
    }

    /// Same as releasing the button; the controller never stays stuck dragging
    pub fn pointer_leave(&mut self) -> Response {
        self.pointer_up()
    }

    /// One wheel step. The step is applied whole or not at all: a step that
    /// would leave the scale limits is dropped without clamping.
    pub fn wheel(&mut self, delta: f64) -> Response {
        let factor = if delta > 0.0 {
            self.zoom_out_factor
        } else {
            self.zoom_in_factor
        };
        let ratio = self.transform.scale * factor;
        if !self.viewport.ratio_in_range(ratio) {
            log::trace!("wheel step to ratio {ratio} outside scale limits; ignored");
            return Response::default();
        }
        self.transform = self.transform.with_scale(ratio);
        Response::reported(self.current_view(), true)
    }

    /// Dispatches a gesture. Taps and resizes need the owning component
    /// (hit-testing, the last reported view) and are not handled here.
    pub fn handle_event(&mut self, event: &InputEvent) -> Response {
        match *event {
            InputEvent::PointerDown { position } => self.pointer_down(position),
            InputEvent::PointerMove { position } => self.pointer_move(position),
            InputEvent::PointerUp => self.pointer_up(),
            InputEvent::PointerLeave => self.pointer_leave(),
            InputEvent::Wheel { delta } => self.wheel(delta),
            InputEvent::Tap { .. } | InputEvent::Resize { .. } => Response::default(),
        }
    }
}

/// Event listener callback type
pub type EventCallback = Box<dyn Fn(&MapEvent) + Send + Sync>;

/// Event management system for the map
#[derive(Default)]
pub struct EventManager {
    /// Event listeners by event type
    listeners: HashMap<String, Vec<EventCallback>>,
    /// Event queue for processing
    event_queue: VecDeque<MapEvent>,
}

impl EventManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an event listener
    pub fn on<F>(&mut self, event_type: &str, callback: F)
    where
        F: Fn(&MapEvent) + Send + Sync + 'static,
    {
        self.listeners
            .entry(event_type.to_string())
            .or_default()
            .push(Box::new(callback));
    }

    /// Emit an event to the queue
    pub fn emit(&mut self, event: MapEvent) {
        self.event_queue.push_back(event);
    }

    /// Delivers all queued events to their listeners, in emission order
    pub fn process_events(&mut self) -> Vec<MapEvent> {
        let events: Vec<_> = self.event_queue.drain(..).collect();

        for event in &events {
            if let Some(callbacks) = self.listeners.get(event.event_type()) {
                for callback in callbacks {
                    callback(event);
                }
            }
        }

        events
    }

    pub fn clear_events(&mut self) {
        self.event_queue.clear();
    }

    /// Get number of pending events
    pub fn pending_events(&self) -> usize {
        self.event_queue.len()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.values().map(Vec::len).sum()
    }
}

impl std::fmt::Debug for EventManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventManager")
            .field("listeners", &self.listener_count())
            .field("pending", &self.event_queue.len())
            .finish()
    }
}
