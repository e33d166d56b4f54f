use crate::{
    core::{
        bounds::MapBounds,
        config::MapConfig,
        geo::{Point, ScreenPoint, Size},
        room::RoomCoord,
        viewport::{Transform, ViewState, Viewport},
    },
    input::{EventManager, InputEvent, MapEvent, Response, ViewportController},
    layers::marker::{Marker, MarkerDraft},
    prelude::HashMap,
    rendering::{
        lod::{LevelOfDetail, RenderMode},
        pipeline::{Scene, ScenePipeline},
        surface::{
            initialize_surface, CancellationToken, Deferred, RenderSurface, SurfaceFactory,
            SurfaceSlot,
        },
    },
    spatial::index::{tooltip_anchor, MarkerIndex},
    terrain::parse::RoomTerrain,
    MapError, Result,
};

/// Handle for one asynchronous surface setup
#[derive(Debug, Clone)]
pub struct SurfaceRequest {
    pub token: CancellationToken,
    pub size: Size,
}

/// The marker currently picked by the operator
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub marker: Marker,
    /// Tooltip position in the host element's frame
    pub anchor: Point,
}

/// A terrain map bound to one drawing surface.
///
/// Hosts hand it rooms, markers and a view, forward pointer events to it and
/// listen for the views it reports back. All state changes happen inside the
/// calls below; the only suspension point is the surface setup.
pub struct TerrainMap {
    config: MapConfig,
    lod: LevelOfDetail,
    pipeline: ScenePipeline,
    controller: ViewportController,
    rooms: Vec<RoomTerrain>,
    room_lookup: HashMap<String, RoomCoord>,
    markers: Vec<Marker>,
    marker_index: MarkerIndex,
    view: ViewState,
    mode: RenderMode,
    slot: SurfaceSlot,
    events: EventManager,
    selection: Option<Selection>,
    host_origin: Point,
    marker_sequence: u64,
}

impl TerrainMap {
    /// Validates `config` and builds an empty map
    pub fn new(config: MapConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::with_valid_config(config))
    }

    fn with_valid_config(config: MapConfig) -> Self {
        let viewport = Viewport::new(&config, MapBounds::default(), Size::default());
        let view = ViewState::default();
        let lod = LevelOfDetail::from_config(&config);
        Self {
            lod,
            pipeline: ScenePipeline::new(&config),
            controller: ViewportController::new(&config, viewport),
            rooms: Vec::new(),
            room_lookup: HashMap::default(),
            markers: Vec::new(),
            marker_index: MarkerIndex::default(),
            mode: lod.mode(view.scale),
            view,
            slot: SurfaceSlot::Empty,
            events: EventManager::new(),
            selection: None,
            host_origin: Point::new(0.0, 0.0),
            marker_sequence: 0,
            config,
        }
    }

    pub fn config(&self) -> &MapConfig {
        &self.config
    }

    /// The last view set by the host or reported back to it
    pub fn view(&self) -> ViewState {
        self.view
    }

    pub fn mode(&self) -> RenderMode {
        self.mode
    }

    pub fn bounds(&self) -> &MapBounds {
        self.controller.viewport().bounds()
    }

    pub fn viewport(&self) -> &Viewport {
        self.controller.viewport()
    }

    pub fn transform(&self) -> Transform {
        self.controller.transform()
    }

    pub fn is_dragging(&self) -> bool {
        self.controller.is_dragging()
    }

    pub fn is_ready(&self) -> bool {
        self.slot.is_ready()
    }

    pub fn rooms(&self) -> &[RoomTerrain] {
        &self.rooms
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    pub fn marker_index(&self) -> &MarkerIndex {
        &self.marker_index
    }

    /// Top-left of the element hosting the surface, in page coordinates
    pub fn set_host_origin(&mut self, origin: Point) {
        self.host_origin = origin;
    }

    /// Register an event listener
    pub fn on<F>(&mut self, event_type: &str, callback: F)
    where
        F: Fn(&MapEvent) + Send + Sync + 'static,
    {
        self.events.on(event_type, callback);
    }

    /// Called with every committed pan, zoom and resize
    pub fn on_view_changed<F>(&mut self, callback: F)
    where
        F: Fn(&ViewState) + Send + Sync + 'static,
    {
        self.events.on("viewchanged", move |event| {
            if let MapEvent::ViewChanged { view } = event {
                callback(view);
            }
        });
    }

    /// The picked marker, if any. Markers cannot be picked when zoomed out,
    /// so this is `None` in overview mode even if one was picked before.
    pub fn selection(&self) -> Option<&Selection> {
        if !self.mode.allows_hit_testing() {
            return None;
        }
        self.selection.as_ref()
    }

    /// Turns an operator's placement request into a marker with a fresh id.
    /// The map does not keep it; the host adds it to its marker list.
    pub fn place_marker(&mut self, draft: &MarkerDraft) -> Option<Marker> {
        let marker = draft.place(self.marker_sequence + 1, self.config.max_local())?;
        self.marker_sequence += 1;
        Some(marker)
    }

    /// Replaces the scene and starts a surface rebuild for it.
    ///
    /// The previous surface is released (or its pending setup cancelled)
    /// first. Without rooms nothing is drawn and no request is returned.
    pub fn prepare_scene(
        &mut self,
        rooms: Vec<RoomTerrain>,
        markers: Vec<Marker>,
        view: ViewState,
        size: Size,
    ) -> Option<SurfaceRequest> {
        let bounds = MapBounds::of_rooms(rooms.iter().map(|room| room.name()));
        self.room_lookup = rooms
            .iter()
            .map(|room| (room.name().to_string(), room.coord()))
            .collect();
        self.marker_index = MarkerIndex::build(
            &markers,
            &self.room_lookup,
            self.controller.viewport().layout(),
            &bounds,
        );
        self.rooms = rooms;
        self.markers = markers;

        let viewport = self.controller.viewport_mut();
        viewport.set_bounds(bounds);
        viewport.set_size(size);
        self.view = self.controller.viewport().sanitize(&view);
        self.mode = self.mode_for(&self.view);
        self.controller.apply_view(&self.view);

        let stale = self
            .selection
            .as_ref()
            .is_some_and(|selection| self.marker_index.get(&selection.marker.id).is_none());
        if stale {
            self.selection = None;
        }

        if self.rooms.is_empty() {
            log::debug!("no rooms loaded; scene not drawn");
            self.teardown();
            return None;
        }
        Some(self.begin_rebuild())
    }

    /// Releases the current surface (or cancels its setup) and opens a new
    /// setup window. Interaction is ignored until the surface is installed.
    pub fn begin_rebuild(&mut self) -> SurfaceRequest {
        self.slot.teardown();
        self.controller.pointer_up();
        let token = CancellationToken::new();
        self.slot = SurfaceSlot::Initializing {
            token: token.clone(),
            deferred: Deferred::default(),
        };
        let size = self.controller.viewport().size();
        log::debug!(
            "rebuilding {} scene: {} rooms, {} markers",
            self.mode,
            self.rooms.len(),
            self.marker_index.len()
        );
        SurfaceRequest { token, size }
    }

    /// Finishes a setup started by [`begin_rebuild`](Self::begin_rebuild).
    ///
    /// A surface from a stale setup is released instead of installed. A
    /// failed setup leaves the scene undrawn. Requests parked during setup
    /// are replayed once. Returns whether the surface was installed.
    pub fn install_surface(
        &mut self,
        token: &CancellationToken,
        result: Result<Box<dyn RenderSurface>>,
    ) -> bool {
        let current = matches!(
            &self.slot,
            SurfaceSlot::Initializing { token: pending, .. } if pending.same_as(token)
        );

        let mut surface = match result {
            Ok(surface) => surface,
            Err(MapError::Cancelled) => {
                log::debug!("surface setup cancelled");
                return false;
            }
            Err(err) => {
                log::warn!("surface unavailable, scene not drawn: {err}");
                if current {
                    self.slot = SurfaceSlot::Empty;
                }
                return false;
            }
        };

        if !current || token.is_cancelled() {
            log::debug!("discarding surface from a stale setup");
            surface.release();
            return false;
        }

        let deferred = match std::mem::take(&mut self.slot) {
            SurfaceSlot::Initializing { deferred, .. } => deferred,
            _ => Deferred::default(),
        };

        if deferred.apply_view {
            log::debug!("replaying view set during setup: {:?}", self.view);
        }
        let mut response = Response::default();
        if let Some(size) = deferred.resize {
            surface.resize(size);
            response = self.controller.resize(size, &self.view);
        } else {
            let size = surface.size();
            if size != self.controller.viewport().size() && !size.is_empty() {
                self.controller.viewport_mut().set_size(size);
            }
            self.controller.apply_view(&self.view);
        }
        self.mode = self.mode_for(&self.view);
        self.slot = SurfaceSlot::Ready(surface);
        self.redraw();
        self.events.emit(MapEvent::SurfaceReady);
        self.commit(response);
        true
    }

    /// Prepares the scene, sets up a surface through `factory` and installs
    /// it. Returns whether the scene is now drawn.
    pub async fn render_scene(
        &mut self,
        factory: &dyn SurfaceFactory,
        rooms: Vec<RoomTerrain>,
        markers: Vec<Marker>,
        view: ViewState,
        size: Size,
    ) -> bool {
        let Some(request) = self.prepare_scene(rooms, markers, view, size) else {
            return false;
        };
        let result = initialize_surface(factory, request.size, &request.token).await;
        self.install_surface(&request.token, result)
    }

    /// Releases the surface and all drawing resources
    pub fn teardown(&mut self) {
        self.slot.teardown();
        self.controller.pointer_up();
    }

    /// Applies a view chosen by the host. Not reported back, does not touch
    /// the selection or an ongoing drag.
    pub fn set_view(&mut self, view: ViewState) {
        self.view = self.controller.viewport().sanitize(&view);
        if self.slot.defer(None, true) {
            return;
        }
        self.controller.apply_view(&self.view);
        self.sync_surface();
    }

    /// Re-applies the current view against a new surface size
    pub fn resize(&mut self, size: Size) {
        if self.slot.defer(Some(size), false) {
            return;
        }
        let Some(surface) = self.slot.surface_mut() else {
            self.controller.viewport_mut().set_size(size);
            self.controller.apply_view(&self.view);
            return;
        };
        surface.resize(size);
        let response = self.controller.resize(size, &self.view);
        // The legend hangs off the bottom edge
        self.redraw();
        self.commit(response);
    }

    pub fn on_pointer_down(&mut self, position: ScreenPoint) {
        if self.is_ready() {
            let response = self.controller.pointer_down(position);
            self.commit(response);
        }
    }

    pub fn on_pointer_move(&mut self, position: ScreenPoint) {
        if self.is_ready() {
            let response = self.controller.pointer_move(position);
            self.commit(response);
        }
    }

    pub fn on_pointer_up(&mut self) {
        if self.is_ready() {
            self.controller.pointer_up();
        }
    }

    pub fn on_pointer_leave(&mut self) {
        if self.is_ready() {
            self.controller.pointer_leave();
        }
    }

    pub fn on_wheel(&mut self, delta: f64) {
        if self.is_ready() {
            let response = self.controller.wheel(delta);
            self.commit(response);
        }
    }

    /// Picks the marker under `position`, or clears the selection when the
    /// tap lands on empty space
    pub fn on_tap(&mut self, position: ScreenPoint) {
        let Some(surface) = self.slot.surface() else {
            return;
        };
        let transform = self.controller.transform();
        let hit = self
            .marker_index
            .resolve_hit(&position, &transform, self.mode)
            .cloned();
        match hit {
            Some(marker) => {
                let surface_origin = surface.bounding_rect().min;
                let anchor = tooltip_anchor(&position, &surface_origin, &self.host_origin);
                log::debug!("selected marker {}", marker.id);
                self.events.emit(MapEvent::MarkerSelected {
                    marker_id: marker.id.clone(),
                    anchor,
                });
                self.selection = Some(Selection { marker, anchor });
            }
            None => self.clear_selection(),
        }
        self.events.process_events();
    }

    /// Dispatches a host event to the matching handler
    pub fn handle_input(&mut self, event: InputEvent) {
        match event {
            InputEvent::PointerDown { position } => self.on_pointer_down(position),
            InputEvent::PointerMove { position } => self.on_pointer_move(position),
            InputEvent::PointerUp => self.on_pointer_up(),
            InputEvent::PointerLeave => self.on_pointer_leave(),
            InputEvent::Wheel { delta } => self.on_wheel(delta),
            InputEvent::Tap { position } => self.on_tap(position),
            InputEvent::Resize { size } => self.resize(size),
        }
    }

    /// Drops the selection, telling listeners if there was one
    pub fn clear_selection(&mut self) {
        if self.selection.take().is_some() {
            self.events.emit(MapEvent::SelectionCleared);
        }
    }

    fn mode_for(&self, view: &ViewState) -> RenderMode {
        self.lod
            .mode(self.controller.viewport().clamp_scale(view.scale))
    }

    /// Applies a controller response: selection, surface transform, redraw
    /// on a mode switch, then one report to the host
    fn commit(&mut self, response: Response) {
        if response.clear_selection {
            self.clear_selection();
        }
        if let Some(view) = response.view {
            self.view = view;
            log::debug!("view committed: {view:?}");
            self.events.emit(MapEvent::ViewChanged { view });
            self.sync_surface();
        }
        self.events.process_events();
    }

    /// Pushes the controller transform to the surface, redrawing when the
    /// render mode flips
    fn sync_surface(&mut self) {
        let mode = self.mode_for(&self.view);
        let transform = self.controller.transform();
        if let Some(surface) = self.slot.surface_mut() {
            surface.set_transform(transform);
        }
        if mode != self.mode {
            log::debug!("render mode {} -> {mode}", self.mode);
            self.mode = mode;
            self.redraw();
        }
    }

    fn redraw(&mut self) {
        let transform = self.controller.transform();
        let size = self.controller.viewport().size();
        let Some(surface) = self.slot.surface_mut() else {
            return;
        };
        let scene = Scene {
            rooms: &self.rooms,
            markers: &self.marker_index,
            bounds: self.controller.viewport().bounds(),
        };
        let frame = self.pipeline.build(&scene, self.mode, transform, size);
        surface.set_transform(transform);
        surface.present(frame);
    }
}

impl Default for TerrainMap {
    fn default() -> Self {
        Self::with_valid_config(MapConfig::default())
    }
}

impl Drop for TerrainMap {
    fn drop(&mut self) {
        self.slot.teardown();
    }
}

impl std::fmt::Debug for TerrainMap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TerrainMap")
            .field("view", &self.view)
            .field("mode", &self.mode)
            .field("rooms", &self.rooms.len())
            .field("markers", &self.markers.len())
            .field("slot", &self.slot)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        core::{geo::RoomPos, room::RoomName},
        layers::marker::MarkerKind,
        rendering::surface::RecordingSurfaceFactory,
    };
    use std::sync::{Arc, Mutex};

    fn rooms() -> Vec<RoomTerrain> {
        ["W0N0", "W1N0", "E0N0"]
            .iter()
            .map(|name| RoomTerrain::plain(RoomName::parse(name).unwrap(), 50))
            .collect()
    }

    fn detail_view() -> ViewState {
        ViewState::new(RoomPos::new(-1.5, -0.5), 150.0)
    }

    async fn ready_map(factory: &RecordingSurfaceFactory) -> TerrainMap {
        let mut map = TerrainMap::default();
        let markers = vec![Marker::new("spawn-1", MarkerKind::Spawn, "W0N0", 24, 24)];
        assert!(
            map.render_scene(factory, rooms(), markers, detail_view(), Size::new(800.0, 600.0))
                .await
        );
        map
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let config = MapConfig::default().with_scale_limits(300.0, 30.0);
        assert!(TerrainMap::new(config).is_err());
    }

    #[tokio::test]
    async fn test_render_scene_draws_detail_frame() {
        let factory = RecordingSurfaceFactory::default();
        let map = ready_map(&factory).await;

        assert!(map.is_ready());
        assert_eq!(map.mode(), RenderMode::Detail);
        assert_eq!(*map.bounds(), MapBounds::new(-2, -1, 0, -1));

        let record = factory.last().unwrap().record();
        assert_eq!(record.frames_presented, 1);
        assert_eq!(record.transform, map.transform());
        assert!((record.transform.scale - 1.5).abs() < 1e-12);
    }

    #[tokio::test]
    async fn test_handlers_ignored_without_surface() {
        let mut map = TerrainMap::default();
        let reports = Arc::new(Mutex::new(0));
        let sink = reports.clone();
        map.on_view_changed(move |_| *sink.lock().unwrap() += 1);

        map.on_pointer_down(ScreenPoint::new(10.0, 10.0));
        map.on_pointer_move(ScreenPoint::new(50.0, 10.0));
        map.on_wheel(-1.0);
        assert!(!map.is_dragging());
        assert_eq!(*reports.lock().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_wheel_crossing_threshold_switches_mode() {
        let factory = RecordingSurfaceFactory::default();
        let mut map = TerrainMap::default();
        let view = ViewState::new(RoomPos::new(-1.5, -0.5), 105.0);
        assert!(map.render_scene(&factory, rooms(), Vec::new(), view, Size::default()).await);
        assert_eq!(map.mode(), RenderMode::Detail);

        map.on_wheel(1.0);
        assert_eq!(map.view().scale, 94.5);
        assert_eq!(map.mode(), RenderMode::Overview);

        let record = factory.last().unwrap().record();
        assert_eq!(record.frames_presented, 2);
        assert_eq!(record.last_frame.unwrap().world.len(), 3);
    }

    #[tokio::test]
    async fn test_tap_selects_and_clears() {
        let factory = RecordingSurfaceFactory::new(Point::new(100.0, 50.0));
        let mut map = ready_map(&factory).await;
        map.set_host_origin(Point::new(90.0, 20.0));

        let center = map.marker_index().get("spawn-1").unwrap().center;
        let screen = map.transform().apply(&center);
        map.on_tap(screen);

        let selection = map.selection().unwrap();
        assert_eq!(selection.marker.id, "spawn-1");
        assert!((selection.anchor.x - (screen.x + 10.0)).abs() < 1e-9);
        assert!((selection.anchor.y - (screen.y + 30.0)).abs() < 1e-9);

        map.on_tap(ScreenPoint::new(1.0, 1.0));
        assert!(map.selection().is_none());
    }

    #[tokio::test]
    async fn test_selection_hidden_in_overview() {
        let factory = RecordingSurfaceFactory::default();
        let mut map = ready_map(&factory).await;
        let center = map.marker_index().get("spawn-1").unwrap().center;
        map.on_tap(map.transform().apply(&center));
        assert!(map.selection().is_some());

        map.set_view(ViewState::new(RoomPos::new(-1.5, -0.5), 80.0));
        assert_eq!(map.mode(), RenderMode::Overview);
        assert!(map.selection().is_none());

        map.set_view(detail_view());
        assert!(map.selection().is_some());
    }

    #[tokio::test]
    async fn test_empty_scene_is_not_drawn() {
        let factory = RecordingSurfaceFactory::default();
        let mut map = ready_map(&factory).await;
        let drawn = map
            .render_scene(&factory, Vec::new(), Vec::new(), detail_view(), Size::default())
            .await;
        assert!(!drawn);
        assert!(!map.is_ready());
        assert_eq!(factory.releases(), 1);
        assert_eq!(*map.bounds(), MapBounds::default());
    }

    #[tokio::test]
    async fn test_stored_view_scale_stays_in_limits() {
        let factory = RecordingSurfaceFactory::default();
        let mut map = TerrainMap::default();
        let view = ViewState::new(RoomPos::new(-1.5, -0.5), 500.0);
        assert!(map.render_scene(&factory, rooms(), Vec::new(), view, Size::default()).await);
        assert_eq!(map.view().scale, 300.0);
        assert_eq!(map.view().position, RoomPos::new(-1.5, -0.5));

        map.set_view(ViewState::new(RoomPos::new(-1.5, -0.5), f64::NAN));
        assert_eq!(map.view().scale, 30.0);
        assert_eq!(map.mode(), RenderMode::Overview);

        map.set_view(ViewState::new(RoomPos::new(-1.5, -0.5), 5.0));
        assert_eq!(map.view().scale, 30.0);

        // Clamped while a setup is pending too
        map.begin_rebuild();
        map.set_view(ViewState::new(RoomPos::new(-1.5, -0.5), 1000.0));
        assert_eq!(map.view().scale, 300.0);
    }

    #[test]
    fn test_place_marker_sequence() {
        let mut map = TerrainMap::default();
        let first = map
            .place_marker(&MarkerDraft::new(MarkerKind::Tower, "W0N0", 3.0, 70.0))
            .unwrap();
        assert_eq!(first.id, "tower-1");
        assert_eq!((first.x, first.y), (3, 49));

        assert!(map
            .place_marker(&MarkerDraft::new(MarkerKind::Spawn, "", 1.0, 1.0))
            .is_none());
        let second = map
            .place_marker(&MarkerDraft::new(MarkerKind::Spawn, "W0N0", 1.0, 1.0))
            .unwrap();
        assert_eq!(second.id, "spawn-2");
    }
}
