use crate::core::{
    bounds::MapBounds,
    config::MapConfig,
    geo::{round_to_precision, Point, RoomPos, ScreenPoint, Size, WorldPoint},
    layout::RoomLayout,
};
use serde::{Deserialize, Serialize};

/// What the operator currently sees: the room-grid position at the surface
/// center and the scale in percent (100 = one world pixel per screen pixel)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewState {
    pub position: RoomPos,
    pub scale: f64,
}

impl ViewState {
    pub fn new(position: RoomPos, scale: f64) -> Self {
        Self { position, scale }
    }

    /// Centered in the middle of a room
    pub fn centered_on_room(x: i32, y: i32, scale: f64) -> Self {
        Self::new(RoomPos::new(f64::from(x) + 0.5, f64::from(y) + 0.5), scale)
    }

    /// Scale as a container ratio (percent / 100)
    pub fn scale_ratio(&self) -> f64 {
        self.scale / 100.0
    }

    /// Position and scale rounded to `precision` decimals
    pub fn rounded(&self, precision: u32) -> ViewState {
        ViewState::new(
            self.position.rounded(precision),
            round_to_precision(self.scale, precision),
        )
    }

    /// Replaces non-finite position components with zero
    pub fn sanitized(&self) -> ViewState {
        let finite_or_zero = |v: f64| if v.is_finite() { v } else { 0.0 };
        ViewState::new(
            RoomPos::new(finite_or_zero(self.position.x), finite_or_zero(self.position.y)),
            self.scale,
        )
    }
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new(RoomPos::new(0.5, 0.5), 100.0)
    }
}

/// `min(max_scale, max(min_scale, scale))`; NaN resolves to `min_scale`
pub fn clamp_scale(scale: f64, min_scale: f64, max_scale: f64) -> f64 {
    scale.max(min_scale).min(max_scale)
}

/// Translation and uniform scale applied to the world-pixel container on
/// the drawing surface: `screen = world * scale + translate`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    /// Translation in screen pixels
    pub translate: Point,
    /// Scale ratio (1.0 = no scaling)
    pub scale: f64,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            translate: Point::new(0.0, 0.0),
            scale: 1.0,
        }
    }
}

impl Transform {
    pub fn new(translate: Point, scale: f64) -> Self {
        Self { translate, scale }
    }

    /// Create identity transform (no change)
    pub fn identity() -> Self {
        Self::default()
    }

    pub fn apply(&self, world: &WorldPoint) -> ScreenPoint {
        ScreenPoint::new(
            world.x * self.scale + self.translate.x,
            world.y * self.scale + self.translate.y,
        )
    }

    pub fn invert(&self, screen: &ScreenPoint) -> WorldPoint {
        WorldPoint::new(
            (screen.x - self.translate.x) / self.scale,
            (screen.y - self.translate.y) / self.scale,
        )
    }

    pub fn with_translate(&self, translate: Point) -> Transform {
        Transform::new(translate, self.scale)
    }

    pub fn with_scale(&self, scale: f64) -> Transform {
        Transform::new(self.translate, scale)
    }
}

/// Projection between room-grid, world-pixel and screen-pixel space.
///
/// Holds everything the mapping depends on besides the view itself: room
/// geometry, the bounds of the loaded rooms and the surface size. Whenever
/// any of those change the whole frame has to be reprojected, because a new
/// `min_x`/`min_y` moves every room's world-pixel origin.
#[derive(Debug, Clone, PartialEq)]
pub struct Viewport {
    layout: RoomLayout,
    bounds: MapBounds,
    size: Size,
    min_scale: f64,
    max_scale: f64,
    precision: u32,
}

impl Viewport {
    pub fn new(config: &MapConfig, bounds: MapBounds, size: Size) -> Self {
        Self {
            layout: RoomLayout::from_config(config),
            bounds,
            size,
            min_scale: config.min_scale,
            max_scale: config.max_scale,
            precision: config.view_precision,
        }
    }

    pub fn layout(&self) -> &RoomLayout {
        &self.layout
    }

    pub fn bounds(&self) -> &MapBounds {
        &self.bounds
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn set_bounds(&mut self, bounds: MapBounds) {
        self.bounds = bounds;
    }

    pub fn set_size(&mut self, size: Size) {
        self.size = size;
    }

    pub fn scale_limits(&self) -> (f64, f64) {
        (self.min_scale, self.max_scale)
    }

    pub fn clamp_scale(&self, scale: f64) -> f64 {
        clamp_scale(scale, self.min_scale, self.max_scale)
    }

    /// A host-supplied view made safe to store: non-finite position
    /// components become zero and the scale is clamped (NaN to `min_scale`)
    pub fn sanitize(&self, view: &ViewState) -> ViewState {
        let view = view.sanitized();
        ViewState::new(view.position, self.clamp_scale(view.scale))
    }

    /// Whether a scale ratio (not percent) lies inside the configured limits
    pub fn ratio_in_range(&self, ratio: f64) -> bool {
        let percent = ratio * 100.0;
        percent >= self.min_scale && percent <= self.max_scale
    }

    /// Room-grid position to world pixels; independent of the view
    pub fn world_of(&self, pos: &RoomPos) -> WorldPoint {
        self.layout.world_of(pos, &self.bounds)
    }

    /// Container transform that puts `view.position` at the surface center
    /// at `view.scale` (clamped)
    pub fn transform_for(&self, view: &ViewState) -> Transform {
        let ratio = self.clamp_scale(view.scale) / 100.0;
        let target = self.world_of(&view.position);
        let center = self.size.center();
        Transform::new(
            Point::new(center.x - target.x * ratio, center.y - target.y * ratio),
            ratio,
        )
    }

    /// Room-grid position to screen pixels under `view`
    pub fn project(&self, pos: &RoomPos, view: &ViewState) -> ScreenPoint {
        self.transform_for(view).apply(&self.world_of(pos))
    }

    /// Screen pixels to world pixels under a container transform
    pub fn screen_to_world(&self, screen: &ScreenPoint, transform: &Transform) -> WorldPoint {
        transform.invert(screen)
    }

    /// Screen pixels back to a room-grid position, rounded to the reporting precision
    pub fn unproject(&self, screen: &ScreenPoint, transform: &Transform) -> RoomPos {
        let world = transform.invert(screen);
        self.layout
            .room_pos_of(&world, &self.bounds)
            .rounded(self.precision)
    }

    /// The view a container transform currently shows: the room-grid
    /// position under the surface center and the scale in percent
    pub fn view_from_transform(&self, transform: &Transform) -> ViewState {
        let position = self.unproject(&self.size.center(), transform);
        let scale = round_to_precision(transform.scale * 100.0, self.precision);
        ViewState::new(position, scale)
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(
            MapConfig::shared_default(),
            MapBounds::default(),
            Size::default(),
        )
    }
}
