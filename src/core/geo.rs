//! Coordinate frames used by the engine.
//!
//! Three frames are kept apart, each with its own type:
//!
//! - [`RoomPos`]: fractional room-grid units (`20.5` is the middle of room column 20)
//! - [`WorldPoint`]: unscaled pixels laid out from the room grid, independent of the view
//! - [`ScreenPoint`]: pixels on the drawing surface after pan and scale
//!
//! [`Point`] is the plain pixel vector used for sizes, translations and offsets.

use serde::{Deserialize, Serialize};

/// A plain 2D pixel vector
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn subtract(&self, other: &Point) -> Point {
        Point::new(self.x - other.x, self.y - other.y)
    }
}

impl Default for Point {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

/// Width and height of a drawing surface in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// The surface's visual center
    pub fn center(&self) -> ScreenPoint {
        ScreenPoint::new(self.width / 2.0, self.height / 2.0)
    }

    /// True when either side is zero or negative (not yet laid out)
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

impl Default for Size {
    fn default() -> Self {
        Self::new(800.0, 600.0)
    }
}

/// Position in room-grid units; fractional parts address the inside of a room
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoomPos {
    pub x: f64,
    pub y: f64,
}

impl RoomPos {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Rounds both axes to `precision` decimal places
    pub fn rounded(&self, precision: u32) -> RoomPos {
        RoomPos::new(
            round_to_precision(self.x, precision),
            round_to_precision(self.y, precision),
        )
    }

    /// Largest per-axis difference to another position
    pub fn max_axis_distance(&self, other: &RoomPos) -> f64 {
        (self.x - other.x).abs().max((self.y - other.y).abs())
    }
}

impl Default for RoomPos {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

/// Unscaled pixel position in the laid-out map
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorldPoint {
    pub x: f64,
    pub y: f64,
}

impl WorldPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn offset(&self, dx: f64, dy: f64) -> WorldPoint {
        WorldPoint::new(self.x + dx, self.y + dy)
    }

    pub fn to_point(self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// Pixel position on the drawing surface
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

impl ScreenPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Vector from `origin` to this point
    pub fn minus(&self, origin: &Point) -> Point {
        Point::new(self.x - origin.x, self.y - origin.y)
    }

    pub fn to_point(self) -> Point {
        Point::new(self.x, self.y)
    }
}

impl From<Point> for ScreenPoint {
    fn from(point: Point) -> Self {
        Self::new(point.x, point.y)
    }
}

/// Round a value to a fixed number of decimal places (`1.2345`, 2 -> `1.23`).
///
/// Halves round toward positive infinity (`-1.125` -> `-1.12`).
pub fn round_to_precision(value: f64, precision: u32) -> f64 {
    let factor = 10_f64.powi(precision as i32);
    (value * factor + 0.5).floor() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_to_precision() {
        assert_eq!(round_to_precision(1.2345, 2), 1.23);
        assert_eq!(round_to_precision(-0.504, 2), -0.5);
        assert_eq!(round_to_precision(78.256, 2), 78.26);
        assert_eq!(round_to_precision(3.0, 0), 3.0);
    }

    #[test]
    fn test_round_half_toward_positive() {
        assert_eq!(round_to_precision(-1.125, 2), -1.12);
        assert_eq!(round_to_precision(1.125, 2), 1.13);
        assert_eq!(round_to_precision(-2.5, 0), -2.0);
        assert_eq!(
            RoomPos::new(-1.125, 0.125).rounded(2),
            RoomPos::new(-1.12, 0.13)
        );
    }

    #[test]
    fn test_point_subtract() {
        let a = Point::new(3.0, 4.0);
        let b = Point::new(1.0, 1.0);
        assert_eq!(a.subtract(&b), Point::new(2.0, 3.0));
    }

    #[test]
    fn test_size_center() {
        let size = Size::new(1024.0, 768.0);
        assert_eq!(size.center(), ScreenPoint::new(512.0, 384.0));
        assert!(!size.is_empty());
        assert!(Size::new(0.0, 600.0).is_empty());
    }

    #[test]
    fn test_room_pos_rounding() {
        let pos = RoomPos::new(20.924, 52.391);
        assert_eq!(pos.rounded(2), RoomPos::new(20.92, 52.39));
    }
}
