use crate::core::{
    geo::Point,
    room::{RoomCoord, RoomName},
};
use serde::{Deserialize, Serialize};

/// Axis-aligned box in pixel coordinates (world or screen)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: Point,
    pub max: Point,
}

impl Bounds {
    pub fn new(min: Point, max: Point) -> Self {
        Self { min, max }
    }

    /// Box of `width` x `height` centered on `center`; marker glyph extents
    pub fn from_center_and_size(center: Point, width: f64, height: f64) -> Self {
        let half_width = width / 2.0;
        let half_height = height / 2.0;
        Self::new(
            Point::new(center.x - half_width, center.y - half_height),
            Point::new(center.x + half_width, center.y + half_height),
        )
    }

    /// Box hanging off a top-left corner, as a surface occupies its host page
    pub fn from_origin_and_size(origin: Point, width: f64, height: f64) -> Self {
        Self::new(origin, Point::new(origin.x + width, origin.y + height))
    }

    pub fn center(&self) -> Point {
        Point::new(
            (self.min.x + self.max.x) / 2.0,
            (self.min.y + self.max.y) / 2.0,
        )
    }

    /// Edges inclusive
    pub fn contains(&self, point: &Point) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self::new(Point::new(0.0, 0.0), Point::new(0.0, 0.0))
    }
}

/// Bounding box of the loaded rooms, in room-grid units (inclusive on both ends)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MapBounds {
    pub min_x: i32,
    pub min_y: i32,
    pub max_x: i32,
    pub max_y: i32,
}

impl MapBounds {
    pub fn new(min_x: i32, min_y: i32, max_x: i32, max_y: i32) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Min/max over the given coordinates; no coordinates gives the zero bounds
    pub fn from_coords<I>(coords: I) -> Self
    where
        I: IntoIterator<Item = RoomCoord>,
    {
        let mut iter = coords.into_iter();
        let Some(first) = iter.next() else {
            return Self::default();
        };
        iter.fold(
            Self::new(first.x, first.y, first.x, first.y),
            |acc, coord| {
                Self::new(
                    acc.min_x.min(coord.x),
                    acc.min_y.min(coord.y),
                    acc.max_x.max(coord.x),
                    acc.max_y.max(coord.y),
                )
            },
        )
    }

    /// Bounds of a set of room names
    pub fn of_rooms<'a, I>(rooms: I) -> Self
    where
        I: IntoIterator<Item = &'a RoomName>,
    {
        Self::from_coords(rooms.into_iter().map(RoomName::coord))
    }

    /// The top-left room; every room origin is measured from here
    pub fn min_corner(&self) -> RoomCoord {
        RoomCoord::new(self.min_x, self.min_y)
    }

    /// Rooms across (inclusive)
    pub fn columns(&self) -> u32 {
        self.max_x.abs_diff(self.min_x).saturating_add(1)
    }

    /// Rooms down (inclusive)
    pub fn rows(&self) -> u32 {
        self.max_y.abs_diff(self.min_y).saturating_add(1)
    }

    pub fn contains(&self, coord: RoomCoord) -> bool {
        coord.x >= self.min_x && coord.x <= self.max_x && coord.y >= self.min_y && coord.y <= self.max_y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_glyph_box_contains_edges() {
        let bounds = Bounds::from_center_and_size(Point::new(545.0, 45.0), 10.0, 10.0);
        assert_eq!(bounds.center(), Point::new(545.0, 45.0));
        assert!(bounds.contains(&Point::new(550.0, 40.0)));
        assert!(!bounds.contains(&Point::new(550.1, 45.0)));
    }

    #[test]
    fn test_surface_rect_from_origin() {
        let rect = Bounds::from_origin_and_size(Point::new(100.0, 50.0), 800.0, 600.0);
        assert_eq!(rect.max, Point::new(900.0, 650.0));
        assert_eq!(rect.center(), Point::new(500.0, 350.0));
    }

    #[test]
    fn test_map_bounds_of_rooms() {
        let rooms: Vec<RoomName> = ["W0N0", "W1N0", "E0N0"]
            .iter()
            .filter_map(|name| RoomName::parse(name))
            .collect();
        let bounds = MapBounds::of_rooms(&rooms);
        assert_eq!(bounds, MapBounds::new(-2, -1, 0, -1));
        assert_eq!(bounds.columns(), 3);
        assert_eq!(bounds.rows(), 1);
    }

    #[test]
    fn test_full_span_counts_saturate() {
        let bounds = MapBounds::new(i32::MIN, i32::MIN, i32::MAX, i32::MAX);
        assert_eq!(bounds.columns(), u32::MAX);
        assert_eq!(bounds.rows(), u32::MAX);
    }

    #[test]
    fn test_empty_map_bounds_are_zero() {
        let rooms: Vec<RoomName> = Vec::new();
        assert_eq!(MapBounds::of_rooms(&rooms), MapBounds::new(0, 0, 0, 0));
    }
}
