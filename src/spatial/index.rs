use crate::{
    core::{
        bounds::{Bounds, MapBounds},
        geo::{Point, ScreenPoint, WorldPoint},
        layout::RoomLayout,
        room::{self, RoomCoord},
        viewport::Transform,
    },
    layers::marker::Marker,
    prelude::HashMap,
    rendering::lod::RenderMode,
};

use rstar::{PointDistance, RTree, RTreeObject, AABB};

/// A spatial item that can be indexed via an R-tree
#[derive(Debug, Clone)]
pub struct SpatialItem<T> {
    pub id: String,
    pub bounds: Bounds,
    pub data: T,
}

impl<T> SpatialItem<T> {
    pub fn new(id: String, bounds: Bounds, data: T) -> Self {
        Self { id, bounds, data }
    }
}

impl<T> PartialEq for SpatialItem<T> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<T> Eq for SpatialItem<T> {}

// --- rstar integration -------------------------------------------------------------------------

impl<T> RTreeObject for SpatialItem<T> {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners(
            [self.bounds.min.x, self.bounds.min.y],
            [self.bounds.max.x, self.bounds.max.y],
        )
    }
}

impl<T> PointDistance for SpatialItem<T> {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let center = self.bounds.center();
        let dx = center.x - point[0];
        let dy = center.y - point[1];
        dx * dx + dy * dy
    }

    fn contains_point(&self, point: &[f64; 2]) -> bool {
        self.bounds.contains(&Point::new(point[0], point[1]))
    }
}

/// R-tree based spatial index over world-pixel boxes
#[derive(Debug)]
pub struct SpatialIndex<T> {
    rtree: RTree<SpatialItem<T>>,
}

impl<T> SpatialIndex<T> {
    pub fn new() -> Self {
        Self {
            rtree: RTree::new(),
        }
    }

    /// Bulk-loads an index; faster than repeated inserts for a full rebuild
    pub fn from_items(items: Vec<SpatialItem<T>>) -> Self {
        Self {
            rtree: RTree::bulk_load(items),
        }
    }

    /// Items whose box contains `point`
    pub fn locate_at(&self, point: &Point) -> Vec<&SpatialItem<T>> {
        self.rtree.locate_all_at_point(&[point.x, point.y]).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SpatialItem<T>> {
        self.rtree.iter()
    }

    pub fn get(&self, id: &str) -> Option<&SpatialItem<T>> {
        self.rtree.iter().find(|item| item.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.rtree.size() == 0
    }

    pub fn len(&self) -> usize {
        self.rtree.size()
    }
}

impl<T> Default for SpatialIndex<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// A marker resolved to its world-pixel position
#[derive(Debug, Clone)]
pub struct PlacedMarker {
    pub marker: Marker,
    pub center: WorldPoint,
    /// Draw order; later markers paint over earlier ones
    pub order: usize,
}

/// Markers of the current scene indexed for pointer hit-testing.
///
/// Built in world-pixel space so it survives pan and zoom unchanged; it only
/// has to be rebuilt when the markers or the loaded room set change.
#[derive(Debug, Default)]
pub struct MarkerIndex {
    index: SpatialIndex<PlacedMarker>,
    skipped: usize,
}

impl MarkerIndex {
    /// Places every marker whose room is loaded. Markers referencing rooms
    /// outside `rooms` are skipped without error.
    pub fn build(
        markers: &[Marker],
        rooms: &HashMap<String, RoomCoord>,
        layout: &RoomLayout,
        bounds: &MapBounds,
    ) -> Self {
        let mut items = Vec::with_capacity(markers.len());
        let mut skipped = 0;
        for (order, marker) in markers.iter().enumerate() {
            let coord = rooms.get(&marker.room_name).or_else(|| {
                room::normalize(&marker.room_name).and_then(|name| rooms.get(&name))
            });
            let Some(coord) = coord else {
                skipped += 1;
                continue;
            };
            let center = layout.tile_center(*coord, bounds, marker.x, marker.y);
            let extent = marker.kind.shape().half_extent() * 2.0;
            let bounds = Bounds::from_center_and_size(center.to_point(), extent, extent);
            items.push(SpatialItem::new(
                marker.id.clone(),
                bounds,
                PlacedMarker {
                    marker: marker.clone(),
                    center,
                    order,
                },
            ));
        }
        if skipped > 0 {
            log::debug!("{skipped} marker(s) reference rooms that are not loaded; not drawn");
        }
        Self {
            index: SpatialIndex::from_items(items),
            skipped,
        }
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Markers left out because their room is not loaded
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    pub fn get(&self, id: &str) -> Option<&PlacedMarker> {
        self.index.get(id).map(|item| &item.data)
    }

    /// Placed markers in draw order
    pub fn placed(&self) -> Vec<&PlacedMarker> {
        let mut placed: Vec<&PlacedMarker> = self.index.iter().map(|item| &item.data).collect();
        placed.sort_by_key(|p| p.order);
        placed
    }

    /// The topmost marker under a screen point, in detail mode only
    pub fn resolve_hit(
        &self,
        screen: &ScreenPoint,
        transform: &Transform,
        mode: RenderMode,
    ) -> Option<&Marker> {
        if !mode.allows_hit_testing() {
            return None;
        }
        let world = transform.invert(screen).to_point();
        self.index
            .locate_at(&world)
            .into_iter()
            .filter(|item| {
                let offset = world.subtract(&item.data.center.to_point());
                item.data.marker.kind.shape().contains(&offset)
            })
            .max_by_key(|item| item.data.order)
            .map(|item| &item.data.marker)
    }
}

/// Translates a pointer position on the drawing surface into the local frame
/// of the element hosting the surface (where the tooltip is positioned).
///
/// `surface_origin` and `host_origin` are the top-left corners of the surface
/// and the host in the same global (page) frame.
pub fn tooltip_anchor(pointer: &ScreenPoint, surface_origin: &Point, host_origin: &Point) -> Point {
    Point::new(
        pointer.x + surface_origin.x - host_origin.x,
        pointer.y + surface_origin.y - host_origin.y,
    )
}
