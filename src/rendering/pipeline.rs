use crate::{
    core::{
        bounds::MapBounds,
        config::{Color, MapConfig, Palette},
        geo::{Point, Size},
        layout::RoomLayout,
        viewport::Transform,
    },
    layers::marker::MarkerShape,
    rendering::{
        context::{DrawLayer, Frame, RenderContext, Stroke},
        lod::RenderMode,
    },
    spatial::index::MarkerIndex,
    terrain::parse::{RoomTerrain, TerrainKind},
};

const GRID_STROKE_WIDTH: f64 = 0.5;
const GRID_ALPHA: f64 = 0.3;
const BORDER_STROKE_WIDTH: f64 = 2.0;
const BORDER_ALPHA: f64 = 0.9;
const LABEL_INSET: f64 = 6.0;
const LABEL_FONT_SIZE: f64 = 14.0;
const LEGEND_LEFT: f64 = 10.0;
const LEGEND_MIN_TOP: f64 = 10.0;
const LEGEND_SWATCH: f64 = 15.0;
const LEGEND_SPACING: f64 = 80.0;
const LEGEND_TEXT_OFFSET: f64 = 20.0;
const LEGEND_FONT_SIZE: f64 = 12.0;

/// Everything one frame draws, borrowed from the owning component
#[derive(Debug, Clone, Copy)]
pub struct Scene<'a> {
    pub rooms: &'a [RoomTerrain],
    pub markers: &'a MarkerIndex,
    pub bounds: &'a MapBounds,
}

/// Builds frames for the two render modes.
///
/// Detail frames carry per-tile terrain, grid lines, room borders and labels,
/// then markers in the world layer, plus a terrain legend in the overlay.
/// Overview frames carry one dot per room and nothing else.
#[derive(Debug, Clone)]
pub struct ScenePipeline {
    layout: RoomLayout,
    palette: Palette,
    overview_radius: f64,
    legend_bottom_offset: f64,
}

impl ScenePipeline {
    pub fn new(config: &MapConfig) -> Self {
        Self {
            layout: RoomLayout::from_config(config),
            palette: config.palette.clone(),
            overview_radius: config.overview_room_radius,
            legend_bottom_offset: config.legend_bottom_offset,
        }
    }

    pub fn build(&self, scene: &Scene<'_>, mode: RenderMode, transform: Transform, size: Size) -> Frame {
        let mut ctx = RenderContext::new(size, self.palette.background);
        ctx.begin_frame();
        match mode {
            RenderMode::Detail => {
                self.draw_terrain(&mut ctx, scene);
                self.draw_grid(&mut ctx, scene);
                self.draw_room_chrome(&mut ctx, scene);
                self.draw_markers(&mut ctx, scene);
                self.draw_legend(&mut ctx, size);
            }
            RenderMode::Overview => self.draw_overview(&mut ctx, scene),
        }
        let frame = ctx.finish(transform);
        log::trace!(
            "built {mode} frame: {} world, {} overlay commands",
            frame.world.len(),
            frame.overlay.len()
        );
        frame
    }

    fn draw_terrain(&self, ctx: &mut RenderContext, scene: &Scene<'_>) {
        let tile = self.layout.tile_size();
        for room in scene.rooms {
            let origin = self.layout.room_origin(room.coord(), scene.bounds);
            for (x, y, kind) in room.tiles() {
                ctx.fill_rect(
                    DrawLayer::World,
                    origin.offset(f64::from(x) * tile, f64::from(y) * tile).to_point(),
                    Size::new(tile, tile),
                    kind.color(&self.palette),
                );
            }
        }
    }

    fn draw_grid(&self, ctx: &mut RenderContext, scene: &Scene<'_>) {
        let tile = self.layout.tile_size();
        let room_px = self.layout.room_px();
        let stroke = Stroke::new(GRID_STROKE_WIDTH, self.palette.grid, GRID_ALPHA);
        for room in scene.rooms {
            let origin = self.layout.room_origin(room.coord(), scene.bounds).to_point();
            for i in 0..=self.layout.room_size() {
                let step = f64::from(i) * tile;
                ctx.line(
                    DrawLayer::World,
                    Point::new(origin.x, origin.y + step),
                    Point::new(origin.x + room_px, origin.y + step),
                    stroke,
                );
            }
            for i in 0..=self.layout.room_size() {
                let step = f64::from(i) * tile;
                ctx.line(
                    DrawLayer::World,
                    Point::new(origin.x + step, origin.y),
                    Point::new(origin.x + step, origin.y + room_px),
                    stroke,
                );
            }
        }
    }

    fn draw_room_chrome(&self, ctx: &mut RenderContext, scene: &Scene<'_>) {
        let room_px = self.layout.room_px();
        for room in scene.rooms {
            let origin = self.layout.room_origin(room.coord(), scene.bounds);
            ctx.text(
                DrawLayer::World,
                origin.offset(LABEL_INSET, LABEL_INSET).to_point(),
                room.name().as_str(),
                self.palette.room_label,
                LABEL_FONT_SIZE,
            );
        }
        // Borders go over the labels
        let stroke = Stroke::new(BORDER_STROKE_WIDTH, self.palette.room_border, BORDER_ALPHA);
        for room in scene.rooms {
            let origin = self.layout.room_origin(room.coord(), scene.bounds);
            ctx.stroke_rect(
                DrawLayer::World,
                origin.to_point(),
                Size::new(room_px, room_px),
                stroke,
            );
        }
    }

    fn draw_markers(&self, ctx: &mut RenderContext, scene: &Scene<'_>) {
        for placed in scene.markers.placed() {
            let center = placed.center.to_point();
            let color = placed.marker.kind.color(&self.palette);
            match placed.marker.kind.shape() {
                MarkerShape::Circle { radius } => {
                    ctx.circle(DrawLayer::World, center, radius, color)
                }
                MarkerShape::Square { size } => ctx.fill_rect(
                    DrawLayer::World,
                    Point::new(center.x - size / 2.0, center.y - size / 2.0),
                    Size::new(size, size),
                    color,
                ),
                MarkerShape::RoundedSquare { size, corner } => ctx.round_rect(
                    DrawLayer::World,
                    Point::new(center.x - size / 2.0, center.y - size / 2.0),
                    Size::new(size, size),
                    corner,
                    color,
                ),
            }
        }
    }

    /// Legend origin in screen pixels, kept on screen for short surfaces
    pub fn legend_origin(&self, size: Size) -> Point {
        Point::new(
            LEGEND_LEFT,
            LEGEND_MIN_TOP.max(size.height - self.legend_bottom_offset),
        )
    }

    fn draw_legend(&self, ctx: &mut RenderContext, size: Size) {
        let origin = self.legend_origin(size);
        let kinds = [TerrainKind::Plain, TerrainKind::Wall, TerrainKind::Swamp];
        for (index, kind) in kinds.into_iter().enumerate() {
            let x = origin.x + index as f64 * LEGEND_SPACING;
            ctx.fill_rect(
                DrawLayer::Overlay,
                Point::new(x, origin.y),
                Size::new(LEGEND_SWATCH, LEGEND_SWATCH),
                kind.color(&self.palette),
            );
            ctx.text(
                DrawLayer::Overlay,
                Point::new(x + LEGEND_TEXT_OFFSET, origin.y),
                kind.label(),
                Color::WHITE,
                LEGEND_FONT_SIZE,
            );
        }
    }

    fn draw_overview(&self, ctx: &mut RenderContext, scene: &Scene<'_>) {
        for room in scene.rooms {
            let center = self.layout.room_center(room.coord(), scene.bounds);
            ctx.circle(
                DrawLayer::World,
                center.to_point(),
                self.overview_radius,
                self.palette.overview_dot,
            );
        }
    }
}

impl Default for ScenePipeline {
    fn default() -> Self {
        Self::new(MapConfig::shared_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        core::room::RoomName,
        layers::marker::{Marker, MarkerKind},
        prelude::HashMap,
        rendering::context::DrawCommand,
    };

    fn rooms() -> Vec<RoomTerrain> {
        ["W0N0", "W1N0", "E0N0"]
            .iter()
            .map(|name| RoomTerrain::plain(RoomName::parse(name).unwrap(), 50))
            .collect()
    }

    fn index(rooms: &[RoomTerrain], bounds: &MapBounds, markers: &[Marker]) -> MarkerIndex {
        let lookup: HashMap<String, _> = rooms
            .iter()
            .map(|r| (r.name().to_string(), r.coord()))
            .collect();
        MarkerIndex::build(markers, &lookup, &RoomLayout::default(), bounds)
    }

    #[test]
    fn test_overview_draws_one_dot_per_room() {
        let rooms = rooms();
        let bounds = MapBounds::of_rooms(rooms.iter().map(|r| r.name()));
        let markers = index(&rooms, &bounds, &[Marker::new("s", MarkerKind::Spawn, "W0N0", 1, 1)]);
        let scene = Scene {
            rooms: &rooms,
            markers: &markers,
            bounds: &bounds,
        };
        let frame = ScenePipeline::default().build(
            &scene,
            RenderMode::Overview,
            Transform::identity(),
            Size::default(),
        );
        assert_eq!(frame.world.len(), 3);
        assert!(frame.overlay.is_empty());
        // W1N0 is the top-left room
        assert_eq!(
            frame.world[1],
            DrawCommand::Circle {
                center: Point::new(290.0, 290.0),
                radius: 6.0,
                fill: Color(0x3ddc84),
            }
        );
    }

    #[test]
    fn test_detail_frame_contents() {
        let rooms = rooms();
        let bounds = MapBounds::of_rooms(rooms.iter().map(|r| r.name()));
        let markers = index(
            &rooms,
            &bounds,
            &[
                Marker::new("s", MarkerKind::Spawn, "W0N0", 24, 24),
                Marker::new("t", MarkerKind::Tower, "W9N9", 1, 1),
            ],
        );
        let scene = Scene {
            rooms: &rooms,
            markers: &markers,
            bounds: &bounds,
        };
        let frame = ScenePipeline::default().build(
            &scene,
            RenderMode::Detail,
            Transform::identity(),
            Size::new(800.0, 600.0),
        );

        // tiles + grid lines + labels + borders + one marker
        let expected = 3 * 2500 + 3 * 102 + 3 + 3 + 1;
        assert_eq!(frame.world.len(), expected);
        assert_eq!(
            frame.world.last(),
            Some(&DrawCommand::Circle {
                center: Point::new(785.0, 285.0),
                radius: 5.0,
                fill: Color(0xf4d35e),
            })
        );
        let labels: Vec<&str> = frame.texts().collect();
        assert_eq!(labels, vec!["W0N0", "W1N0", "E0N0", "Plain", "Wall", "Swamp"]);
        assert_eq!(frame.overlay.len(), 6);
    }

    #[test]
    fn test_legend_stays_on_short_surfaces() {
        let pipeline = ScenePipeline::default();
        assert_eq!(pipeline.legend_origin(Size::new(800.0, 600.0)), Point::new(10.0, 570.0));
        assert_eq!(pipeline.legend_origin(Size::new(800.0, 20.0)), Point::new(10.0, 10.0));
    }
}
