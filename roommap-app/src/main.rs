use anyhow::Context;
use roommap::prelude::*;
use roommap::terrain::suggested_radius;

/// Headless demo: loads generated terrain around W0N0, draws it onto a
/// recording surface and replays a short operator session.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    roommap::init_logging();

    let shard = match std::env::var("ROOMMAP_SHARD") {
        Ok(value) => value.parse::<Shard>()?,
        Err(_) => Shard::Shard0,
    };

    let config = MapConfig::default();
    let loader = TerrainLoader::new(Arc::new(DemoTerrainSource::default()), &config);

    let center = RoomCoord::from_room_name("W0N0");
    let view = ViewState::centered_on_room(center.x, center.y, 78.26);
    let radius = suggested_radius(view.scale, config.detail_threshold);
    let grid = loader.load_grid(center, radius, shard).await;
    for failure in &grid.failures {
        log::warn!("skipping {}: {}", failure.room, failure.error);
    }

    let mut map = TerrainMapBuilder::new()
        .with_config(config)
        .with_host_origin(Point::new(0.0, 0.0))
        .build()?;
    map.on_view_changed(|view| {
        log::info!(
            "view ({:.2}, {:.2}) @ {:.2}%",
            view.position.x,
            view.position.y,
            view.scale
        )
    });
    map.on("markerselected", |event| {
        if let MapEvent::MarkerSelected { marker_id, anchor } = event {
            log::info!("selected {marker_id}, tooltip at ({:.0}, {:.0})", anchor.x, anchor.y);
        }
    });

    let markers = vec![
        Marker::new("demo-spawn", MarkerKind::Spawn, "W0N0", 24, 24).with_durability(5000),
        Marker::new("demo-tower", MarkerKind::Tower, "W0N0", 20, 30).with_durability(3000),
    ];

    let factory = RecordingSurfaceFactory::new(Point::new(0.0, 0.0));
    let size = Size::new(1024.0, 768.0);
    let drawn = map
        .render_scene(&factory, grid.rooms, markers, view, size)
        .await;
    anyhow::ensure!(drawn, "surface setup failed");
    log::info!("scene ready in {} mode", map.mode());

    // Zoom in until the tiles show up
    while !map.mode().is_detail() {
        let before = map.view().scale;
        map.handle_input(InputEvent::Wheel { delta: -100.0 });
        if map.view().scale == before {
            break;
        }
    }

    let start = size.center();
    map.handle_input(InputEvent::PointerDown { position: start });
    for step in 1..=4 {
        let offset = f64::from(step) * 20.0;
        map.handle_input(InputEvent::PointerMove {
            position: ScreenPoint::new(start.x + offset, start.y - offset / 2.0),
        });
    }
    map.handle_input(InputEvent::PointerUp);

    let spawn = map
        .marker_index()
        .get("demo-spawn")
        .map(|placed| placed.center)
        .context("demo spawn was not placed")?;
    map.handle_input(InputEvent::Tap {
        position: map.transform().apply(&spawn),
    });
    if let Some(selection) = map.selection() {
        for line in selection.marker.tooltip_lines() {
            log::info!("  {line}");
        }
    }

    if let Some(marker) =
        map.place_marker(&MarkerDraft::from_inputs(MarkerKind::Extension, "W0N0", "12", "80"))
    {
        log::info!("placed {} at ({}, {})", marker.id, marker.x, marker.y);
    }

    map.handle_input(InputEvent::Resize {
        size: Size::new(1280.0, 720.0),
    });

    if let Some(surface) = factory.last() {
        let record = surface.record();
        log::info!(
            "{} frames presented, last with {} draw commands",
            record.frames_presented,
            record
                .last_frame
                .as_ref()
                .map(Frame::command_count)
                .unwrap_or_default()
        );
    }

    map.teardown();
    Ok(())
}
