use roommap::prelude::*;
use roommap::core::room::{decode, encode, normalize, room_grid};
use std::sync::Mutex;

/// Integration tests driving the map the way a host page would
#[cfg(test)]
mod integration_tests {
    use super::*;

    fn init_logging() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn three_rooms() -> Vec<RoomTerrain> {
        ["W0N0", "W1N0", "E0N0"]
            .iter()
            .map(|name| RoomTerrain::plain(RoomName::parse(name).unwrap(), 50))
            .collect()
    }

    fn record_views(map: &mut TerrainMap) -> Arc<Mutex<Vec<ViewState>>> {
        let views = Arc::new(Mutex::new(Vec::new()));
        let sink = views.clone();
        map.on_view_changed(move |view| sink.lock().unwrap().push(*view));
        views
    }

    #[test]
    fn test_room_codec() {
        assert_eq!(decode(Some("W1N0")), RoomCoord::new(-2, -1));
        assert_eq!(decode(Some("E0S0")), RoomCoord::new(0, 0));
        assert_eq!(decode(Some("E3S7")), RoomCoord::new(3, 7));
        assert_eq!(decode(Some("X1Y2")), RoomCoord::ORIGIN);
        assert_eq!(decode(Some("")), RoomCoord::ORIGIN);
        assert_eq!(decode(None), RoomCoord::ORIGIN);

        assert_eq!(encode(-1, -1), "W0N0");
        assert_eq!(encode(-11, 4), "W10S4");
        assert_eq!(normalize("w1n0").as_deref(), Some("W1N0"));

        for name in room_grid(RoomCoord::new(-1, -1), 3) {
            let coord = decode(Some(name.as_str()));
            assert_eq!(encode(coord.x, coord.y), name.as_str());
        }
    }

    #[tokio::test]
    async fn test_drag_in_detail_mode() {
        init_logging();
        let factory = RecordingSurfaceFactory::default();
        let mut map = TerrainMap::default();
        let views = record_views(&mut map);

        let view = ViewState::new(RoomPos::new(-1.5, -0.5), 150.0);
        assert!(
            map.render_scene(&factory, three_rooms(), Vec::new(), view, Size::new(800.0, 600.0))
                .await
        );
        assert_eq!(map.mode(), RenderMode::Detail);
        assert_eq!(*map.bounds(), MapBounds::new(-2, -1, 0, -1));
        assert!(views.lock().unwrap().is_empty());

        map.handle_input(InputEvent::PointerDown {
            position: ScreenPoint::new(400.0, 300.0),
        });
        map.handle_input(InputEvent::PointerMove {
            position: ScreenPoint::new(415.0, 300.0),
        });
        map.handle_input(InputEvent::PointerMove {
            position: ScreenPoint::new(430.0, 285.0),
        });
        map.handle_input(InputEvent::PointerUp);

        let views = views.lock().unwrap();
        assert_eq!(views.len(), 2);
        // 30 px right and 15 px up at ratio 1.5 over 500 px rooms
        let last = views[1];
        assert!((last.position.x - (-1.5 - 30.0 / 1.5 / 500.0)).abs() < 1e-9);
        assert!((last.position.y - (-0.5 + 15.0 / 1.5 / 500.0)).abs() < 1e-9);
        assert_eq!(last.scale, 150.0);
        assert_eq!(map.view(), last);
        assert!(!map.is_dragging());

        // Pointer moves after release do not pan
        drop(views);
        let before = map.transform();
        map.on_pointer_move(ScreenPoint::new(10.0, 10.0));
        assert_eq!(map.transform(), before);
    }

    #[tokio::test]
    async fn test_markers_in_unloaded_rooms_are_skipped() {
        init_logging();
        let factory = RecordingSurfaceFactory::default();
        let mut map = TerrainMap::default();
        let markers = vec![
            Marker::new("spawn-9", MarkerKind::Spawn, "W5N5", 10, 10),
            Marker::new("tower-9", MarkerKind::Tower, "E4S2", 20, 20),
        ];
        let view = ViewState::new(RoomPos::new(-1.5, -0.5), 150.0);
        assert!(
            map.render_scene(&factory, three_rooms(), markers, view, Size::new(800.0, 600.0))
                .await
        );

        assert_eq!(map.markers().len(), 2);
        assert!(map.marker_index().is_empty());
        let frame = factory.last().unwrap().record().last_frame.unwrap();
        assert!(!frame
            .world
            .iter()
            .any(|command| matches!(command, DrawCommand::Circle { .. })));
    }

    #[tokio::test]
    async fn test_wheel_respects_scale_limits() {
        init_logging();
        let factory = RecordingSurfaceFactory::default();
        let mut map = TerrainMap::default();
        let views = record_views(&mut map);
        let view = ViewState::new(RoomPos::new(-1.0, -0.5), 300.0);
        assert!(
            map.render_scene(&factory, three_rooms(), Vec::new(), view, Size::new(800.0, 600.0))
                .await
        );

        let before = map.transform();
        map.handle_input(InputEvent::Wheel { delta: -120.0 });
        assert_eq!(map.transform(), before);
        assert!(views.lock().unwrap().is_empty());

        map.handle_input(InputEvent::Wheel { delta: 120.0 });
        let views = views.lock().unwrap();
        assert_eq!(views.len(), 1);
        assert!((views[0].scale - 270.0).abs() < 1e-9);
        // Translation is kept, only the ratio changes
        assert_eq!(map.transform().translate, before.translate);
    }

    fn tap_marker(map: &mut TerrainMap, id: &str) {
        let center = map.marker_index().get(id).unwrap().center;
        let position = map.transform().apply(&center);
        map.handle_input(InputEvent::Tap { position });
    }

    #[tokio::test]
    async fn test_gestures_and_marker_selection() {
        init_logging();
        let factory = RecordingSurfaceFactory::default();
        let mut map = TerrainMap::default();
        let cleared = Arc::new(Mutex::new(0));
        let sink = cleared.clone();
        map.on("selectioncleared", move |_| *sink.lock().unwrap() += 1);

        let markers = vec![Marker::new("spawn-1", MarkerKind::Spawn, "W0N0", 24, 24)];
        let view = ViewState::new(RoomPos::new(-0.5, -0.5), 300.0);
        assert!(
            map.render_scene(&factory, three_rooms(), markers, view, Size::new(800.0, 600.0))
                .await
        );
        tap_marker(&mut map, "spawn-1");
        assert_eq!(map.selection().unwrap().marker.id, "spawn-1");

        // A rejected wheel step and a move without a drag keep the selection
        map.handle_input(InputEvent::Wheel { delta: -120.0 });
        map.handle_input(InputEvent::PointerMove {
            position: ScreenPoint::new(50.0, 50.0),
        });
        assert!(map.selection().is_some());
        assert_eq!(*cleared.lock().unwrap(), 0);

        // An accepted wheel step clears it
        map.handle_input(InputEvent::Wheel { delta: 120.0 });
        assert_eq!(map.view().scale, 270.0);
        assert!(map.selection().is_none());
        assert_eq!(*cleared.lock().unwrap(), 1);

        // Picked mid-drag, the selection survives moves and the release
        map.handle_input(InputEvent::PointerDown {
            position: ScreenPoint::new(400.0, 300.0),
        });
        tap_marker(&mut map, "spawn-1");
        map.handle_input(InputEvent::PointerMove {
            position: ScreenPoint::new(420.0, 310.0),
        });
        map.handle_input(InputEvent::PointerUp);
        assert_eq!(map.selection().unwrap().marker.id, "spawn-1");
        assert_eq!(*cleared.lock().unwrap(), 1);

        // The next drag start clears it
        map.handle_input(InputEvent::PointerDown {
            position: ScreenPoint::new(400.0, 300.0),
        });
        assert!(map.selection().is_none());
        assert_eq!(*cleared.lock().unwrap(), 2);
    }

    #[tokio::test]
    async fn test_set_view_is_not_reported() {
        let factory = RecordingSurfaceFactory::default();
        let mut map = TerrainMap::default();
        let views = record_views(&mut map);
        let view = ViewState::new(RoomPos::new(-1.5, -0.5), 150.0);
        map.render_scene(&factory, three_rooms(), Vec::new(), view, Size::new(800.0, 600.0))
            .await;

        map.on_pointer_down(ScreenPoint::new(100.0, 100.0));
        map.set_view(ViewState::new(RoomPos::new(-0.5, -0.5), 60.0));

        assert!(views.lock().unwrap().is_empty());
        assert!(map.is_dragging());
        assert_eq!(map.mode(), RenderMode::Overview);
        assert_eq!(factory.last().unwrap().record().frames_presented, 2);
    }

    #[tokio::test]
    async fn test_builder_listeners_receive_events() {
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = events.clone();
        let mut map = TerrainMapBuilder::new()
            .on("surfaceready", move |event| {
                sink.lock().unwrap().push(event.event_type().to_string())
            })
            .build()
            .unwrap();

        let factory = RecordingSurfaceFactory::default();
        map.render_scene(
            &factory,
            three_rooms(),
            Vec::new(),
            ViewState::default(),
            Size::new(640.0, 480.0),
        )
        .await;
        assert_eq!(*events.lock().unwrap(), vec!["surfaceready".to_string()]);
    }
}
