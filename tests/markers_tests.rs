// Host-side tests for the marker model, card state, props and debug drafts.

#![allow(dead_code)]
mod pano {
    pub mod constants {
        include!("../src/core/constants.rs");
    }
    pub mod camera {
        include!("../src/core/camera.rs");
    }
    pub mod controls {
        include!("../src/core/controls.rs");
    }
    pub mod projection {
        include!("../src/core/projection.rs");
    }
    pub mod view {
        include!("../src/core/view.rs");
    }
    pub mod markers {
        include!("../src/core/markers.rs");
    }
    pub mod load {
        include!("../src/core/load.rs");
    }
    pub mod config {
        include!("../src/core/config.rs");
    }
    pub mod debug {
        include!("../src/core/debug.rs");
    }
}

use pano::config::*;
use pano::constants::DEFAULT_MAX_TEXTURE_WIDTH;
use pano::debug::MarkerDraft;
use pano::markers::*;
use pano::projection::{ScreenPlacement, Viewport, YawPitch};
use pano::view::ViewState;
use std::collections::HashMap;

#[derive(Default)]
struct RecordingSink {
    placed: HashMap<MarkerId, ScreenPlacement>,
    calls: usize,
}

impl MarkerSink for RecordingSink {
    fn place(&mut self, id: MarkerId, placement: ScreenPlacement) {
        self.calls += 1;
        self.placed.insert(id, placement);
    }
}

fn hotspot(yaw: f32, pitch: f32, target: Option<&str>) -> Hotspot {
    Hotspot {
        yaw,
        pitch,
        label: None,
        target: target.map(str::to_string),
    }
}

fn pin(yaw: f32, title: &str) -> Pin {
    Pin {
        id: None,
        yaw,
        pitch: 0.0,
        title: title.to_string(),
        description: None,
        image: None,
        distance: None,
        badge: None,
        links: Vec::new(),
        color: None,
        label: None,
    }
}

#[test]
fn reproject_places_every_marker_each_frame() {
    let set = MarkerSet::new(
        vec![hotspot(90.0, 0.0, Some("hall")), hotspot(180.0, 0.0, None)],
        vec![pin(0.0, "behind")],
    );
    let view = ViewState::new(Viewport { width: 800.0, height: 600.0 }, 0.0, true, 0.0);
    let mut sink = RecordingSink::default();
    set.reproject(view.view_projection(), view.sphere_yaw_rad, view.viewport, &mut sink);
    set.reproject(view.view_projection(), view.sphere_yaw_rad, view.viewport, &mut sink);
    assert_eq!(sink.calls, 2 * set.len());

    let right = sink.placed[&MarkerId::hotspot(0)];
    assert!(right.visible && right.x >= 800.0);

    // Yaw 180 is straight ahead of the default camera.
    let ahead = sink.placed[&MarkerId::hotspot(1)];
    assert!(ahead.visible);
    assert!((ahead.x - 400.0).abs() < 0.5 && (ahead.y - 300.0).abs() < 0.5);

    assert!(!sink.placed[&MarkerId::pin(0)].visible);
}

#[test]
fn markers_follow_sphere_rotation() {
    let set = MarkerSet::new(vec![hotspot(180.0, 0.0, None)], Vec::new());
    let mut view = ViewState::new(Viewport { width: 800.0, height: 600.0 }, 0.0, true, 90.0);
    view.step(1.0);
    let mut sink = RecordingSink::default();
    set.reproject(view.view_projection(), view.sphere_yaw_rad, view.viewport, &mut sink);
    let moved = sink.placed[&MarkerId::hotspot(0)];
    // A quarter turn carries the marker out of the center of the view.
    assert!(!moved.visible || (moved.x - 400.0).abs() > 100.0);
}

#[test]
fn only_targeted_hotspots_navigate() {
    let set = MarkerSet::new(vec![hotspot(0.0, 0.0, Some("kitchen")), hotspot(10.0, 0.0, None)], Vec::new());
    assert_eq!(
        set.hotspot_click(0),
        Some(MarkerIntent::Navigate {
            target: "kitchen".to_string()
        })
    );
    assert_eq!(set.hotspot_click(1), None);
    assert_eq!(set.hotspot_click(7), None);
}

#[test]
fn card_state_tracks_hover_and_tap() {
    let mut cards = CardStates::new(2);
    assert_eq!(cards.apply(&MarkerIntent::OpenCard(0)), Some((0, true)));
    // Re-entering an open card changes nothing.
    assert_eq!(cards.apply(&MarkerIntent::OpenCard(0)), None);
    assert_eq!(cards.apply(&MarkerIntent::CloseCard(0)), Some((0, false)));
    assert_eq!(cards.apply(&MarkerIntent::ToggleCard(1)), Some((1, true)));
    assert_eq!(cards.apply(&MarkerIntent::ToggleCard(1)), Some((1, false)));
    assert!(!cards.is_open(1));
    assert_eq!(cards.apply(&MarkerIntent::ToggleCard(5)), None);
    assert_eq!(
        cards.apply(&MarkerIntent::Navigate {
            target: "x".into()
        }),
        None
    );
}

#[test]
fn intent_queue_is_shared_and_drains_in_order() {
    let queue = IntentQueue::new();
    let handler_side = queue.clone();
    handler_side.push(MarkerIntent::OpenCard(1));
    handler_side.push(MarkerIntent::CloseCard(1));
    assert!(!queue.is_empty());
    assert_eq!(
        queue.drain(),
        vec![MarkerIntent::OpenCard(1), MarkerIntent::CloseCard(1)]
    );
    assert!(handler_side.is_empty());
}

#[test]
fn props_fill_defaults_from_minimal_object() {
    let props: ViewerProps = serde_json::from_str(r#"{ "src": "/pano/lobby.jpg" }"#).unwrap();
    assert_eq!(props, ViewerProps::new("/pano/lobby.jpg"));
    assert!(props.enable_zoom);
    assert!(props.debug);
    assert_eq!(props.max_texture_width, DEFAULT_MAX_TEXTURE_WIDTH);
    assert_eq!(props.fetch_errors, FetchErrorPolicy::Mask);
}

#[test]
fn props_read_camel_case_fields() {
    let json = r#"{
        "src": "a.jpg",
        "initialYaw": 45,
        "autoRotateSpeed": 2.5,
        "enableZoom": false,
        "maxTextureWidth": 4096,
        "fetchErrors": "report",
        "hotspots": [{ "yaw": 10, "pitch": -5, "target": "b" }],
        "pins": [{ "yaw": 1, "pitch": 2, "title": "Desk", "links": [{ "href": "/d", "text": "Docs" }] }]
    }"#;
    let props: ViewerProps = serde_json::from_str(json).unwrap();
    assert_eq!(props.initial_yaw, 45.0);
    assert_eq!(props.auto_rotate_speed, 2.5);
    assert!(!props.enable_zoom);
    assert_eq!(props.max_texture_width, 4096);
    assert_eq!(props.fetch_errors, FetchErrorPolicy::Report);
    assert_eq!(props.hotspots[0].target.as_deref(), Some("b"));
    assert_eq!(props.pins[0].links[0].text, "Docs");
}

#[test]
fn debug_draft_rounds_angles_and_serializes() {
    let draft = MarkerDraft::new(YawPitch::new(12.345, -7.06), 1_700_000_000_123.0);
    assert_eq!(draft.id, "pin-1700000000123");
    assert_eq!(draft.yaw, 12.3);
    assert_eq!(draft.pitch, -7.1);

    let value: serde_json::Value = serde_json::from_str(&draft.to_json()).unwrap();
    for key in ["id", "yaw", "pitch", "title", "description", "image", "distance", "label", "badge", "links"] {
        assert!(value.get(key).is_some(), "missing {}", key);
    }
}
