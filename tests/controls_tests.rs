// Host-side tests for damped orbit controls and pointer gestures.

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
    pub mod gesture {
        include!("../src/core/gesture.rs");
    }
}

use glam::{Vec2, Vec3};
use pano::camera::PerspectiveCamera;
use pano::constants::*;
use pano::controls::*;
use pano::gesture::PointerTracker;
use std::f32::consts::PI;

fn setup(enable_zoom: bool) -> (PerspectiveCamera, OrbitControls) {
    let mut camera = PerspectiveCamera::new(4.0 / 3.0);
    let controls = OrbitControls::new(&mut camera, enable_zoom, 0.0);
    (camera, controls)
}

#[test]
fn spherical_round_trips_offsets() {
    let offset = Vec3::new(0.3, -0.2, 0.9);
    let back = Spherical::from_offset(offset).to_offset();
    assert!((back - offset).length() < 1e-5);
}

#[test]
fn initial_yaw_sets_negated_azimuth() {
    let mut camera = PerspectiveCamera::new(1.0);
    let controls = OrbitControls::new(&mut camera, true, 45.0);
    assert!((controls.spherical().theta + 45f32.to_radians()).abs() < 1e-6);
    assert!((camera.eye.length() - CAMERA_START_DISTANCE).abs() < 1e-6);
}

#[test]
fn drag_rotation_is_damped_and_converges() {
    let (mut camera, mut controls) = setup(true);
    let start_theta = controls.spherical().theta;
    controls.begin_rotate(100.0, 100.0);
    controls.rotate_to(200.0, 100.0, 600.0);
    controls.end_rotate();

    assert!(controls.update(&mut camera));
    let first_step = (controls.spherical().theta - start_theta).abs();

    for _ in 0..2000 {
        controls.update(&mut camera);
    }
    let last = controls.spherical().theta;
    // Total rotation is rotate_speed * 2π * dx / height.
    let expected = (CONTROLS_ROTATE_SPEED * 2.0 * PI * 100.0 / 600.0).abs();
    let total = (last - start_theta).abs();
    assert!(first_step < total, "damping spreads motion over frames");
    assert!((total - expected).abs() < 1e-3, "total {} expected {}", total, expected);
    assert!(!controls.update(&mut camera), "motion settles");
}

#[test]
fn polar_angle_is_clamped_away_from_poles() {
    let (mut camera, mut controls) = setup(true);
    controls.rotate_up(-10.0);
    for _ in 0..500 {
        controls.update(&mut camera);
    }
    let phi = controls.spherical().phi;
    assert!(phi > 0.0 && phi < PI);
    assert!(camera.eye.is_finite());
}

#[test]
fn wheel_zoom_respects_distance_clamp() {
    let (mut camera, mut controls) = setup(true);
    for _ in 0..200 {
        controls.wheel(100.0);
        controls.update(&mut camera);
    }
    assert!((controls.spherical().radius - CONTROLS_MAX_DISTANCE).abs() < 1e-4);
    for _ in 0..200 {
        controls.wheel(-100.0);
        controls.update(&mut camera);
    }
    assert!((controls.spherical().radius - CONTROLS_MIN_DISTANCE).abs() < 1e-4);
}

#[test]
fn zoom_disabled_ignores_wheel_and_pinch() {
    let (mut camera, mut controls) = setup(false);
    controls.wheel(100.0);
    controls.begin_pinch(100.0);
    controls.pinch_to(50.0);
    controls.update(&mut camera);
    assert!((controls.spherical().radius - CAMERA_START_DISTANCE).abs() < 1e-6);
}

#[test]
fn one_pointer_rotates() {
    let (mut camera, mut controls) = setup(true);
    let mut pointers = PointerTracker::new();
    pointers.down(1, Vec2::new(10.0, 10.0), &mut controls);
    assert!(controls.is_rotating());
    pointers.move_to(1, Vec2::new(60.0, 10.0), 500.0, &mut controls);
    assert!(controls.update(&mut camera));
    assert!(pointers.up(1, &mut controls));
    assert!(!controls.is_rotating());
    assert!(pointers.is_empty());
}

#[test]
fn two_pointers_pinch_then_hand_back_to_rotation() {
    let (mut camera, mut controls) = setup(true);
    let mut pointers = PointerTracker::new();
    pointers.down(1, Vec2::new(100.0, 100.0), &mut controls);
    pointers.down(2, Vec2::new(200.0, 100.0), &mut controls);
    assert_eq!(pointers.len(), 2);
    assert!(!controls.is_rotating());

    // Fingers move apart: zoom in, radius shrinks toward the minimum.
    pointers.move_to(2, Vec2::new(300.0, 100.0), 500.0, &mut controls);
    let _ = controls.update(&mut camera);
    assert!(controls.spherical().radius <= CAMERA_START_DISTANCE);

    // A third finger is ignored.
    pointers.down(3, Vec2::new(0.0, 0.0), &mut controls);
    assert_eq!(pointers.len(), 2);
    assert!(!pointers.up(3, &mut controls));

    assert!(pointers.up(2, &mut controls));
    assert!(controls.is_rotating());
    assert!(pointers.up(1, &mut controls));
    assert!(!controls.is_rotating());
}
