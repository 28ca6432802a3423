// Host-side tests for constants and their relationships.
// The main crate is wasm-only, so we include the pure-Rust modules directly.

#![allow(dead_code)]
mod constants {
    include!("../src/core/constants.rs");
}

use constants::*;

#[test]
#[allow(clippy::assertions_on_constants)]
fn status_banner_stacks_above_canvas_and_markers() {
    // Loading, load-failure and context-lost messages are drawn over an
    // opaque canvas, so they need the highest layer.
    assert!(Z_STATUS > Z_CANVAS);
    assert!(Z_STATUS > Z_MARKERS);
    // Markers float over the rendered sphere.
    assert!(Z_MARKERS > Z_CANVAS);
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn markers_sit_inside_the_sphere_and_beyond_the_near_plane() {
    assert!(MARKER_RADIUS < SPHERE_RADIUS);
    assert!(MARKER_RADIUS > CAMERA_NEAR);
    assert!(SPHERE_RADIUS < CAMERA_FAR);
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn zoom_range_contains_the_start_distance() {
    assert!(CONTROLS_MIN_DISTANCE <= CAMERA_START_DISTANCE);
    assert!(CAMERA_START_DISTANCE <= CONTROLS_MAX_DISTANCE);
    assert!(CONTROLS_DAMPING_FACTOR > 0.0 && CONTROLS_DAMPING_FACTOR < 1.0);
}
