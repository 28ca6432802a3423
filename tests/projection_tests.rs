// Host-side tests for marker direction and screen projection math.
// The main crate is wasm-only, so we include the pure-Rust modules directly.

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
}

use glam::Vec3;
use pano::camera::PerspectiveCamera;
use pano::constants::MARKER_RADIUS;
use pano::projection::*;
use pano::view::ViewState;

const VIEWPORT: Viewport = Viewport {
    width: 800.0,
    height: 600.0,
};

fn angle_diff(a: f32, b: f32) -> f32 {
    let d = (a - b).rem_euclid(360.0);
    d.min(360.0 - d)
}

#[test]
fn direction_is_unit_for_all_angles() {
    for yaw in (-180..=180).step_by(15) {
        for pitch in (-90..=90).step_by(15) {
            let d = direction_from_yaw_pitch(YawPitch::new(yaw as f32, pitch as f32));
            assert!(
                (d.length() - 1.0).abs() < 1e-5,
                "yaw {} pitch {} gave length {}",
                yaw,
                pitch,
                d.length()
            );
        }
    }
}

#[test]
fn direction_axes_follow_ui_convention() {
    let right = direction_from_yaw_pitch(YawPitch::new(90.0, 0.0));
    assert!((right - Vec3::X).length() < 1e-5);
    let ahead = direction_from_yaw_pitch(YawPitch::new(0.0, 0.0));
    assert!((ahead - Vec3::Z).length() < 1e-5);
    // Positive pitch looks down.
    let down = direction_from_yaw_pitch(YawPitch::new(0.0, 90.0));
    assert!((down - Vec3::NEG_Y).length() < 1e-5);
}

#[test]
fn yaw_pitch_inverts_direction() {
    for &(yaw, pitch) in &[(0.0, 0.0), (90.0, 10.0), (-135.0, -45.0), (170.0, 60.0)] {
        let back = yaw_pitch_from_direction(direction_from_yaw_pitch(YawPitch::new(yaw, pitch)));
        assert!(angle_diff(back.yaw, yaw) < 1e-3, "yaw {} -> {}", yaw, back.yaw);
        assert!((back.pitch - pitch).abs() < 1e-3, "pitch {} -> {}", pitch, back.pitch);
    }
}

#[test]
fn center_pixel_unprojects_to_camera_forward() {
    for &(yaw, pitch) in &[(0.0, 0.0), (45.0, 20.0), (-120.0, -35.0), (179.0, 70.0)] {
        let dir = direction_from_yaw_pitch(YawPitch::new(yaw, pitch));
        let mut camera = PerspectiveCamera::new(VIEWPORT.width / VIEWPORT.height);
        camera.eye = -dir * 0.1;
        camera.target = Vec3::ZERO;

        let placed = project_to_screen(camera.view_projection(), dir * MARKER_RADIUS, VIEWPORT);
        assert!(placed.visible);
        assert!((placed.x - 400.0).abs() < 0.5 && (placed.y - 300.0).abs() < 0.5);

        let picked = unproject_to_yaw_pitch(camera.view_projection(), camera.eye, 400.0, 300.0, VIEWPORT, 0.0)
            .expect("center ray hits the sphere");
        assert!(angle_diff(picked.yaw, yaw) < 0.05, "yaw {} -> {}", yaw, picked.yaw);
        assert!((picked.pitch - pitch).abs() < 0.05, "pitch {} -> {}", pitch, picked.pitch);
    }
}

#[test]
fn unproject_undoes_sphere_rotation() {
    let view = ViewState::new(VIEWPORT, 90.0, true, 0.0);
    let spun = ViewState {
        sphere_yaw_rad: 30f32.to_radians(),
        ..view.clone()
    };
    let still = view.pick(400.0, 300.0).expect("hit");
    let moved = spun.pick(400.0, 300.0).expect("hit");
    // The sphere turned 30° about +Y, so the image under the center moved
    // back by the same amount.
    assert!(angle_diff(still.yaw - 30.0, moved.yaw) < 0.05);
}

#[test]
fn initial_yaw_faces_its_mirror_about_ninety() {
    // The camera azimuth is the negated initial yaw while marker yaw grows to
    // the right, so initial yaw Y centres marker yaw 180 - Y. 90 maps to
    // itself, 0 looks at 180 and 45 looks at 135.
    for (initial, centred) in [(90.0, 90.0), (0.0, 180.0), (45.0, 135.0), (-30.0, 210.0)] {
        let view = ViewState::new(VIEWPORT, initial, true, 0.0);
        let picked = view.pick(400.0, 300.0).expect("hit");
        assert!(
            angle_diff(picked.yaw, centred) < 0.05,
            "initial {} centred {} (want {})",
            initial,
            picked.yaw,
            centred
        );
        assert!(picked.pitch.abs() < 0.05);
    }
}

#[test]
fn points_behind_camera_are_hidden() {
    let camera = PerspectiveCamera::new(VIEWPORT.width / VIEWPORT.height);
    // The default camera looks down -Z, so +Z is behind it.
    let behind = project_to_screen(camera.view_projection(), Vec3::Z * MARKER_RADIUS, VIEWPORT);
    assert_eq!(behind, ScreenPlacement::HIDDEN);

    let slightly_behind = project_to_screen(
        camera.view_projection(),
        Vec3::new(MARKER_RADIUS, 0.0, 0.5),
        VIEWPORT,
    );
    assert!(!slightly_behind.visible);
}

#[test]
fn perpendicular_marker_stays_visible_at_depth_boundary() {
    let camera = PerspectiveCamera::new(VIEWPORT.width / VIEWPORT.height);
    let vp = camera.view_projection();
    let world = Vec3::X * MARKER_RADIUS;
    let clip = vp * world.extend(1.0);
    let ndc_z = clip.z / clip.w;
    assert!(ndc_z.abs() < 1e-3, "depth {}", ndc_z);
    let placed = project_to_screen(vp, world, VIEWPORT);
    assert!(placed.visible);
    assert!(placed.x.is_finite() && placed.y.is_finite());
}

#[test]
fn hotspot_at_yaw_90_lands_on_right_edge() {
    let view = ViewState::new(VIEWPORT, 0.0, true, 0.0);
    let world = marker_anchor(YawPitch::new(90.0, 0.0), view.sphere_yaw_rad);
    let placed = project_to_screen(view.view_projection(), world, view.viewport);
    assert!(placed.visible);
    assert!(placed.x >= VIEWPORT.width, "x = {}", placed.x);
    assert!((placed.y - VIEWPORT.height / 2.0).abs() < 1.0);
}

#[test]
fn ray_sphere_exit_from_inside() {
    let t = ray_sphere_exit(Vec3::new(0.0, 0.0, 0.1), Vec3::NEG_Z, 10.0).expect("hit");
    assert!((t - 10.1).abs() < 1e-4);
    assert!(ray_sphere_exit(Vec3::new(0.0, 20.0, 0.0), Vec3::X, 10.0).is_none());
}

#[test]
fn marker_anchor_sits_inside_sphere_and_turns_with_it() {
    let a = marker_anchor(YawPitch::new(0.0, 0.0), 0.0);
    assert!((a.length() - MARKER_RADIUS).abs() < 1e-3);
    let turned = marker_anchor(YawPitch::new(0.0, 0.0), std::f32::consts::FRAC_PI_2);
    assert!((turned - Vec3::X * MARKER_RADIUS).length() < 1e-3);
}
