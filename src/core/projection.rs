// Direction ↔ screen conversions for markers anchored on the panorama sphere.
//
// Angles use the UI convention: yaw positive to the right, pitch positive
// downward. The 3D convention is y-up, so pitch flips sign on the way in and
// on the way out.

use glam::{Mat4, Quat, Vec3, Vec4};

use super::constants::MARKER_RADIUS;

/// A direction on the sphere in UI degrees.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct YawPitch {
    pub yaw: f32,
    pub pitch: f32,
}

impl YawPitch {
    pub fn new(yaw: f32, pitch: f32) -> Self {
        Self { yaw, pitch }
    }
}

/// Pixel placement of a marker for the current frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScreenPlacement {
    pub x: f32,
    pub y: f32,
    pub visible: bool,
}

impl ScreenPlacement {
    pub const HIDDEN: ScreenPlacement = ScreenPlacement {
        x: 0.0,
        y: 0.0,
        visible: false,
    };
}

/// Viewport size in CSS pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

/// Unit direction for a UI yaw/pitch pair.
#[inline]
pub fn direction_from_yaw_pitch(angles: YawPitch) -> Vec3 {
    let yaw = angles.yaw.to_radians();
    let pitch = (-angles.pitch).to_radians();
    Vec3::new(
        pitch.cos() * yaw.sin(),
        pitch.sin(),
        pitch.cos() * yaw.cos(),
    )
}

/// Inverse of [`direction_from_yaw_pitch`]; `dir` need not be normalized.
#[inline]
pub fn yaw_pitch_from_direction(dir: Vec3) -> YawPitch {
    let d = dir.normalize_or_zero();
    let yaw = d.x.atan2(d.z).to_degrees();
    let pitch = -d.y.clamp(-1.0, 1.0).asin().to_degrees();
    YawPitch { yaw, pitch }
}

/// World-space anchor for a marker, following the sphere's own rotation.
#[inline]
pub fn marker_anchor(angles: YawPitch, sphere_yaw_rad: f32) -> Vec3 {
    Quat::from_rotation_y(sphere_yaw_rad) * direction_from_yaw_pitch(angles) * MARKER_RADIUS
}

/// Project a world-space point into viewport pixels.
///
/// A point is visible iff its normalized depth is below 1; anything behind
/// the camera lands above 1 and is hidden, never placed with stale pixels.
pub fn project_to_screen(view_proj: Mat4, world: Vec3, viewport: Viewport) -> ScreenPlacement {
    let clip = view_proj * world.extend(1.0);
    if clip.w == 0.0 {
        return ScreenPlacement::HIDDEN;
    }
    let ndc = clip.truncate() / clip.w;
    if !ndc.is_finite() || ndc.z >= 1.0 {
        return ScreenPlacement::HIDDEN;
    }
    ScreenPlacement {
        x: (ndc.x * 0.5 + 0.5) * viewport.width,
        y: (-ndc.y * 0.5 + 0.5) * viewport.height,
        visible: true,
    }
}

/// Ray through a viewport pixel, as `(origin, direction)` in world space.
pub fn screen_to_world_ray(view_proj: Mat4, eye: Vec3, px: f32, py: f32, viewport: Viewport) -> (Vec3, Vec3) {
    let ndc_x = 2.0 * px / viewport.width.max(1.0) - 1.0;
    let ndc_y = 1.0 - 2.0 * py / viewport.height.max(1.0);
    let inv = view_proj.inverse();
    let p = inv * Vec4::new(ndc_x, ndc_y, 0.5, 1.0);
    let p: Vec3 = p.truncate() / p.w;
    (eye, (p - eye).normalize_or_zero())
}

/// Far intersection of a ray with a sphere centered at the origin.
///
/// The camera always sits inside the sphere, so the far root is the one on
/// the panorama surface.
#[inline]
pub fn ray_sphere_exit(ray_origin: Vec3, ray_dir: Vec3, radius: f32) -> Option<f32> {
    let b = ray_origin.dot(ray_dir);
    let c = ray_origin.dot(ray_origin) - radius * radius;
    let disc = b * b - c;
    if disc < 0.0 {
        return None;
    }
    let t = -b + disc.sqrt();
    (t >= 0.0).then_some(t)
}

/// Yaw/pitch under a viewport pixel, undoing the sphere's rotation.
pub fn unproject_to_yaw_pitch(
    view_proj: Mat4,
    eye: Vec3,
    px: f32,
    py: f32,
    viewport: Viewport,
    sphere_yaw_rad: f32,
) -> Option<YawPitch> {
    let (ro, rd) = screen_to_world_ray(view_proj, eye, px, py, viewport);
    let t = ray_sphere_exit(ro, rd, MARKER_RADIUS)?;
    let hit = ro + rd * t;
    let local = Quat::from_rotation_y(-sphere_yaw_rad) * hit;
    Some(yaw_pitch_from_direction(local))
}
