// Damped orbit controls.
//
// The camera orbits `target` on a sphere of radius `spherical.radius`.
// Input accumulates into `delta`/`scale`; `update` applies a damped share of
// the pending rotation every frame and writes the new eye position back into
// the camera. Panning is not supported.

use glam::{Vec2, Vec3};
use std::f32::consts::{PI, TAU};

use super::camera::PerspectiveCamera;
use super::constants::{
    CONTROLS_DAMPING_FACTOR, CONTROLS_MAX_DISTANCE, CONTROLS_MIN_DISTANCE, CONTROLS_POLAR_EPSILON,
    CONTROLS_ROTATE_SPEED, CONTROLS_ZOOM_SPEED,
};

/// Polar/azimuth coordinates of the eye relative to the target.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Spherical {
    pub radius: f32,
    /// Polar angle from +Y.
    pub phi: f32,
    /// Azimuth around +Y, measured from +Z toward +X.
    pub theta: f32,
}

impl Spherical {
    pub fn from_offset(offset: Vec3) -> Self {
        let radius = offset.length();
        if radius == 0.0 {
            return Self {
                radius: 0.0,
                phi: 0.0,
                theta: 0.0,
            };
        }
        Self {
            radius,
            theta: offset.x.atan2(offset.z),
            phi: (offset.y / radius).clamp(-1.0, 1.0).acos(),
        }
    }

    pub fn to_offset(self) -> Vec3 {
        let s = self.phi.sin() * self.radius;
        Vec3::new(s * self.theta.sin(), self.phi.cos() * self.radius, s * self.theta.cos())
    }
}

#[derive(Clone, Debug)]
pub struct OrbitControls {
    pub target: Vec3,
    pub enable_damping: bool,
    pub damping_factor: f32,
    pub enable_zoom: bool,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    spherical: Spherical,
    delta_theta: f32,
    delta_phi: f32,
    scale: f32,
    rotate_start: Option<Vec2>,
    pinch_start: Option<f32>,
}

impl OrbitControls {
    /// Controls for `camera`, with the azimuth turned to face `initial_yaw_deg`.
    ///
    /// Camera rotation runs opposite to the UI yaw convention, hence the
    /// negation.
    pub fn new(camera: &mut PerspectiveCamera, enable_zoom: bool, initial_yaw_deg: f32) -> Self {
        let mut spherical = Spherical::from_offset(camera.eye - camera.target);
        spherical.theta = -initial_yaw_deg.to_radians();
        let mut controls = Self {
            target: camera.target,
            enable_damping: true,
            damping_factor: CONTROLS_DAMPING_FACTOR,
            enable_zoom,
            rotate_speed: CONTROLS_ROTATE_SPEED,
            zoom_speed: CONTROLS_ZOOM_SPEED,
            min_distance: CONTROLS_MIN_DISTANCE,
            max_distance: CONTROLS_MAX_DISTANCE,
            spherical,
            delta_theta: 0.0,
            delta_phi: 0.0,
            scale: 1.0,
            rotate_start: None,
            pinch_start: None,
        };
        controls.apply_to(camera);
        controls
    }

    pub fn spherical(&self) -> Spherical {
        self.spherical
    }

    pub fn is_rotating(&self) -> bool {
        self.rotate_start.is_some()
    }

    pub fn rotate_left(&mut self, angle: f32) {
        self.delta_theta -= angle;
    }

    pub fn rotate_up(&mut self, angle: f32) {
        self.delta_phi -= angle;
    }

    pub fn begin_rotate(&mut self, x: f32, y: f32) {
        self.rotate_start = Some(Vec2::new(x, y));
    }

    /// Pointer drag in element pixels; a full element height is one turn.
    pub fn rotate_to(&mut self, x: f32, y: f32, element_height: f32) {
        let Some(start) = self.rotate_start else {
            return;
        };
        let end = Vec2::new(x, y);
        let delta = (end - start) * self.rotate_speed;
        let h = element_height.max(1.0);
        self.rotate_left(TAU * delta.x / h);
        self.rotate_up(TAU * delta.y / h);
        self.rotate_start = Some(end);
    }

    pub fn end_rotate(&mut self) {
        self.rotate_start = None;
    }

    /// Wheel input; negative `delta_y` zooms in.
    pub fn wheel(&mut self, delta_y: f32) {
        if !self.enable_zoom {
            return;
        }
        if delta_y < 0.0 {
            self.dolly_in(self.zoom_scale());
        } else if delta_y > 0.0 {
            self.dolly_out(self.zoom_scale());
        }
    }

    pub fn begin_pinch(&mut self, distance: f32) {
        self.rotate_start = None;
        if self.enable_zoom && distance > 0.0 {
            self.pinch_start = Some(distance);
        }
    }

    /// Spreading two fingers apart zooms in.
    pub fn pinch_to(&mut self, distance: f32) {
        let Some(start) = self.pinch_start else {
            return;
        };
        if distance <= 0.0 {
            return;
        }
        self.dolly_out((distance / start).powf(self.zoom_speed));
        self.pinch_start = Some(distance);
    }

    pub fn end_pinch(&mut self) {
        self.pinch_start = None;
    }

    /// Apply pending input to `camera`. Returns true if the eye moved.
    pub fn update(&mut self, camera: &mut PerspectiveCamera) -> bool {
        let before = camera.eye;
        if self.enable_damping {
            self.spherical.theta += self.delta_theta * self.damping_factor;
            self.spherical.phi += self.delta_phi * self.damping_factor;
        } else {
            self.spherical.theta += self.delta_theta;
            self.spherical.phi += self.delta_phi;
        }
        self.spherical.phi = self
            .spherical
            .phi
            .clamp(CONTROLS_POLAR_EPSILON, PI - CONTROLS_POLAR_EPSILON);
        self.spherical.radius =
            (self.spherical.radius * self.scale).clamp(self.min_distance, self.max_distance);
        self.scale = 1.0;

        self.apply_to(camera);

        if self.enable_damping {
            self.delta_theta *= 1.0 - self.damping_factor;
            self.delta_phi *= 1.0 - self.damping_factor;
        } else {
            self.delta_theta = 0.0;
            self.delta_phi = 0.0;
        }
        (camera.eye - before).length_squared() > 1e-12
    }

    fn apply_to(&self, camera: &mut PerspectiveCamera) {
        camera.target = self.target;
        camera.eye = self.target + self.spherical.to_offset();
    }

    fn zoom_scale(&self) -> f32 {
        0.95_f32.powf(self.zoom_speed)
    }

    fn dolly_in(&mut self, scale: f32) {
        self.scale *= scale;
    }

    fn dolly_out(&mut self, scale: f32) {
        self.scale /= scale;
    }
}
