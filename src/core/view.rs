// Camera, controls and sphere orientation for one mounted viewer.

use glam::Mat4;

use super::camera::{aspect_from_size, PerspectiveCamera};
use super::controls::OrbitControls;
use super::projection::{unproject_to_yaw_pitch, Viewport, YawPitch};

#[derive(Clone, Debug)]
pub struct ViewState {
    pub camera: PerspectiveCamera,
    pub controls: OrbitControls,
    /// Auto-rotation of the sphere about +Y, in radians.
    pub sphere_yaw_rad: f32,
    /// Degrees per second; zero disables auto-rotation.
    pub auto_rotate_speed: f32,
    pub viewport: Viewport,
}

impl ViewState {
    pub fn new(viewport: Viewport, initial_yaw_deg: f32, enable_zoom: bool, auto_rotate_speed: f32) -> Self {
        let mut camera = PerspectiveCamera::new(aspect_from_size(viewport.width, viewport.height));
        let controls = OrbitControls::new(&mut camera, enable_zoom, initial_yaw_deg);
        Self {
            camera,
            controls,
            sphere_yaw_rad: 0.0,
            auto_rotate_speed,
            viewport,
        }
    }

    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.camera
            .set_aspect(aspect_from_size(viewport.width, viewport.height));
    }

    /// Advance auto-rotation and control damping by `dt` seconds.
    pub fn step(&mut self, dt: f32) {
        if self.auto_rotate_speed != 0.0 {
            self.sphere_yaw_rad =
                (self.sphere_yaw_rad + (self.auto_rotate_speed * dt).to_radians()) % std::f32::consts::TAU;
        }
        self.controls.update(&mut self.camera);
    }

    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_rotation_y(self.sphere_yaw_rad)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.camera.view_projection()
    }

    /// Direction under a viewport pixel in UI yaw/pitch.
    pub fn pick(&self, px: f32, py: f32) -> Option<YawPitch> {
        unproject_to_yaw_pitch(
            self.view_projection(),
            self.camera.eye,
            px,
            py,
            self.viewport,
            self.sphere_yaw_rad,
        )
    }
}
