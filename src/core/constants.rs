// Shared viewing and interaction constants for the panorama viewer.

// Camera
pub const CAMERA_FOV_DEG: f32 = 75.0;
pub const CAMERA_NEAR: f32 = 0.1;
pub const CAMERA_FAR: f32 = 1000.0;
// Never exactly at the sphere center; a zero offset gives a degenerate look-at.
pub const CAMERA_START_DISTANCE: f32 = 0.1;

// Panorama sphere
pub const SPHERE_RADIUS: f32 = 50.0;
pub const SPHERE_WIDTH_SEGMENTS: u32 = 64;
pub const SPHERE_HEIGHT_SEGMENTS: u32 = 48;
// Markers sit just inside the sphere surface.
pub const MARKER_RADIUS: f32 = 49.9;

// Orbit controls
pub const CONTROLS_MIN_DISTANCE: f32 = 0.1;
pub const CONTROLS_MAX_DISTANCE: f32 = 3.0;
pub const CONTROLS_DAMPING_FACTOR: f32 = 0.05;
// Negative so that dragging moves the image with the pointer.
pub const CONTROLS_ROTATE_SPEED: f32 = -0.3;
pub const CONTROLS_ZOOM_SPEED: f32 = 0.6;
// Keeps the polar angle away from the poles where look-at flips.
pub const CONTROLS_POLAR_EPSILON: f32 = 1e-6;

// Texture loading
pub const DEFAULT_MAX_TEXTURE_WIDTH: u32 = 8192;

// Marker defaults
pub const HOTSPOT_DEFAULT_LABEL: &str = "•";
pub const PIN_DEFAULT_LABEL: &str = "i";

// User-facing status messages
pub const MSG_LOADING: &str = "Loading panorama…";
pub const MSG_GPU_UNAVAILABLE: &str =
    "WebGPU/WebGL is not available. Enable hardware acceleration or try another browser.";
pub const MSG_CONTEXT_LOST: &str = "The graphics context was lost. Reload the page to continue.";

// Stacking order inside the viewer root. The status banner must stay above
// the canvas, which keeps showing its last frame after a context loss.
pub const Z_CANVAS: i32 = 0;
pub const Z_MARKERS: i32 = 1;
pub const Z_STATUS: i32 = 2;
