pub mod camera;
pub mod config;
pub mod constants;
pub mod controls;
pub mod debug;
pub mod geometry;
pub mod gesture;
pub mod lifecycle;
pub mod load;
pub mod markers;
pub mod projection;
pub mod raster;
pub mod tour;
pub mod view;

pub use camera::*;
pub use config::*;
pub use constants::*;
pub use controls::*;
pub use gesture::*;
pub use lifecycle::*;
pub use markers::*;
pub use projection::*;
pub use view::*;

// Shaders bundled as string constants
pub static SPHERE_WGSL: &str = include_str!("../../shaders/sphere.wgsl");
pub static MIPMAP_WGSL: &str = include_str!("../../shaders/mipmap.wgsl");
