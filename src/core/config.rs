// Viewer construction props, deserialized from the host's JS object.

use serde::{Deserialize, Serialize};

use super::constants::DEFAULT_MAX_TEXTURE_WIDTH;
use super::markers::{Hotspot, Pin};

pub use super::load::FetchErrorPolicy;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewerProps {
    pub src: String,
    #[serde(default)]
    pub initial_yaw: f32,
    #[serde(default)]
    pub hotspots: Vec<Hotspot>,
    #[serde(default)]
    pub pins: Vec<Pin>,
    /// Degrees per second; zero disables auto-rotation.
    #[serde(default)]
    pub auto_rotate_speed: f32,
    #[serde(default = "default_true")]
    pub enable_zoom: bool,
    #[serde(default = "default_true")]
    pub debug: bool,
    #[serde(default)]
    pub class_name: Option<String>,
    #[serde(default = "default_max_texture_width")]
    pub max_texture_width: u32,
    #[serde(default)]
    pub fetch_errors: FetchErrorPolicy,
    /// Base for resolving relative `src`; the document base URI when absent.
    #[serde(default)]
    pub asset_base: Option<String>,
}

impl ViewerProps {
    pub fn new(src: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            initial_yaw: 0.0,
            hotspots: Vec::new(),
            pins: Vec::new(),
            auto_rotate_speed: 0.0,
            enable_zoom: true,
            debug: true,
            class_name: None,
            max_texture_width: DEFAULT_MAX_TEXTURE_WIDTH,
            fetch_errors: FetchErrorPolicy::Mask,
            asset_base: None,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_max_texture_width() -> u32 {
    DEFAULT_MAX_TEXTURE_WIDTH
}
