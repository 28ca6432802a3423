// Tour model: an ordered set of scenes and the current selection.

use fnv::FnvHashMap;
use serde::{Deserialize, Serialize};

use super::config::ViewerProps;
use super::markers::{Hotspot, Pin};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneLink {
    pub yaw: f32,
    /// Positive is downward.
    pub pitch: f32,
    pub target: String,
    #[serde(default)]
    pub label: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scene {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    pub src: String,
    #[serde(default)]
    pub yaw: Option<f32>,
    #[serde(default)]
    pub links: Vec<SceneLink>,
    #[serde(default)]
    pub pins: Vec<Pin>,
}

impl Scene {
    /// Hotspots derived from this scene's links.
    pub fn hotspots(&self) -> Vec<Hotspot> {
        self.links
            .iter()
            .map(|l| Hotspot {
                yaw: l.yaw,
                pitch: l.pitch,
                label: l.label.clone(),
                target: Some(l.target.clone()),
            })
            .collect()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TourConfig {
    pub scenes: Vec<Scene>,
    pub start_scene_id: String,
    #[serde(default)]
    pub auto_rotate_speed: Option<f32>,
    #[serde(default)]
    pub enable_zoom: Option<bool>,
    #[serde(default)]
    pub debug: Option<bool>,
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("scene \"{0}\" not found")]
pub struct SceneNotFound(pub String);

#[derive(Clone, Debug)]
pub struct Tour {
    config: TourConfig,
    index: FnvHashMap<String, usize>,
    current_id: String,
}

impl Tour {
    /// A tour whose current scene is `start_scene_id`, even if unknown;
    /// `current` reports the miss so the host can show an error state.
    pub fn new(config: TourConfig) -> Self {
        let index = config
            .scenes
            .iter()
            .enumerate()
            .map(|(i, s)| (s.id.clone(), i))
            .collect();
        let current_id = config.start_scene_id.clone();
        Self {
            config,
            index,
            current_id,
        }
    }

    pub fn scenes(&self) -> &[Scene] {
        &self.config.scenes
    }

    pub fn current_id(&self) -> &str {
        &self.current_id
    }

    pub fn current(&self) -> Result<&Scene, SceneNotFound> {
        self.position()
            .map(|i| &self.config.scenes[i])
            .ok_or_else(|| SceneNotFound(self.current_id.clone()))
    }

    fn position(&self) -> Option<usize> {
        self.index.get(&self.current_id).copied()
    }

    /// Select a scene by id. Returns true if the selection changed.
    ///
    /// Unknown ids are stored like any other; `current` then reports the
    /// miss and stepping resumes from the ends of the scene list.
    pub fn select(&mut self, id: &str) -> bool {
        if self.current_id == id {
            return false;
        }
        self.current_id = id.to_string();
        true
    }

    /// Step forward with wraparound. From an unknown scene, go to the first.
    pub fn next(&mut self) -> bool {
        self.step(1)
    }

    /// Step backward with wraparound. From an unknown scene, go to the last.
    pub fn prev(&mut self) -> bool {
        self.step(-1)
    }

    fn step(&mut self, by: isize) -> bool {
        let n = self.config.scenes.len();
        if n == 0 {
            return false;
        }
        let next = match self.position() {
            Some(i) => (i as isize + by).rem_euclid(n as isize) as usize,
            None if by > 0 => 0,
            None => n - 1,
        };
        let id = self.config.scenes[next].id.clone();
        self.select(&id)
    }

    /// Props for mounting a viewer on the current scene.
    pub fn viewer_props(&self) -> Result<ViewerProps, SceneNotFound> {
        let scene = self.current()?;
        let mut props = ViewerProps::new(scene.src.clone());
        props.initial_yaw = scene.yaw.unwrap_or(0.0);
        props.hotspots = scene.hotspots();
        props.pins = scene.pins.clone();
        if let Some(speed) = self.config.auto_rotate_speed {
            props.auto_rotate_speed = speed;
        }
        if let Some(zoom) = self.config.enable_zoom {
            props.enable_zoom = zoom;
        }
        if let Some(debug) = self.config.debug {
            props.debug = debug;
        }
        Ok(props)
    }
}
