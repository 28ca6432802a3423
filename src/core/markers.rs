// Screen-space markers: navigable hotspots and informational pins.
//
// Markers are plain data. Every frame `MarkerSet::reproject` turns each
// marker's direction into a `ScreenPlacement` and hands it to a
// `MarkerSink`; the DOM layer is one such sink. Pointer interaction is
// reported as `MarkerIntent`s on an `IntentQueue` instead of callbacks.

use glam::Mat4;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use super::projection::{marker_anchor, project_to_screen, ScreenPlacement, Viewport, YawPitch};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hotspot {
    pub yaw: f32,
    pub pitch: f32,
    #[serde(default)]
    pub label: Option<String>,
    /// Scene to navigate to when clicked. Without one the marker is inert.
    #[serde(default)]
    pub target: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PinLink {
    pub href: String,
    pub text: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pin {
    #[serde(default)]
    pub id: Option<String>,
    pub yaw: f32,
    pub pitch: f32,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub distance: Option<String>,
    #[serde(default)]
    pub badge: Option<String>,
    #[serde(default)]
    pub links: Vec<PinLink>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub label: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MarkerKind {
    Hotspot,
    Pin,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MarkerId {
    pub kind: MarkerKind,
    pub index: usize,
}

impl MarkerId {
    pub fn hotspot(index: usize) -> Self {
        Self {
            kind: MarkerKind::Hotspot,
            index,
        }
    }

    pub fn pin(index: usize) -> Self {
        Self {
            kind: MarkerKind::Pin,
            index,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MarkerIntent {
    Navigate { target: String },
    OpenCard(usize),
    CloseCard(usize),
    ToggleCard(usize),
}

/// Receives one placement per marker per frame.
pub trait MarkerSink {
    fn place(&mut self, id: MarkerId, placement: ScreenPlacement);
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct MarkerSet {
    pub hotspots: Vec<Hotspot>,
    pub pins: Vec<Pin>,
}

impl MarkerSet {
    pub fn new(hotspots: Vec<Hotspot>, pins: Vec<Pin>) -> Self {
        Self { hotspots, pins }
    }

    pub fn len(&self) -> usize {
        self.hotspots.len() + self.pins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn directions(&self) -> impl Iterator<Item = (MarkerId, YawPitch)> + '_ {
        let hs = self
            .hotspots
            .iter()
            .enumerate()
            .map(|(i, h)| (MarkerId::hotspot(i), YawPitch::new(h.yaw, h.pitch)));
        let ps = self
            .pins
            .iter()
            .enumerate()
            .map(|(i, p)| (MarkerId::pin(i), YawPitch::new(p.yaw, p.pitch)));
        hs.chain(ps)
    }

    /// Recompute every marker placement from the current camera.
    pub fn reproject(
        &self,
        view_proj: Mat4,
        sphere_yaw_rad: f32,
        viewport: Viewport,
        sink: &mut impl MarkerSink,
    ) {
        for (id, angles) in self.directions() {
            let world = marker_anchor(angles, sphere_yaw_rad);
            sink.place(id, project_to_screen(view_proj, world, viewport));
        }
    }

    /// Intent raised by clicking a hotspot, if it navigates anywhere.
    pub fn hotspot_click(&self, index: usize) -> Option<MarkerIntent> {
        self.hotspots
            .get(index)
            .and_then(|h| h.target.clone())
            .map(|target| MarkerIntent::Navigate { target })
    }
}

/// Per-pin open/closed card state.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CardStates {
    open: Vec<bool>,
}

impl CardStates {
    pub fn new(pin_count: usize) -> Self {
        Self {
            open: vec![false; pin_count],
        }
    }

    pub fn is_open(&self, pin: usize) -> bool {
        self.open.get(pin).copied().unwrap_or(false)
    }

    /// Apply a card intent. Returns `(pin, open)` when the state changed.
    pub fn apply(&mut self, intent: &MarkerIntent) -> Option<(usize, bool)> {
        let (pin, next) = match *intent {
            MarkerIntent::OpenCard(pin) => (pin, true),
            MarkerIntent::CloseCard(pin) => (pin, false),
            MarkerIntent::ToggleCard(pin) => (pin, !self.is_open(pin)),
            MarkerIntent::Navigate { .. } => return None,
        };
        let slot = self.open.get_mut(pin)?;
        if *slot == next {
            return None;
        }
        *slot = next;
        Some((pin, next))
    }
}

/// Single-threaded intent channel shared by DOM handlers and the frame loop.
#[derive(Clone, Debug, Default)]
pub struct IntentQueue(Rc<RefCell<VecDeque<MarkerIntent>>>);

impl IntentQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, intent: MarkerIntent) {
        self.0.borrow_mut().push_back(intent);
    }

    pub fn drain(&self) -> Vec<MarkerIntent> {
        self.0.borrow_mut().drain(..).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }
}
