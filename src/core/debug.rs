// Alt-click capture of marker coordinates for authoring tours.

use serde::Serialize;

use super::markers::PinLink;
use super::projection::YawPitch;

/// Ready-to-paste pin/hotspot skeleton printed to the console.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MarkerDraft {
    pub id: String,
    pub yaw: f32,
    pub pitch: f32,
    pub title: String,
    pub description: String,
    pub image: String,
    pub distance: String,
    pub label: String,
    pub badge: String,
    pub links: Vec<PinLink>,
}

impl MarkerDraft {
    /// Draft at `at`, with angles rounded to one decimal place.
    pub fn new(at: YawPitch, now_ms: f64) -> Self {
        Self {
            id: format!("pin-{}", now_ms.max(0.0) as u64),
            yaw: round1(at.yaw),
            pitch: round1(at.pitch),
            title: "New point".to_string(),
            description: "Describe this spot.".to_string(),
            image: "/images/placeholder.jpg".to_string(),
            distance: "~0 m".to_string(),
            label: "•".to_string(),
            badge: "Info".to_string(),
            links: vec![PinLink {
                href: "https://example.com".to_string(),
                text: "More".to_string(),
            }],
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}

fn round1(v: f32) -> f32 {
    (v * 10.0).round() / 10.0
}
