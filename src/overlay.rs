use crate::core::constants::{
    HOTSPOT_DEFAULT_LABEL, MSG_LOADING, PIN_DEFAULT_LABEL, Z_MARKERS, Z_STATUS,
};
use crate::core::lifecycle::DisplayState;
use crate::core::markers::{
    CardStates, IntentQueue, MarkerId, MarkerIntent, MarkerKind, MarkerSet, MarkerSink, Pin,
};
use crate::core::projection::ScreenPlacement;
use crate::dom::{self, js_err, set_style};
use gloo_events::EventListener;
use web_sys as web;

const HOTSPOT_STYLE: &str = "position:absolute;left:0;top:0;display:none;padding:4px 10px;\
border-radius:999px;background:rgba(10,14,24,0.75);color:#fff;font:13px system-ui;\
white-space:nowrap;border:1px solid rgba(255,255,255,0.35);user-select:none;";
const PIN_STYLE: &str = "position:absolute;left:0;top:0;display:none;pointer-events:auto;";
const PIN_BUTTON_STYLE: &str = "width:28px;height:28px;border-radius:50%;border:2px solid #fff;\
background:#2b6cb0;color:#fff;font:bold 13px system-ui;cursor:pointer;";
const CARD_STYLE: &str = "display:none;position:absolute;left:50%;bottom:36px;transform:translateX(-50%);\
width:240px;padding:10px;border-radius:8px;background:rgba(10,14,24,0.92);color:#e8eef8;\
font:13px system-ui;box-shadow:0 6px 24px rgba(0,0,0,0.4);";

struct PinNodes {
    wrapper: web::HtmlElement,
    card: web::HtmlElement,
}

/// DOM markers for one viewer session.
///
/// The layer is a click-through overlay over the canvas; only interactive
/// markers accept pointer events. Markers start hidden and are shown by the
/// first `place` call after a frame has rendered.
pub struct MarkerLayer {
    root: web::HtmlElement,
    hotspots: Vec<web::HtmlElement>,
    pins: Vec<PinNodes>,
    cards: CardStates,
    _listeners: Vec<EventListener>,
}

impl MarkerLayer {
    pub fn build(
        document: &web::Document,
        container: &web::HtmlElement,
        markers: &MarkerSet,
        intents: &IntentQueue,
    ) -> anyhow::Result<Self> {
        let root = dom::create_element(document, "div", "pano-markers")?;
        root.set_attribute(
            "style",
            &format!(
                "position:absolute;inset:0;overflow:hidden;pointer-events:none;z-index:{};",
                Z_MARKERS
            ),
        )
        .map_err(js_err)?;
        let mut listeners = Vec::new();

        let mut hotspots = Vec::with_capacity(markers.hotspots.len());
        for (i, h) in markers.hotspots.iter().enumerate() {
            let el = dom::create_element(document, "div", "pano-hotspot")?;
            el.set_attribute("style", HOTSPOT_STYLE).map_err(js_err)?;
            el.set_text_content(Some(h.label.as_deref().unwrap_or(HOTSPOT_DEFAULT_LABEL)));
            if let Some(intent) = markers.hotspot_click(i) {
                set_style(&el, "pointer-events", "auto");
                set_style(&el, "cursor", "pointer");
                let q = intents.clone();
                listeners.push(EventListener::new(&el, "click", move |_| {
                    q.push(intent.clone());
                }));
            }
            root.append_child(&el).map_err(js_err)?;
            hotspots.push(el);
        }

        let mut pins = Vec::with_capacity(markers.pins.len());
        for (i, pin) in markers.pins.iter().enumerate() {
            let nodes = build_pin(document, pin)?;
            wire_pin(&nodes, i, intents, &mut listeners);
            root.append_child(&nodes.wrapper).map_err(js_err)?;
            pins.push(nodes);
        }

        container.append_child(&root).map_err(js_err)?;
        Ok(Self {
            root,
            hotspots,
            pins,
            cards: CardStates::new(markers.pins.len()),
            _listeners: listeners,
        })
    }

    /// Apply a card intent and reflect it in the DOM.
    pub fn apply_card(&mut self, intent: &MarkerIntent) {
        if let Some((pin, open)) = self.cards.apply(intent) {
            if let Some(nodes) = self.pins.get(pin) {
                set_style(&nodes.card, "display", if open { "block" } else { "none" });
                _ = nodes.wrapper.class_list().toggle_with_force("open", open);
            }
        }
    }

    /// Detach every marker node and drop their listeners.
    pub fn remove(self) {
        self.root.remove();
    }
}

impl MarkerSink for MarkerLayer {
    fn place(&mut self, id: MarkerId, placement: ScreenPlacement) {
        let el = match id.kind {
            MarkerKind::Hotspot => self.hotspots.get(id.index),
            MarkerKind::Pin => self.pins.get(id.index).map(|p| &p.wrapper),
        };
        let Some(el) = el else {
            return;
        };
        if placement.visible {
            set_style(el, "display", "block");
            set_style(
                el,
                "transform",
                &format!(
                    "translate({:.1}px, {:.1}px) translate(-50%, -50%)",
                    placement.x, placement.y
                ),
            );
        } else {
            set_style(el, "display", "none");
        }
    }
}

fn build_pin(document: &web::Document, pin: &Pin) -> anyhow::Result<PinNodes> {
    let wrapper = dom::create_element(document, "div", "pano-pin")?;
    wrapper.set_attribute("style", PIN_STYLE).map_err(js_err)?;

    let button = dom::create_element(document, "button", "pano-pin__marker")?;
    button.set_attribute("style", PIN_BUTTON_STYLE).map_err(js_err)?;
    button.set_attribute("type", "button").map_err(js_err)?;
    button.set_attribute("aria-label", &pin.title).map_err(js_err)?;
    button.set_text_content(Some(pin.label.as_deref().unwrap_or(PIN_DEFAULT_LABEL)));
    if let Some(color) = &pin.color {
        set_style(&button, "background", color);
    }
    wrapper.append_child(&button).map_err(js_err)?;

    let card = dom::create_element(document, "div", "pano-pin__card")?;
    card.set_attribute("style", CARD_STYLE).map_err(js_err)?;
    if let Some(src) = &pin.image {
        let img = document.create_element("img").map_err(js_err)?;
        img.set_attribute("src", src).map_err(js_err)?;
        img.set_attribute("alt", &pin.title).map_err(js_err)?;
        img.set_attribute("loading", "lazy").map_err(js_err)?;
        img.set_attribute("style", "width:100%;border-radius:6px;margin-bottom:6px;")
            .map_err(js_err)?;
        card.append_child(&img).map_err(js_err)?;
    }
    append_text(document, &card, "h3", "pano-pin__title", Some(&pin.title))?;
    append_text(document, &card, "span", "pano-pin__badge", pin.badge.as_deref())?;
    append_text(document, &card, "p", "pano-pin__description", pin.description.as_deref())?;
    append_text(document, &card, "div", "pano-pin__distance", pin.distance.as_deref())?;
    if !pin.links.is_empty() {
        let links = dom::create_element(document, "div", "pano-pin__links")?;
        for link in &pin.links {
            let a = document.create_element("a").map_err(js_err)?;
            a.set_attribute("href", &link.href).map_err(js_err)?;
            a.set_attribute("target", "_blank").map_err(js_err)?;
            a.set_attribute("rel", "noopener noreferrer").map_err(js_err)?;
            a.set_attribute("style", "color:#8cc4ff;margin-right:10px;")
                .map_err(js_err)?;
            a.set_text_content(Some(&link.text));
            links.append_child(&a).map_err(js_err)?;
        }
        card.append_child(&links).map_err(js_err)?;
    }
    wrapper.append_child(&card).map_err(js_err)?;
    Ok(PinNodes { wrapper, card })
}

fn append_text(
    document: &web::Document,
    parent: &web::HtmlElement,
    tag: &str,
    class: &str,
    text: Option<&str>,
) -> anyhow::Result<()> {
    let Some(text) = text else {
        return Ok(());
    };
    let el = dom::create_element(document, tag, class)?;
    el.set_text_content(Some(text));
    parent.append_child(&el).map_err(js_err)?;
    Ok(())
}

// Hover opens, leaving the whole pin closes, click toggles for touch.
fn wire_pin(nodes: &PinNodes, pin: usize, intents: &IntentQueue, listeners: &mut Vec<EventListener>) {
    let button = nodes.wrapper.first_element_child();
    let Some(button) = button else {
        return;
    };
    let q = intents.clone();
    listeners.push(EventListener::new(&button, "pointerenter", move |_| {
        q.push(MarkerIntent::OpenCard(pin));
    }));
    let q = intents.clone();
    listeners.push(EventListener::new(&nodes.wrapper, "pointerleave", move |_| {
        q.push(MarkerIntent::CloseCard(pin));
    }));
    let q = intents.clone();
    listeners.push(EventListener::new(&button, "click", move |event| {
        event.stop_propagation();
        q.push(MarkerIntent::ToggleCard(pin));
    }));
}

/// Loading / error banner shown over the viewer.
pub struct StatusOverlay {
    el: web::HtmlElement,
}

impl StatusOverlay {
    pub fn build(document: &web::Document, container: &web::HtmlElement) -> anyhow::Result<Self> {
        let el = dom::create_element(document, "div", "pano-status")?;
        el.set_attribute(
            "style",
            &format!(
                "position:absolute;inset:0;display:flex;align-items:center;justify-content:center;\
text-align:center;padding:24px;color:#cfe7ff;font:14px system-ui;pointer-events:none;z-index:{};",
                Z_STATUS
            ),
        )
        .map_err(js_err)?;
        container.append_child(&el).map_err(js_err)?;
        let overlay = Self { el };
        overlay.show(&DisplayState::Loading);
        Ok(overlay)
    }

    pub fn show(&self, state: &DisplayState) {
        match state {
            DisplayState::Loading => {
                self.el.set_text_content(Some(MSG_LOADING));
                _ = self.el.set_attribute("data-state", "loading");
                set_style(&self.el, "display", "flex");
            }
            DisplayState::Ready => {
                _ = self.el.set_attribute("data-state", "ready");
                set_style(&self.el, "display", "none");
            }
            DisplayState::Disposed => {
                _ = self.el.set_attribute("data-state", "disposed");
                set_style(&self.el, "display", "none");
            }
            DisplayState::Error(msg) => {
                self.el.set_text_content(Some(msg));
                _ = self.el.set_attribute("data-state", "error");
                set_style(&self.el, "display", "flex");
            }
        }
    }

    pub fn remove(self) {
        self.el.remove();
    }
}
