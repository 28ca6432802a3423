#![cfg(target_arch = "wasm32")]
use crate::core::config::ViewerProps;
use crate::core::lifecycle::DisplayState;
use crate::core::tour::{Tour, TourConfig};
use crate::overlay::StatusOverlay;
use crate::session::{Navigator, Session, ViewerError};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use web_sys as web;

mod core;
mod dom;
mod events;
mod frame;
mod gpu;
mod loader;
mod overlay;
mod render;
mod scene;
mod session;

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("panorama-web starting");
    Ok(())
}

fn to_js(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn status_label(state: &DisplayState) -> &'static str {
    match state {
        DisplayState::Loading => "loading",
        DisplayState::Ready => "ready",
        DisplayState::Error(_) => "error",
        DisplayState::Disposed => "disposed",
    }
}

fn status_message(state: DisplayState) -> Option<String> {
    match state {
        DisplayState::Error(msg) => Some(msg),
        _ => None,
    }
}

/// A single panorama mounted into a host element.
#[wasm_bindgen]
pub struct PanoramaViewer {
    session: Session,
}

#[wasm_bindgen]
impl PanoramaViewer {
    /// `props` is a plain object (`src`, `initialYaw`, `hotspots`, `pins`,
    /// ...). `on_navigate` receives the target id of a clicked hotspot.
    #[wasm_bindgen(constructor)]
    pub fn new(
        container: web::HtmlElement,
        props: JsValue,
        on_navigate: Option<js_sys::Function>,
    ) -> Result<PanoramaViewer, JsValue> {
        let props: ViewerProps = dom::from_js(&props).map_err(|e| to_js(format!("invalid props: {:#}", e)))?;
        let navigator = on_navigate.map(|f| -> Navigator {
            Rc::new(move |target: String| {
                if let Err(e) = f.call1(&JsValue::NULL, &JsValue::from_str(&target)) {
                    log::error!("[session] navigate handler threw: {}", dom::js_message(&e));
                }
            })
        });
        let session = Session::mount(&container, props, navigator).map_err(to_js)?;
        Ok(Self { session })
    }

    /// `"loading"`, `"ready"`, `"error"`, or `"disposed"` after `dispose()`.
    #[wasm_bindgen(getter)]
    pub fn status(&self) -> String {
        status_label(&self.session.display()).to_string()
    }

    #[wasm_bindgen(getter, js_name = errorMessage)]
    pub fn error_message(&self) -> Option<String> {
        status_message(self.session.display())
    }

    pub fn dispose(&self) {
        self.session.dispose();
    }
}

struct TourHost {
    container: web::HtmlElement,
    tour: RefCell<Tour>,
    session: RefCell<Option<Session>>,
    error: RefCell<Option<(StatusOverlay, String)>>,
    on_scene_change: Option<js_sys::Function>,
}

impl TourHost {
    /// Replace the mounted session with one for the current scene. The old
    /// session is fully disposed first.
    fn mount(self: &Rc<Self>) {
        let old = self.session.borrow_mut().take();
        if let Some(old) = old {
            old.dispose();
        }
        let stale = self.error.borrow_mut().take();
        if let Some((overlay, _)) = stale {
            overlay.remove();
        }

        let props = self.tour.borrow().viewer_props();
        let result = props
            .map_err(ViewerError::from)
            .and_then(|props| Session::mount(&self.container, props, Some(self.navigator())));
        match result {
            Ok(session) => *self.session.borrow_mut() = Some(session),
            Err(e) => {
                log::error!("[tour] cannot show scene: {}", e);
                self.show_error(e.to_string());
            }
        }
        self.notify_scene_change();
    }

    fn navigator(self: &Rc<Self>) -> Navigator {
        let host = Rc::downgrade(self);
        Rc::new(move |target: String| {
            if let Some(host) = host.upgrade() {
                host.go_to(&target);
            }
        })
    }

    fn go_to(self: &Rc<Self>, id: &str) {
        let changed = self.tour.borrow_mut().select(id);
        if changed {
            log::info!("[tour] scene -> {}", id);
            self.mount();
        }
    }

    fn step(self: &Rc<Self>, forward: bool) {
        let changed = {
            let mut tour = self.tour.borrow_mut();
            if forward {
                tour.next()
            } else {
                tour.prev()
            }
        };
        if changed {
            log::info!("[tour] scene -> {}", self.tour.borrow().current_id());
            self.mount();
        }
    }

    fn show_error(&self, message: String) {
        let Some(document) = dom::window_document() else {
            return;
        };
        match StatusOverlay::build(&document, &self.container) {
            Ok(overlay) => {
                overlay.show(&DisplayState::Error(message.clone()));
                *self.error.borrow_mut() = Some((overlay, message));
            }
            Err(e) => log::error!("[tour] cannot show error overlay: {:#}", e),
        }
    }

    fn notify_scene_change(&self) {
        let Some(f) = &self.on_scene_change else {
            return;
        };
        let id = self.tour.borrow().current_id().to_string();
        if let Err(e) = f.call1(&JsValue::NULL, &JsValue::from_str(&id)) {
            log::error!("[tour] scene change handler threw: {}", dom::js_message(&e));
        }
    }

    fn display(&self) -> DisplayState {
        if let Some((_, message)) = self.error.borrow().as_ref() {
            return DisplayState::Error(message.clone());
        }
        self.session
            .borrow()
            .as_ref()
            .map(Session::display)
            .unwrap_or(DisplayState::Loading)
    }

    fn dispose(&self) {
        let old = self.session.borrow_mut().take();
        if let Some(old) = old {
            old.dispose();
        }
        let stale = self.error.borrow_mut().take();
        if let Some((overlay, _)) = stale {
            overlay.remove();
        }
    }
}

/// An ordered set of panoramas linked by hotspots, one mounted at a time.
#[wasm_bindgen]
pub struct PanoramaTour {
    host: Rc<TourHost>,
}

#[wasm_bindgen]
impl PanoramaTour {
    /// `config` is `{ scenes, startSceneId, autoRotateSpeed?, enableZoom?,
    /// debug? }`. `on_scene_change` receives the new scene id after every
    /// switch, including the first mount.
    #[wasm_bindgen(constructor)]
    pub fn new(
        container: web::HtmlElement,
        config: JsValue,
        on_scene_change: Option<js_sys::Function>,
    ) -> Result<PanoramaTour, JsValue> {
        let config: TourConfig =
            dom::from_js(&config).map_err(|e| to_js(format!("invalid tour config: {:#}", e)))?;
        log::info!(
            "[tour] {} scenes, starting at {}",
            config.scenes.len(),
            config.start_scene_id
        );
        let host = Rc::new(TourHost {
            container,
            tour: RefCell::new(Tour::new(config)),
            session: RefCell::new(None),
            error: RefCell::new(None),
            on_scene_change,
        });
        host.mount();
        Ok(Self { host })
    }

    pub fn next(&self) {
        self.host.step(true);
    }

    pub fn prev(&self) {
        self.host.step(false);
    }

    #[wasm_bindgen(js_name = goTo)]
    pub fn go_to(&self, id: &str) {
        self.host.go_to(id);
    }

    #[wasm_bindgen(getter, js_name = currentSceneId)]
    pub fn current_scene_id(&self) -> String {
        self.host.tour.borrow().current_id().to_string()
    }

    /// Scene ids in tour order, for building navigation chips.
    #[wasm_bindgen(js_name = sceneIds)]
    pub fn scene_ids(&self) -> js_sys::Array {
        self.host
            .tour
            .borrow()
            .scenes()
            .iter()
            .map(|s| JsValue::from_str(&s.id))
            .collect()
    }

    #[wasm_bindgen(getter)]
    pub fn status(&self) -> String {
        status_label(&self.host.display()).to_string()
    }

    #[wasm_bindgen(getter, js_name = errorMessage)]
    pub fn error_message(&self) -> Option<String> {
        status_message(self.host.display())
    }

    pub fn dispose(&self) {
        self.host.dispose();
    }
}
