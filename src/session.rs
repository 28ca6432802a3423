//! One mounted viewer: async initialisation, shared state, and teardown.
//!
//! Every allocation made by `initialise` is registered on the teardown stack
//! as soon as it lands in the state, so a dispose at any point releases
//! exactly what exists. Registering after the stack was drained runs the
//! disposer at once, which covers results that arrive after a dispose.

use crate::core::config::ViewerProps;
use crate::core::constants::{MSG_CONTEXT_LOST, MSG_GPU_UNAVAILABLE, Z_CANVAS};
use crate::core::gesture::PointerTracker;
use crate::core::lifecycle::{
    release_all, ContextLossFlag, DisplayState, FrameClock, Liveness, Teardown, TeardownStage,
    ViewerPhase,
};
use crate::core::markers::{IntentQueue, MarkerSet};
use crate::core::projection::Viewport;
use crate::core::raster::effective_max_width;
use crate::core::tour::SceneNotFound;
use crate::core::view::ViewState;
use crate::dom::{self, js_err, set_style};
use crate::events;
use crate::frame;
use crate::gpu::{self, ContextAttributes, GpuContext};
use crate::core::load::LoadError;
use crate::loader;
use crate::overlay::{MarkerLayer, StatusOverlay};
use crate::render::Renderer;
use crate::scene::{self, PanoramaScene};
use gloo_events::EventListener;
use gloo_render::AnimationFrame;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

/// Called with a hotspot's target scene id.
pub type Navigator = Rc<dyn Fn(String)>;

#[derive(Debug, thiserror::Error)]
pub enum ViewerError {
    #[error("{}", MSG_GPU_UNAVAILABLE)]
    GpuUnavailable,
    #[error("{}", MSG_CONTEXT_LOST)]
    ContextLost,
    #[error("Could not load the panorama: {0}")]
    AssetLoad(#[from] LoadError),
    #[error(transparent)]
    SceneNotFound(#[from] SceneNotFound),
    #[error("renderer: {0:#}")]
    Renderer(anyhow::Error),
    #[error("dom: {0:#}")]
    Dom(anyhow::Error),
    #[error("session disposed during initialisation")]
    Cancelled,
}

impl ViewerError {
    /// Phase a failed initialisation settles in.
    fn phase(&self) -> ViewerPhase {
        match self {
            ViewerError::GpuUnavailable => ViewerPhase::ContextFailed,
            ViewerError::ContextLost => ViewerPhase::ContextLost,
            other => ViewerPhase::LoadFailed(other.to_string()),
        }
    }
}

pub(crate) struct SessionState {
    pub phase: ViewerPhase,
    pub props: ViewerProps,
    pub root: web::HtmlElement,
    pub status: Option<StatusOverlay>,
    pub gpu: Option<Rc<GpuContext>>,
    pub renderer: Option<Renderer>,
    pub scene: Option<PanoramaScene>,
    pub view: Option<ViewState>,
    pub pointers: PointerTracker,
    pub markers: MarkerSet,
    pub layer: Option<MarkerLayer>,
    pub intents: IntentQueue,
    pub frame: Option<AnimationFrame>,
    pub listeners: Vec<EventListener>,
    pub control_listeners: Vec<EventListener>,
    pub clock: FrameClock,
    pub context_lost: ContextLossFlag,
    pub navigator: Option<Navigator>,
    pub liveness: Liveness,
}

impl SessionState {
    /// Move to `next` if the transition is legal, updating the status overlay.
    pub fn advance(&mut self, next: ViewerPhase) -> bool {
        if !self.phase.can_advance_to(&next) {
            log::warn!("[session] ignored transition {:?} -> {:?}", self.phase, next);
            return false;
        }
        log::info!("[session] {:?} -> {:?}", self.phase, next);
        self.phase = next;
        if let Some(status) = &self.status {
            status.show(&self.phase.display());
        }
        true
    }

    /// Re-derive canvas backing size, surface size and camera aspect from
    /// the current container size.
    pub fn resize(&mut self) {
        let (Some(gpu), Some(renderer)) = (self.gpu.as_ref(), self.renderer.as_mut()) else {
            return;
        };
        let (w, h) =
            dom::sync_canvas_backing_size(&gpu.canvas, &self.root, renderer.max_texture_dimension());
        renderer.resize(&gpu.surface, w, h);
        if let Some(view) = self.view.as_mut() {
            view.resize(css_viewport(&self.root));
        }
    }
}

fn css_viewport(root: &web::HtmlElement) -> Viewport {
    let (width, height) = dom::element_css_size(root);
    Viewport { width, height }
}

/// Handle to a mounted viewer. Dropping it disposes the session.
pub struct Session {
    state: Rc<RefCell<SessionState>>,
    teardown: Rc<RefCell<Teardown>>,
    liveness: Liveness,
}

#[derive(Clone)]
struct Shared {
    state: Rc<RefCell<SessionState>>,
    teardown: Rc<RefCell<Teardown>>,
    liveness: Liveness,
}

impl Shared {
    fn on_teardown(&self, stage: TeardownStage, label: &'static str, f: impl FnOnce() + 'static) {
        self.teardown.borrow_mut().register(stage, label, f);
    }

    fn ensure_alive(&self) -> Result<(), ViewerError> {
        if self.liveness.is_alive() {
            Ok(())
        } else {
            Err(ViewerError::Cancelled)
        }
    }
}

impl Session {
    /// Build the viewer root inside `container` and start initialisation.
    pub fn mount(
        container: &web::HtmlElement,
        props: ViewerProps,
        navigator: Option<Navigator>,
    ) -> Result<Self, ViewerError> {
        let document =
            dom::window_document().ok_or_else(|| ViewerError::Dom(anyhow::anyhow!("no document")))?;
        let class = match &props.class_name {
            Some(extra) => format!("pano-viewer {}", extra),
            None => "pano-viewer".to_string(),
        };
        let root = dom::create_element(&document, "div", &class).map_err(ViewerError::Dom)?;
        root.set_attribute(
            "style",
            "position:relative;width:100%;height:100%;overflow:hidden;background:#000;",
        )
        .map_err(|e| ViewerError::Dom(js_err(e)))?;
        container
            .append_child(&root)
            .map_err(|e| ViewerError::Dom(js_err(e)))?;
        let status = StatusOverlay::build(&document, &root).map_err(ViewerError::Dom)?;

        let liveness = Liveness::new();
        let markers = MarkerSet::new(props.hotspots.clone(), props.pins.clone());
        let state = Rc::new(RefCell::new(SessionState {
            phase: ViewerPhase::Uninitialized,
            props,
            root: root.clone(),
            status: Some(status),
            gpu: None,
            renderer: None,
            scene: None,
            view: None,
            pointers: PointerTracker::new(),
            markers,
            layer: None,
            intents: IntentQueue::new(),
            frame: None,
            listeners: Vec::new(),
            control_listeners: Vec::new(),
            clock: FrameClock::new(),
            context_lost: ContextLossFlag::new(),
            navigator,
            liveness: liveness.clone(),
        }));
        let shared = Shared {
            state: state.clone(),
            teardown: Rc::new(RefCell::new(Teardown::new())),
            liveness: liveness.clone(),
        };

        shared.on_teardown(TeardownStage::DetachSurface, "viewer root", move || root.remove());
        let st = state.clone();
        shared.on_teardown(TeardownStage::RemoveMarkers, "status overlay", move || {
            if let Some(status) = st.borrow_mut().status.take() {
                status.remove();
            }
        });

        let init = shared.clone();
        spawn_local(async move {
            match initialise(&init, &document).await {
                Ok(()) => {}
                Err(ViewerError::Cancelled) => {
                    log::info!("[session] initialisation abandoned after dispose");
                }
                Err(e) if !init.liveness.is_alive() => {
                    log::info!("[session] ignoring failure after dispose: {}", e);
                }
                Err(e) => {
                    log::error!("[session] initialisation failed: {}", e);
                    init.state.borrow_mut().advance(e.phase());
                }
            }
        });

        Ok(Self {
            state,
            teardown: shared.teardown,
            liveness,
        })
    }

    pub fn display(&self) -> DisplayState {
        self.state.borrow().phase.display()
    }

    /// Release everything the session allocated. Safe to call repeatedly.
    pub fn dispose(&self) {
        if self.teardown.borrow().is_done() {
            return;
        }
        self.liveness.kill();
        // Disposers borrow the session state, so the stack is released first.
        let steps = self.teardown.borrow_mut().drain();
        let count = release_all(steps);
        self.state.borrow_mut().advance(ViewerPhase::Disposed);
        log::info!("[session] disposed ({} resources released)", count);
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.dispose();
    }
}

async fn initialise(shared: &Shared, document: &web::Document) -> Result<(), ViewerError> {
    let ctx = gpu::acquire_context(document, ContextAttributes::default())
        .await
        .ok_or(ViewerError::GpuUnavailable)?;
    let ctx = Rc::new(ctx);
    let canvas = ctx.canvas.clone();
    shared.state.borrow_mut().gpu = Some(ctx.clone());
    if ctx.kind.is_gl() {
        let canvas = canvas.clone();
        shared.on_teardown(TeardownStage::ReleaseContext, "webgl context", move || {
            gpu::force_release_gl_context(&canvas)
        });
    }
    let st = shared.state.clone();
    shared.on_teardown(TeardownStage::DetachSurface, "canvas and surface", move || {
        if let Some(gpu) = st.borrow_mut().gpu.take() {
            gpu.canvas.remove();
        }
    });
    shared.ensure_alive()?;
    shared.state.borrow_mut().advance(ViewerPhase::ContextReady);

    let (root, lost, max_dim) = {
        let s = shared.state.borrow();
        (s.root.clone(), s.context_lost.clone(), ctx.adapter.limits().max_texture_dimension_2d)
    };
    canvas
        .set_attribute(
            "style",
            &format!(
                "position:absolute;inset:0;width:100%;height:100%;display:block;touch-action:none;z-index:{};",
                Z_CANVAS
            ),
        )
        .map_err(|e| ViewerError::Dom(js_err(e)))?;
    root.append_child(&canvas)
        .map_err(|e| ViewerError::Dom(js_err(e)))?;
    // Listen from the moment the canvas is live; a loss during the texture
    // load is then seen by the first frame.
    let loss = events::wire_context_loss(lost.clone(), &canvas);
    shared.state.borrow_mut().listeners.push(loss);
    let st = shared.state.clone();
    shared.on_teardown(TeardownStage::RemoveListeners, "dom listeners", move || {
        st.borrow_mut().listeners.clear();
    });
    let (w, h) = dom::sync_canvas_backing_size(&canvas, &root, max_dim);
    let renderer = Renderer::create(&ctx, w, h, lost)
        .await
        .map_err(ViewerError::Renderer)?;
    drop(ctx);
    shared.state.borrow_mut().renderer = Some(renderer);
    let st = shared.state.clone();
    shared.on_teardown(TeardownStage::DisposeRenderer, "renderer", move || {
        if let Some(renderer) = st.borrow_mut().renderer.take() {
            renderer.dispose();
        }
    });
    shared.ensure_alive()?;

    // Marker nodes are built while the texture downloads; they stay hidden
    // until the first frame places them.
    {
        let mut guard = shared.state.borrow_mut();
        let s = &mut *guard;
        let layer = MarkerLayer::build(document, &s.root, &s.markers, &s.intents)
            .map_err(ViewerError::Dom)?;
        s.layer = Some(layer);
    }
    let st = shared.state.clone();
    shared.on_teardown(TeardownStage::RemoveMarkers, "marker layer", move || {
        if let Some(layer) = st.borrow_mut().layer.take() {
            layer.remove();
        }
    });

    let (url, max_width, policy) = {
        let s = shared.state.borrow();
        let device_max = s
            .renderer
            .as_ref()
            .map(Renderer::max_texture_dimension)
            .unwrap_or(max_dim);
        let url = dom::resolve_url(&s.props.src, s.props.asset_base.as_deref())
            .map_err(ViewerError::Dom)?;
        (
            url,
            effective_max_width(s.props.max_texture_width, device_max),
            s.props.fetch_errors,
        )
    };
    log::info!("[texture] loading {} (max width {})", url, max_width);
    let raster = loader::load_texture(&url, max_width, policy).await?;
    shared.ensure_alive()?;

    {
        let mut guard = shared.state.borrow_mut();
        let s = &mut *guard;
        let viewport = css_viewport(&s.root);
        let renderer = s
            .renderer
            .as_ref()
            .ok_or_else(|| ViewerError::Renderer(anyhow::anyhow!("renderer released")))?;
        let (panorama, view) =
            scene::assemble(renderer, &raster, &s.props, viewport).map_err(ViewerError::Renderer)?;
        s.scene = Some(panorama);
        s.view = Some(view);
    }
    drop(raster);
    let st = shared.state.clone();
    shared.on_teardown(TeardownStage::DisposeScene, "sphere and texture", move || {
        if let Some(panorama) = st.borrow_mut().scene.take() {
            panorama.dispose();
        }
    });

    let controls = events::wire_controls(&shared.state, &canvas);
    shared.state.borrow_mut().control_listeners = controls;
    let st = shared.state.clone();
    shared.on_teardown(TeardownStage::DisposeControls, "orbit controls", move || {
        let mut s = st.borrow_mut();
        s.control_listeners.clear();
        s.pointers = PointerTracker::new();
        s.view = None;
    });

    let mut listeners = Vec::new();
    listeners.extend(events::wire_resize(&shared.state));
    if shared.state.borrow().props.debug {
        listeners.push(events::wire_debug_capture(&shared.state, &root));
    }
    shared.state.borrow_mut().listeners.extend(listeners);

    frame::start(&shared.state);
    let st = shared.state.clone();
    shared.on_teardown(TeardownStage::CancelFrame, "animation frame", move || {
        st.borrow_mut().frame = None;
    });
    shared.ensure_alive()?;

    set_style(&root, "cursor", "grab");
    shared.state.borrow_mut().advance(ViewerPhase::Running);
    Ok(())
}
