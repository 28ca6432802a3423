use crate::core::lifecycle::ContextLossFlag;
use crate::session::SessionState;
use gloo_events::{EventListener, EventListenerOptions};
use std::cell::RefCell;
use std::rc::Rc;

/// Resize the surface and camera with the window. No debouncing.
pub(crate) fn wire_resize(state: &Rc<RefCell<SessionState>>) -> Option<EventListener> {
    let window = web_sys::window()?;
    let state = Rc::downgrade(state);
    Some(EventListener::new(&window, "resize", move |_| {
        if let Some(state) = state.upgrade() {
            state.borrow_mut().resize();
        }
    }))
}

/// Swallow the browser's default handling of a lost WebGL context and raise
/// `lost`; the frame loop moves the session to the context-lost phase.
pub(crate) fn wire_context_loss(lost: ContextLossFlag, canvas: &web_sys::HtmlCanvasElement) -> EventListener {
    EventListener::new_with_options(
        canvas,
        "webglcontextlost",
        EventListenerOptions::enable_prevent_default(),
        move |event| {
            event.prevent_default();
            log::error!("[gpu] webgl context lost");
            lost.raise();
        },
    )
}
