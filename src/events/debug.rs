use crate::core::debug::MarkerDraft;
use crate::dom;
use crate::session::SessionState;
use gloo_events::EventListener;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use web_sys as web;

/// Alt-click anywhere in the viewer logs a marker draft for the clicked
/// direction.
pub(crate) fn wire_debug_capture(
    state: &Rc<RefCell<SessionState>>,
    root: &web::HtmlElement,
) -> EventListener {
    let state = Rc::downgrade(state);
    let target = root.clone();
    EventListener::new(root, "click", move |event| {
        let Some(ev) = event.dyn_ref::<web::MouseEvent>() else {
            return;
        };
        if !ev.alt_key() {
            return;
        }
        let Some(state) = state.upgrade() else {
            return;
        };
        let s = state.borrow();
        let Some(view) = s.view.as_ref() else {
            return;
        };
        let (x, y) = dom::pointer_offset(ev, &target);
        match view.pick(x, y) {
            Some(at) => {
                let draft = MarkerDraft::new(at, dom::now_ms());
                log::info!(
                    "[debug] yaw {:.1} pitch {:.1}\n{}",
                    draft.yaw,
                    draft.pitch,
                    draft.to_json()
                );
            }
            None => log::warn!("[debug] no direction under ({:.0}, {:.0})", x, y),
        }
    })
}
