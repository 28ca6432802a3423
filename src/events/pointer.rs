use crate::dom;
use crate::session::SessionState;
use gloo_events::{EventListener, EventListenerOptions};
use glam::Vec2;
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use wasm_bindgen::JsCast;
use web_sys as web;

/// Pointer, pinch and wheel input on the canvas, fed into the orbit controls.
pub(crate) fn wire_controls(
    state: &Rc<RefCell<SessionState>>,
    canvas: &web::HtmlCanvasElement,
) -> Vec<EventListener> {
    vec![
        wire_pointerdown(Rc::downgrade(state), canvas),
        wire_pointermove(Rc::downgrade(state), canvas),
        wire_pointerup(Rc::downgrade(state), canvas, "pointerup"),
        wire_pointerup(Rc::downgrade(state), canvas, "pointercancel"),
        wire_wheel(Rc::downgrade(state), canvas),
    ]
}

fn wire_pointerdown(state: Weak<RefCell<SessionState>>, canvas: &web::HtmlCanvasElement) -> EventListener {
    let target = canvas.clone();
    EventListener::new_with_options(
        canvas,
        "pointerdown",
        EventListenerOptions::enable_prevent_default(),
        move |event| {
            let Some(ev) = event.dyn_ref::<web::PointerEvent>() else {
                return;
            };
            // Alt-click belongs to debug capture.
            if ev.alt_key() || (ev.pointer_type() == "mouse" && ev.button() != 0) {
                return;
            }
            let Some(state) = state.upgrade() else {
                return;
            };
            let (x, y) = dom::pointer_offset(ev, &target);
            let mut guard = state.borrow_mut();
            let s = &mut *guard;
            let Some(view) = s.view.as_mut() else {
                return;
            };
            s.pointers.down(ev.pointer_id(), Vec2::new(x, y), &mut view.controls);
            _ = target.set_pointer_capture(ev.pointer_id());
            dom::set_style(&s.root, "cursor", "grabbing");
            ev.prevent_default();
        },
    )
}

fn wire_pointermove(state: Weak<RefCell<SessionState>>, canvas: &web::HtmlCanvasElement) -> EventListener {
    let target = canvas.clone();
    EventListener::new(canvas, "pointermove", move |event| {
        let Some(ev) = event.dyn_ref::<web::PointerEvent>() else {
            return;
        };
        let Some(state) = state.upgrade() else {
            return;
        };
        let mut guard = state.borrow_mut();
        let s = &mut *guard;
        if s.pointers.is_empty() {
            return;
        }
        let Some(view) = s.view.as_mut() else {
            return;
        };
        let (x, y) = dom::pointer_offset(ev, &target);
        let height = target.client_height() as f32;
        s.pointers
            .move_to(ev.pointer_id(), Vec2::new(x, y), height, &mut view.controls);
    })
}

fn wire_pointerup(
    state: Weak<RefCell<SessionState>>,
    canvas: &web::HtmlCanvasElement,
    event_type: &'static str,
) -> EventListener {
    let target = canvas.clone();
    EventListener::new(canvas, event_type, move |event| {
        let Some(ev) = event.dyn_ref::<web::PointerEvent>() else {
            return;
        };
        let Some(state) = state.upgrade() else {
            return;
        };
        let mut guard = state.borrow_mut();
        let s = &mut *guard;
        let Some(view) = s.view.as_mut() else {
            return;
        };
        if s.pointers.up(ev.pointer_id(), &mut view.controls) {
            _ = target.release_pointer_capture(ev.pointer_id());
        }
        if s.pointers.is_empty() {
            dom::set_style(&s.root, "cursor", "grab");
        }
    })
}

fn wire_wheel(state: Weak<RefCell<SessionState>>, canvas: &web::HtmlCanvasElement) -> EventListener {
    EventListener::new_with_options(
        canvas,
        "wheel",
        EventListenerOptions::enable_prevent_default(),
        move |event| {
            let Some(ev) = event.dyn_ref::<web::WheelEvent>() else {
                return;
            };
            let Some(state) = state.upgrade() else {
                return;
            };
            let mut s = state.borrow_mut();
            // Without zoom the page keeps its normal wheel scrolling.
            if !s.props.enable_zoom {
                return;
            }
            ev.prevent_default();
            if let Some(view) = s.view.as_mut() {
                view.controls.wheel(ev.delta_y() as f32);
            }
        },
    )
}
