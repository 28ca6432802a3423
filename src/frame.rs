use crate::core::markers::MarkerIntent;
use crate::session::{SessionState, ViewerError};
use gloo_render::{request_animation_frame, AnimationFrame};
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use wasm_bindgen_futures::spawn_local;

/// Start the render loop. The pending frame handle lives in the session
/// state; dropping it cancels the loop.
pub(crate) fn start(state: &Rc<RefCell<SessionState>>) {
    let handle = schedule(Rc::downgrade(state));
    state.borrow_mut().frame = Some(handle);
}

fn schedule(weak: Weak<RefCell<SessionState>>) -> AnimationFrame {
    request_animation_frame(move |_timestamp| {
        let Some(state) = weak.upgrade() else {
            return;
        };
        let keep_running = tick(&state);
        let mut s = state.borrow_mut();
        s.frame = if keep_running && s.liveness.is_alive() {
            Some(schedule(weak))
        } else {
            None
        };
    })
}

/// One frame: advance, render, place markers, then dispatch marker intents.
fn tick(state: &Rc<RefCell<SessionState>>) -> bool {
    let mut navigate = Vec::new();
    {
        let mut guard = state.borrow_mut();
        let s = &mut *guard;
        if let Some(next) = s.phase.on_frame(&s.context_lost) {
            log::error!("[frame] {}", ViewerError::ContextLost);
            s.advance(next);
            return false;
        }
        let dt = s.clock.tick();
        let (Some(gpu), Some(renderer), Some(scene), Some(view)) = (
            s.gpu.as_ref(),
            s.renderer.as_mut(),
            s.scene.as_ref(),
            s.view.as_mut(),
        ) else {
            return false;
        };

        view.step(dt);
        let view_proj = view.view_projection();
        match renderer.render(&gpu.surface, &scene.sphere, view_proj, view.model_matrix()) {
            Ok(()) => {
                // Markers are only positioned once a frame has been drawn.
                if let Some(layer) = s.layer.as_mut() {
                    s.markers
                        .reproject(view_proj, view.sphere_yaw_rad, view.viewport, layer);
                }
            }
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::warn!("[frame] surface lost or outdated; reconfiguring");
                renderer.reconfigure(&gpu.surface);
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("[frame] out of GPU memory");
                s.context_lost.raise();
            }
            Err(e) => log::warn!("[frame] skipped frame: {:?}", e),
        }

        for intent in s.intents.drain() {
            match intent {
                MarkerIntent::Navigate { target } => navigate.push(target),
                card => {
                    if let Some(layer) = s.layer.as_mut() {
                        layer.apply_card(&card);
                    }
                }
            }
        }
        if !navigate.is_empty() && s.navigator.is_none() {
            log::warn!("[frame] hotspot clicked but no navigation handler is set");
            navigate.clear();
        }
    }

    // Navigation may dispose this session, so it never runs inside the frame.
    if let Some(navigator) = state.borrow().navigator.clone() {
        for target in navigate {
            let navigator = navigator.clone();
            spawn_local(async move { navigator(target) });
        }
    }
    true
}
