// Host-side tests for session phases and the teardown stack.

#![allow(dead_code)]
mod pano {
    pub mod constants {
        include!("../src/core/constants.rs");
    }
    pub mod lifecycle {
        include!("../src/core/lifecycle.rs");
    }
}

use instant::{Duration, Instant};
use pano::constants::*;
use pano::lifecycle::*;
use std::cell::RefCell;
use std::rc::Rc;

type Log = Rc<RefCell<Vec<&'static str>>>;

fn recorder(log: &Log, name: &'static str) -> impl FnOnce() + 'static {
    let log = log.clone();
    move || log.borrow_mut().push(name)
}

/// Registers disposers the way a session does as it gets further through
/// initialisation.
fn partial_session(log: &Log, reached: usize) -> Teardown {
    let mut t = Teardown::new();
    let steps: [(TeardownStage, &'static str); 6] = [
        (TeardownStage::DetachSurface, "surface"),
        (TeardownStage::ReleaseContext, "context"),
        (TeardownStage::DisposeRenderer, "renderer"),
        (TeardownStage::RemoveMarkers, "markers"),
        (TeardownStage::DisposeScene, "scene"),
        (TeardownStage::CancelFrame, "frame"),
    ];
    for (stage, name) in steps.into_iter().take(reached) {
        t.register(stage, name, recorder(log, name));
    }
    t
}

#[test]
fn teardown_runs_in_stage_order() {
    let log: Log = Rc::default();
    let mut t = partial_session(&log, 6);
    assert_eq!(release_all(t.drain()), 6);
    assert_eq!(
        *log.borrow(),
        vec!["frame", "markers", "context", "surface", "scene", "renderer"]
    );
}

#[test]
fn teardown_runs_each_disposer_exactly_once() {
    let log: Log = Rc::default();
    let mut t = partial_session(&log, 6);
    release_all(t.drain());
    assert_eq!(release_all(t.drain()), 0);
    assert_eq!(log.borrow().len(), 6);
    assert!(t.is_done());
}

#[test]
fn partial_sessions_release_only_what_was_allocated() {
    for reached in 0..=6 {
        let log: Log = Rc::default();
        let mut t = partial_session(&log, reached);
        assert!(log.borrow().is_empty());
        assert_eq!(release_all(t.drain()), reached);
        assert_eq!(log.borrow().len(), reached, "reached {}", reached);
    }
}

#[test]
fn late_registration_runs_immediately() {
    let log: Log = Rc::default();
    let mut t = partial_session(&log, 2);
    release_all(t.drain());
    // A texture that finished loading after dispose.
    t.register(TeardownStage::DisposeScene, "late texture", recorder(&log, "late texture"));
    assert_eq!(log.borrow().last(), Some(&"late texture"));
    assert!(t.drain().is_empty());
}

#[test]
fn later_registrations_run_first_within_a_stage() {
    let log: Log = Rc::default();
    let mut t = Teardown::new();
    t.register(TeardownStage::DetachSurface, "root", recorder(&log, "root"));
    t.register(TeardownStage::DetachSurface, "canvas", recorder(&log, "canvas"));
    release_all(t.drain());
    assert_eq!(*log.borrow(), vec!["canvas", "root"]);
}

#[test]
fn drained_steps_can_run_after_release() {
    let log: Log = Rc::default();
    let shared = Rc::new(RefCell::new(partial_session(&log, 3)));
    let stack = Rc::downgrade(&shared);
    shared
        .borrow_mut()
        .register(TeardownStage::CancelFrame, "borrow check", move || {
            let stack = stack.upgrade().map(|s| s.try_borrow_mut().is_ok());
            assert_eq!(stack, Some(true));
        });
    let steps = shared.borrow_mut().drain();
    // The stack is no longer borrowed while disposers run.
    assert_eq!(release_all(steps), 4);
    assert_eq!(*log.borrow(), vec!["context", "surface", "renderer"]);
}

#[test]
fn scene_switch_never_overlaps_sessions() {
    let live = Rc::new(RefCell::new(0i32));
    let peak = Rc::new(RefCell::new(0i32));
    let mut current: Option<Teardown> = None;
    for _ in 0..5 {
        if let Some(mut old) = current.take() {
            release_all(old.drain());
        }
        *live.borrow_mut() += 1;
        let m = *live.borrow();
        let p = *peak.borrow();
        *peak.borrow_mut() = p.max(m);
        let mut t = Teardown::new();
        let l = live.clone();
        t.register(TeardownStage::DisposeRenderer, "renderer", move || *l.borrow_mut() -= 1);
        current = Some(t);
    }
    assert_eq!(*peak.borrow(), 1);
    assert_eq!(*live.borrow(), 1);
}

#[test]
fn phases_follow_the_state_machine() {
    use ViewerPhase::*;
    assert!(Uninitialized.can_advance_to(&ContextReady));
    assert!(Uninitialized.can_advance_to(&ContextFailed));
    assert!(ContextReady.can_advance_to(&Running));
    assert!(ContextReady.can_advance_to(&LoadFailed("404".into())));
    assert!(Running.can_advance_to(&ContextLost));
    assert!(!Uninitialized.can_advance_to(&Running));
    assert!(!ContextFailed.can_advance_to(&Running));
    assert!(!LoadFailed("x".into()).can_advance_to(&Running));
    for phase in [Uninitialized, ContextFailed, ContextReady, Running, ContextLost] {
        assert!(phase.can_advance_to(&Disposed));
    }
    assert!(!Disposed.can_advance_to(&Disposed));
    assert!(!Disposed.can_advance_to(&Running));
}

#[test]
fn phases_map_to_display_states() {
    assert_eq!(ViewerPhase::Uninitialized.display(), DisplayState::Loading);
    assert_eq!(ViewerPhase::ContextReady.display(), DisplayState::Loading);
    assert_eq!(ViewerPhase::Running.display(), DisplayState::Ready);
    assert_eq!(
        ViewerPhase::ContextFailed.display(),
        DisplayState::Error(MSG_GPU_UNAVAILABLE.to_string())
    );
    assert_eq!(
        ViewerPhase::LoadFailed("HTTP 404 Not Found".into()).display(),
        DisplayState::Error("HTTP 404 Not Found".to_string())
    );
    assert_eq!(
        ViewerPhase::ContextLost.display(),
        DisplayState::Error(MSG_CONTEXT_LOST.to_string())
    );
    // A torn-down viewer never reports itself as ready.
    assert_eq!(ViewerPhase::Disposed.display(), DisplayState::Disposed);
}

#[test]
fn liveness_is_shared_between_clones() {
    let a = Liveness::new();
    let b = a.clone();
    assert!(b.is_alive());
    a.kill();
    assert!(!b.is_alive());
}

#[test]
fn frame_clock_reports_deltas() {
    let mut clock = FrameClock::new();
    let t0 = Instant::now();
    assert_eq!(clock.tick_at(t0), 0.0);
    let dt = clock.tick_at(t0 + Duration::from_millis(16));
    assert!((dt - 0.016).abs() < 1e-6);
    // Time never runs backwards.
    assert_eq!(clock.tick_at(t0), 0.0);
}

#[test]
fn context_loss_during_load_is_seen_by_the_first_frame() {
    let lost = ContextLossFlag::new();
    let listener = lost.clone();
    let mut phase = ViewerPhase::ContextReady;
    // The texture is still downloading when the context goes away.
    listener.raise();
    assert_eq!(phase.on_frame(&lost), None);
    assert!(phase.can_advance_to(&ViewerPhase::Running));
    phase = ViewerPhase::Running;
    assert_eq!(phase.on_frame(&lost), Some(ViewerPhase::ContextLost));
    assert_eq!(
        ViewerPhase::ContextLost.display(),
        DisplayState::Error(MSG_CONTEXT_LOST.to_string())
    );
}

#[test]
fn frames_keep_running_while_the_context_is_intact() {
    let lost = ContextLossFlag::new();
    assert!(!lost.is_raised());
    assert_eq!(ViewerPhase::Running.on_frame(&lost), None);
    lost.raise();
    assert_eq!(ViewerPhase::Disposed.on_frame(&lost), None);
}
