// Session lifecycle: phases, user-visible display state, and the ordered
// teardown stack that releases everything a session allocated.

use instant::Instant;
use std::cell::Cell;
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::constants::{MSG_CONTEXT_LOST, MSG_GPU_UNAVAILABLE};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ViewerPhase {
    Uninitialized,
    ContextFailed,
    ContextReady,
    LoadFailed(String),
    Running,
    ContextLost,
    Disposed,
}

/// What the host shows on top of the viewer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DisplayState {
    Loading,
    Ready,
    Error(String),
    /// The viewer was torn down and shows nothing.
    Disposed,
}

impl ViewerPhase {
    /// Whether `next` is a legal successor of `self`.
    pub fn can_advance_to(&self, next: &ViewerPhase) -> bool {
        use ViewerPhase::*;
        match (self, next) {
            (Disposed, _) => false,
            (_, Disposed) => true,
            (Uninitialized, ContextFailed | ContextReady) => true,
            (ContextReady, LoadFailed(_) | Running) => true,
            (Running, ContextLost) => true,
            _ => false,
        }
    }

    /// Phase the render loop moves to before drawing, if the context went
    /// away. A loss flagged while the panorama was still loading is picked up
    /// by the first frame.
    pub fn on_frame(&self, lost: &ContextLossFlag) -> Option<ViewerPhase> {
        (lost.is_raised() && self.can_advance_to(&ViewerPhase::ContextLost))
            .then_some(ViewerPhase::ContextLost)
    }

    pub fn display(&self) -> DisplayState {
        match self {
            ViewerPhase::Uninitialized | ViewerPhase::ContextReady => DisplayState::Loading,
            ViewerPhase::Running => DisplayState::Ready,
            ViewerPhase::Disposed => DisplayState::Disposed,
            ViewerPhase::ContextFailed => DisplayState::Error(MSG_GPU_UNAVAILABLE.to_string()),
            ViewerPhase::LoadFailed(msg) => DisplayState::Error(msg.clone()),
            ViewerPhase::ContextLost => DisplayState::Error(MSG_CONTEXT_LOST.to_string()),
        }
    }
}

/// Teardown order. Lower stages run first regardless of registration order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TeardownStage {
    CancelFrame,
    RemoveListeners,
    RemoveMarkers,
    ReleaseContext,
    DisposeControls,
    DetachSurface,
    DisposeScene,
    DisposeRenderer,
}

pub type TeardownStep = (TeardownStage, &'static str, Box<dyn FnOnce()>);

/// Disposers registered as resources are allocated.
///
/// `drain` hands out each disposer exactly once, grouped by stage and in
/// reverse registration order within a stage. Draining again yields nothing,
/// and a disposer registered after the drain executes immediately so late
/// allocations are never left behind.
#[derive(Default)]
pub struct Teardown {
    entries: Vec<TeardownStep>,
    done: bool,
}

impl Teardown {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, stage: TeardownStage, label: &'static str, f: impl FnOnce() + 'static) {
        if self.done {
            log::debug!("[session] late disposer '{}' runs immediately", label);
            f();
            return;
        }
        self.entries.push((stage, label, Box::new(f)));
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Take the disposers in execution order, marking the stack as run.
    ///
    /// Callers that hold shared state should drain first and run the
    /// disposers after releasing their borrows.
    pub fn drain(&mut self) -> Vec<TeardownStep> {
        self.done = true;
        let mut entries = std::mem::take(&mut self.entries);
        entries.reverse();
        // Stable sort keeps the reversed registration order inside a stage.
        entries.sort_by_key(|(stage, _, _)| *stage);
        entries
    }

}

/// Run drained disposers in order. Returns how many ran.
pub fn release_all(steps: Vec<TeardownStep>) -> usize {
    let count = steps.len();
    for (stage, label, release) in steps {
        log::debug!("[session] teardown {:?}: {}", stage, label);
        release();
    }
    count
}

/// Set by the `webglcontextlost` listener and the device-lost callback.
#[derive(Clone, Debug, Default)]
pub struct ContextLossFlag(Arc<AtomicBool>);

impl ContextLossFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raise(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_raised(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Shared flag gating every post-await mutation of a session.
#[derive(Clone, Debug)]
pub struct Liveness(Rc<Cell<bool>>);

impl Liveness {
    pub fn new() -> Self {
        Self(Rc::new(Cell::new(true)))
    }

    pub fn is_alive(&self) -> bool {
        self.0.get()
    }

    pub fn kill(&self) {
        self.0.set(false);
    }
}

impl Default for Liveness {
    fn default() -> Self {
        Self::new()
    }
}

/// Monotonic delta-time clock for the render loop.
#[derive(Clone, Debug)]
pub struct FrameClock {
    last: Option<Instant>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self { last: None }
    }

    /// Seconds since the previous call; zero on the first call.
    pub fn tick(&mut self) -> f32 {
        self.tick_at(Instant::now())
    }

    pub fn tick_at(&mut self, now: Instant) -> f32 {
        let dt = match self.last {
            Some(prev) if now > prev => (now - prev).as_secs_f32(),
            _ => 0.0,
        };
        self.last = Some(now);
        dt
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}
