mod debug;
mod pointer;
mod window;

pub(crate) use debug::wire_debug_capture;
pub(crate) use pointer::wire_controls;
pub(crate) use window::{wire_context_loss, wire_resize};
