//! Contract between the window runtime and the application.
//!
//! The runtime owns the event loop and the GPU; the application sees raw
//! window events and one [`FrameCtx`] per redraw.

mod app;
mod ctx;

pub use app::{App, AppControl};
pub use ctx::{FrameCtx, WindowCtx};
