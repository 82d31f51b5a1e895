//! GPU device and window surface.
//!
//! [`Gpu`] owns the wgpu objects for one window, configures its swapchain and
//! hands out frames. Everything that draws borrows device and queue from here
//! through [`Gpu::render_ctx`].

mod frame;
mod gpu;
mod surface;

pub use frame::{GpuFrame, SurfaceErrorAction};
pub use gpu::{Gpu, GpuInit};
