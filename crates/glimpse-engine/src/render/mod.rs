//! GPU rendering subsystem.
//!
//! Textures are drawn as screen-space quads by [`TextureRenderer`], which owns
//! the pipelines and shared quad geometry. Each draw records its own render
//! pass that loads the existing target contents, so draws compose in call
//! order.
//!
//! Convention:
//! - CPU geometry is in logical pixels (top-left origin, +Y down).
//! - Vertex shader converts to NDC using a per-quad uniform.

mod common;
mod ctx;
mod texture;

pub use ctx::{RenderCtx, RenderTarget};
pub use texture::TextureRenderer;

pub(crate) use texture::{Binding, PipelineKind};
