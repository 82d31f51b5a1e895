//! Screen-space geometry in logical pixels.
//!
//! Canonical CPU space:
//! - Logical pixels (DPI-aware)
//! - Origin top-left
//! - +X right, +Y down
//!
//! Renderers convert to NDC in shaders using a viewport uniform.

mod rect;
mod tex_coords;
mod viewport;

pub use rect::Rect;
pub use tex_coords::TexCoords;
pub use viewport::Viewport;
