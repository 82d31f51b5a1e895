//! Glimpse engine crate.
//!
//! Displays 2D arrays as false-colored textures: arrays are resolved to a GPU
//! texture format, uploaded with a linear pixel transfer, and drawn through a
//! color lookup table. The window, device and frame plumbing live here too.

pub mod array;
pub mod colormap;
pub mod coords;
pub mod core;
pub mod device;
pub mod error;
pub mod logging;
pub mod render;
pub mod slice;
pub mod texture;
pub mod window;

#[cfg(test)]
pub(crate) mod testing;

pub use array::Array;
pub use colormap::Colormap;
pub use error::{InvalidInput, Result};
pub use slice::{Slice, SliceShader};
pub use texture::{FormatTag, Texture, TextureKind};
