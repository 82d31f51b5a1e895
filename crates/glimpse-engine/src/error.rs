//! Error type for texture, colormap and slice operations.
//!
//! Every failure in this crate's data path is a caller error: the supplied
//! array, format tag, or value range violates a constraint. There is no
//! recovery path; the failing call leaves prior state untouched.

use thiserror::Error;

use crate::texture::{FormatTag, TextureKind};

/// Result alias using [`InvalidInput`].
pub type Result<T> = std::result::Result<T, InvalidInput>;

/// Caller-supplied data violates a shape, format, or range constraint.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InvalidInput {
    /// Array rank outside `1..=3`.
    #[error("array rank {rank} is not supported (expected 1 to 3 dimensions)")]
    Rank { rank: usize },

    /// A dimension of length zero.
    #[error("array shape {shape:?} contains an empty dimension")]
    EmptyDimension { shape: Vec<usize> },

    /// Element buffer length does not match the product of the shape.
    #[error("array shape {shape:?} needs {expected} elements, got {actual}")]
    ElementCount {
        shape: Vec<usize>,
        expected: usize,
        actual: usize,
    },

    /// Product of the dimensions does not fit in `usize`.
    #[error("array shape {shape:?} has more elements than can be addressed")]
    ShapeOverflow { shape: Vec<usize> },

    /// Trailing dimension does not match the format tag.
    #[error("format {tag:?} expects {expected} channels, last dimension is {actual}")]
    ChannelMismatch {
        tag: FormatTag,
        expected: usize,
        actual: usize,
    },

    /// Channel dimension larger than 4.
    #[error("{channels} channels requested, at most 4 are supported")]
    TooManyChannels { channels: usize },

    /// The shape cannot be interpreted as the requested texture kind.
    #[error("array shape {shape:?} cannot be uploaded as a {kind:?} texture")]
    KindMismatch { shape: Vec<usize>, kind: TextureKind },

    /// Texture extent exceeds the device limit.
    #[error("{kind:?} texture extent {extent} exceeds device limit {limit}")]
    TooLarge {
        kind: TextureKind,
        extent: usize,
        limit: u32,
    },

    /// `vmin == vmax` or a non-finite bound.
    #[error("value range [{min}, {max}] is degenerate")]
    DegenerateRange { min: f32, max: f32 },

    /// Colormap with too few or non-finite entries.
    #[error("invalid colormap: {0}")]
    Colormap(String),
}
