//! Texture format inference from array shape.
//!
//! Decides whether an array is a 1D strip or a 2D image, and whether its last
//! dimension is a channel axis.

use crate::error::{InvalidInput, Result};

/// Explicit pixel format of the source data.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum FormatTag {
    /// One channel. The trailing channel axis may be omitted.
    Luminance,
    /// Two channels (value + alpha).
    LuminanceAlpha,
    Rgb,
    Rgba,
}

impl FormatTag {
    /// Length the trailing dimension must have for this tag.
    pub const fn channels(self) -> usize {
        match self {
            FormatTag::Luminance => 1,
            FormatTag::LuminanceAlpha => 2,
            FormatTag::Rgb => 3,
            FormatTag::Rgba => 4,
        }
    }
}

/// Texture dimensionality.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum TextureKind {
    OneD,
    TwoD,
}

/// Outcome of format resolution.
///
/// For 2D textures `height` is the row count (`shape[0]`) and `width` the
/// column count (`shape[1]`).
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct ResolvedFormat {
    pub kind: TextureKind,
    pub width: usize,
    pub height: Option<usize>,
    pub channels: usize,
}

/// One way of splitting a shape into spatial dimensions and a channel count.
#[derive(Debug, Copy, Clone)]
struct Interpretation<'a> {
    spatial: &'a [usize],
    channels: usize,
}

impl Interpretation<'_> {
    fn kind(&self) -> Option<TextureKind> {
        match self.spatial.len() {
            1 => Some(TextureKind::OneD),
            2 => Some(TextureKind::TwoD),
            _ => None,
        }
    }

    fn resolved(&self, kind: TextureKind) -> ResolvedFormat {
        match kind {
            TextureKind::OneD => ResolvedFormat {
                kind,
                width: self.spatial[0],
                height: None,
                channels: self.channels,
            },
            TextureKind::TwoD => ResolvedFormat {
                kind,
                width: self.spatial[1],
                height: Some(self.spatial[0]),
                channels: self.channels,
            },
        }
    }
}

/// Resolves the texture layout for `shape`.
///
/// `tag` pins the channel count; `want` pins the texture kind. Without either,
/// rank 1 and rank 2 with a short (<= 4) last dimension become 1D textures,
/// other rank 2 shapes single-channel 2D, and rank 3 shapes multi-channel 2D.
pub fn resolve(
    shape: &[usize],
    tag: Option<FormatTag>,
    want: Option<TextureKind>,
) -> Result<ResolvedFormat> {
    let rank = shape.len();
    if rank == 0 || rank > 3 {
        return Err(InvalidInput::Rank { rank });
    }
    if shape.contains(&0) {
        return Err(InvalidInput::EmptyDimension { shape: shape.to_vec() });
    }

    let last = shape[rank - 1];
    let with_axis = (rank >= 2).then(|| Interpretation {
        spatial: &shape[..rank - 1],
        channels: last,
    });
    let without_axis = Interpretation { spatial: shape, channels: 1 };

    let candidates: Vec<Interpretation<'_>> = match (tag, want) {
        (None, None) => match rank {
            1 => vec![without_axis],
            2 if last <= 4 => with_axis.into_iter().collect(),
            2 => vec![without_axis],
            _ => with_axis.into_iter().collect(),
        },
        (None, Some(_)) => with_axis.into_iter().chain([without_axis]).collect(),
        (Some(tag), _) => {
            let mut c: Vec<_> = with_axis
                .filter(|i| i.channels == tag.channels())
                .into_iter()
                .collect();
            if tag == FormatTag::Luminance {
                c.push(without_axis);
            }
            c
        }
    };

    let mut too_many = None;
    for candidate in candidates {
        let Some(kind) = candidate.kind() else { continue };
        if want.is_some_and(|w| w != kind) {
            continue;
        }
        if candidate.channels > 4 {
            too_many.get_or_insert(InvalidInput::TooManyChannels {
                channels: candidate.channels,
            });
            continue;
        }
        return Ok(candidate.resolved(kind));
    }

    if let Some(err) = too_many {
        return Err(err);
    }
    if let Some(kind) = want {
        return Err(InvalidInput::KindMismatch { shape: shape.to_vec(), kind });
    }
    match tag {
        Some(tag) => Err(InvalidInput::ChannelMismatch {
            tag,
            expected: tag.channels(),
            actual: if rank >= 2 { last } else { 1 },
        }),
        None => Err(InvalidInput::Rank { rank }),
    }
}
