use crate::render::{Binding, PipelineKind};
use crate::texture::Texture;

/// How a slice turns transferred values into colors.
///
/// Both variants fetch the value texel nearest to the fragment; they differ
/// in how the LUT is read.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub enum SliceShader {
    /// Nearest LUT entry.
    #[default]
    Nearest,
    /// Linear interpolation between neighbouring LUT entries.
    Linear,
}

impl SliceShader {
    /// Binds the value texture and the LUT for one draw.
    pub(crate) fn bind<'a>(self, values: &'a Texture, lut: &'a Texture) -> Binding<'a> {
        Binding {
            kind: PipelineKind::Colormap(self),
            views: vec![values.view(), lut.view()],
            channels: values.channels(),
        }
    }
}
