//! False-colored 2D slices.
//!
//! A [`Slice`] pairs a 2D value texture with a 1D LUT texture. Values are
//! remapped on upload so that `range.min..range.max` spans the LUT; the
//! configured [`SliceShader`] then looks each value up while drawing.
//!
//! Whenever the data, the range or the colormap changes, the upload transfer
//! is recomputed and re-applied before the call returns.
//!
//! Slice data is single-channel. Byte arrays are widened to `f32` first, so
//! the range is always expressed in the array's own units.

mod range;
mod shader;

pub use range::ValueRange;
pub use shader::SliceShader;

use crate::array::Array;
use crate::colormap::Colormap;
use crate::coords::{Rect, TexCoords};
use crate::error::Result;
use crate::render::{RenderCtx, RenderTarget, TextureRenderer};
use crate::texture::{FormatTag, PixelTransfer, Texture};

/// Optional parameters for [`Slice`] construction.
///
/// Unset bounds default to the observed extrema of the array; the colormap
/// defaults to a 512-entry grayscale ramp.
#[derive(Debug, Clone, Default)]
pub struct SliceBuilder {
    shader: SliceShader,
    colormap: Option<Colormap>,
    vmin: Option<f32>,
    vmax: Option<f32>,
}

impl SliceBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shader(mut self, shader: SliceShader) -> Self {
        self.shader = shader;
        self
    }

    pub fn colormap(mut self, colormap: Colormap) -> Self {
        self.colormap = Some(colormap);
        self
    }

    pub fn vmin(mut self, vmin: f32) -> Self {
        self.vmin = Some(vmin);
        self
    }

    pub fn vmax(mut self, vmax: f32) -> Self {
        self.vmax = Some(vmax);
        self
    }

    pub fn range(self, vmin: f32, vmax: f32) -> Self {
        self.vmin(vmin).vmax(vmax)
    }

    /// Uploads `array` as a single-channel 2D texture plus the LUT.
    pub fn build(self, ctx: &RenderCtx<'_>, array: Array) -> Result<Slice> {
        let array = array.into_float();
        let range = ValueRange::new(
            self.vmin.unwrap_or_else(|| array.min()),
            self.vmax.unwrap_or_else(|| array.max()),
        );
        let colormap = self.colormap.unwrap_or_default();
        let transfer = range.bias_scale(colormap.len())?;

        let mut data = Texture::new_2d(ctx, array, Some(FormatTag::Luminance))?;
        let lut = Texture::new_1d(ctx, colormap.to_array(), Some(FormatTag::Rgb))?;
        data.update(ctx, transfer.bias, transfer.scale);

        log::debug!(
            "Slice: {}x{} values, range {:?}, {} LUT entries",
            data.width(),
            data.height().unwrap_or(1),
            range,
            colormap.len()
        );

        Ok(Slice {
            data,
            lut,
            colormap,
            range,
            shader: self.shader,
        })
    }
}

/// A 2D array drawn through a color lookup table.
pub struct Slice {
    data: Texture,
    lut: Texture,
    colormap: Colormap,
    range: ValueRange,
    shader: SliceShader,
}

impl Slice {
    /// Slice with default shader, grayscale colormap and the data's own range.
    pub fn new(ctx: &RenderCtx<'_>, array: Array) -> Result<Self> {
        SliceBuilder::new().build(ctx, array)
    }

    pub fn builder() -> SliceBuilder {
        SliceBuilder::new()
    }

    /// Replaces the values, keeping range and colormap.
    ///
    /// The shape may change but must stay two-dimensional and single-channel.
    pub fn set_data(&mut self, ctx: &RenderCtx<'_>, array: Array) -> Result<()> {
        let transfer = self.range.bias_scale(self.colormap.len())?;
        self.data.set_data_with_transfer(ctx, array.into_float(), transfer)
    }

    /// Sets the value range mapped onto the colormap.
    pub fn set_range(&mut self, ctx: &RenderCtx<'_>, vmin: f32, vmax: f32) -> Result<()> {
        let range = ValueRange::new(vmin, vmax);
        let transfer = range.bias_scale(self.colormap.len())?;
        self.range = range;
        self.apply(ctx, transfer);
        Ok(())
    }

    /// Replaces the colormap and the LUT texture.
    pub fn set_colormap(&mut self, ctx: &RenderCtx<'_>, colormap: Colormap) -> Result<()> {
        let transfer = self.range.bias_scale(colormap.len())?;
        self.lut.set_data(ctx, colormap.to_array())?;
        self.colormap = colormap;
        self.apply(ctx, transfer);
        Ok(())
    }

    pub fn set_shader(&mut self, shader: SliceShader) {
        self.shader = shader;
    }

    /// Draws the slice onto `rect` (logical px), row 0 at the top.
    pub fn draw(
        &self,
        renderer: &mut TextureRenderer,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        rect: Rect,
    ) {
        let binding = self.shader.bind(&self.data, &self.lut);
        self.data
            .draw_bound(renderer, ctx, target, binding, rect, TexCoords::FULL);
    }

    #[inline]
    pub fn range(&self) -> ValueRange {
        self.range
    }

    #[inline]
    pub fn colormap(&self) -> &Colormap {
        &self.colormap
    }

    #[inline]
    pub fn shader(&self) -> SliceShader {
        self.shader
    }

    /// Transfer currently applied to the value texture.
    #[inline]
    pub fn bias_scale(&self) -> PixelTransfer {
        self.data.transfer()
    }

    #[inline]
    pub fn data_texture(&self) -> &Texture {
        &self.data
    }

    #[inline]
    pub fn lut_texture(&self) -> &Texture {
        &self.lut
    }

    fn apply(&mut self, ctx: &RenderCtx<'_>, transfer: PixelTransfer) {
        if self.data.transfer() != transfer {
            self.data.update(ctx, transfer.bias, transfer.scale);
        }
    }
}
