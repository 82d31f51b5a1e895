use crate::coords::Viewport;
use crate::texture::TextureKind;

/// Device, queue and target description for uploads and draws.
///
/// Every texture operation takes this explicitly; nothing in the crate relies
/// on ambient pipeline state.
pub struct RenderCtx<'a> {
    pub device: &'a wgpu::Device,
    pub queue: &'a wgpu::Queue,
    pub surface_format: wgpu::TextureFormat,
    pub viewport: Viewport, // logical px
}

impl<'a> RenderCtx<'a> {
    #[inline]
    pub fn new(
        device: &'a wgpu::Device,
        queue: &'a wgpu::Queue,
        surface_format: wgpu::TextureFormat,
        viewport: Viewport,
    ) -> Self {
        Self {
            device,
            queue,
            surface_format,
            viewport,
        }
    }

    /// Largest width or height the device accepts for a texture of `kind`.
    ///
    /// Both kinds live in 2D storage, so both share the 2D limit.
    #[inline]
    pub fn max_extent(&self, kind: TextureKind) -> u32 {
        match kind {
            TextureKind::OneD | TextureKind::TwoD => self.device.limits().max_texture_dimension_2d,
        }
    }
}

/// Where draws are recorded: an encoder and the color view it renders into.
pub struct RenderTarget<'a> {
    pub encoder: &'a mut wgpu::CommandEncoder,
    pub color_view: &'a wgpu::TextureView,
}

impl<'a> RenderTarget<'a> {
    #[inline]
    pub fn new(encoder: &'a mut wgpu::CommandEncoder, color_view: &'a wgpu::TextureView) -> Self {
        Self { encoder, color_view }
    }
}
