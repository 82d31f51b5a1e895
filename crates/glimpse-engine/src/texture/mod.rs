//! GPU textures holding array data.
//!
//! A [`Texture`] owns exactly one `wgpu::Texture`. Its kind (1D or 2D) and
//! channel count come from the format resolver; both kinds are stored as 2D
//! textures, 1D ones with a single row; uploads go through the
//! pixel-transfer stage so float data can be remapped for contrast.

mod format;
mod transfer;

pub use format::{resolve, FormatTag, ResolvedFormat, TextureKind};
pub use transfer::{texel_format, PixelTransfer};

use crate::array::{Array, ElementType};
use crate::coords::{Rect, TexCoords};
use crate::error::{InvalidInput, Result};
use crate::render::{Binding, PipelineKind, RenderCtx, RenderTarget, TextureRenderer};

/// A 1D or 2D GPU texture plus the array it was uploaded from.
///
/// The array copy is kept so the texture can be re-uploaded with a different
/// [`PixelTransfer`] without the caller resupplying data.
pub struct Texture {
    tag: Option<FormatTag>,
    format: ResolvedFormat,
    element: ElementType,
    data: Array,
    transfer: PixelTransfer,

    texture: wgpu::Texture,
    view: wgpu::TextureView,
}

impl Texture {
    /// Creates a texture whose kind is inferred from the array shape.
    pub fn new(ctx: &RenderCtx<'_>, array: Array, tag: Option<FormatTag>) -> Result<Self> {
        Self::create(ctx, array, tag, None)
    }

    /// Creates a 1D texture (e.g. a color lookup table).
    pub fn new_1d(ctx: &RenderCtx<'_>, array: Array, tag: Option<FormatTag>) -> Result<Self> {
        Self::create(ctx, array, tag, Some(TextureKind::OneD))
    }

    /// Creates a 2D texture (e.g. an image slice).
    pub fn new_2d(ctx: &RenderCtx<'_>, array: Array, tag: Option<FormatTag>) -> Result<Self> {
        Self::create(ctx, array, tag, Some(TextureKind::TwoD))
    }

    fn create(
        ctx: &RenderCtx<'_>,
        array: Array,
        tag: Option<FormatTag>,
        want: Option<TextureKind>,
    ) -> Result<Self> {
        let format = resolve(array.shape(), tag, want)?;
        check_limits(ctx, &format)?;

        let element = array.element_type();
        let (texture, view) = allocate(ctx.device, &format, element);

        let texture = Self {
            tag,
            format,
            element,
            data: array,
            transfer: PixelTransfer::IDENTITY,
            texture,
            view,
        };
        texture.upload(ctx.queue);
        Ok(texture)
    }

    /// Replaces the texture contents.
    ///
    /// The kind and format tag stay fixed; the shape may change. The GPU
    /// resource is reallocated only when size, channel count or element type
    /// differ. On error nothing is modified.
    pub fn set_data(&mut self, ctx: &RenderCtx<'_>, array: Array) -> Result<()> {
        self.set_data_with_transfer(ctx, array, self.transfer)
    }

    /// Like [`set_data`](Self::set_data), but uploads with `transfer` and keeps it.
    pub fn set_data_with_transfer(
        &mut self,
        ctx: &RenderCtx<'_>,
        array: Array,
        transfer: PixelTransfer,
    ) -> Result<()> {
        let format = resolve(array.shape(), self.tag, Some(self.format.kind))?;
        check_limits(ctx, &format)?;

        let element = array.element_type();
        if format != self.format || element != self.element {
            log::debug!(
                "Texture: reallocating {:?} -> {:?} ({:?})",
                self.format,
                format,
                element
            );
            let (texture, view) = allocate(ctx.device, &format, element);
            self.texture = texture;
            self.view = view;
        }

        self.format = format;
        self.element = element;
        self.data = array;
        self.transfer = transfer;
        self.upload(ctx.queue);
        Ok(())
    }

    /// Re-uploads the current data as `value * scale + bias`.
    ///
    /// Only float data is remapped; byte data is uploaded verbatim. The
    /// transfer sticks, so later [`set_data`](Self::set_data) calls reuse it.
    pub fn update(&mut self, ctx: &RenderCtx<'_>, bias: f32, scale: f32) {
        self.transfer = PixelTransfer::new(bias, scale);
        self.upload(ctx.queue);
    }

    /// Draws the texture onto `rect` (logical px) spanning `coords`.
    pub fn draw(
        &self,
        renderer: &mut TextureRenderer,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        rect: Rect,
        coords: TexCoords,
    ) {
        let binding = Binding {
            kind: PipelineKind::Plain(self.format.kind),
            views: vec![&self.view],
            channels: self.format.channels,
        };
        self.draw_bound(renderer, ctx, target, binding, rect, coords);
    }

    /// Draws this texture's quad with textures bound by someone else.
    pub(crate) fn draw_bound(
        &self,
        renderer: &mut TextureRenderer,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        binding: Binding<'_>,
        rect: Rect,
        coords: TexCoords,
    ) {
        renderer.draw(ctx, target, binding, rect, coords);
    }

    #[inline]
    pub fn kind(&self) -> TextureKind {
        self.format.kind
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.format.width
    }

    /// Row count; `None` for 1D textures.
    #[inline]
    pub fn height(&self) -> Option<usize> {
        self.format.height
    }

    #[inline]
    pub fn channels(&self) -> usize {
        self.format.channels
    }

    #[inline]
    pub fn element(&self) -> ElementType {
        self.element
    }

    #[inline]
    pub fn transfer(&self) -> PixelTransfer {
        self.transfer
    }

    #[inline]
    pub fn data(&self) -> &Array {
        &self.data
    }

    #[inline]
    pub fn view(&self) -> &wgpu::TextureView {
        &self.view
    }

    fn upload(&self, queue: &wgpu::Queue) {
        let bytes = transfer::stage(self.data.elements(), self.format.channels, self.transfer);
        let extent = extent(&self.format);
        let row_bytes = self.format.width * transfer::bytes_per_texel(self.format.channels, self.element);

        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &self.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            &bytes,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(row_bytes as u32),
                rows_per_image: Some(extent.height),
            },
            extent,
        );

        log::trace!(
            "Texture: uploaded {} bytes ({:?}, transfer {:?})",
            bytes.len(),
            self.format,
            self.transfer
        );
    }
}

fn extent(format: &ResolvedFormat) -> wgpu::Extent3d {
    wgpu::Extent3d {
        width: format.width as u32,
        height: format.height.unwrap_or(1) as u32,
        depth_or_array_layers: 1,
    }
}

fn check_limits(ctx: &RenderCtx<'_>, format: &ResolvedFormat) -> Result<()> {
    let limit = ctx.max_extent(format.kind);
    let extent = format.width.max(format.height.unwrap_or(0));
    if extent > limit as usize {
        return Err(InvalidInput::TooLarge {
            kind: format.kind,
            extent,
            limit,
        });
    }
    Ok(())
}

fn allocate(
    device: &wgpu::Device,
    format: &ResolvedFormat,
    element: ElementType,
) -> (wgpu::Texture, wgpu::TextureView) {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("glimpse texture"),
        size: extent(format),
        mip_level_count: 1,
        sample_count: 1,
        // 1D data is stored as a single-row 2D texture; D1 textures are not
        // sampled on every backend.
        dimension: wgpu::TextureDimension::D2,
        format: texel_format(format.channels, element),
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });
    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

    log::debug!("Texture: allocated {:?} {:?}", format, element);
    (texture, view)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::Viewport;
    use crate::testing::{encoder, headless_gpu, pixel, Canvas, CANVAS_SIZE};

    fn ctx<'a>(gpu: &'a (wgpu::Device, wgpu::Queue)) -> RenderCtx<'a> {
        RenderCtx::new(
            &gpu.0,
            &gpu.1,
            wgpu::TextureFormat::Rgba8Unorm,
            Viewport::new(64.0, 64.0),
        )
    }

    #[test]
    fn extent_of_1d_has_unit_height() {
        let f = resolve(&[10, 4], None, None).unwrap();
        let e = extent(&f);
        assert_eq!((e.width, e.height, e.depth_or_array_layers), (10, 1, 1));

        let f = resolve(&[32, 16], None, None).unwrap();
        let e = extent(&f);
        assert_eq!((e.width, e.height), (16, 32));
    }

    #[test]
    fn create_infers_kind_and_size() {
        let Some(gpu) = headless_gpu() else { return };
        let ctx = ctx(&gpu);

        let image = Array::new(vec![32, 32], vec![0.5f32; 32 * 32]).unwrap();
        let t = Texture::new(&ctx, image, None).unwrap();
        assert_eq!(t.kind(), TextureKind::TwoD);
        assert_eq!((t.width(), t.height(), t.channels()), (32, Some(32), 1));

        let strip = Array::new(vec![10, 4], vec![0u8; 40]).unwrap();
        let t = Texture::new(&ctx, strip, None).unwrap();
        assert_eq!(t.kind(), TextureKind::OneD);
        assert_eq!((t.width(), t.height(), t.channels()), (10, None, 4));
        assert_eq!(t.element(), ElementType::Byte);
    }

    #[test]
    fn set_data_keeps_size_for_same_shape() {
        let Some(gpu) = headless_gpu() else { return };
        let ctx = ctx(&gpu);

        let mut t = Texture::new_2d(&ctx, Array::new(vec![8, 6], vec![0.0f32; 48]).unwrap(), None)
            .unwrap();
        t.set_data(&ctx, Array::new(vec![8, 6], vec![1.0f32; 48]).unwrap()).unwrap();
        assert_eq!((t.width(), t.height()), (6, Some(8)));

        let canvas = Canvas::new(&ctx);
        let mut enc = encoder(&ctx);
        let mut renderer = TextureRenderer::new();
        {
            let mut target = RenderTarget::new(&mut enc, &canvas.view);
            t.draw(&mut renderer, &ctx, &mut target, Rect::new(0.0, 0.0, 64.0, 64.0), TexCoords::FULL);
        }
        ctx.queue.submit(std::iter::once(enc.finish()));
        assert_eq!((t.width(), t.height()), (6, Some(8)));

        t.set_data(&ctx, Array::new(vec![4, 5], vec![1.0f32; 20]).unwrap()).unwrap();
        assert_eq!((t.width(), t.height()), (5, Some(4)));
    }

    /// Draws `texture` over the whole canvas into `rect` and reads it back.
    fn render(ctx: &RenderCtx<'_>, texture: &Texture, rect: Rect) -> Vec<[u8; 4]> {
        let canvas = Canvas::new(ctx);
        let mut enc = encoder(ctx);
        let mut renderer = TextureRenderer::new();
        {
            let mut target = RenderTarget::new(&mut enc, &canvas.view);
            texture.draw(&mut renderer, ctx, &mut target, rect, TexCoords::FULL);
        }
        canvas.read(ctx, enc)
    }

    const FULL: Rect = Rect::new(0.0, 0.0, CANVAS_SIZE as f32, CANVAS_SIZE as f32);
    const BLACK: [u8; 4] = [0, 0, 0, 255];
    const WHITE: [u8; 4] = [255, 255, 255, 255];

    #[test]
    fn one_d_strips_read_back() {
        let Some(gpu) = headless_gpu() else { return };
        let ctx = ctx(&gpu);

        let bytes = Texture::new_1d(&ctx, Array::new(vec![2], vec![0u8, 255]).unwrap(), None).unwrap();
        let px = render(&ctx, &bytes, FULL);
        assert_eq!(pixel(&px, 0, 32), BLACK);
        assert_eq!(pixel(&px, 63, 32), WHITE);

        let floats = Texture::new_1d(&ctx, Array::new(vec![2], vec![0.0f32, 1.0]).unwrap(), None)
            .unwrap();
        let px = render(&ctx, &floats, FULL);
        assert_eq!(pixel(&px, 0, 0), BLACK);
        assert_eq!(pixel(&px, 63, 63), WHITE);

        let rgb = Array::new(vec![2, 3], vec![1.0f32, 0.0, 0.0, 0.0, 0.0, 1.0]).unwrap();
        let lut = Texture::new_1d(&ctx, rgb, Some(FormatTag::Rgb)).unwrap();
        let px = render(&ctx, &lut, FULL);
        assert_eq!(pixel(&px, 0, 10), [255, 0, 0, 255]);
        assert_eq!(pixel(&px, 63, 10), [0, 0, 255, 255]);
    }

    #[test]
    fn row_zero_is_drawn_at_the_top() {
        let Some(gpu) = headless_gpu() else { return };
        let ctx = ctx(&gpu);

        let rows = Array::new(vec![2, 1], vec![1.0f32, 0.0]).unwrap();
        let t = Texture::new_2d(&ctx, rows, None).unwrap();
        let px = render(&ctx, &t, FULL);
        assert_eq!(pixel(&px, 32, 0), WHITE);
        assert_eq!(pixel(&px, 32, 63), BLACK);
    }

    #[test]
    fn negative_width_mirrors() {
        let Some(gpu) = headless_gpu() else { return };
        let ctx = ctx(&gpu);

        let half = Array::new(vec![1, 8], vec![0.0f32, 0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 1.0]).unwrap();
        let t = Texture::new_2d(&ctx, half, None).unwrap();

        let px = render(&ctx, &t, FULL);
        assert_eq!(pixel(&px, 0, 32), BLACK);
        assert_eq!(pixel(&px, 63, 32), WHITE);

        let px = render(&ctx, &t, Rect::new(64.0, 0.0, -64.0, 64.0));
        assert_eq!(pixel(&px, 0, 32), WHITE);
        assert_eq!(pixel(&px, 63, 32), BLACK);
    }

    #[test]
    fn zero_area_rect_draws_nothing() {
        let Some(gpu) = headless_gpu() else { return };
        let ctx = ctx(&gpu);

        let t = Texture::new_2d(&ctx, Array::new(vec![2, 2], vec![1.0f32; 4]).unwrap(), None)
            .unwrap();
        let px = render(&ctx, &t, Rect::new(0.0, 0.0, 0.0, 64.0));
        assert!(px.iter().all(|p| *p == [0, 0, 0, 0]));
    }

    #[test]
    fn set_data_rejects_wrong_kind_and_keeps_state() {
        let Some(gpu) = headless_gpu() else { return };
        let ctx = ctx(&gpu);

        let mut t = Texture::new_2d(&ctx, Array::new(vec![4, 4], vec![0.0f32; 16]).unwrap(), None)
            .unwrap();
        let err = t.set_data(&ctx, Array::new(vec![16], vec![0.0f32; 16]).unwrap()).unwrap_err();
        assert!(matches!(err, InvalidInput::KindMismatch { .. }));
        assert_eq!((t.width(), t.height()), (4, Some(4)));
        assert_eq!(t.data().shape(), &[4, 4]);
    }

    #[test]
    fn update_remembers_transfer() {
        let Some(gpu) = headless_gpu() else { return };
        let ctx = ctx(&gpu);

        let mut t = Texture::new(&ctx, Array::new(vec![16, 16], vec![0.0f32; 256]).unwrap(), None)
            .unwrap();
        assert!(t.transfer().is_identity());
        t.update(&ctx, 0.5, 2.0);
        assert_eq!(t.transfer(), PixelTransfer::new(0.5, 2.0));
        t.set_data(&ctx, Array::new(vec![16, 16], vec![1.0f32; 256]).unwrap()).unwrap();
        assert_eq!(t.transfer(), PixelTransfer::new(0.5, 2.0));
    }

    #[test]
    fn oversized_1d_texture_is_rejected() {
        let Some(gpu) = headless_gpu() else { return };
        let ctx = ctx(&gpu);

        let n = ctx.max_extent(TextureKind::OneD) as usize + 1;
        let err = Texture::new_1d(&ctx, Array::new(vec![n], vec![0u8; n]).unwrap(), None)
            .err()
            .unwrap();
        assert!(matches!(err, InvalidInput::TooLarge { kind: TextureKind::OneD, .. }));
    }
}
