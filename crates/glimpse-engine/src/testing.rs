//! Test-only GPU helpers.
//!
//! Tests that need a device call [`headless_gpu`] and return early when it
//! yields `None`. Any adapter qualifies, software rasterizers included, so the
//! GPU paths also run on CI hosts without a discrete GPU.

use crate::render::RenderCtx;

/// Side of the square [`Canvas`], in pixels.
pub(crate) const CANVAS_SIZE: u32 = 64;

/// Requests any adapter without a surface, hardware first, then the fallback.
pub(crate) fn headless_gpu() -> Option<(wgpu::Device, wgpu::Queue)> {
    let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
        backends: wgpu::Backends::all(),
        ..Default::default()
    });

    let adapter = [false, true].into_iter().find_map(|force_fallback_adapter| {
        pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::LowPower,
            compatible_surface: None,
            force_fallback_adapter,
        }))
        .ok()
    })?;

    pollster::block_on(adapter.request_device(&wgpu::DeviceDescriptor {
        label: Some("glimpse test device"),
        required_features: wgpu::Features::empty(),
        required_limits: adapter.limits(),
        experimental_features: wgpu::ExperimentalFeatures::disabled(),
        memory_hints: wgpu::MemoryHints::Performance,
        trace: wgpu::Trace::Off,
    }))
    .ok()
}

pub(crate) fn encoder(ctx: &RenderCtx<'_>) -> wgpu::CommandEncoder {
    ctx.device
        .create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("glimpse test encoder"),
        })
}

/// A 64x64 render target in `ctx.surface_format` that can be read back.
///
/// Starts out transparent black.
pub(crate) struct Canvas {
    texture: wgpu::Texture,
    pub view: wgpu::TextureView,
}

impl Canvas {
    pub(crate) fn new(ctx: &RenderCtx<'_>) -> Self {
        let texture = ctx.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("glimpse test canvas"),
            size: canvas_extent(),
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: ctx.surface_format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Self { texture, view }
    }

    /// Submits `encoder` and returns the canvas as rows of 4-byte pixels.
    ///
    /// Assumes a 4-byte format; 64 px rows are already copy-aligned.
    pub(crate) fn read(&self, ctx: &RenderCtx<'_>, mut encoder: wgpu::CommandEncoder) -> Vec<[u8; 4]> {
        let row_bytes = CANVAS_SIZE * 4;
        let buffer = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("glimpse test readback"),
            size: (row_bytes * CANVAS_SIZE) as u64,
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            mapped_at_creation: false,
        });

        encoder.copy_texture_to_buffer(
            wgpu::TexelCopyTextureInfo {
                texture: &self.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::TexelCopyBufferInfo {
                buffer: &buffer,
                layout: wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(row_bytes),
                    rows_per_image: Some(CANVAS_SIZE),
                },
            },
            canvas_extent(),
        );
        ctx.queue.submit(std::iter::once(encoder.finish()));

        let slice = buffer.slice(..);
        slice.map_async(wgpu::MapMode::Read, |result| {
            result.expect("readback buffer maps");
        });
        ctx.device
            .poll(wgpu::PollType::wait_indefinitely())
            .expect("device poll succeeds");

        let bytes = slice.get_mapped_range();
        bytes
            .chunks_exact(4)
            .map(|p| [p[0], p[1], p[2], p[3]])
            .collect()
    }
}

/// Pixel at column `x`, row `y` (row 0 at the top).
pub(crate) fn pixel(pixels: &[[u8; 4]], x: u32, y: u32) -> [u8; 4] {
    pixels[(y * CANVAS_SIZE + x) as usize]
}

fn canvas_extent() -> wgpu::Extent3d {
    wgpu::Extent3d {
        width: CANVAS_SIZE,
        height: CANVAS_SIZE,
        depth_or_array_layers: 1,
    }
}
