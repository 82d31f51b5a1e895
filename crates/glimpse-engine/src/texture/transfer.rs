//! Pixel-transfer stage: converts array elements into texel bytes.
//!
//! Float sources go through `clamp(v * scale + bias, 0, 1)` and are stored as
//! 32-bit float texels. Byte sources are copied verbatim into normalized 8-bit
//! texels. Three-channel data is widened to four with an opaque alpha.

use crate::array::{ElementType, Elements};

/// Linear remap applied to float data during upload.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PixelTransfer {
    pub bias: f32,
    pub scale: f32,
}

impl PixelTransfer {
    pub const IDENTITY: Self = Self { bias: 0.0, scale: 1.0 };

    #[inline]
    pub const fn new(bias: f32, scale: f32) -> Self {
        Self { bias, scale }
    }

    #[inline]
    pub fn is_identity(self) -> bool {
        self == Self::IDENTITY
    }

    /// Applies the remap to one component. NaN maps to 0.
    #[inline]
    pub fn apply(self, v: f32) -> f32 {
        let out = v * self.scale + self.bias;
        if out.is_nan() { 0.0 } else { out.clamp(0.0, 1.0) }
    }
}

impl Default for PixelTransfer {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Channel count as stored on the GPU (RGB is widened to RGBA).
#[inline]
pub const fn gpu_channels(channels: usize) -> usize {
    if channels == 3 { 4 } else { channels }
}

/// Texel format used to store `channels` components of `element`.
pub fn texel_format(channels: usize, element: ElementType) -> wgpu::TextureFormat {
    match (gpu_channels(channels), element) {
        (1, ElementType::Byte) => wgpu::TextureFormat::R8Unorm,
        (2, ElementType::Byte) => wgpu::TextureFormat::Rg8Unorm,
        (_, ElementType::Byte) => wgpu::TextureFormat::Rgba8Unorm,
        (1, ElementType::Float) => wgpu::TextureFormat::R32Float,
        (2, ElementType::Float) => wgpu::TextureFormat::Rg32Float,
        (_, ElementType::Float) => wgpu::TextureFormat::Rgba32Float,
    }
}

/// Bytes per texel for the format chosen by [`texel_format`].
#[inline]
pub const fn bytes_per_texel(channels: usize, element: ElementType) -> usize {
    let component = match element {
        ElementType::Byte => 1,
        ElementType::Float => 4,
    };
    gpu_channels(channels) * component
}

/// Produces the upload bytes for `elements` interpreted with `channels`
/// components per texel.
pub fn stage(elements: &Elements, channels: usize, transfer: PixelTransfer) -> Vec<u8> {
    match elements {
        Elements::Byte(data) => {
            if channels == 3 {
                widen_rgb(data, u8::MAX)
            } else {
                data.clone()
            }
        }
        Elements::Float(data) => {
            let mapped: Vec<f32> = data.iter().map(|&v| transfer.apply(v)).collect();
            let texels = if channels == 3 { widen_rgb(&mapped, 1.0) } else { mapped };
            bytemuck::cast_slice(&texels).to_vec()
        }
    }
}

fn widen_rgb<T: Copy>(rgb: &[T], alpha: T) -> Vec<T> {
    let mut out = Vec::with_capacity(rgb.len() / 3 * 4);
    for px in rgb.chunks_exact(3) {
        out.extend_from_slice(px);
        out.push(alpha);
    }
    out
}
