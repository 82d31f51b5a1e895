//! Quad geometry and uniform layout shared by all texture pipelines.

use bytemuck::{Pod, Zeroable};

use crate::coords::{Rect, TexCoords, Viewport};

// ── blend ─────────────────────────────────────────────────────────────────

pub(super) fn premul_alpha_blend() -> wgpu::BlendState {
    let component = wgpu::BlendComponent {
        src_factor: wgpu::BlendFactor::One,
        dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
        operation: wgpu::BlendOperation::Add,
    };
    wgpu::BlendState {
        color: component,
        alpha: component,
    }
}

// ── quad uniform ──────────────────────────────────────────────────────────

/// Per-draw parameters, mirrored by `struct Quad` in `shaders/quad.wgsl`.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub(super) struct QuadUniform {
    pub viewport: [f32; 2],
    pub _pad: [f32; 2], // 16-byte alignment
    pub rect: [f32; 4], // x, y, w, h
    pub tex: [f32; 4],  // s0, s1, t0, t1
    pub channels: [f32; 4], // x = source channel count
}

impl QuadUniform {
    pub(super) fn new(viewport: Viewport, rect: Rect, coords: TexCoords, channels: usize) -> Self {
        Self {
            viewport: viewport.clamped(),
            _pad: [0.0; 2],
            rect: rect.to_array(),
            tex: coords.to_array(),
            channels: [channels as f32, 0.0, 0.0, 0.0],
        }
    }
}

/// Minimum binding size for the quad uniform buffer.
pub(super) fn quad_ubo_min_binding_size() -> std::num::NonZeroU64 {
    std::num::NonZeroU64::new(std::mem::size_of::<QuadUniform>() as u64)
        .expect("QuadUniform has non-zero size by construction")
}

// ── quad vertex ───────────────────────────────────────────────────────────

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub(super) struct QuadVertex {
    pub pos: [f32; 2], // 0..1
}

impl QuadVertex {
    const ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x2];

    pub(super) fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<QuadVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

pub(super) const QUAD_VERTICES: [QuadVertex; 4] = [
    QuadVertex { pos: [0.0, 0.0] },
    QuadVertex { pos: [1.0, 0.0] },
    QuadVertex { pos: [1.0, 1.0] },
    QuadVertex { pos: [0.0, 1.0] },
];

pub(super) const QUAD_INDICES: [u16; 6] = [0, 1, 2, 0, 2, 3];
