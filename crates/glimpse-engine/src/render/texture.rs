use std::collections::HashMap;

use wgpu::util::DeviceExt;

use crate::coords::{Rect, TexCoords};
use crate::render::{RenderCtx, RenderTarget};
use crate::slice::SliceShader;
use crate::texture::TextureKind;

use super::common::{
    premul_alpha_blend, quad_ubo_min_binding_size, QuadUniform, QuadVertex, QUAD_INDICES,
    QUAD_VERTICES,
};

const QUAD_WGSL: &str = include_str!("shaders/quad.wgsl");

/// Which fragment program draws a quad.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub(crate) enum PipelineKind {
    /// A single texture shown as-is (gray for one channel).
    Plain(TextureKind),
    /// A 2D value texture looked up through a 1D LUT texture.
    Colormap(SliceShader),
}

impl PipelineKind {
    fn label(self) -> &'static str {
        match self {
            PipelineKind::Plain(TextureKind::OneD) => "glimpse plain 1d",
            PipelineKind::Plain(TextureKind::TwoD) => "glimpse plain 2d",
            PipelineKind::Colormap(SliceShader::Nearest) => "glimpse colormap nearest",
            PipelineKind::Colormap(SliceShader::Linear) => "glimpse colormap linear",
        }
    }

    fn fragment_source(self) -> &'static str {
        match self {
            PipelineKind::Plain(TextureKind::OneD) => include_str!("shaders/plain_1d.wgsl"),
            PipelineKind::Plain(TextureKind::TwoD) => include_str!("shaders/plain_2d.wgsl"),
            PipelineKind::Colormap(_) => include_str!("shaders/colormap.wgsl"),
        }
    }

    fn fragment_entry(self) -> &'static str {
        match self {
            PipelineKind::Plain(_) => "fs_main",
            PipelineKind::Colormap(SliceShader::Nearest) => "fs_nearest",
            PipelineKind::Colormap(SliceShader::Linear) => "fs_linear",
        }
    }

    /// Textures bound at bindings 1, 2, ... All are 2D views; 1D data is a
    /// single row.
    fn texture_slots(self) -> usize {
        match self {
            PipelineKind::Plain(_) => 1,
            PipelineKind::Colormap(_) => 2,
        }
    }
}

/// Textures bound for one draw, in binding order.
///
/// Produced by a texture (plain) or by a [`SliceShader`] (value + LUT); the
/// binding ends with the render pass that consumes it.
pub(crate) struct Binding<'a> {
    pub kind: PipelineKind,
    pub views: Vec<&'a wgpu::TextureView>,
    pub channels: usize,
}

struct Pipeline {
    pipeline: wgpu::RenderPipeline,
    bind_group_layout: wgpu::BindGroupLayout,
}

/// Draws textures as screen-space quads.
///
/// Pipelines are built lazily per [`PipelineKind`] and rebuilt when the surface
/// format changes. One renderer can serve any number of textures and slices.
#[derive(Default)]
pub struct TextureRenderer {
    pipeline_format: Option<wgpu::TextureFormat>,
    pipelines: HashMap<PipelineKind, Pipeline>,

    quad_vbo: Option<wgpu::Buffer>,
    quad_ibo: Option<wgpu::Buffer>,
}

impl TextureRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one quad covering `rect` with `binding`'s textures.
    ///
    /// Zero-area or non-finite rects and invalid viewports are skipped. Negative
    /// extents mirror the texture.
    pub(crate) fn draw(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        binding: Binding<'_>,
        rect: Rect,
        coords: TexCoords,
    ) {
        if rect.is_empty() || !rect.is_finite() || !ctx.viewport.is_valid() {
            log::trace!("TextureRenderer: skipping degenerate quad {rect:?}");
            return;
        }
        debug_assert_eq!(binding.views.len(), binding.kind.texture_slots());

        self.ensure_format(ctx);
        self.ensure_pipeline(ctx, binding.kind);
        self.ensure_static_buffers(ctx);

        let Some(pipeline) = self.pipelines.get(&binding.kind) else { return };
        let Some(quad_vbo) = self.quad_vbo.as_ref() else { return };
        let Some(quad_ibo) = self.quad_ibo.as_ref() else { return };

        let uniform = QuadUniform::new(ctx.viewport, rect, coords, binding.channels);
        let quad_ubo = ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("glimpse quad ubo"),
            contents: bytemuck::bytes_of(&uniform),
            usage: wgpu::BufferUsages::UNIFORM,
        });

        let mut entries = vec![wgpu::BindGroupEntry {
            binding: 0,
            resource: quad_ubo.as_entire_binding(),
        }];
        entries.extend(binding.views.iter().copied().enumerate().map(|(i, view)| {
            wgpu::BindGroupEntry {
                binding: i as u32 + 1,
                resource: wgpu::BindingResource::TextureView(view),
            }
        }));

        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("glimpse quad bind group"),
            layout: &pipeline.bind_group_layout,
            entries: &entries,
        });

        let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some(binding.kind.label()),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        rpass.set_pipeline(&pipeline.pipeline);
        rpass.set_bind_group(0, &bind_group, &[]);
        rpass.set_vertex_buffer(0, quad_vbo.slice(..));
        rpass.set_index_buffer(quad_ibo.slice(..), wgpu::IndexFormat::Uint16);
        rpass.draw_indexed(0..QUAD_INDICES.len() as u32, 0, 0..1);
    }

    fn ensure_format(&mut self, ctx: &RenderCtx<'_>) {
        if self.pipeline_format == Some(ctx.surface_format) {
            return;
        }
        if self.pipeline_format.is_some() {
            log::debug!(
                "TextureRenderer: surface format changed to {:?}; rebuilding pipelines",
                ctx.surface_format
            );
        }
        self.pipelines.clear();
        self.pipeline_format = Some(ctx.surface_format);
    }

    fn ensure_pipeline(&mut self, ctx: &RenderCtx<'_>, kind: PipelineKind) {
        if self.pipelines.contains_key(&kind) {
            return;
        }

        let source = format!("{QUAD_WGSL}\n{}", kind.fragment_source());
        let shader = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(kind.label()),
            source: wgpu::ShaderSource::Wgsl(source.into()),
        });

        let mut layout_entries = vec![wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: Some(quad_ubo_min_binding_size()),
            },
            count: None,
        }];
        layout_entries.extend((0..kind.texture_slots()).map(|i| {
            wgpu::BindGroupLayoutEntry {
                binding: i as u32 + 1,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Texture {
                    // Texels are fetched with textureLoad; float32 formats are not filterable.
                    sample_type: wgpu::TextureSampleType::Float { filterable: false },
                    view_dimension: wgpu::TextureViewDimension::D2,
                    multisampled: false,
                },
                count: None,
            }
        }));

        let bind_group_layout =
            ctx.device
                .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                    label: Some(kind.label()),
                    entries: &layout_entries,
                });

        let pipeline_layout = ctx.device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some(kind.label()),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let pipeline = ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(kind.label()),
            layout: Some(&pipeline_layout),

            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[QuadVertex::layout()],
            },

            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some(kind.fragment_entry()),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: ctx.surface_format,
                    blend: Some(premul_alpha_blend()),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),

            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },

            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        log::debug!("TextureRenderer: built pipeline {:?} for {:?}", kind, ctx.surface_format);

        self.pipelines.insert(
            kind,
            Pipeline {
                pipeline,
                bind_group_layout,
            },
        );
    }

    fn ensure_static_buffers(&mut self, ctx: &RenderCtx<'_>) {
        if self.quad_vbo.is_some() && self.quad_ibo.is_some() {
            return;
        }

        self.quad_vbo = Some(ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("glimpse quad vbo"),
            contents: bytemuck::cast_slice(&QUAD_VERTICES),
            usage: wgpu::BufferUsages::VERTEX,
        }));

        self.quad_ibo = Some(ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("glimpse quad ibo"),
            contents: bytemuck::cast_slice(&QUAD_INDICES),
            usage: wgpu::BufferUsages::INDEX,
        }));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn colormap_binds_value_and_lut_textures() {
        assert_eq!(PipelineKind::Colormap(SliceShader::Linear).texture_slots(), 2);
        assert_eq!(PipelineKind::Plain(TextureKind::OneD).texture_slots(), 1);
    }

    #[test]
    fn shaders_declare_no_1d_textures() {
        for src in [
            QUAD_WGSL,
            PipelineKind::Plain(TextureKind::OneD).fragment_source(),
            PipelineKind::Colormap(SliceShader::Nearest).fragment_source(),
        ] {
            assert!(!src.contains("texture_1d"));
        }
    }

    #[test]
    fn shader_variants_select_entry_points() {
        assert_eq!(PipelineKind::Colormap(SliceShader::Nearest).fragment_entry(), "fs_nearest");
        assert_eq!(PipelineKind::Colormap(SliceShader::Linear).fragment_entry(), "fs_linear");
        assert_eq!(PipelineKind::Plain(TextureKind::TwoD).fragment_entry(), "fs_main");
    }

    #[test]
    fn fragment_sources_define_their_entry_points() {
        for kind in [
            PipelineKind::Plain(TextureKind::OneD),
            PipelineKind::Plain(TextureKind::TwoD),
            PipelineKind::Colormap(SliceShader::Nearest),
            PipelineKind::Colormap(SliceShader::Linear),
        ] {
            let needle = format!("fn {}(", kind.fragment_entry());
            assert!(kind.fragment_source().contains(&needle), "{kind:?}");
        }
        assert!(QUAD_WGSL.contains("fn vs_main("));
    }
}
