use std::ops::Range;

use bytemuck::{Pod, Zeroable};

use crate::render::RenderCtx;
use crate::scene::shapes::RectCmd;

use super::common::{
    create_quad_pipeline, create_viewport_ubo, viewport_layout_entry, write_viewport,
    InstanceBuffer, QuadBuffers,
};

/// GPU resources that only change with the surface format.
struct RectPipeline {
    format: wgpu::TextureFormat,
    pipeline: wgpu::RenderPipeline,
    bind_group: wgpu::BindGroup,
    viewport_ubo: wgpu::Buffer,
    quad: QuadBuffers,
}

/// Rectangle renderer (solid fill or 1px outline).
///
/// Geometry is in logical pixels and converted to NDC in the vertex shader.
/// Color is linear premultiplied RGBA.
pub struct RectRenderer {
    gpu: Option<RectPipeline>,
    instances: InstanceBuffer<RectInstance>,
}

impl Default for RectRenderer {
    fn default() -> Self {
        Self { gpu: None, instances: InstanceBuffer::new("sprig rect instance vbo") }
    }
}

impl RectRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&mut self, ctx: &RenderCtx<'_>) {
        self.ensure_pipeline(ctx);
        self.instances.clear();
    }

    /// Queues one rectangle. Empty or non-finite rects yield an empty range.
    pub fn push(&mut self, cmd: &RectCmd) -> Range<u32> {
        let r = cmd.rect.normalized();
        if r.is_empty() || !r.is_finite() {
            let end = self.instances.len();
            return end..end;
        }
        self.instances.push(RectInstance {
            origin: r.origin.to_array(),
            size: r.size.to_array(),
            stroke_width: cmd.style.stroke_width(),
            color: cmd.color.to_array(),
        })
    }

    pub fn upload(&mut self, ctx: &RenderCtx<'_>) {
        if let Some(gpu) = &self.gpu {
            write_viewport(ctx, &gpu.viewport_ubo);
        }
        self.instances.upload(ctx);
    }

    pub fn draw(&self, rpass: &mut wgpu::RenderPass<'_>, range: Range<u32>) {
        let Some(gpu) = &self.gpu else { return };
        if range.is_empty() {
            return;
        }
        rpass.set_pipeline(&gpu.pipeline);
        rpass.set_bind_group(0, &gpu.bind_group, &[]);
        gpu.quad.bind(rpass);
        if self.instances.bind(rpass) {
            rpass.draw_indexed(0..6, 0, range);
        }
    }

    fn ensure_pipeline(&mut self, ctx: &RenderCtx<'_>) {
        if self.gpu.as_ref().is_some_and(|g| g.format == ctx.surface_format) {
            return;
        }

        let bgl = ctx.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("sprig rect bgl"),
            entries: &[viewport_layout_entry(0)],
        });

        let pipeline = create_quad_pipeline(
            ctx,
            "sprig rect",
            include_str!("shaders/rect.wgsl"),
            &[&bgl],
            RectInstance::layout(),
        );

        let viewport_ubo = create_viewport_ubo(ctx, "sprig rect viewport ubo");
        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("sprig rect bind group"),
            layout: &bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: viewport_ubo.as_entire_binding(),
            }],
        });

        self.gpu = Some(RectPipeline {
            format: ctx.surface_format,
            pipeline,
            bind_group,
            viewport_ubo,
            quad: QuadBuffers::new(ctx, "sprig rect"),
        });
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct RectInstance {
    origin: [f32; 2],
    size: [f32; 2],
    /// 0 = fill.
    stroke_width: f32,
    color: [f32; 4],
}

impl RectInstance {
    const ATTRS: [wgpu::VertexAttribute; 4] = wgpu::vertex_attr_array![
        1 => Float32x2, // origin
        2 => Float32x2, // size
        3 => Float32,   // stroke_width
        4 => Float32x4  // color
    ];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<RectInstance>() as u64,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRS,
        }
    }
}
