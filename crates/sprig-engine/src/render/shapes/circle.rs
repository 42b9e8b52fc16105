use std::ops::Range;

use bytemuck::{Pod, Zeroable};

use crate::render::RenderCtx;
use crate::scene::shapes::CircleCmd;

use super::common::{
    create_quad_pipeline, create_viewport_ubo, viewport_layout_entry, write_viewport,
    InstanceBuffer, QuadBuffers,
};

struct CirclePipeline {
    format: wgpu::TextureFormat,
    pipeline: wgpu::RenderPipeline,
    bind_group: wgpu::BindGroup,
    viewport_ubo: wgpu::Buffer,
    quad: QuadBuffers,
}

/// Renderer for `DrawCmd::Circle`.
///
/// Discs and rings are evaluated per fragment from the distance to the
/// center, with one pixel of coverage falloff on each edge.
pub struct CircleRenderer {
    gpu: Option<CirclePipeline>,
    instances: InstanceBuffer<CircleInstance>,
}

impl Default for CircleRenderer {
    fn default() -> Self {
        Self { gpu: None, instances: InstanceBuffer::new("sprig circle instance vbo") }
    }
}

impl CircleRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&mut self, ctx: &RenderCtx<'_>) {
        self.ensure_pipeline(ctx);
        self.instances.clear();
    }

    /// Queues one circle. Non-positive radii draw nothing.
    pub fn push(&mut self, cmd: &CircleCmd) -> Range<u32> {
        if cmd.radius.is_nan() || cmd.radius <= 0.0 || !cmd.center.is_finite() {
            let end = self.instances.len();
            return end..end;
        }
        self.instances.push(CircleInstance {
            center: cmd.center.to_array(),
            radius: cmd.radius,
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
            label: Some("sprig circle bgl"),
            entries: &[viewport_layout_entry(0)],
        });

        let pipeline = create_quad_pipeline(
            ctx,
            "sprig circle",
            include_str!("shaders/circle.wgsl"),
            &[&bgl],
            CircleInstance::layout(),
        );

        let viewport_ubo = create_viewport_ubo(ctx, "sprig circle viewport ubo");
        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("sprig circle bind group"),
            layout: &bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: viewport_ubo.as_entire_binding(),
            }],
        });

        self.gpu = Some(CirclePipeline {
            format: ctx.surface_format,
            pipeline,
            bind_group,
            viewport_ubo,
            quad: QuadBuffers::new(ctx, "sprig circle"),
        });
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct CircleInstance {
    center: [f32; 2],
    radius: f32,
    /// 0 = fill.
    stroke_width: f32,
    color: [f32; 4],
}

impl CircleInstance {
    const ATTRS: [wgpu::VertexAttribute; 4] = wgpu::vertex_attr_array![
        1 => Float32x2, // center
        2 => Float32,   // radius
        3 => Float32,   // stroke_width
        4 => Float32x4  // color
    ];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<CircleInstance>() as u64,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRS,
        }
    }
}
