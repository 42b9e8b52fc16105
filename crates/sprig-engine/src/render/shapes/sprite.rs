use std::collections::HashMap;
use std::ops::Range;

use bytemuck::{Pod, Zeroable};

use crate::render::RenderCtx;
use crate::scene::shapes::SpriteCmd;
use crate::sprite::{SpriteId, SpriteImage, SpriteStore};

use super::common::{
    create_quad_pipeline, create_viewport_ubo, viewport_layout_entry, write_viewport,
    InstanceBuffer, QuadBuffers,
};

struct SpritePipeline {
    format: wgpu::TextureFormat,
    pipeline: wgpu::RenderPipeline,
    viewport_bind_group: wgpu::BindGroup,
    texture_layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    viewport_ubo: wgpu::Buffer,
    quad: QuadBuffers,
}

/// One uploaded sprite. The texture is kept alive alongside its bind group.
struct SpriteTexture {
    _texture: wgpu::Texture,
    bind_group: wgpu::BindGroup,
}

/// Renderer for `DrawCmd::Sprite`.
///
/// Each sprite gets its own `Rgba8UnormSrgb` texture, uploaded the first
/// time it is drawn. Sampling is nearest-neighbour so scaled pixel art stays
/// crisp.
pub struct SpriteRenderer {
    gpu: Option<SpritePipeline>,
    textures: HashMap<SpriteId, SpriteTexture>,
    instances: InstanceBuffer<SpriteInstance>,
}

impl Default for SpriteRenderer {
    fn default() -> Self {
        Self {
            gpu: None,
            textures: HashMap::new(),
            instances: InstanceBuffer::new("sprig sprite instance vbo"),
        }
    }
}

impl SpriteRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&mut self, ctx: &RenderCtx<'_>) {
        self.ensure_pipeline(ctx);
        self.instances.clear();
    }

    /// Queues one sprite, uploading its texture if this is its first draw.
    pub fn push(&mut self, ctx: &RenderCtx<'_>, cmd: &SpriteCmd, store: &SpriteStore) -> Range<u32> {
        let end = self.instances.len();
        let Some(image) = store.get(cmd.sprite) else {
            log::warn!("unknown sprite {:?}; skipped", cmd.sprite);
            return end..end;
        };
        if !self.ensure_texture(ctx, cmd.sprite, image) {
            return end..end;
        }

        let size = image.size().scale(cmd.scale);
        self.instances.push(SpriteInstance {
            origin: cmd.origin.to_array(),
            size: size.to_array(),
        })
    }

    pub fn upload(&mut self, ctx: &RenderCtx<'_>) {
        if let Some(gpu) = &self.gpu {
            write_viewport(ctx, &gpu.viewport_ubo);
        }
        self.instances.upload(ctx);
    }

    pub fn draw(&self, rpass: &mut wgpu::RenderPass<'_>, sprite: SpriteId, range: Range<u32>) {
        let (Some(gpu), Some(texture)) = (&self.gpu, self.textures.get(&sprite)) else { return };
        if range.is_empty() {
            return;
        }
        rpass.set_pipeline(&gpu.pipeline);
        rpass.set_bind_group(0, &gpu.viewport_bind_group, &[]);
        rpass.set_bind_group(1, &texture.bind_group, &[]);
        gpu.quad.bind(rpass);
        if self.instances.bind(rpass) {
            rpass.draw_indexed(0..6, 0, range);
        }
    }

    fn ensure_texture(&mut self, ctx: &RenderCtx<'_>, id: SpriteId, image: &SpriteImage) -> bool {
        if self.textures.contains_key(&id) {
            return true;
        }
        let Some(gpu) = &self.gpu else { return false };
        if image.width == 0 || image.height == 0 {
            return false;
        }

        let extent = wgpu::Extent3d {
            width: image.width,
            height: image.height,
            depth_or_array_layers: 1,
        };
        let texture = ctx.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("sprig sprite texture"),
            size: extent,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        ctx.queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            &image.rgba,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(image.width * 4),
                rows_per_image: Some(image.height),
            },
            extent,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("sprig sprite bind group"),
            layout: &gpu.texture_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&gpu.sampler),
                },
            ],
        });

        log::debug!("uploaded sprite {id:?} ({}x{})", image.width, image.height);
        self.textures.insert(id, SpriteTexture { _texture: texture, bind_group });
        true
    }

    fn ensure_pipeline(&mut self, ctx: &RenderCtx<'_>) {
        if self.gpu.as_ref().is_some_and(|g| g.format == ctx.surface_format) {
            return;
        }

        let viewport_layout = ctx.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("sprig sprite viewport bgl"),
            entries: &[viewport_layout_entry(0)],
        });

        let texture_layout = ctx.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("sprig sprite texture bgl"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let pipeline = create_quad_pipeline(
            ctx,
            "sprig sprite",
            include_str!("shaders/sprite.wgsl"),
            &[&viewport_layout, &texture_layout],
            SpriteInstance::layout(),
        );

        let sampler = ctx.device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("sprig sprite sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            mipmap_filter: wgpu::MipmapFilterMode::Nearest,
            ..Default::default()
        });

        let viewport_ubo = create_viewport_ubo(ctx, "sprig sprite viewport ubo");
        let viewport_bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("sprig sprite viewport bind group"),
            layout: &viewport_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: viewport_ubo.as_entire_binding(),
            }],
        });

        // Texture bind groups reference the old layout; rebuild lazily.
        self.textures.clear();
        self.gpu = Some(SpritePipeline {
            format: ctx.surface_format,
            pipeline,
            viewport_bind_group,
            texture_layout,
            sampler,
            viewport_ubo,
            quad: QuadBuffers::new(ctx, "sprig sprite"),
        });
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct SpriteInstance {
    origin: [f32; 2],
    /// Scaled extent; negative flips the image.
    size: [f32; 2],
}

impl SpriteInstance {
    const ATTRS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
        1 => Float32x2, // origin
        2 => Float32x2  // size
    ];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<SpriteInstance>() as u64,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRS,
        }
    }
}
