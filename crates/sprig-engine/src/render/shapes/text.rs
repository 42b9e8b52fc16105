use std::collections::HashMap;
use std::ops::Range;

use bytemuck::{Pod, Zeroable};
use fontdue::layout::{CoordinateSystem, GlyphRasterConfig, Layout, LayoutSettings, TextStyle};

use crate::render::RenderCtx;
use crate::scene::shapes::TextCmd;
use crate::text::FontSystem;

use super::common::{
    create_quad_pipeline, create_viewport_ubo, viewport_layout_entry, write_viewport,
    InstanceBuffer, QuadBuffers,
};

// ── atlas constants ────────────────────────────────────────────────────────

const ATLAS_SIZE: u32 = 1024;
const GLYPH_PADDING: u32 = 1; // pixels between glyphs in the atlas

struct CachedGlyph {
    uv_min: [f32; 2],
    uv_max: [f32; 2],
}

/// Shelf-packed R8 glyph atlas. Glyphs are never evicted; once full, new
/// glyphs are dropped with a single warning.
struct GlyphAtlas {
    texture: wgpu::Texture,
    view: wgpu::TextureView,
    cursor_x: u32,
    cursor_y: u32,
    row_height: u32,
    full: bool,
    glyphs: HashMap<GlyphRasterConfig, CachedGlyph>,
}

impl GlyphAtlas {
    fn new(ctx: &RenderCtx<'_>) -> Self {
        let texture = ctx.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("sprig text atlas"),
            size: wgpu::Extent3d {
                width: ATLAS_SIZE,
                height: ATLAS_SIZE,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::R8Unorm,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Self {
            texture,
            view,
            cursor_x: GLYPH_PADDING,
            cursor_y: GLYPH_PADDING,
            row_height: 0,
            full: false,
            glyphs: HashMap::new(),
        }
    }

    /// Returns the cached glyph, rasterizing and uploading it on first use.
    fn glyph(
        &mut self,
        ctx: &RenderCtx<'_>,
        font: &fontdue::Font,
        key: GlyphRasterConfig,
    ) -> Option<&CachedGlyph> {
        if !self.glyphs.contains_key(&key) {
            let (metrics, bitmap) = font.rasterize_config(key);
            let placed = self.place(ctx, &bitmap, metrics.width as u32, metrics.height as u32)?;
            self.glyphs.insert(key, placed);
        }
        self.glyphs.get(&key)
    }

    fn place(&mut self, ctx: &RenderCtx<'_>, bitmap: &[u8], w: u32, h: u32) -> Option<CachedGlyph> {
        if self.full || w == 0 || h == 0 {
            return None;
        }

        if self.cursor_x + w + GLYPH_PADDING > ATLAS_SIZE {
            self.cursor_y += self.row_height + GLYPH_PADDING;
            self.cursor_x = GLYPH_PADDING;
            self.row_height = 0;
        }

        if self.cursor_y + h + GLYPH_PADDING > ATLAS_SIZE {
            log::warn!("glyph atlas is full ({ATLAS_SIZE}x{ATLAS_SIZE}); some glyphs will not be drawn");
            self.full = true;
            return None;
        }

        let (gx, gy) = (self.cursor_x, self.cursor_y);

        ctx.queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &self.texture,
                mip_level: 0,
                origin: wgpu::Origin3d { x: gx, y: gy, z: 0 },
                aspect: wgpu::TextureAspect::All,
            },
            bitmap,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(w),
                rows_per_image: Some(h),
            },
            wgpu::Extent3d { width: w, height: h, depth_or_array_layers: 1 },
        );

        self.cursor_x += w + GLYPH_PADDING;
        self.row_height = self.row_height.max(h);

        let atlas_f = ATLAS_SIZE as f32;
        Some(CachedGlyph {
            uv_min: [gx as f32 / atlas_f, gy as f32 / atlas_f],
            uv_max: [(gx + w) as f32 / atlas_f, (gy + h) as f32 / atlas_f],
        })
    }
}

struct TextPipeline {
    format: wgpu::TextureFormat,
    pipeline: wgpu::RenderPipeline,
    bind_group: wgpu::BindGroup,
    viewport_ubo: wgpu::Buffer,
    quad: QuadBuffers,
}

/// Renderer for `DrawCmd::Text`.
///
/// Glyphs are laid out and rasterized by fontdue at physical resolution
/// (`size * scale_factor`) and cached in the atlas keyed by
/// `GlyphRasterConfig` (font, glyph index, pixel size).
pub struct TextRenderer {
    gpu: Option<TextPipeline>,
    atlas: Option<GlyphAtlas>,
    instances: InstanceBuffer<GlyphInstance>,
    layout: Layout<()>,
}

impl Default for TextRenderer {
    fn default() -> Self {
        Self {
            gpu: None,
            atlas: None,
            instances: InstanceBuffer::new("sprig text instance vbo"),
            layout: Layout::new(CoordinateSystem::PositiveYDown),
        }
    }
}

impl TextRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&mut self, ctx: &RenderCtx<'_>) {
        if self.atlas.is_none() {
            self.atlas = Some(GlyphAtlas::new(ctx));
        }
        self.ensure_pipeline(ctx);
        self.instances.clear();
    }

    /// Lays out `cmd` and queues one instance per visible glyph.
    pub fn push(&mut self, ctx: &RenderCtx<'_>, cmd: &TextCmd, fonts: &FontSystem) -> Range<u32> {
        let start = self.instances.len();
        let (Some(font), Some(atlas)) = (fonts.font(), self.atlas.as_mut()) else {
            return start..start;
        };
        if cmd.text.is_empty() || cmd.size.is_nan() || cmd.size <= 0.0 {
            return start..start;
        }

        let scale = ctx.scale_factor.max(0.01);
        self.layout.reset(&LayoutSettings::default());
        self.layout.append(&[font], &TextStyle::new(&cmd.text, cmd.size * scale, 0));

        let color = cmd.color.to_array();
        for g in self.layout.glyphs() {
            if !g.char_data.rasterize() || g.width == 0 || g.height == 0 {
                continue;
            }
            let Some(cached) = atlas.glyph(ctx, font, g.key) else { continue };

            let x = cmd.origin.x + g.x / scale;
            let y = cmd.origin.y + g.y / scale;
            self.instances.push(GlyphInstance {
                dst_min: [x, y],
                dst_max: [x + g.width as f32 / scale, y + g.height as f32 / scale],
                uv_min: cached.uv_min,
                uv_max: cached.uv_max,
                color,
            });
        }

        start..self.instances.len()
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
        let Some(atlas) = self.atlas.as_ref() else { return };

        let bgl = ctx.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("sprig text bgl"),
            entries: &[
                viewport_layout_entry(0),
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let pipeline = create_quad_pipeline(
            ctx,
            "sprig text",
            include_str!("shaders/text.wgsl"),
            &[&bgl],
            GlyphInstance::layout(),
        );

        let sampler = ctx.device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("sprig text sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::MipmapFilterMode::Nearest,
            ..Default::default()
        });

        let viewport_ubo = create_viewport_ubo(ctx, "sprig text viewport ubo");
        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("sprig text bind group"),
            layout: &bgl,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: viewport_ubo.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&atlas.view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&sampler),
                },
            ],
        });

        self.gpu = Some(TextPipeline {
            format: ctx.surface_format,
            pipeline,
            bind_group,
            viewport_ubo,
            quad: QuadBuffers::new(ctx, "sprig text"),
        });
    }
}

/// Instance data layout (48 bytes):
///
///  offset  0  dst_min  [f32; 2]   loc 1
///  offset  8  dst_max  [f32; 2]   loc 2
///  offset 16  uv_min   [f32; 2]   loc 3
///  offset 24  uv_max   [f32; 2]   loc 4
///  offset 32  color    [f32; 4]   loc 5
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct GlyphInstance {
    dst_min: [f32; 2],
    dst_max: [f32; 2],
    uv_min: [f32; 2],
    uv_max: [f32; 2],
    color: [f32; 4],
}

impl GlyphInstance {
    const ATTRS: [wgpu::VertexAttribute; 5] = wgpu::vertex_attr_array![
        1 => Float32x2, // dst_min
        2 => Float32x2, // dst_max
        3 => Float32x2, // uv_min
        4 => Float32x2, // uv_max
        5 => Float32x4  // color
    ];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<GlyphInstance>() as u64,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRS,
        }
    }
}
