use std::ops::Range;

use crate::paint::Color;
use crate::scene::{DrawCmd, DrawList};
use crate::sprite::{SpriteId, SpriteStore};
use crate::text::FontSystem;

use super::shapes::circle::CircleRenderer;
use super::shapes::rect::RectRenderer;
use super::shapes::sprite::SpriteRenderer;
use super::shapes::text::TextRenderer;
use super::{RenderCtx, RenderTarget};

/// Which renderer draws a batch. Sprites batch only with the same image.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum BatchKind {
    Rect,
    Circle,
    Text,
    Sprite(SpriteId),
}

#[derive(Debug, Clone, PartialEq)]
struct Batch {
    kind: BatchKind,
    instances: Range<u32>,
}

/// Appends `instances` to the batch list, extending the last batch when it
/// has the same kind and the ranges are contiguous.
fn push_batch(batches: &mut Vec<Batch>, kind: BatchKind, instances: Range<u32>) {
    if instances.is_empty() {
        return;
    }
    if let Some(last) = batches.last_mut() {
        if last.kind == kind && last.instances.end == instances.start {
            last.instances.end = instances.end;
            return;
        }
    }
    batches.push(Batch { kind, instances });
}

/// Draws a whole `DrawList` in one render pass.
///
/// Commands are painted in recording order: consecutive commands of the same
/// kind are merged into one instanced draw, and a change of kind starts a new
/// draw, so a circle recorded between two rects ends up between them on
/// screen.
#[derive(Default)]
pub struct SceneRenderer {
    rects: RectRenderer,
    circles: CircleRenderer,
    text: TextRenderer,
    sprites: SpriteRenderer,
    batches: Vec<Batch>,
}

impl SceneRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn render(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        list: &DrawList,
        sprites: &SpriteStore,
        fonts: &FontSystem,
    ) {
        self.rects.begin(ctx);
        self.circles.begin(ctx);
        self.text.begin(ctx);
        self.sprites.begin(ctx);
        self.batches.clear();

        for cmd in list.items() {
            let (kind, range) = match cmd {
                DrawCmd::Rect(c) => (BatchKind::Rect, self.rects.push(c)),
                DrawCmd::Circle(c) => (BatchKind::Circle, self.circles.push(c)),
                DrawCmd::Text(c) => (BatchKind::Text, self.text.push(ctx, c, fonts)),
                DrawCmd::Sprite(c) => {
                    (BatchKind::Sprite(c.sprite), self.sprites.push(ctx, c, sprites))
                }
            };
            push_batch(&mut self.batches, kind, range);
        }

        self.rects.upload(ctx);
        self.circles.upload(ctx);
        self.text.upload(ctx);
        self.sprites.upload(ctx);

        let clear = list.clear_color().unwrap_or(Color::BLACK);
        let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("sprig scene pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(clear.to_wgpu()),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        for batch in &self.batches {
            let range = batch.instances.clone();
            match batch.kind {
                BatchKind::Rect => self.rects.draw(&mut rpass, range),
                BatchKind::Circle => self.circles.draw(&mut rpass, range),
                BatchKind::Text => self.text.draw(&mut rpass, range),
                BatchKind::Sprite(id) => self.sprites.draw(&mut rpass, id, range),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(batches: &[Batch]) -> Vec<BatchKind> {
        batches.iter().map(|b| b.kind).collect()
    }

    #[test]
    fn contiguous_same_kind_merges() {
        let mut batches = Vec::new();
        push_batch(&mut batches, BatchKind::Rect, 0..1);
        push_batch(&mut batches, BatchKind::Rect, 1..2);
        assert_eq!(batches, [Batch { kind: BatchKind::Rect, instances: 0..2 }]);
    }

    #[test]
    fn kind_change_keeps_paint_order() {
        let mut batches = Vec::new();
        push_batch(&mut batches, BatchKind::Rect, 0..1);
        push_batch(&mut batches, BatchKind::Circle, 0..1);
        push_batch(&mut batches, BatchKind::Rect, 1..2);
        assert_eq!(kinds(&batches), [BatchKind::Rect, BatchKind::Circle, BatchKind::Rect]);
        assert_eq!(batches[2].instances, 1..2);
    }

    #[test]
    fn different_sprites_do_not_merge() {
        let mut batches = Vec::new();
        push_batch(&mut batches, BatchKind::Sprite(SpriteId(0)), 0..1);
        push_batch(&mut batches, BatchKind::Sprite(SpriteId(1)), 1..2);
        push_batch(&mut batches, BatchKind::Sprite(SpriteId(1)), 2..3);
        assert_eq!(batches.len(), 2);
        assert_eq!(batches[1].instances, 1..3);
    }

    #[test]
    fn empty_ranges_are_dropped() {
        let mut batches = Vec::new();
        push_batch(&mut batches, BatchKind::Rect, 0..1);
        push_batch(&mut batches, BatchKind::Text, 0..0);
        push_batch(&mut batches, BatchKind::Rect, 1..2);
        assert_eq!(kinds(&batches), [BatchKind::Rect]);
    }
}
