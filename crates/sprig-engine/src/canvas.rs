//! Immediate-mode 2D canvas the scripting host draws through.
//!
//! Drawing calls only record into a [`DrawList`]; nothing touches the GPU
//! until [`Canvas::render`] runs at the end of the frame. This keeps the
//! canvas usable without a window, which is how the host's tests drive it.

use std::path::Path;

use crate::coords::{Rect, Vec2};
use crate::input::{Key, KeyboardState};
use crate::paint::Color;
use crate::render::{RenderCtx, RenderTarget, SceneRenderer};
use crate::scene::{DrawList, PaintStyle};
use crate::sprite::{SpriteId, SpriteLoadError, SpriteStore};
use crate::text::FontSystem;

pub struct Canvas {
    list: DrawList,
    sprites: SpriteStore,
    fonts: FontSystem,
    keyboard: KeyboardState,
    renderer: SceneRenderer,
}

impl Canvas {
    /// Canvas using the first system font found.
    pub fn new() -> Self {
        Self::with_font_system(FontSystem::with_system_font())
    }

    pub fn with_font_system(fonts: FontSystem) -> Self {
        Self {
            list: DrawList::new(),
            sprites: SpriteStore::new(),
            fonts,
            keyboard: KeyboardState::default(),
            renderer: SceneRenderer::new(),
        }
    }

    /// Starts recording a new frame with a fresh keyboard snapshot.
    pub fn begin_frame(&mut self, keyboard: KeyboardState) {
        self.list.reset();
        self.keyboard = keyboard;
    }

    /// Commands recorded so far this frame.
    pub fn draw_list(&self) -> &DrawList {
        &self.list
    }

    // ── drawing ───────────────────────────────────────────────────────────

    pub fn clear(&mut self, color: Color) {
        self.list.clear(color);
    }

    pub fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color) {
        self.list.push_rect(Rect::new(x, y, w, h), color, PaintStyle::Fill);
    }

    pub fn stroke_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color) {
        self.list.push_rect(Rect::new(x, y, w, h), color, PaintStyle::Stroke);
    }

    pub fn fill_circle(&mut self, x: f32, y: f32, radius: f32, color: Color) {
        self.list.push_circle(Vec2::new(x, y), radius, color, PaintStyle::Fill);
    }

    pub fn stroke_circle(&mut self, x: f32, y: f32, radius: f32, color: Color) {
        self.list.push_circle(Vec2::new(x, y), radius, color, PaintStyle::Stroke);
    }

    pub fn draw_text(&mut self, text: &str, x: f32, y: f32, size: f32, color: Color) {
        self.list.push_text(text, Vec2::new(x, y), size, color);
    }

    pub fn draw_sprite(&mut self, sprite: SpriteId, x: f32, y: f32, scale_x: f32, scale_y: f32) {
        self.list.push_sprite(sprite, Vec2::new(x, y), Vec2::new(scale_x, scale_y));
    }

    // ── assets ────────────────────────────────────────────────────────────

    /// Decodes an image file and keeps it for the canvas' lifetime.
    pub fn load_sprite(&mut self, path: impl AsRef<Path>) -> Result<SpriteId, SpriteLoadError> {
        self.sprites.load(path)
    }

    pub fn sprites(&self) -> &SpriteStore {
        &self.sprites
    }

    // ── input ─────────────────────────────────────────────────────────────

    pub fn key_down(&self, key: Key) -> bool {
        self.keyboard.key_down(key)
    }

    pub fn key_pressed(&self, key: Key) -> bool {
        self.keyboard.key_pressed(key)
    }

    // ── output ────────────────────────────────────────────────────────────

    /// Paints the recorded frame into `target`.
    pub fn render(&mut self, ctx: &RenderCtx<'_>, target: &mut RenderTarget<'_>) {
        self.renderer
            .render(ctx, target, &self.list, &self.sprites, &self.fonts);
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{InputEvent, InputFrame, InputState, KeyState};
    use crate::scene::DrawCmd;

    fn canvas() -> Canvas {
        Canvas::with_font_system(FontSystem::new())
    }

    #[test]
    fn records_in_call_order() {
        let mut c = canvas();
        c.clear(Color::BLACK);
        c.fill_rect(0.0, 0.0, 10.0, 10.0, Color::WHITE);
        c.stroke_circle(5.0, 5.0, 3.0, Color::WHITE);
        c.draw_text("hi", 1.0, 2.0, 12.0, Color::WHITE);

        let items = c.draw_list().items();
        assert_eq!(items.len(), 3);
        assert!(matches!(&items[0], DrawCmd::Rect(r) if r.style == PaintStyle::Fill));
        assert!(matches!(&items[1], DrawCmd::Circle(r) if r.style == PaintStyle::Stroke));
        assert!(matches!(&items[2], DrawCmd::Text(t) if t.text == "hi"));
    }

    #[test]
    fn begin_frame_starts_empty() {
        let mut c = canvas();
        c.fill_rect(0.0, 0.0, 1.0, 1.0, Color::WHITE);
        c.begin_frame(KeyboardState::default());
        assert!(c.draw_list().is_empty());
        assert_eq!(c.draw_list().clear_color(), None);
    }

    #[test]
    fn keyboard_snapshot_is_queried() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();
        state.apply_event(
            &mut frame,
            InputEvent::Key { key: Key::ArrowLeft, state: KeyState::Pressed, repeat: false },
        );

        let mut c = canvas();
        c.begin_frame(KeyboardState::capture(&state, &frame));
        assert!(c.key_down(Key::ArrowLeft));
        assert!(c.key_pressed(Key::ArrowLeft));
        assert!(!c.key_down(Key::ArrowRight));
    }

    #[test]
    fn sprite_scale_is_recorded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("s.png");
        image::RgbaImage::new(4, 4).save(&path).unwrap();

        let mut c = canvas();
        let id = c.load_sprite(&path).unwrap();
        c.draw_sprite(id, 1.0, 2.0, 2.0, 3.0);
        match &c.draw_list().items()[0] {
            DrawCmd::Sprite(s) => {
                assert_eq!(s.sprite, id);
                assert_eq!(s.scale, Vec2::new(2.0, 3.0));
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
