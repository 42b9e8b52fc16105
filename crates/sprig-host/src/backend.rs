//! The drawing and input surface the host forwards script calls to.

use std::path::Path;

use anyhow::{Context, Result};
use sprig_engine::canvas::Canvas;
use sprig_engine::input::Key;
use sprig_engine::paint::Color;

/// Backend-issued sprite reference. Only meaningful to the backend that
/// produced it.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct SpriteHandle(usize);

impl SpriteHandle {
    pub const fn from_raw(raw: usize) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> usize {
        self.0
    }
}

/// Rendering and keyboard operations used by the script capabilities.
///
/// Coordinates are logical pixels with the origin at the top-left corner.
pub trait Backend {
    fn load_sprite(&mut self, path: &Path) -> Result<SpriteHandle>;

    fn clear(&mut self, color: Color);
    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color);
    fn stroke_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color);
    fn fill_circle(&mut self, x: f32, y: f32, radius: f32, color: Color);
    fn stroke_circle(&mut self, x: f32, y: f32, radius: f32, color: Color);
    fn draw_text(&mut self, text: &str, x: f32, y: f32, size: f32, color: Color);
    fn draw_sprite(&mut self, sprite: SpriteHandle, x: f32, y: f32, scale_x: f32, scale_y: f32);

    /// Unknown codes report `false`.
    fn key_down(&self, code: i32) -> bool;
    fn key_pressed(&self, code: i32) -> bool;

    /// Every key the backend knows, as `(NAME, code)`.
    fn key_codes(&self) -> Vec<(&'static str, i32)>;
}

impl Backend for Canvas {
    fn load_sprite(&mut self, path: &Path) -> Result<SpriteHandle> {
        let id = Canvas::load_sprite(self, path)
            .with_context(|| format!("decoding sprite {}", path.display()))?;
        Ok(SpriteHandle::from_raw(id.index()))
    }

    fn clear(&mut self, color: Color) {
        Canvas::clear(self, color);
    }

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color) {
        Canvas::fill_rect(self, x, y, w, h, color);
    }

    fn stroke_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color) {
        Canvas::stroke_rect(self, x, y, w, h, color);
    }

    fn fill_circle(&mut self, x: f32, y: f32, radius: f32, color: Color) {
        Canvas::fill_circle(self, x, y, radius, color);
    }

    fn stroke_circle(&mut self, x: f32, y: f32, radius: f32, color: Color) {
        Canvas::stroke_circle(self, x, y, radius, color);
    }

    fn draw_text(&mut self, text: &str, x: f32, y: f32, size: f32, color: Color) {
        Canvas::draw_text(self, text, x, y, size, color);
    }

    fn draw_sprite(&mut self, sprite: SpriteHandle, x: f32, y: f32, scale_x: f32, scale_y: f32) {
        match self.sprites().id_at(sprite.raw()) {
            Some(id) => Canvas::draw_sprite(self, id, x, y, scale_x, scale_y),
            None => log::warn!("draw_sprite: stale handle {}", sprite.raw()),
        }
    }

    fn key_down(&self, code: i32) -> bool {
        Key::from_code(code).is_some_and(|k| Canvas::key_down(self, k))
    }

    fn key_pressed(&self, code: i32) -> bool {
        Key::from_code(code).is_some_and(|k| Canvas::key_pressed(self, k))
    }

    fn key_codes(&self) -> Vec<(&'static str, i32)> {
        Key::ALL.iter().map(|k| (k.name(), k.code())).collect()
    }
}

#[cfg(test)]
pub(crate) mod recording {
    //! A backend that records calls as strings, for host tests.

    use super::*;

    #[derive(Debug, Default)]
    pub struct RecordingBackend {
        pub calls: Vec<String>,
        pub loaded: Vec<std::path::PathBuf>,
        pub down: Vec<i32>,
        pub pressed: Vec<i32>,
    }

    impl RecordingBackend {
        pub fn take(&mut self) -> Vec<String> {
            std::mem::take(&mut self.calls)
        }
    }

    fn rgba(c: Color) -> String {
        let [r, g, b, a] = c.to_array();
        format!("{r:.2},{g:.2},{b:.2},{a:.2}")
    }

    impl Backend for RecordingBackend {
        fn load_sprite(&mut self, path: &Path) -> Result<SpriteHandle> {
            if !path.is_file() {
                anyhow::bail!("no such file");
            }
            self.loaded.push(path.to_path_buf());
            Ok(SpriteHandle::from_raw(self.loaded.len() - 1))
        }

        fn clear(&mut self, color: Color) {
            self.calls.push(format!("clear {}", rgba(color)));
        }

        fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color) {
            self.calls.push(format!("fill_rect {x} {y} {w} {h} {}", rgba(color)));
        }

        fn stroke_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color) {
            self.calls.push(format!("stroke_rect {x} {y} {w} {h} {}", rgba(color)));
        }

        fn fill_circle(&mut self, x: f32, y: f32, radius: f32, color: Color) {
            self.calls.push(format!("fill_circle {x} {y} {radius} {}", rgba(color)));
        }

        fn stroke_circle(&mut self, x: f32, y: f32, radius: f32, color: Color) {
            self.calls.push(format!("stroke_circle {x} {y} {radius} {}", rgba(color)));
        }

        fn draw_text(&mut self, text: &str, x: f32, y: f32, size: f32, color: Color) {
            self.calls.push(format!("draw_text {text:?} {x} {y} {size} {}", rgba(color)));
        }

        fn draw_sprite(&mut self, sprite: SpriteHandle, x: f32, y: f32, sx: f32, sy: f32) {
            self.calls.push(format!("draw_sprite #{} {x} {y} {sx} {sy}", sprite.raw()));
        }

        fn key_down(&self, code: i32) -> bool {
            self.down.contains(&code)
        }

        fn key_pressed(&self, code: i32) -> bool {
            self.pressed.contains(&code)
        }

        fn key_codes(&self) -> Vec<(&'static str, i32)> {
            vec![("SPACE", 32), ("A", 65), ("UP", 265)]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sprig_engine::input::{InputEvent, InputFrame, InputState, KeyState, KeyboardState};
    use sprig_engine::scene::DrawCmd;
    use sprig_engine::text::FontSystem;

    fn canvas() -> Canvas {
        Canvas::with_font_system(FontSystem::new())
    }

    #[test]
    fn canvas_exposes_every_engine_key() {
        let codes = Backend::key_codes(&canvas());
        assert_eq!(codes.len(), Key::ALL.len());
        assert!(codes.contains(&("SPACE", 32)));
        assert!(codes.contains(&("ESCAPE", 256)));
    }

    #[test]
    fn escape_reaches_the_backend_like_any_key() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();
        state.apply_event(
            &mut frame,
            InputEvent::Key { key: Key::Escape, state: KeyState::Pressed, repeat: false },
        );
        let mut c = canvas();
        c.begin_frame(KeyboardState::capture(&state, &frame));
        assert!(Backend::key_pressed(&c, 256));
        assert!(Backend::key_down(&c, Key::Escape.code()));
    }

    #[test]
    fn unknown_key_codes_are_not_down() {
        let c = canvas();
        assert!(!Backend::key_down(&c, -1));
        assert!(!Backend::key_pressed(&c, 9999));
    }

    #[test]
    fn canvas_records_forwarded_draws() {
        let mut c = canvas();
        Backend::clear(&mut c, Color::WHITE);
        Backend::fill_rect(&mut c, 1.0, 2.0, 3.0, 4.0, Color::BLACK);
        Backend::stroke_circle(&mut c, 5.0, 5.0, 2.0, Color::BLACK);
        assert_eq!(c.draw_list().clear_color(), Some(Color::WHITE));
        assert!(matches!(c.draw_list().items()[0], DrawCmd::Rect(_)));
        assert!(matches!(c.draw_list().items()[1], DrawCmd::Circle(_)));
    }

    #[test]
    fn canvas_sprite_load_failure_is_an_error() {
        let mut c = canvas();
        assert!(Backend::load_sprite(&mut c, Path::new("/nope/ghost.png")).is_err());
    }
}
