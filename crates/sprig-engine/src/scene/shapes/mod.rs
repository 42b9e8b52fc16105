pub(crate) mod circle;
pub(crate) mod rect;
pub(crate) mod sprite;
pub(crate) mod text;

pub use circle::CircleCmd;
pub use rect::RectCmd;
pub use sprite::SpriteCmd;
pub use text::TextCmd;

/// Whether a shape is filled or outlined with a 1px stroke.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum PaintStyle {
    Fill,
    Stroke,
}

/// Stroke width used for outlined shapes, in logical pixels.
pub const STROKE_WIDTH: f32 = 1.0;

impl PaintStyle {
    /// Width passed to shaders; 0 means fill.
    #[inline]
    pub fn stroke_width(self) -> f32 {
        match self {
            PaintStyle::Fill => 0.0,
            PaintStyle::Stroke => STROKE_WIDTH,
        }
    }
}
