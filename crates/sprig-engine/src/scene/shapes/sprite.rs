use crate::coords::Vec2;
use crate::scene::{DrawCmd, DrawList};
use crate::sprite::SpriteId;

/// Sprite draw payload.
#[derive(Debug, Clone, PartialEq)]
pub struct SpriteCmd {
    pub sprite: SpriteId,
    /// Top-left corner in logical pixels.
    pub origin: Vec2,
    /// Multiplier applied to the image's pixel size per axis.
    pub scale: Vec2,
}

impl DrawList {
    #[inline]
    pub fn push_sprite(&mut self, sprite: SpriteId, origin: Vec2, scale: Vec2) {
        self.push(DrawCmd::Sprite(SpriteCmd { sprite, origin, scale }));
    }
}
