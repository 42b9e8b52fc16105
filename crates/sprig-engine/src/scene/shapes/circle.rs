use crate::coords::Vec2;
use crate::paint::Color;
use crate::scene::{DrawCmd, DrawList};

use super::PaintStyle;

/// Circle draw payload.
#[derive(Debug, Clone, PartialEq)]
pub struct CircleCmd {
    pub center: Vec2,
    pub radius: f32,
    pub color: Color,
    pub style: PaintStyle,
}

impl DrawList {
    #[inline]
    pub fn push_circle(&mut self, center: Vec2, radius: f32, color: Color, style: PaintStyle) {
        self.push(DrawCmd::Circle(CircleCmd { center, radius, color, style }));
    }
}
