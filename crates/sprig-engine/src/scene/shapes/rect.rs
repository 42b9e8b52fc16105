use crate::coords::Rect;
use crate::paint::Color;
use crate::scene::{DrawCmd, DrawList};

use super::PaintStyle;

/// Rectangle draw payload.
#[derive(Debug, Clone, PartialEq)]
pub struct RectCmd {
    pub rect: Rect,
    pub color: Color,
    pub style: PaintStyle,
}

impl DrawList {
    #[inline]
    pub fn push_rect(&mut self, rect: Rect, color: Color, style: PaintStyle) {
        self.push(DrawCmd::Rect(RectCmd { rect, color, style }));
    }
}
