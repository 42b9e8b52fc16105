use crate::paint::Color;

use super::DrawCmd;

/// Draw commands recorded for one frame.
///
/// Commands are painted strictly in the order they were pushed; there is no
/// z-sorting. The clear color is part of the frame so the renderer can fold
/// it into the pass load op.
#[derive(Debug, Default)]
pub struct DrawList {
    clear: Option<Color>,
    items: Vec<DrawCmd>,
}

impl DrawList {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new frame. Keeps allocated capacity.
    pub fn reset(&mut self) {
        self.clear = None;
        self.items.clear();
    }

    /// Clears the screen to `color`.
    ///
    /// Everything recorded so far is discarded since it would be painted
    /// over anyway.
    pub fn clear(&mut self, color: Color) {
        self.clear = Some(color);
        self.items.clear();
    }

    /// Clear color for the frame, if the frame was cleared.
    #[inline]
    pub fn clear_color(&self) -> Option<Color> {
        self.clear
    }

    #[inline]
    pub fn push(&mut self, cmd: DrawCmd) {
        self.items.push(cmd);
    }

    /// Items in paint order (back to front).
    #[inline]
    pub fn items(&self) -> &[DrawCmd] {
        &self.items
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::{Rect, Vec2};
    use crate::scene::PaintStyle;

    #[test]
    fn keeps_push_order() {
        let mut list = DrawList::new();
        list.push_rect(Rect::new(0.0, 0.0, 1.0, 1.0), Color::WHITE, PaintStyle::Fill);
        list.push_circle(Vec2::new(5.0, 5.0), 2.0, Color::BLACK, PaintStyle::Stroke);
        list.push_rect(Rect::new(2.0, 2.0, 1.0, 1.0), Color::BLACK, PaintStyle::Fill);

        let kinds: Vec<&str> = list
            .items()
            .iter()
            .map(|c| match c {
                DrawCmd::Rect(_) => "rect",
                DrawCmd::Circle(_) => "circle",
                DrawCmd::Text(_) => "text",
                DrawCmd::Sprite(_) => "sprite",
            })
            .collect();
        assert_eq!(kinds, ["rect", "circle", "rect"]);
    }

    #[test]
    fn clear_discards_earlier_items() {
        let mut list = DrawList::new();
        list.push_rect(Rect::new(0.0, 0.0, 1.0, 1.0), Color::WHITE, PaintStyle::Fill);
        list.clear(Color::BLACK);
        list.push_circle(Vec2::new(1.0, 1.0), 1.0, Color::WHITE, PaintStyle::Fill);

        assert_eq!(list.len(), 1);
        assert_eq!(list.clear_color(), Some(Color::BLACK));
    }

    #[test]
    fn reset_forgets_clear_color() {
        let mut list = DrawList::new();
        list.clear(Color::WHITE);
        list.reset();
        assert_eq!(list.clear_color(), None);
        assert!(list.is_empty());
    }
}
