//! Draw stream types.
//!
//! The canvas records `DrawCmd`s into a `DrawList`; `render::SceneRenderer`
//! consumes the list once per frame.

mod cmd;
mod list;

pub mod shapes;

pub use cmd::DrawCmd;
pub use list::DrawList;
pub use shapes::PaintStyle;
