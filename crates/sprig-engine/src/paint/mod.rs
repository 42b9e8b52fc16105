//! Color model shared by the canvas and renderers.
//!
//! Colors are linear premultiplied RGBA; conversion from script-facing sRGB
//! names and hex literals happens once in [`Color::parse`].

mod color;

pub use color::{Color, ColorParseError};
