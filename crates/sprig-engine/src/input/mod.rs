//! Input subsystem.
//!
//! Public API is platform-agnostic and does not expose winit types.
//! The window runtime translates platform events into `InputEvent`s.

mod frame;
mod keyboard;
mod state;
mod types;

pub use frame::InputFrame;
pub use keyboard::KeyboardState;
pub use state::InputState;
pub use types::{InputEvent, Key, KeyState};
