//! Sprig engine crate.
//!
//! This crate owns the platform + GPU runtime pieces the scripting host draws
//! through: a single window, keyboard state, a frame clock, and a recorded
//! 2D canvas rendered with wgpu.

pub mod canvas;
pub mod coords;
pub mod core;
pub mod device;
pub mod input;
pub mod logging;
pub mod paint;
pub mod render;
pub mod scene;
pub mod sprite;
pub mod text;
pub mod time;
pub mod window;
