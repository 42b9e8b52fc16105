//! Shape renderers.
//!
//! Every renderer follows the same per-frame protocol driven by
//! `SceneRenderer`: `begin` drops last frame's instances, `push_*` appends
//! instances and returns their range, `upload` writes them to the GPU, and
//! `draw` replays a range inside the shared render pass.

mod common;

pub mod circle;
pub mod rect;
pub mod sprite;
pub mod text;
