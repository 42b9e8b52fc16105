//! GPU rendering subsystem.
//!
//! `SceneRenderer` consumes a frame's `DrawList` and issues one render pass.
//! Each shape renderer owns its own GPU resources (pipelines, buffers).
//!
//! Convention:
//! - CPU geometry is in logical pixels (top-left origin, +Y down).
//! - Vertex shaders convert to NDC using a viewport uniform.

mod ctx;
mod scene;
pub mod shapes;

pub use ctx::{RenderCtx, RenderTarget};
pub use scene::SceneRenderer;
