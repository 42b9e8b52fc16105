//! Frame timing.
//!
//! One `FrameClock` drives the loop; `tick()` is called once per presented
//! frame and its `dt` is what scripts receive in `update`.

mod frame_clock;

pub use frame_clock::{FrameClock, FrameTime};
