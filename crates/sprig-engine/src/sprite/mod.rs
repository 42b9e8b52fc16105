//! Decoded sprite images and the store that hands out [`SpriteId`]s.
//!
//! Decoding happens on the CPU at load time; the sprite renderer uploads each
//! image to its own texture the first time it is drawn.

mod store;

pub use store::{SpriteId, SpriteImage, SpriteLoadError, SpriteStore};
