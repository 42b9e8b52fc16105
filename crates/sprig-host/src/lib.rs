//! Loads a sprig project and drives its Lua script.
//!
//! # Structure
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`manifest`] | `ProjectManifest`: typed view of `<project>` with defaults |
//! | [`registry`] | `AssetRegistry`: sprites and maps keyed by manifest entry minus extension |
//! | [`backend`] | `Backend` trait the capabilities draw through; impl for `Canvas` |
//! | [`capability`] | `CAPABILITIES`: the `screen` / `keyboard` descriptor table |
//! | [`bridge`] | `ScriptHost`: Lua runtime, lifecycle, named calls |
//! | [`context`] | `EngineContext`: boot sequence and per-frame dispatch |
//! | [`error`] | `HostError` |

pub mod backend;
pub mod bridge;
pub mod capability;
pub mod context;
pub mod error;
pub mod manifest;
pub mod registry;

pub use backend::{Backend, SpriteHandle};
pub use bridge::{HostState, ScriptHost, ENTRY_POINTS};
pub use capability::{Capability, CAPABILITIES};
pub use context::EngineContext;
pub use error::HostError;
pub use manifest::ProjectManifest;
pub use registry::AssetRegistry;
