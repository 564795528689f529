//! Engine Module - The externally-owned model and its runtime bridge.
//!
//! - **Node** - the skin description tree the runtime owns and mutates
//! - **Runtime** - the semantic event vocabulary and the runtime trait
//! - **Atlas** - case-insensitive sprite lookup

mod atlas;
mod node;
mod runtime;

pub use atlas::{ImageAtlas, SpriteEntry};
pub use node::{container_origin, Cleanup, Command, Node};
pub use runtime::{SkinRuntime, Trigger};
