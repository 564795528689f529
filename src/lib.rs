//! # skinview
//!
//! Declarative skin rendering engine: node interpretation, pointer dispatch,
//! reactive updates.
//!
//! Built on [spark-signals](https://github.com/RLabs-Inc/spark-signals) for
//! the reactive pieces (render revision, pointer position).
//!
//! ## Architecture
//!
//! An external skin runtime owns a tree of typed [`Node`]s. `mount` walks
//! that tree and keeps a retained instance per renderable node; the embedder
//! pulls absolutely-positioned [`VisualElement`] snapshots out and feeds raw
//! pointer/keyboard input back in. Input comes out the other side as the
//! skin's semantic event vocabulary (`onLeftButtonDown`, `onDragOver`, ...)
//! delivered to the runtime.
//!
//! ```text
//! Node tree → ViewInstance tree → VisualElement snapshot → embedder
//!    ↑                                                        │
//!    └── Trigger ←── PointerDispatcher ←── raw input ←────────┘
//! ```
//!
//! Degradation is deliberate: a missing sprite suppresses the node and its
//! subtree, an unknown node kind passes its children through, and only a
//! broken tree invariant (a pointer target with no container ancestor)
//! panics.
//!
//! ## Modules
//!
//! - [`types`] - Core types (NodeKind, Rgb, TextAlign, Modifiers)
//! - [`engine`] - Node model, runtime bridge, image atlas
//! - [`primitives`] - Per-kind attribute resolution
//! - [`pipeline`] - Mount lifecycle and the render pass
//! - [`renderer`] - Positioned element output
//! - [`state`] - Pointer dispatch, capture state machine, key forwarding

pub mod engine;
pub mod pipeline;
pub mod primitives;
pub mod renderer;
pub mod state;
pub mod types;

// Re-export commonly used items
pub use types::*;

pub use engine::{
    container_origin, Cleanup, Command, ImageAtlas, Node, SkinRuntime, SpriteEntry, Trigger,
};

pub use pipeline::{mount, unmount, MountHandle, ViewInstance};

pub use primitives::{
    ButtonParams, ContainerParams, GroupParams, LayerParams, LayoutParams, MenuItem, MenuParams,
    TextParams,
};

pub use renderer::{ElementStyle, SpriteRef, VisualElement};

pub use state::{
    pointer_position, KeyEvent, KeyState, MouseButton, PointerAction, PointerDispatcher,
    PointerEvent,
};
