//! Renderer Module - The positioned element output consumed by embedders.

mod element;

pub use element::{ElementStyle, SpriteRef, VisualElement};
