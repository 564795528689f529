//! Button and togglebutton resolution.
//!
//! Buttons render a sprite that swaps to `downImage` while the instance is
//! pressed (when the skin provides one). The pressed flag is ephemeral
//! per-instance state owned by the render layer, so it arrives here as an
//! argument - the resolver itself stays pure.

use std::collections::HashMap;

use log::warn;

use super::attr_i32;
use crate::engine::{ImageAtlas, SpriteEntry};

/// Visual parameters of a button or togglebutton node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ButtonParams {
    pub sprite: SpriteEntry,
    pub x: Option<i32>,
    pub y: Option<i32>,
    pub tooltip: Option<String>,
}

/// Resolve a button. `pressed` selects `downImage` when the attribute is
/// provided; otherwise `image` is used in both states. Returns `None` when
/// the node (and its subtree) must be suppressed: no usable image attribute,
/// or a sprite the atlas does not know.
pub fn resolve_button(
    node_id: &str,
    attrs: &HashMap<String, String>,
    atlas: &ImageAtlas,
    pressed: bool,
) -> Option<ButtonParams> {
    let image = if pressed {
        attrs.get("downImage").or_else(|| attrs.get("image"))
    } else {
        attrs.get("image")
    };
    let Some(image) = image else {
        warn!("button {node_id} has no image; rendering nothing");
        return None;
    };
    let Some(sprite) = atlas.lookup(image) else {
        warn!("button {node_id}: image {image:?} not in atlas; rendering nothing");
        return None;
    };

    Some(ButtonParams {
        sprite: sprite.clone(),
        x: attr_i32(attrs, "x"),
        y: attr_i32(attrs, "y"),
        tooltip: attrs.get("tooltip").cloned(),
    })
}
