//! Layer resolution.
//!
//! A layer is a positioned sprite. The `image` attribute is mandatory; a
//! layer that cannot resolve its sprite is suppressed together with its
//! subtree. The sprite supplies crop offset and dimensions, `x`/`y` offset
//! the absolute position.

use std::collections::HashMap;

use log::warn;

use super::attr_i32;
use crate::engine::{ImageAtlas, SpriteEntry};

/// Visual parameters of a layer node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerParams {
    pub sprite: SpriteEntry,
    pub x: Option<i32>,
    pub y: Option<i32>,
}

/// Resolve a layer. Returns `None` when the node (and its subtree) must be
/// suppressed: no `image` attribute, or a sprite the atlas does not know.
pub fn resolve_layer(
    node_id: &str,
    attrs: &HashMap<String, String>,
    atlas: &ImageAtlas,
) -> Option<LayerParams> {
    let Some(image) = attrs.get("image") else {
        warn!("layer {node_id} has no image; rendering nothing");
        return None;
    };
    let Some(sprite) = atlas.lookup(image) else {
        warn!("layer {node_id}: image {image:?} not in atlas; rendering nothing");
        return None;
    };

    Some(LayerParams {
        sprite: sprite.clone(),
        x: attr_i32(attrs, "x"),
        y: attr_i32(attrs, "y"),
    })
}
