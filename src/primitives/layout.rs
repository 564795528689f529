//! Layout resolution.
//!
//! A layout is one window face of a container. It renders in one of two
//! modes: background mode, where a sprite supplies the image and the natural
//! size, or plain mode, where `x`/`y`/`w`/`h` attributes position an empty
//! region. Background mode is fail-closed: a layout that wants a background
//! it cannot resolve is meaningless, so the whole subtree is suppressed.

use std::collections::HashMap;

use log::warn;

use super::{attr_bool, attr_i32};
use crate::engine::{ImageAtlas, SpriteEntry};

/// Visual parameters of a layout node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutParams {
    /// `drawBackground` mode: the sprite's natural dimensions size the
    /// layout; min/max bounds forward as given.
    Background {
        sprite: SpriteEntry,
        min_w: Option<i32>,
        max_w: Option<i32>,
        min_h: Option<i32>,
        max_h: Option<i32>,
    },
    /// Attribute-driven geometry, no image involved.
    Plain {
        x: Option<i32>,
        y: Option<i32>,
        w: Option<i32>,
        h: Option<i32>,
    },
}

/// Resolve a layout. Returns `None` when the node (and its subtree) must be
/// suppressed: background mode with a missing `background` attribute or a
/// sprite the atlas does not know.
pub fn resolve_layout(
    node_id: &str,
    attrs: &HashMap<String, String>,
    atlas: &ImageAtlas,
) -> Option<LayoutParams> {
    if !attr_bool(attrs, "drawBackground").unwrap_or(false) {
        return Some(LayoutParams::Plain {
            x: attr_i32(attrs, "x"),
            y: attr_i32(attrs, "y"),
            w: attr_i32(attrs, "w"),
            h: attr_i32(attrs, "h"),
        });
    }

    let Some(background) = attrs.get("background") else {
        warn!("layout {node_id} draws a background but has none; rendering nothing");
        return None;
    };
    let Some(sprite) = atlas.lookup(background) else {
        warn!("layout {node_id}: background {background:?} not in atlas; rendering nothing");
        return None;
    };

    Some(LayoutParams::Background {
        sprite: sprite.clone(),
        min_w: attr_i32(attrs, "minimum_w"),
        max_w: attr_i32(attrs, "maximum_w"),
        min_h: attr_i32(attrs, "minimum_h"),
        max_h: attr_i32(attrs, "maximum_h"),
    })
}
