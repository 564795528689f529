//! Text resolution.
//!
//! Text nodes map their attributes straight onto style parameters. The
//! content itself is not an attribute value: `display` is a keyword the
//! owning runtime resolves through its own text lookup (song name, time,
//! ...), so the resolver only carries the keyword along.

use std::collections::HashMap;

use super::{attr_color, attr_i32};
use crate::types::{Rgb, TextAlign};

/// Visual parameters of a text node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextParams {
    pub x: Option<i32>,
    pub y: Option<i32>,
    pub w: Option<i32>,
    pub h: Option<i32>,
    pub color: Option<Rgb>,
    /// Font size in pixels.
    pub font_size: Option<i32>,
    pub align: Option<TextAlign>,
    /// Keyword for the runtime's text lookup.
    pub display: Option<String>,
}

/// Resolve a text node's attributes.
pub fn resolve_text(attrs: &HashMap<String, String>) -> TextParams {
    TextParams {
        x: attr_i32(attrs, "x"),
        y: attr_i32(attrs, "y"),
        w: attr_i32(attrs, "w"),
        h: attr_i32(attrs, "h"),
        color: attr_color(attrs, "color"),
        font_size: attr_i32(attrs, "fontsize"),
        align: attrs.get("align").and_then(|raw| TextAlign::from_attr(raw)),
        display: attrs.get("display").cloned(),
    }
}
