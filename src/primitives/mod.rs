//! Primitives Module - Per-kind attribute resolution.
//!
//! Pure conversion from a node's raw attribute strings to typed visual
//! parameters, one module per node kind. Resolvers never touch the node
//! tree or the host - a kind that needs the atlas receives it as an
//! argument, and a resolver that cannot produce a visual returns `None`
//! (the caller suppresses the node and its subtree).
//!
//! Shared parsing rules:
//! - numbers are base-10 (`str::parse::<i32>` after trim); an absent
//!   attribute omits the parameter, an unparsable one is treated as absent
//!   and logged
//! - booleans treat `"0"`, `"false"`, `"no"`, `"off"` (case-insensitive)
//!   as false and any other present value as true
//! - colors are raw `"r,g,b"` component triples

use std::collections::HashMap;

use log::warn;

use crate::types::Rgb;

mod button;
mod container;
mod layer;
mod layout;
mod popupmenu;
mod text;

pub use button::{resolve_button, ButtonParams};
pub use container::{resolve_container, resolve_group, ContainerParams, GroupParams};
pub use layer::{resolve_layer, LayerParams};
pub use layout::{resolve_layout, LayoutParams};
pub use popupmenu::{resolve_popup_menu, MenuItem, MenuParams};
pub use text::{resolve_text, TextParams};

// =============================================================================
// Attribute parsing helpers
// =============================================================================

/// Parse a numeric attribute. Absent → `None`; unparsable → `None` with a
/// diagnostic.
pub(crate) fn attr_i32(attrs: &HashMap<String, String>, name: &str) -> Option<i32> {
    let raw = attrs.get(name)?;
    match raw.trim().parse::<i32>() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!("attribute {name}={raw:?} is not a number; ignoring");
            None
        }
    }
}

/// Parse a boolean attribute. Absent → `None`.
pub(crate) fn attr_bool(attrs: &HashMap<String, String>, name: &str) -> Option<bool> {
    let raw = attrs.get(name)?;
    Some(!matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "0" | "false" | "no" | "off"
    ))
}

/// Parse a `"r,g,b"` color attribute. Absent → `None`; malformed → `None`
/// with a diagnostic.
pub(crate) fn attr_color(attrs: &HashMap<String, String>, name: &str) -> Option<Rgb> {
    let raw = attrs.get(name)?;
    let mut parts = raw.split(',').map(|part| part.trim().parse::<u8>());
    match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some(Ok(r)), Some(Ok(g)), Some(Ok(b)), None) => Some(Rgb::new(r, g, b)),
        _ => {
            warn!("attribute {name}={raw:?} is not an r,g,b triple; ignoring");
            None
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
