//! Container and group resolution.
//!
//! Containers are the positioning roots of the tree: their position is the
//! coordinate origin for every descendant. Groups are plain positioned
//! wrappers. Neither draws anything of its own.

use std::collections::HashMap;

use super::{attr_bool, attr_i32};

/// Visual parameters of a container node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerParams {
    pub x: Option<i32>,
    pub y: Option<i32>,
    /// Initial show/hide. `None` leaves the element visible.
    pub visible: Option<bool>,
}

/// Resolve a container's `default_x`/`default_y`/`default_visible`.
pub fn resolve_container(attrs: &HashMap<String, String>) -> ContainerParams {
    ContainerParams {
        x: attr_i32(attrs, "default_x"),
        y: attr_i32(attrs, "default_y"),
        visible: attr_bool(attrs, "default_visible"),
    }
}

/// Visual parameters of a group node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupParams {
    pub x: Option<i32>,
    pub y: Option<i32>,
}

/// Resolve a group's `x`/`y`.
pub fn resolve_group(attrs: &HashMap<String, String>) -> GroupParams {
    GroupParams {
        x: attr_i32(attrs, "x"),
        y: attr_i32(attrs, "y"),
    }
}
