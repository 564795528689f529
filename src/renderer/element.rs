//! Visual Element - The positioned output tree.
//!
//! The interpreter's product: a tree of absolutely-positioned elements the
//! embedder draws however it likes (DOM nodes, quads, canvas fills). Every
//! field is plain data except `target`, which carries the rendered instance
//! an element dispatches pointer events for - event-exempt elements (popup
//! menus) have no target.
//!
//! Absent style fields mean "leave that parameter unset", not zero.

use std::rc::Rc;

use crate::engine::Node;
use crate::pipeline::ViewInstance;
use crate::primitives::MenuItem;
use crate::types::{NodeKind, Rgb, TextAlign};

// =============================================================================
// STYLE
// =============================================================================

/// A sprite painted as an element's background.
///
/// `offset_x`/`offset_y` are the crop origin within the source image;
/// the element's own width/height select the visible region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpriteRef {
    pub source: String,
    pub offset_x: i32,
    pub offset_y: i32,
}

/// Resolved visual parameters of one element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementStyle {
    pub left: Option<i32>,
    pub top: Option<i32>,
    pub width: Option<i32>,
    pub height: Option<i32>,
    pub min_width: Option<i32>,
    pub max_width: Option<i32>,
    pub min_height: Option<i32>,
    pub max_height: Option<i32>,
    pub background: Option<SpriteRef>,
    pub background_color: Option<Rgb>,
    pub color: Option<Rgb>,
    pub font_size: Option<i32>,
    pub text_align: Option<TextAlign>,
    /// Show/hide toggle; a hidden element keeps its children in the tree.
    pub visible: bool,
}

impl Default for ElementStyle {
    fn default() -> Self {
        Self {
            left: None,
            top: None,
            width: None,
            height: None,
            min_width: None,
            max_width: None,
            min_height: None,
            max_height: None,
            background: None,
            background_color: None,
            color: None,
            font_size: None,
            text_align: None,
            visible: true,
        }
    }
}

// =============================================================================
// ELEMENT
// =============================================================================

/// One positioned element of the rendered output.
#[derive(Debug, Clone)]
pub struct VisualElement {
    /// The node kind that produced this element. ToggleButton is stamped
    /// distinctly so embedders can style it, though it renders like Button.
    pub kind: NodeKind,
    /// The source node (read-only view; useful for ids and menu activation).
    pub node: Rc<Node>,
    pub style: ElementStyle,
    /// Hover tooltip (buttons).
    pub tooltip: Option<String>,
    /// Resolved text content (text nodes).
    pub text: Option<String>,
    /// Menu rows (popup menus).
    pub menu_items: Vec<MenuItem>,
    /// Dispatch target for pointer/key events; `None` renders inertly.
    pub target: Option<Rc<ViewInstance>>,
    pub children: Vec<VisualElement>,
}

impl VisualElement {
    /// The source node's id.
    pub fn node_id(&self) -> &str {
        self.node.id()
    }
}
