//! Core types for skinview.
//!
//! These types define the foundation that everything builds on: the closed
//! set of node kinds the interpreter understands, colors, text alignment,
//! and input modifier flags.

// =============================================================================
// Node Kind
// =============================================================================

/// The semantic kind of a skin node.
///
/// A closed enum rather than open string dispatch: every rendering rule is
/// matched exhaustively at compile time. Tags outside the known set parse to
/// [`NodeKind::Unknown`], which carries no rendering rule of its own - the
/// interpreter renders such a node's visible children and nothing else.
///
/// `GroupDef` is the definition-only sentinel: it renders nothing and does
/// not recurse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Container,
    Layout,
    Layer,
    Button,
    ToggleButton,
    Group,
    PopupMenu,
    Text,
    GroupDef,
    Unknown,
}

impl NodeKind {
    /// Parse a raw tag into a kind. Matching is case-insensitive.
    pub fn from_tag(tag: &str) -> Self {
        match tag.to_ascii_lowercase().as_str() {
            "container" => Self::Container,
            "layout" => Self::Layout,
            "layer" => Self::Layer,
            "button" => Self::Button,
            "togglebutton" => Self::ToggleButton,
            "group" => Self::Group,
            "popupmenu" => Self::PopupMenu,
            "text" => Self::Text,
            "groupdef" => Self::GroupDef,
            _ => Self::Unknown,
        }
    }

    /// Whether this kind establishes a positioning root for its descendants.
    #[inline]
    pub fn is_container(&self) -> bool {
        matches!(self, Self::Container)
    }

    /// Whether this kind renders a pressable button surface.
    #[inline]
    pub fn is_button(&self) -> bool {
        matches!(self, Self::Button | Self::ToggleButton)
    }
}

// =============================================================================
// Color
// =============================================================================

/// RGB color with 8-bit channels (0-255).
///
/// Skin color attributes arrive as raw `"r,g,b"` component triples; integer
/// channels keep comparisons exact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// Create a new RGB color.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const BLACK: Self = Self::new(0, 0, 0);
    pub const WHITE: Self = Self::new(255, 255, 255);
}

// =============================================================================
// Text Alignment
// =============================================================================

/// Horizontal text alignment for text nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

impl TextAlign {
    /// Parse a raw `align` attribute value. Matching is case-insensitive;
    /// anything else is `None`.
    pub fn from_attr(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "left" => Some(Self::Left),
            "center" => Some(Self::Center),
            "right" => Some(Self::Right),
            _ => None,
        }
    }
}

// =============================================================================
// Input Modifiers (bitflags)
// =============================================================================

bitflags::bitflags! {
    /// Modifier keys held during a pointer or key event.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Modifiers: u8 {
        const SHIFT = 1 << 0;
        const CTRL  = 1 << 1;
        const ALT   = 1 << 2;
        const META  = 1 << 3;
    }
}

// =============================================================================
// Tests
// =============================================================================
