//! Runtime Bridge - Semantic events and the owning runtime's interface.
//!
//! The interpreter does not act on skin events itself: it translates raw
//! input into the skin's semantic vocabulary ([`Trigger`]) and hands each
//! trigger to the owning runtime, fire-and-forget. The runtime also supplies
//! the image atlas and the external text lookup used by text nodes.

use std::rc::Rc;

use super::atlas::ImageAtlas;
use super::node::Node;

// =============================================================================
// TRIGGER
// =============================================================================

/// A semantic skin event, delivered to the owning runtime.
///
/// Coordinates are relative to the target node's positioning root (nearest
/// container ancestor), not to the viewport. Key codes are the physical
/// codes reported by the host input environment, forwarded unmodified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    LeftButtonDown { x: i32, y: i32 },
    LeftButtonUp { x: i32, y: i32 },
    RightButtonDown { x: i32, y: i32 },
    RightButtonUp { x: i32, y: i32 },
    LeftButtonDblClk { x: i32, y: i32 },
    RightButtonDblClk { x: i32, y: i32 },
    MouseMove { x: i32, y: i32 },
    EnterArea { x: i32, y: i32 },
    LeaveArea { x: i32, y: i32 },
    DragEnter,
    DragLeave,
    DragOver { x: i32, y: i32 },
    LeftClick,
    RightClick,
    KeyDown { code: u32 },
    KeyUp { code: u32 },
}

impl Trigger {
    /// The event name in the skin script vocabulary.
    pub fn name(&self) -> &'static str {
        match self {
            Self::LeftButtonDown { .. } => "onLeftButtonDown",
            Self::LeftButtonUp { .. } => "onLeftButtonUp",
            Self::RightButtonDown { .. } => "onRightButtonDown",
            Self::RightButtonUp { .. } => "onRightButtonUp",
            Self::LeftButtonDblClk { .. } => "onLeftButtonDblClk",
            Self::RightButtonDblClk { .. } => "onRightButtonDblClk",
            Self::MouseMove { .. } => "onMouseMove",
            Self::EnterArea { .. } => "onEnterArea",
            Self::LeaveArea { .. } => "onLeaveArea",
            Self::DragEnter => "onDragEnter",
            Self::DragLeave => "onDragLeave",
            Self::DragOver { .. } => "onDragOver",
            Self::LeftClick => "onLeftClick",
            Self::RightClick => "onRightClick",
            Self::KeyDown { .. } => "onKeyDown",
            Self::KeyUp { .. } => "onKeyUp",
        }
    }
}

// =============================================================================
// RUNTIME TRAIT
// =============================================================================

/// The owning skin runtime, as seen from the interpreter.
///
/// All methods are synchronous; `trigger` is fire-and-forget with no return
/// channel. Implementations typically route triggers into skin-script
/// handlers and may mutate the node tree in response (signalling mutations
/// back through [`Node::notify_change`]).
pub trait SkinRuntime {
    /// Deliver a semantic event to `node`'s script handlers.
    fn trigger(&self, node: &Rc<Node>, trigger: Trigger);

    /// A popup-menu command was activated on `node`.
    fn select_command(&self, node: &Rc<Node>, command_id: &str);

    /// Resolve a text node's `display` keyword (e.g. `songname`, `time`)
    /// to its current text. `None` renders the node with empty content.
    fn resolve_display(&self, keyword: &str) -> Option<String>;

    /// The sprite atlas for this skin.
    fn atlas(&self) -> &ImageAtlas;
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trigger_names_match_skin_vocabulary() {
        assert_eq!(
            Trigger::LeftButtonDown { x: 0, y: 0 }.name(),
            "onLeftButtonDown"
        );
        assert_eq!(
            Trigger::RightButtonUp { x: 0, y: 0 }.name(),
            "onRightButtonUp"
        );
        assert_eq!(
            Trigger::LeftButtonDblClk { x: 0, y: 0 }.name(),
            "onLeftButtonDblClk"
        );
        assert_eq!(Trigger::DragEnter.name(), "onDragEnter");
        assert_eq!(Trigger::KeyDown { code: 13 }.name(), "onKeyDown");
    }
}
