//! Popup menu resolution.
//!
//! A popup menu renders its node's command list instead of attributes. It
//! has no coordinates of its own: it appears at the process-wide last
//! pointer position, which the dispatcher records on every move event. A
//! menu resolved before any move event has been observed has no specified
//! placement - it falls back to the top-left corner.

use crate::engine::Command;

/// One rendered menu row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItem {
    /// `None` renders a bare divider.
    pub label: Option<String>,
    /// `None` makes the row inert; `Some` is the command id reported on
    /// activation.
    pub command_id: Option<String>,
}

impl MenuItem {
    /// Whether this row is a divider.
    pub fn is_separator(&self) -> bool {
        self.command_id.is_none()
    }
}

/// Visual parameters of a popup menu node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuParams {
    pub x: i32,
    pub y: i32,
    pub items: Vec<MenuItem>,
}

/// Resolve a menu from its command list and the last observed pointer
/// position. An entry whose id is `"seperator"` (wire-format spelling)
/// becomes a divider with no label and no activation.
pub fn resolve_popup_menu(commands: &[Command], pointer: Option<(i32, i32)>) -> MenuParams {
    let (x, y) = pointer.unwrap_or((0, 0));
    let items = commands
        .iter()
        .map(|command| {
            if command.id == "seperator" {
                MenuItem {
                    label: None,
                    command_id: None,
                }
            } else {
                MenuItem {
                    label: Some(command.name.clone()),
                    command_id: Some(command.id.clone()),
                }
            }
        })
        .collect();
    MenuParams { x, y, items }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_separator_and_command_rows() {
        let params = resolve_popup_menu(
            &[Command::separator(), Command::new("c1", "Open")],
            Some((120, 45)),
        );

        assert_eq!(params.x, 120);
        assert_eq!(params.y, 45);
        assert_eq!(params.items.len(), 2);

        assert!(params.items[0].is_separator());
        assert_eq!(params.items[0].label, None);

        assert_eq!(params.items[1].label.as_deref(), Some("Open"));
        assert_eq!(params.items[1].command_id.as_deref(), Some("c1"));
    }

    #[test]
    fn test_no_pointer_position_falls_back_to_origin() {
        let params = resolve_popup_menu(&[Command::new("c1", "Open")], None);
        assert_eq!((params.x, params.y), (0, 0));
    }
}
