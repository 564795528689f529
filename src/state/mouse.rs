//! Mouse Module - Pointer event dispatch and the capture state machine.
//!
//! The dispatcher translates raw pointer input arriving at a rendered
//! instance into semantic skin triggers, and owns the capture protocol that
//! pairs every button-down with exactly one button-up - wherever the release
//! happens. The host feeds presses, moves and crossings through
//! [`PointerDispatcher::dispatch`], and the document-wide release feed
//! through [`PointerDispatcher::release`].
//!
//! Capture entries carry a monotonic token and only a weak reference to the
//! pressed instance: completion removes the entry by token (a duplicate
//! release finds nothing and is a no-op), and a release arriving after the
//! instance was unmounted is dropped silently.
//!
//! # API
//!
//! - `dispatch(target, event)` - Route one raw pointer event
//! - `release(x, y)` - Document-level button release, completes captures
//! - `dispatch_key(target, event)` - Key forwarding (see `state::keyboard`)
//! - `outstanding_captures()` - Captures awaiting their release
//! - `pointer_position()` - Process-wide last observed pointer position
//!
//! # Example
//!
//! ```ignore
//! use skinview::{PointerEvent, MouseButton};
//!
//! let elements = handle.elements();
//! let target = elements[0].target.clone().unwrap();
//!
//! // Press on the element, release anywhere in the document.
//! handle.dispatcher().dispatch(&target, &PointerEvent::down(MouseButton::Left, 120, 200));
//! handle.dispatcher().release(640, 480);
//! ```

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use spark_signals::{signal, Signal};

use crate::engine::{container_origin, Node, Trigger};
use crate::pipeline::{refresh, RenderCtx, ViewInstance};
use crate::types::Modifiers;

// =============================================================================
// TYPES
// =============================================================================

/// Raw pointer action as reported by the host input environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerAction {
    /// Button press on the target. Installs a capture.
    Down,
    Move,
    Enter,
    Leave,
    DoubleClick,
    Click,
    DragEnter,
    DragLeave,
    DragOver,
    /// Platform context-menu request; suppressed, never a skin event.
    ContextMenu,
}

/// Physical mouse button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
    #[default]
    None,
}

/// One raw pointer event in client space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerEvent {
    pub action: PointerAction,
    pub button: MouseButton,
    /// Client-space X coordinate.
    pub x: i32,
    /// Client-space Y coordinate.
    pub y: i32,
    pub modifiers: Modifiers,
}

impl PointerEvent {
    /// Create a pointer event.
    pub fn new(action: PointerAction, button: MouseButton, x: i32, y: i32) -> Self {
        Self {
            action,
            button,
            x,
            y,
            modifiers: Modifiers::default(),
        }
    }

    /// Create a button-press event.
    pub fn down(button: MouseButton, x: i32, y: i32) -> Self {
        Self::new(PointerAction::Down, button, x, y)
    }

    /// Create a move event.
    pub fn move_to(x: i32, y: i32) -> Self {
        Self::new(PointerAction::Move, MouseButton::None, x, y)
    }

    /// Create a boundary-enter event.
    pub fn enter(x: i32, y: i32) -> Self {
        Self::new(PointerAction::Enter, MouseButton::None, x, y)
    }

    /// Create a boundary-leave event.
    pub fn leave(x: i32, y: i32) -> Self {
        Self::new(PointerAction::Leave, MouseButton::None, x, y)
    }

    /// Create a double-activation event.
    pub fn double_click(button: MouseButton, x: i32, y: i32) -> Self {
        Self::new(PointerAction::DoubleClick, button, x, y)
    }

    /// Create a click-activation event.
    pub fn click(button: MouseButton, x: i32, y: i32) -> Self {
        Self::new(PointerAction::Click, button, x, y)
    }

    /// Create a context-menu request.
    pub fn context_menu(x: i32, y: i32) -> Self {
        Self::new(PointerAction::ContextMenu, MouseButton::Right, x, y)
    }
}

/// Which event side a physical button selects. The right button selects the
/// right-hand vocabulary; every other button (middle included) the left.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ButtonSide {
    Left,
    Right,
}

impl ButtonSide {
    fn of(button: MouseButton) -> Self {
        match button {
            MouseButton::Right => Self::Right,
            _ => Self::Left,
        }
    }
}

// =============================================================================
// PROCESS-WIDE POINTER POSITION
// =============================================================================

thread_local! {
    static POINTER_POSITION: Signal<Option<(i32, i32)>> = signal(None);
}

/// The most recent client-space pointer position observed on a move event.
///
/// Written on every move, read when a popup menu is resolved. `None` until
/// the first move - a menu rendered before any move has no specified
/// placement.
pub fn pointer_position() -> Option<(i32, i32)> {
    POINTER_POSITION.with(|s| s.get())
}

fn set_pointer_position(x: i32, y: i32) {
    POINTER_POSITION.with(|s| s.set(Some((x, y))));
}

/// Reset pointer state (for testing).
pub fn reset_pointer_state() {
    POINTER_POSITION.with(|s| s.set(None));
}

// =============================================================================
// DISPATCHER
// =============================================================================

/// One outstanding button-down awaiting its release.
struct CaptureEntry {
    token: u64,
    target: Weak<ViewInstance>,
    side: ButtonSide,
}

/// Pointer event dispatcher and capture state machine.
///
/// Owned by the mount; one instance per mounted tree. All triggers are
/// emitted with coordinates relative to the target node's positioning root,
/// recomputed per event.
pub struct PointerDispatcher {
    pub(super) ctx: RenderCtx,
    captures: RefCell<Vec<CaptureEntry>>,
    next_token: Cell<u64>,
}

impl PointerDispatcher {
    pub(crate) fn new(ctx: RenderCtx) -> Self {
        Self {
            ctx,
            captures: RefCell::new(Vec::new()),
            next_token: Cell::new(0),
        }
    }

    /// Route one raw pointer event arriving at `target`'s visual boundary.
    ///
    /// Returns `true` when the host must suppress its default behavior for
    /// the event (context-menu requests); `false` otherwise.
    pub fn dispatch(&self, target: &Rc<ViewInstance>, event: &PointerEvent) -> bool {
        if event.action == PointerAction::ContextMenu {
            // Default suppressed; menu invocation is the call site's
            // right-click convention, not a skin event.
            return true;
        }

        let Some(runtime) = self.ctx.runtime() else {
            return false;
        };
        let node = target.node().clone();
        let side = ButtonSide::of(event.button);

        match event.action {
            PointerAction::Down => {
                let (x, y) = relative(&node, event);
                runtime.trigger(
                    &node,
                    match side {
                        ButtonSide::Left => Trigger::LeftButtonDown { x, y },
                        ButtonSide::Right => Trigger::RightButtonDown { x, y },
                    },
                );
                self.install_capture(target, side);
                if node.kind().is_some_and(|kind| kind.is_button()) {
                    target.set_pressed(true);
                    refresh(target, &self.ctx);
                }
            }
            PointerAction::Move => {
                let (x, y) = relative(&node, event);
                runtime.trigger(&node, Trigger::MouseMove { x, y });
                set_pointer_position(event.x, event.y);
            }
            PointerAction::Enter => {
                let (x, y) = relative(&node, event);
                runtime.trigger(&node, Trigger::EnterArea { x, y });
            }
            PointerAction::Leave => {
                let (x, y) = relative(&node, event);
                runtime.trigger(&node, Trigger::LeaveArea { x, y });
            }
            PointerAction::DoubleClick => {
                let (x, y) = relative(&node, event);
                runtime.trigger(
                    &node,
                    match side {
                        ButtonSide::Left => Trigger::LeftButtonDblClk { x, y },
                        ButtonSide::Right => Trigger::RightButtonDblClk { x, y },
                    },
                );
            }
            PointerAction::Click => {
                // Click activation exists on buttons only.
                if node.kind().is_some_and(|kind| kind.is_button()) {
                    runtime.trigger(
                        &node,
                        match side {
                            ButtonSide::Left => Trigger::LeftClick,
                            ButtonSide::Right => Trigger::RightClick,
                        },
                    );
                }
            }
            PointerAction::DragEnter => runtime.trigger(&node, Trigger::DragEnter),
            PointerAction::DragLeave => runtime.trigger(&node, Trigger::DragLeave),
            PointerAction::DragOver => {
                let (x, y) = relative(&node, event);
                runtime.trigger(&node, Trigger::DragOver { x, y });
            }
            PointerAction::ContextMenu => unreachable!("handled above"),
        }

        false
    }

    /// Document-level button release at client (`x`, `y`).
    ///
    /// Completes every outstanding capture exactly once: each completion
    /// emits the up-event counterpart of the originally triggered down kind
    /// on the original press target, with coordinates recomputed against
    /// that target's container at the release position. Duplicate release
    /// signals find no remaining entries and do nothing.
    pub fn release(&self, x: i32, y: i32) {
        let tokens: Vec<u64> = self
            .captures
            .borrow()
            .iter()
            .map(|entry| entry.token)
            .collect();
        for token in tokens {
            self.complete(token, x, y);
        }
    }

    /// Captures currently awaiting their release.
    pub fn outstanding_captures(&self) -> usize {
        self.captures.borrow().len()
    }

    fn install_capture(&self, target: &Rc<ViewInstance>, side: ButtonSide) {
        let token = self.next_token.get();
        self.next_token.set(token + 1);
        self.captures.borrow_mut().push(CaptureEntry {
            token,
            target: Rc::downgrade(target),
            side,
        });
    }

    /// Complete one capture by token. Removal happens first, so a reentrant
    /// or duplicate completion of the same token is a no-op; a target that
    /// was unmounted in the meantime is dropped silently.
    fn complete(&self, token: u64, x: i32, y: i32) {
        let entry = {
            let mut captures = self.captures.borrow_mut();
            let Some(index) = captures.iter().position(|entry| entry.token == token) else {
                return;
            };
            captures.remove(index)
        };
        let Some(target) = entry.target.upgrade() else {
            return;
        };

        if target.is_pressed() {
            target.set_pressed(false);
            refresh(&target, &self.ctx);
        }

        let Some(runtime) = self.ctx.runtime() else {
            return;
        };
        let node = target.node().clone();
        let (left, top) = container_origin(&node);
        let (x, y) = (x - left, y - top);
        runtime.trigger(
            &node,
            match entry.side {
                ButtonSide::Left => Trigger::LeftButtonUp { x, y },
                ButtonSide::Right => Trigger::RightButtonUp { x, y },
            },
        );
    }
}

/// Client coordinates translated into `node`'s positioning-root basis.
fn relative(node: &Rc<Node>, event: &PointerEvent) -> (i32, i32) {
    let (left, top) = container_origin(node);
    (event.x - left, event.y - top)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    use crate::engine::{ImageAtlas, SkinRuntime, SpriteEntry};
    use crate::pipeline::{mount, MountHandle};
    use crate::renderer::VisualElement;

    struct Recorder {
        atlas: ImageAtlas,
        triggers: RefCell<Vec<(String, Trigger)>>,
    }

    impl Recorder {
        fn new() -> Rc<Self> {
            let mut atlas = ImageAtlas::new();
            atlas.insert(
                "main.bg",
                SpriteEntry {
                    source: "main.png".to_string(),
                    x: 0,
                    y: 0,
                    w: 275,
                    h: 116,
                },
            );
            atlas.insert(
                "play.up",
                SpriteEntry {
                    source: "buttons.png".to_string(),
                    x: 0,
                    y: 0,
                    w: 23,
                    h: 18,
                },
            );
            atlas.insert(
                "play.down",
                SpriteEntry {
                    source: "buttons.png".to_string(),
                    x: 0,
                    y: 18,
                    w: 23,
                    h: 18,
                },
            );
            Rc::new(Self {
                atlas,
                triggers: RefCell::new(Vec::new()),
            })
        }

        fn triggers(&self) -> Vec<(String, Trigger)> {
            self.triggers.borrow().clone()
        }
    }

    impl SkinRuntime for Recorder {
        fn trigger(&self, node: &Rc<Node>, trigger: Trigger) {
            self.triggers
                .borrow_mut()
                .push((node.id().to_string(), trigger));
        }

        fn select_command(&self, _node: &Rc<Node>, _command_id: &str) {}

        fn resolve_display(&self, _keyword: &str) -> Option<String> {
            None
        }

        fn atlas(&self) -> &ImageAtlas {
            &self.atlas
        }
    }

    /// Container at (50, 80) holding a layer and a button.
    fn skin() -> (Rc<Node>, Rc<Recorder>, MountHandle) {
        let runtime = Recorder::new();

        let root = Node::new(Some("container"), "main");
        root.set_attribute("default_x", "50");
        root.set_attribute("default_y", "80");

        let layer = Node::new(Some("layer"), "bg");
        layer.set_attribute("image", "main.bg");
        Node::append_child(&root, &layer);

        let button = Node::new(Some("button"), "play");
        button.set_attribute("image", "play.up");
        button.set_attribute("downImage", "play.down");
        Node::append_child(&root, &button);

        let handle = mount(&root, runtime.clone());
        (root, runtime, handle)
    }

    fn find_target(elements: &[VisualElement], id: &str) -> Rc<ViewInstance> {
        fn walk(elements: &[VisualElement], id: &str) -> Option<Rc<ViewInstance>> {
            for element in elements {
                if element.node_id() == id {
                    return element.target.clone();
                }
                if let Some(found) = walk(&element.children, id) {
                    return Some(found);
                }
            }
            None
        }
        walk(elements, id).expect("no dispatch target with that id")
    }

    fn find_element<'a>(elements: &'a [VisualElement], id: &str) -> &'a VisualElement {
        fn walk<'a>(elements: &'a [VisualElement], id: &str) -> Option<&'a VisualElement> {
            for element in elements {
                if element.node_id() == id {
                    return Some(element);
                }
                if let Some(found) = walk(&element.children, id) {
                    return Some(found);
                }
            }
            None
        }
        walk(elements, id).expect("no element with that id")
    }

    #[test]
    fn test_press_emits_container_relative_coordinates() {
        let (_root, runtime, handle) = skin();
        let target = find_target(&handle.elements(), "bg");

        handle
            .dispatcher()
            .dispatch(&target, &PointerEvent::down(MouseButton::Left, 120, 200));

        assert_eq!(
            runtime.triggers(),
            vec![("bg".to_string(), Trigger::LeftButtonDown { x: 70, y: 120 })]
        );
    }

    #[test]
    fn test_release_anywhere_completes_on_original_target() {
        let (_root, runtime, handle) = skin();
        let target = find_target(&handle.elements(), "bg");

        handle
            .dispatcher()
            .dispatch(&target, &PointerEvent::down(MouseButton::Left, 120, 200));
        assert_eq!(handle.dispatcher().outstanding_captures(), 1);

        // Release far away, over no tracked node at all.
        handle.dispatcher().release(300, 400);

        let ups: Vec<_> = runtime
            .triggers()
            .into_iter()
            .filter(|(_, trigger)| matches!(trigger, Trigger::LeftButtonUp { .. }))
            .collect();
        assert_eq!(
            ups,
            vec![("bg".to_string(), Trigger::LeftButtonUp { x: 250, y: 320 })]
        );
        assert_eq!(handle.dispatcher().outstanding_captures(), 0);
    }

    #[test]
    fn test_right_button_selects_right_vocabulary() {
        let (_root, runtime, handle) = skin();
        let target = find_target(&handle.elements(), "bg");

        handle
            .dispatcher()
            .dispatch(&target, &PointerEvent::down(MouseButton::Right, 60, 90));
        handle.dispatcher().release(60, 90);

        assert_eq!(
            runtime.triggers(),
            vec![
                ("bg".to_string(), Trigger::RightButtonDown { x: 10, y: 10 }),
                ("bg".to_string(), Trigger::RightButtonUp { x: 10, y: 10 }),
            ]
        );
    }

    #[test]
    fn test_middle_button_maps_to_left_vocabulary() {
        let (_root, runtime, handle) = skin();
        let target = find_target(&handle.elements(), "bg");

        handle
            .dispatcher()
            .dispatch(&target, &PointerEvent::down(MouseButton::Middle, 60, 90));

        assert!(matches!(
            runtime.triggers()[0].1,
            Trigger::LeftButtonDown { .. }
        ));
    }

    #[test]
    fn test_duplicate_release_completes_at_most_once() {
        let (_root, runtime, handle) = skin();
        let target = find_target(&handle.elements(), "bg");

        handle
            .dispatcher()
            .dispatch(&target, &PointerEvent::down(MouseButton::Left, 60, 90));
        handle.dispatcher().release(60, 90);
        handle.dispatcher().release(60, 90);

        let ups = runtime
            .triggers()
            .iter()
            .filter(|(_, trigger)| matches!(trigger, Trigger::LeftButtonUp { .. }))
            .count();
        assert_eq!(ups, 1);
    }

    #[test]
    fn test_release_after_unmount_is_dropped_silently() {
        let (root, runtime, handle) = skin();
        let target = find_target(&handle.elements(), "bg");

        handle
            .dispatcher()
            .dispatch(&target, &PointerEvent::down(MouseButton::Left, 60, 90));
        drop(target);

        // The runtime hides the layer; reconciliation drops its instance
        // while the capture is still outstanding.
        root.children()[0].set_visible(false);
        root.notify_change();

        handle.dispatcher().release(300, 400);

        assert!(!runtime
            .triggers()
            .iter()
            .any(|(_, trigger)| matches!(trigger, Trigger::LeftButtonUp { .. })));
        assert_eq!(handle.dispatcher().outstanding_captures(), 0);
    }

    #[test]
    fn test_concurrent_left_right_captures_both_complete() {
        let (_root, runtime, handle) = skin();
        let elements = handle.elements();
        let layer = find_target(&elements, "bg");
        let button = find_target(&elements, "play");

        handle
            .dispatcher()
            .dispatch(&layer, &PointerEvent::down(MouseButton::Left, 60, 90));
        handle
            .dispatcher()
            .dispatch(&button, &PointerEvent::down(MouseButton::Right, 61, 91));
        assert_eq!(handle.dispatcher().outstanding_captures(), 2);

        handle.dispatcher().release(100, 100);

        let ups: Vec<_> = runtime
            .triggers()
            .into_iter()
            .filter(|(_, trigger)| {
                matches!(
                    trigger,
                    Trigger::LeftButtonUp { .. } | Trigger::RightButtonUp { .. }
                )
            })
            .collect();
        assert_eq!(
            ups,
            vec![
                ("bg".to_string(), Trigger::LeftButtonUp { x: 50, y: 20 }),
                ("play".to_string(), Trigger::RightButtonUp { x: 50, y: 20 }),
            ]
        );
    }

    #[test]
    fn test_move_emits_and_updates_pointer_position() {
        let (_root, runtime, handle) = skin();
        let target = find_target(&handle.elements(), "bg");
        reset_pointer_state();

        handle
            .dispatcher()
            .dispatch(&target, &PointerEvent::move_to(120, 45));

        assert_eq!(
            runtime.triggers(),
            vec![("bg".to_string(), Trigger::MouseMove { x: 70, y: -35 })]
        );
        assert_eq!(pointer_position(), Some((120, 45)));
    }

    #[test]
    fn test_drag_over_does_not_update_pointer_position() {
        let (_root, runtime, handle) = skin();
        let target = find_target(&handle.elements(), "bg");
        reset_pointer_state();

        handle.dispatcher().dispatch(
            &target,
            &PointerEvent::new(PointerAction::DragOver, MouseButton::None, 120, 45),
        );

        assert_eq!(
            runtime.triggers(),
            vec![("bg".to_string(), Trigger::DragOver { x: 70, y: -35 })]
        );
        assert_eq!(pointer_position(), None);
    }

    #[test]
    fn test_enter_and_leave_crossings() {
        let (_root, runtime, handle) = skin();
        let target = find_target(&handle.elements(), "bg");

        handle
            .dispatcher()
            .dispatch(&target, &PointerEvent::enter(55, 85));
        handle
            .dispatcher()
            .dispatch(&target, &PointerEvent::leave(40, 70));

        assert_eq!(
            runtime.triggers(),
            vec![
                ("bg".to_string(), Trigger::EnterArea { x: 5, y: 5 }),
                ("bg".to_string(), Trigger::LeaveArea { x: -10, y: -10 }),
            ]
        );
    }

    #[test]
    fn test_drag_enter_and_leave_are_bare_triggers() {
        let (_root, runtime, handle) = skin();
        let target = find_target(&handle.elements(), "bg");

        handle.dispatcher().dispatch(
            &target,
            &PointerEvent::new(PointerAction::DragEnter, MouseButton::None, 0, 0),
        );
        handle.dispatcher().dispatch(
            &target,
            &PointerEvent::new(PointerAction::DragLeave, MouseButton::None, 0, 0),
        );

        assert_eq!(
            runtime.triggers(),
            vec![
                ("bg".to_string(), Trigger::DragEnter),
                ("bg".to_string(), Trigger::DragLeave),
            ]
        );
    }

    #[test]
    fn test_double_click_emits_once_per_gesture() {
        let (_root, runtime, handle) = skin();
        let target = find_target(&handle.elements(), "bg");

        handle
            .dispatcher()
            .dispatch(&target, &PointerEvent::double_click(MouseButton::Left, 60, 90));

        let dblclks = runtime
            .triggers()
            .iter()
            .filter(|(_, trigger)| matches!(trigger, Trigger::LeftButtonDblClk { .. }))
            .count();
        assert_eq!(dblclks, 1);

        handle
            .dispatcher()
            .dispatch(&target, &PointerEvent::double_click(MouseButton::Right, 60, 90));
        assert!(matches!(
            runtime.triggers().last().unwrap().1,
            Trigger::RightButtonDblClk { .. }
        ));
    }

    #[test]
    fn test_click_activates_buttons_only() {
        let (_root, runtime, handle) = skin();
        let elements = handle.elements();
        let layer = find_target(&elements, "bg");
        let button = find_target(&elements, "play");

        handle
            .dispatcher()
            .dispatch(&layer, &PointerEvent::click(MouseButton::Left, 60, 90));
        assert!(runtime.triggers().is_empty());

        handle
            .dispatcher()
            .dispatch(&button, &PointerEvent::click(MouseButton::Left, 60, 90));
        handle
            .dispatcher()
            .dispatch(&button, &PointerEvent::click(MouseButton::Right, 60, 90));
        assert_eq!(
            runtime.triggers(),
            vec![
                ("play".to_string(), Trigger::LeftClick),
                ("play".to_string(), Trigger::RightClick),
            ]
        );
    }

    #[test]
    fn test_context_menu_suppressed_without_trigger() {
        let (_root, runtime, handle) = skin();
        let target = find_target(&handle.elements(), "bg");

        let suppressed = handle
            .dispatcher()
            .dispatch(&target, &PointerEvent::context_menu(60, 90));

        assert!(suppressed);
        assert!(runtime.triggers().is_empty());
    }

    #[test]
    fn test_pressed_button_swaps_to_down_image_and_back() {
        let (_root, _runtime, handle) = skin();
        let target = find_target(&handle.elements(), "play");

        handle
            .dispatcher()
            .dispatch(&target, &PointerEvent::down(MouseButton::Left, 60, 90));
        let pressed = handle.elements();
        let background = find_element(&pressed, "play")
            .style
            .background
            .clone()
            .unwrap();
        assert_eq!(background.offset_y, 18);

        handle.dispatcher().release(60, 90);
        let released = handle.elements();
        let background = find_element(&released, "play")
            .style
            .background
            .clone()
            .unwrap();
        assert_eq!(background.offset_y, 0);
        assert!(!target.is_pressed());
    }
}
