//! Node Model - The externally-owned skin description tree.
//!
//! A [`Node`] is the interpreter's read-only view of one element of the skin
//! description: a kind tag, an id, raw string attributes, ordered children
//! (each with its own visibility flag), and - for popup menus - a command
//! list. The tree is created and mutated exclusively by the owning skin
//! runtime; the interpreter only reads it and subscribes to change
//! notifications.
//!
//! # API
//!
//! - `Node::new(tag, id)` - Create a node (runtime side)
//! - `append_child` / `set_attribute` / `set_visible` / `set_commands` - Mutate (runtime side)
//! - `attr`, `children`, `visible`, `commands` - Query (interpreter side)
//! - `on_change(callback)` - Subscribe to "state changed", returns cleanup
//! - `notify_change()` - Fire "state changed" (runtime side)
//! - `positioning_root` / `container_origin` - Coordinate basis resolution
//!
//! # Example
//!
//! ```ignore
//! use skinview::engine::Node;
//!
//! let main = Node::new(Some("container"), "main");
//! main.set_attribute("default_x", "50");
//! let layer = Node::new(Some("layer"), "bg");
//! layer.set_attribute("image", "player.background");
//! Node::append_child(&main, &layer);
//! ```

use std::cell::{Cell, Ref, RefCell};
use std::collections::HashMap;
use std::fmt;
use std::rc::{Rc, Weak};

use crate::primitives::attr_i32;
use crate::types::NodeKind;

// =============================================================================
// TYPES
// =============================================================================

/// Cleanup function returned by subscriptions. Call it to unregister.
pub type Cleanup = Box<dyn FnOnce()>;

/// One entry of a popup menu's command list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub id: String,
    pub name: String,
}

impl Command {
    /// Create a command entry.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }

    /// Create a divider entry. The id uses the skin wire-format spelling.
    pub fn separator() -> Self {
        Self::new("seperator", "")
    }
}

/// Change-listener registry. Listeners are id-keyed so a cleanup can remove
/// exactly the entry it created, and nothing else.
#[derive(Default)]
struct Listeners {
    next_id: usize,
    entries: Vec<(usize, Rc<dyn Fn()>)>,
}

// =============================================================================
// NODE
// =============================================================================

/// One element of the externally-owned skin description tree.
///
/// The interpreter never mutates a `Node`; all setters exist for the owning
/// runtime. Attribute values are raw strings - conversion to visual
/// parameters happens in the per-kind resolvers.
pub struct Node {
    tag: Option<String>,
    kind: Option<NodeKind>,
    id: String,
    attributes: RefCell<HashMap<String, String>>,
    children: RefCell<Vec<Rc<Node>>>,
    parent: RefCell<Weak<Node>>,
    visible: Cell<bool>,
    commands: RefCell<Vec<Command>>,
    listeners: RefCell<Listeners>,
}

impl Node {
    /// Create a node. A `None` tag marks a non-renderable entry (the skin
    /// format allows comment nodes); otherwise the kind is derived from the
    /// tag, falling back to [`NodeKind::Unknown`].
    pub fn new(tag: Option<&str>, id: impl Into<String>) -> Rc<Self> {
        Rc::new(Self {
            kind: tag.map(NodeKind::from_tag),
            tag: tag.map(str::to_string),
            id: id.into(),
            attributes: RefCell::new(HashMap::new()),
            children: RefCell::new(Vec::new()),
            parent: RefCell::new(Weak::new()),
            visible: Cell::new(true),
            commands: RefCell::new(Vec::new()),
            listeners: RefCell::new(Listeners::default()),
        })
    }

    /// The resolved kind, or `None` for non-renderable entries.
    pub fn kind(&self) -> Option<NodeKind> {
        self.kind
    }

    /// The raw tag string as it appeared in the skin description.
    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    /// The node id.
    pub fn id(&self) -> &str {
        &self.id
    }

    // -------------------------------------------------------------------------
    // Attributes
    // -------------------------------------------------------------------------

    /// Get one attribute's current raw value.
    pub fn attr(&self, name: &str) -> Option<String> {
        self.attributes.borrow().get(name).cloned()
    }

    /// Borrow the full attribute map for a render pass.
    pub fn attributes(&self) -> Ref<'_, HashMap<String, String>> {
        self.attributes.borrow()
    }

    /// Set an attribute (runtime side). Does not notify; the runtime signals
    /// a batch of mutations explicitly via [`Node::notify_change`].
    pub fn set_attribute(&self, name: impl Into<String>, value: impl Into<String>) {
        self.attributes
            .borrow_mut()
            .insert(name.into(), value.into());
    }

    /// Remove an attribute (runtime side).
    pub fn remove_attribute(&self, name: &str) {
        self.attributes.borrow_mut().remove(name);
    }

    // -------------------------------------------------------------------------
    // Structure
    // -------------------------------------------------------------------------

    /// Append a child and link its parent pointer (runtime side).
    pub fn append_child(parent: &Rc<Self>, child: &Rc<Self>) {
        *child.parent.borrow_mut() = Rc::downgrade(parent);
        parent.children.borrow_mut().push(child.clone());
    }

    /// Snapshot of the current child list.
    pub fn children(&self) -> Vec<Rc<Node>> {
        self.children.borrow().clone()
    }

    /// The parent node, if attached and still alive.
    pub fn parent(&self) -> Option<Rc<Node>> {
        self.parent.borrow().upgrade()
    }

    /// This node's own visibility flag (consulted by the parent's render).
    pub fn visible(&self) -> bool {
        self.visible.get()
    }

    /// Set the visibility flag (runtime side).
    pub fn set_visible(&self, visible: bool) {
        self.visible.set(visible);
    }

    // -------------------------------------------------------------------------
    // Commands (popup menus)
    // -------------------------------------------------------------------------

    /// Snapshot of the command list.
    pub fn commands(&self) -> Vec<Command> {
        self.commands.borrow().clone()
    }

    /// Replace the command list (runtime side).
    pub fn set_commands(&self, commands: Vec<Command>) {
        *self.commands.borrow_mut() = commands;
    }

    // -------------------------------------------------------------------------
    // Change subscription ("state changed")
    // -------------------------------------------------------------------------

    /// Subscribe to this node's "state changed" notification.
    ///
    /// The node stores only the callback - never a reference to whatever
    /// rendered the node. The returned cleanup removes exactly this entry
    /// and is safe to call after the node itself has been dropped.
    pub fn on_change(self: &Rc<Self>, callback: Rc<dyn Fn()>) -> Cleanup {
        let id = {
            let mut listeners = self.listeners.borrow_mut();
            let id = listeners.next_id;
            listeners.next_id += 1;
            listeners.entries.push((id, callback));
            id
        };

        let node = Rc::downgrade(self);
        Box::new(move || {
            if let Some(node) = node.upgrade() {
                node.listeners
                    .borrow_mut()
                    .entries
                    .retain(|(entry_id, _)| *entry_id != id);
            }
        })
    }

    /// Fire "state changed" (runtime side). Listeners registered or removed
    /// by a running callback take effect from the next notification.
    pub fn notify_change(&self) {
        let callbacks: Vec<Rc<dyn Fn()>> = self
            .listeners
            .borrow()
            .entries
            .iter()
            .map(|(_, callback)| callback.clone())
            .collect();
        for callback in callbacks {
            callback();
        }
    }

    // -------------------------------------------------------------------------
    // Coordinate basis
    // -------------------------------------------------------------------------

    /// Find the nearest container-kind node starting at this node itself and
    /// ascending the parent chain. `None` if the chain holds no container.
    pub fn positioning_root(self: &Rc<Self>) -> Option<Rc<Node>> {
        let mut current = self.clone();
        loop {
            if current.kind().is_some_and(|kind| kind.is_container()) {
                return Some(current);
            }
            current = current.parent()?;
        }
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("id", &self.id)
            .field("tag", &self.tag)
            .field("visible", &self.visible.get())
            .finish_non_exhaustive()
    }
}

/// Current on-screen top-left of `node`'s positioning root.
///
/// Recomputed per call from the container's current attributes - container
/// position can change between events. The tree guarantees a container
/// ancestor for every node that receives pointer events; calling this on a
/// node without one is a caller bug.
///
/// # Panics
///
/// Panics if no container ancestor exists.
pub fn container_origin(node: &Rc<Node>) -> (i32, i32) {
    let root = node
        .positioning_root()
        .expect("pointer event target has no container ancestor");
    let attrs = root.attributes();
    let left = attr_i32(&attrs, "default_x").unwrap_or(0);
    let top = attr_i32(&attrs, "default_y").unwrap_or(0);
    (left, top)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn container_at(x: &str, y: &str) -> Rc<Node> {
        let node = Node::new(Some("container"), "main");
        node.set_attribute("default_x", x);
        node.set_attribute("default_y", y);
        node
    }

    #[test]
    fn test_kind_derivation() {
        assert_eq!(
            Node::new(Some("layer"), "a").kind(),
            Some(NodeKind::Layer)
        );
        assert_eq!(Node::new(None, "b").kind(), None);
        assert_eq!(
            Node::new(Some("groupdef"), "c").kind(),
            Some(NodeKind::GroupDef)
        );
    }

    #[test]
    fn test_parent_links() {
        let parent = Node::new(Some("container"), "p");
        let child = Node::new(Some("layer"), "c");
        Node::append_child(&parent, &child);

        assert_eq!(parent.children().len(), 1);
        assert_eq!(child.parent().unwrap().id(), "p");
    }

    #[test]
    fn test_positioning_root_walks_ancestry() {
        let root = container_at("50", "80");
        let group = Node::new(Some("group"), "g");
        let button = Node::new(Some("button"), "b");
        Node::append_child(&root, &group);
        Node::append_child(&group, &button);

        let found = button.positioning_root().unwrap();
        assert_eq!(found.id(), "main");
        assert_eq!(container_origin(&button), (50, 80));
    }

    #[test]
    fn test_positioning_root_is_self_inclusive() {
        let root = container_at("10", "20");
        assert_eq!(root.positioning_root().unwrap().id(), "main");
        assert_eq!(container_origin(&root), (10, 20));
    }

    #[test]
    fn test_container_origin_defaults_to_zero() {
        let root = Node::new(Some("container"), "main");
        let child = Node::new(Some("layer"), "c");
        Node::append_child(&root, &child);
        assert_eq!(container_origin(&child), (0, 0));
    }

    #[test]
    #[should_panic(expected = "no container ancestor")]
    fn test_container_origin_panics_without_container() {
        let orphan = Node::new(Some("layer"), "lost");
        container_origin(&orphan);
    }

    #[test]
    fn test_origin_recomputed_per_call() {
        let root = container_at("50", "80");
        let child = Node::new(Some("layer"), "c");
        Node::append_child(&root, &child);

        assert_eq!(container_origin(&child), (50, 80));
        root.set_attribute("default_x", "100");
        assert_eq!(container_origin(&child), (100, 80));
    }

    #[test]
    fn test_on_change_fires_and_cleans_up() {
        let node = Node::new(Some("layer"), "a");
        let count = Rc::new(Cell::new(0));
        let count_clone = count.clone();

        let cleanup = node.on_change(Rc::new(move || {
            count_clone.set(count_clone.get() + 1);
        }));

        node.notify_change();
        node.notify_change();
        assert_eq!(count.get(), 2);

        cleanup();
        node.notify_change();
        assert_eq!(count.get(), 2);
    }

    #[test]
    fn test_multiple_listeners_are_independent() {
        let node = Node::new(Some("layer"), "a");
        let first = Rc::new(Cell::new(0));
        let second = Rc::new(Cell::new(0));

        let first_clone = first.clone();
        let _keep = node.on_change(Rc::new(move || {
            first_clone.set(first_clone.get() + 1);
        }));
        let second_clone = second.clone();
        let cleanup = node.on_change(Rc::new(move || {
            second_clone.set(second_clone.get() + 1);
        }));

        cleanup();
        node.notify_change();
        assert_eq!(first.get(), 1);
        assert_eq!(second.get(), 0);
    }

    #[test]
    fn test_cleanup_after_node_dropped_is_harmless() {
        let node = Node::new(Some("layer"), "a");
        let cleanup = node.on_change(Rc::new(|| {}));
        drop(node);
        cleanup();
    }

    #[test]
    fn test_commands_roundtrip() {
        let menu = Node::new(Some("popupmenu"), "menu");
        menu.set_commands(vec![Command::separator(), Command::new("c1", "Open")]);
        let commands = menu.commands();
        assert_eq!(commands.len(), 2);
        assert_eq!(commands[0].id, "seperator");
        assert_eq!(commands[1].name, "Open");
    }
}
