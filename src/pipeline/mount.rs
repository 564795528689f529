//! Mount API - Lifecycle of one rendered skin tree.
//!
//! `mount` walks the externally-owned node tree, builds the retained
//! instance tree, and returns a [`MountHandle`]: the embedder's grip on the
//! rendered skin. The handle serves positioned element snapshots, owns the
//! pointer dispatcher, exposes the revision counter that advances on every
//! re-resolution, and tears everything down on `unmount`.
//!
//! # Example
//!
//! ```ignore
//! use skinview::{mount, PointerEvent, MouseButton};
//!
//! let handle = mount(&root, runtime);
//!
//! // Draw the current scene.
//! for element in handle.elements() {
//!     draw(&element);
//! }
//!
//! // Feed input back in.
//! if let Some(target) = handle.elements()[0].target.clone() {
//!     handle.dispatcher().dispatch(&target, &PointerEvent::down(MouseButton::Left, 10, 10));
//! }
//! handle.dispatcher().release(10, 10);
//!
//! handle.unmount();
//! ```

use std::rc::Rc;

use spark_signals::{signal, Signal};

use super::render::{collect_elements, mount_instance, RenderCtx, ViewInstance};
use crate::engine::{Node, SkinRuntime};
use crate::primitives::MenuItem;
use crate::renderer::VisualElement;
use crate::state::mouse::PointerDispatcher;

// =============================================================================
// MOUNT HANDLE
// =============================================================================

/// Handle to one mounted skin tree.
///
/// Holds the strong references for the duration of the mount: the runtime,
/// the retained instance tree, and the pointer dispatcher. Dropping the
/// handle (or calling [`MountHandle::unmount`]) tears the instance tree
/// down, which runs every change-subscription cleanup; captures still
/// outstanding in the dispatcher go stale and complete silently.
pub struct MountHandle {
    runtime: Rc<dyn SkinRuntime>,
    root: Option<Rc<ViewInstance>>,
    dispatcher: PointerDispatcher,
    ctx: RenderCtx,
}

impl MountHandle {
    /// Snapshot of the positioned element tree. Empty when the root node is
    /// non-renderable or its visual is suppressed.
    pub fn elements(&self) -> Vec<VisualElement> {
        self.root
            .as_ref()
            .map(collect_elements)
            .unwrap_or_default()
    }

    /// The pointer dispatcher for this tree.
    pub fn dispatcher(&self) -> &PointerDispatcher {
        &self.dispatcher
    }

    /// Current render revision. Advances whenever any instance re-resolves.
    pub fn revision(&self) -> u64 {
        self.ctx.revision.get()
    }

    /// The revision signal itself, for embedders that re-draw reactively.
    pub fn revision_signal(&self) -> Signal<u64> {
        self.ctx.revision.clone()
    }

    /// Activate one popup-menu row on `node`. Divider rows have no command
    /// id and do nothing.
    pub fn activate_menu_item(&self, node: &Rc<Node>, item: &MenuItem) {
        if let Some(command_id) = &item.command_id {
            self.runtime.select_command(node, command_id);
        }
    }

    /// Tear the rendered tree down. Every instance unsubscribes from its
    /// node; later `notify_change` calls on the tree are inert.
    pub fn unmount(mut self) {
        self.root.take();
    }
}

// =============================================================================
// MOUNT / UNMOUNT
// =============================================================================

/// Mount a skin tree rooted at `root`, rendering through `runtime`.
///
/// The handle keeps the runtime alive; every instance subscribes to its
/// node's "state changed" notification on mount and unsubscribes on
/// unmount.
pub fn mount(root: &Rc<Node>, runtime: Rc<dyn SkinRuntime>) -> MountHandle {
    let ctx = RenderCtx {
        runtime: Rc::downgrade(&runtime),
        revision: signal(0),
    };
    let root_instance = mount_instance(root, &ctx);
    let dispatcher = PointerDispatcher::new(ctx.clone());

    MountHandle {
        runtime,
        root: root_instance,
        dispatcher,
        ctx,
    }
}

/// Unmount and clean up.
pub fn unmount(handle: MountHandle) {
    handle.unmount();
}

// =============================================================================
// TESTS
// =============================================================================
