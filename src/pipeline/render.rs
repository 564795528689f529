//! Render Pass - The node interpreter and its retained instance tree.
//!
//! Each renderable node gets a [`ViewInstance`]: the retained state of one
//! rendered node - its resolved visual parameters, its mounted children, the
//! ephemeral pressed flag for buttons, and the change subscription that
//! re-resolves exactly this instance when the runtime signals "state
//! changed".
//!
//! Degradation policy:
//! - nodes with a `None` tag or the `groupdef` sentinel are never mounted
//! - an unknown kind warns and renders exactly its visible children
//!   (structure preserved, no element of its own)
//! - an asset miss (layout background, layer/button image) suppresses the
//!   node and its whole subtree

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use log::warn;
use spark_signals::Signal;

use crate::engine::{Cleanup, Node, SkinRuntime};
use crate::primitives::{
    resolve_button, resolve_container, resolve_group, resolve_layer, resolve_layout,
    resolve_popup_menu, resolve_text, ButtonParams, ContainerParams, GroupParams, LayerParams,
    LayoutParams, MenuParams, TextParams,
};
use crate::renderer::{ElementStyle, SpriteRef, VisualElement};
use crate::state::mouse::pointer_position;
use crate::types::NodeKind;

// =============================================================================
// RENDER CONTEXT
// =============================================================================

/// Shared handles every render-time operation needs: the owning runtime
/// (weak - the mount holds the strong reference) and the revision counter
/// bumped after each re-resolution.
#[derive(Clone)]
pub(crate) struct RenderCtx {
    pub(crate) runtime: Weak<dyn SkinRuntime>,
    pub(crate) revision: Signal<u64>,
}

impl RenderCtx {
    pub(crate) fn runtime(&self) -> Option<Rc<dyn SkinRuntime>> {
        self.runtime.upgrade()
    }

    fn bump(&self) {
        self.revision.set(self.revision.get() + 1);
    }
}

// =============================================================================
// VIEW INSTANCE
// =============================================================================

/// Resolved visual parameters of one instance, by kind.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum NodeVisual {
    Container(ContainerParams),
    Group(GroupParams),
    Layout(LayoutParams),
    Layer(LayerParams),
    Button { params: ButtonParams, toggle: bool },
    Text { params: TextParams, content: Option<String> },
    Menu(MenuParams),
    /// Unknown kind: no visual of its own, children splice into the parent.
    PassThrough,
}

/// Retained state of one rendered node.
///
/// Holds the node strongly for the duration of the mount; the reverse
/// relation (node → this instance) exists only inside the change callback,
/// and only weakly - tearing the instance down can never be blocked by the
/// node, and a node outliving its instance fires into nothing.
pub struct ViewInstance {
    node: Rc<Node>,
    visual: RefCell<Option<NodeVisual>>,
    children: RefCell<Vec<Rc<ViewInstance>>>,
    /// Ephemeral pressed state (buttons); reset when the capture completes.
    pressed: Cell<bool>,
    unsubscribe: RefCell<Option<Cleanup>>,
}

impl ViewInstance {
    /// The node this instance renders.
    pub fn node(&self) -> &Rc<Node> {
        &self.node
    }

    /// Whether this instance is currently pressed (buttons only).
    pub fn is_pressed(&self) -> bool {
        self.pressed.get()
    }

    pub(crate) fn set_pressed(&self, pressed: bool) {
        self.pressed.set(pressed);
    }
}

impl Drop for ViewInstance {
    fn drop(&mut self) {
        // Unsubscribe is guaranteed on teardown of every rendered instance.
        if let Some(cleanup) = self.unsubscribe.borrow_mut().take() {
            cleanup();
        }
    }
}

impl fmt::Debug for ViewInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewInstance")
            .field("node", &self.node.id())
            .field("pressed", &self.pressed.get())
            .finish_non_exhaustive()
    }
}

// =============================================================================
// MOUNTING & RE-RESOLUTION
// =============================================================================

/// Mount one node: create its instance, subscribe it to "state changed",
/// and run the first resolution. Returns `None` for non-renderable nodes
/// (`None` tag / `groupdef`), which take no instance and no subscription.
pub(crate) fn mount_instance(node: &Rc<Node>, ctx: &RenderCtx) -> Option<Rc<ViewInstance>> {
    match node.kind() {
        None | Some(NodeKind::GroupDef) => return None,
        Some(_) => {}
    }

    let instance = Rc::new(ViewInstance {
        node: node.clone(),
        visual: RefCell::new(None),
        children: RefCell::new(Vec::new()),
        pressed: Cell::new(false),
        unsubscribe: RefCell::new(None),
    });

    let weak = Rc::downgrade(&instance);
    let callback_ctx = ctx.clone();
    let cleanup = node.on_change(Rc::new(move || {
        // The callback owns no instance: an unmounted target makes the
        // notification a no-op.
        if let Some(instance) = weak.upgrade() {
            refresh(&instance, &callback_ctx);
        }
    }));
    *instance.unsubscribe.borrow_mut() = Some(cleanup);

    refresh(&instance, ctx);
    Some(instance)
}

/// Re-resolve one instance: its visual parameters and its direct children.
/// Ancestors and untouched siblings are left alone - this is deliberately
/// not a full-tree rerender.
pub(crate) fn refresh(instance: &Rc<ViewInstance>, ctx: &RenderCtx) {
    let Some(runtime) = ctx.runtime() else {
        return;
    };

    let kind = instance
        .node
        .kind()
        .expect("non-renderable nodes are never mounted");
    let visual = resolve_visual(&instance.node, kind, instance.pressed.get(), runtime.as_ref());
    let suppressed = visual.is_none();
    *instance.visual.borrow_mut() = visual;

    if suppressed || kind == NodeKind::PopupMenu {
        // Suppressed subtrees unmount entirely; menus render commands, not
        // child nodes.
        instance.children.borrow_mut().clear();
    } else {
        reconcile_children(instance, ctx);
    }

    ctx.bump();
}

/// Dispatch a node's kind to its rendering rule.
fn resolve_visual(
    node: &Rc<Node>,
    kind: NodeKind,
    pressed: bool,
    runtime: &dyn SkinRuntime,
) -> Option<NodeVisual> {
    let attrs = node.attributes();
    match kind {
        NodeKind::Container => Some(NodeVisual::Container(resolve_container(&attrs))),
        NodeKind::Group => Some(NodeVisual::Group(resolve_group(&attrs))),
        NodeKind::Layout => {
            resolve_layout(node.id(), &attrs, runtime.atlas()).map(NodeVisual::Layout)
        }
        NodeKind::Layer => resolve_layer(node.id(), &attrs, runtime.atlas()).map(NodeVisual::Layer),
        NodeKind::Button => resolve_button(node.id(), &attrs, runtime.atlas(), pressed)
            .map(|params| NodeVisual::Button {
                params,
                toggle: false,
            }),
        NodeKind::ToggleButton => resolve_button(node.id(), &attrs, runtime.atlas(), pressed)
            .map(|params| NodeVisual::Button {
                params,
                toggle: true,
            }),
        NodeKind::Text => {
            let params = resolve_text(&attrs);
            let content = params
                .display
                .as_deref()
                .and_then(|keyword| runtime.resolve_display(keyword));
            Some(NodeVisual::Text { params, content })
        }
        NodeKind::PopupMenu => {
            drop(attrs);
            Some(NodeVisual::Menu(resolve_popup_menu(
                &node.commands(),
                pointer_position(),
            )))
        }
        NodeKind::Unknown => {
            warn!(
                "unknown node type {:?} on {}; rendering children only",
                node.tag(),
                node.id()
            );
            Some(NodeVisual::PassThrough)
        }
        NodeKind::GroupDef => unreachable!("groupdef nodes are never mounted"),
    }
}

/// Bring the child instance list in line with the node's current visible
/// children, reusing instances whose node identity is unchanged. Dropped
/// instances unsubscribe via `Drop`.
fn reconcile_children(instance: &Rc<ViewInstance>, ctx: &RenderCtx) {
    let desired: Vec<Rc<Node>> = instance
        .node
        .children()
        .into_iter()
        .filter(|child| child.visible())
        .collect();

    let mut previous: Vec<Rc<ViewInstance>> = instance.children.borrow_mut().drain(..).collect();
    let mut next = Vec::with_capacity(desired.len());
    for child_node in &desired {
        let reused = previous
            .iter()
            .position(|prev| Rc::ptr_eq(prev.node(), child_node));
        if let Some(index) = reused {
            next.push(previous.swap_remove(index));
        } else if let Some(mounted) = mount_instance(child_node, ctx) {
            next.push(mounted);
        }
    }

    *instance.children.borrow_mut() = next;
}

// =============================================================================
// ELEMENT COLLECTION
// =============================================================================

/// Collect the positioned element tree rooted at `instance`. A suppressed
/// instance yields nothing; a pass-through instance yields exactly its
/// children's elements, spliced in place.
pub(crate) fn collect_elements(instance: &Rc<ViewInstance>) -> Vec<VisualElement> {
    let visual = instance.visual.borrow();
    let Some(visual) = visual.as_ref() else {
        return Vec::new();
    };

    let children: Vec<VisualElement> = instance
        .children
        .borrow()
        .iter()
        .flat_map(collect_elements)
        .collect();

    match visual {
        NodeVisual::PassThrough => children,
        _ => vec![build_element(instance, visual, children)],
    }
}

fn build_element(
    instance: &Rc<ViewInstance>,
    visual: &NodeVisual,
    children: Vec<VisualElement>,
) -> VisualElement {
    let node = instance.node().clone();
    let mut kind = node.kind().expect("non-renderable nodes are never mounted");
    let mut style = ElementStyle::default();
    let mut tooltip = None;
    let mut text = None;
    let mut menu_items = Vec::new();
    let mut target = Some(instance.clone());

    match visual {
        NodeVisual::Container(params) => {
            style.left = params.x;
            style.top = params.y;
            style.visible = params.visible.unwrap_or(true);
        }
        NodeVisual::Group(params) => {
            style.left = params.x;
            style.top = params.y;
        }
        NodeVisual::Layout(LayoutParams::Background {
            sprite,
            min_w,
            max_w,
            min_h,
            max_h,
        }) => {
            style.width = Some(sprite.w);
            style.height = Some(sprite.h);
            style.min_width = *min_w;
            style.max_width = *max_w;
            style.min_height = *min_h;
            style.max_height = *max_h;
            // Layout backgrounds paint the whole source image at its
            // natural size; the crop origin stays at the top-left.
            style.background = Some(SpriteRef {
                source: sprite.source.clone(),
                offset_x: 0,
                offset_y: 0,
            });
        }
        NodeVisual::Layout(LayoutParams::Plain { x, y, w, h }) => {
            style.left = *x;
            style.top = *y;
            style.width = *w;
            style.height = *h;
        }
        NodeVisual::Layer(params) => {
            style.left = params.x;
            style.top = params.y;
            style.width = Some(params.sprite.w);
            style.height = Some(params.sprite.h);
            style.background = Some(SpriteRef {
                source: params.sprite.source.clone(),
                offset_x: params.sprite.x,
                offset_y: params.sprite.y,
            });
        }
        NodeVisual::Button { params, toggle } => {
            kind = if *toggle {
                NodeKind::ToggleButton
            } else {
                NodeKind::Button
            };
            style.left = params.x;
            style.top = params.y;
            style.width = Some(params.sprite.w);
            style.height = Some(params.sprite.h);
            style.background = Some(SpriteRef {
                source: params.sprite.source.clone(),
                offset_x: params.sprite.x,
                offset_y: params.sprite.y,
            });
            tooltip = params.tooltip.clone();
        }
        NodeVisual::Text { params, content } => {
            style.left = params.x;
            style.top = params.y;
            style.width = params.w;
            style.height = params.h;
            style.color = params.color;
            style.font_size = params.font_size;
            style.text_align = params.align;
            text = content.clone();
        }
        NodeVisual::Menu(params) => {
            style.left = Some(params.x);
            style.top = Some(params.y);
            style.background_color = Some(crate::types::Rgb::BLACK);
            style.color = Some(crate::types::Rgb::WHITE);
            menu_items = params.items.clone();
            // Popup menus are event-exempt: no pointer wiring at all.
            target = None;
        }
        NodeVisual::PassThrough => unreachable!("pass-through handled by the caller"),
    }

    VisualElement {
        kind,
        node,
        style,
        tooltip,
        text,
        menu_items,
        target,
        children,
    }
}
