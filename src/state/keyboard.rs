//! Keyboard Module - Key events forwarded into the skin vocabulary.
//!
//! Key handling is deliberately thin: the physical key code reported by the
//! host passes through unmodified as `onKeyDown`/`onKeyUp` on the target
//! node. No key mapping, no focus model - which node receives keys is the
//! host's decision.
//!
//! # Example
//!
//! ```ignore
//! use skinview::KeyEvent;
//!
//! handle.dispatcher().dispatch_key(&target, &KeyEvent::press(13));
//! ```

use std::rc::Rc;

use super::mouse::PointerDispatcher;
use crate::engine::Trigger;
use crate::pipeline::ViewInstance;
use crate::types::Modifiers;

// =============================================================================
// TYPES
// =============================================================================

/// Key press or release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyState {
    #[default]
    Press,
    Release,
}

/// One raw key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    /// Physical key code as reported by the host, forwarded unmodified.
    pub code: u32,
    pub state: KeyState,
    pub modifiers: Modifiers,
}

impl KeyEvent {
    /// Create a key event.
    pub fn new(code: u32, state: KeyState) -> Self {
        Self {
            code,
            state,
            modifiers: Modifiers::default(),
        }
    }

    /// Create a key-press event.
    pub fn press(code: u32) -> Self {
        Self::new(code, KeyState::Press)
    }

    /// Create a key-release event.
    pub fn release(code: u32) -> Self {
        Self::new(code, KeyState::Release)
    }

    /// Check if this is a press event.
    pub fn is_press(&self) -> bool {
        self.state == KeyState::Press
    }
}

// =============================================================================
// DISPATCH
// =============================================================================

impl PointerDispatcher {
    /// Forward a key event to `target`'s node as `KeyDown`/`KeyUp`.
    pub fn dispatch_key(&self, target: &Rc<ViewInstance>, event: &KeyEvent) {
        let Some(runtime) = self.ctx.runtime() else {
            return;
        };
        let trigger = match event.state {
            KeyState::Press => Trigger::KeyDown { code: event.code },
            KeyState::Release => Trigger::KeyUp { code: event.code },
        };
        runtime.trigger(target.node(), trigger);
    }
}

// =============================================================================
// TESTS
// =============================================================================
