//! State Module - The input-side state systems.
//!
//! - **Mouse** - pointer event dispatch, the capture state machine, and the
//!   process-wide pointer position
//! - **Keyboard** - key events forwarded into the skin vocabulary

pub mod keyboard;
pub mod mouse;

pub use keyboard::{KeyEvent, KeyState};
pub use mouse::{
    pointer_position, MouseButton, PointerAction, PointerDispatcher, PointerEvent,
};
