//! Input handling
//!
//! Raw stdin bytes are decoded into pointer events (SGR mouse reports)
//! and key bytes, which the key map turns into painter actions.

pub mod keymap;
pub mod mouse;

pub use keymap::{action_for_key, Action};
pub use mouse::{
    InputDecoder, InputEvent, Modifiers, MouseButton, PointerEvent, PointerKind,
};
