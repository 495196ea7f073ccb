//! Terminal output side
//!
//! Raw-mode session guard, Kitty graphics encoding and the status line.

pub mod kitty;
pub mod session;
pub mod status;

pub use kitty::{ImageSlots, KittyChunk, KittyEncoder, KittyParams};
pub use session::TerminalSession;
pub use status::StatusLine;

/// Terminal grid in character cells
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TerminalSize {
    pub cols: u16,
    pub rows: u16,
}
