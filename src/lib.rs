//! kpaint - mouse painting inside a Kitty graphics capable terminal
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────┐
//! │          stdin (raw mode, SGR mouse)     │
//! ├──────────────────────────────────────────┤
//! │  InputDecoder → CoordinateMapper         │
//! │                      ↓                   │
//! │  StrokeRasterizer → Framebuffer (RGBA)   │
//! │                      ↓                   │
//! │  KittyEncoder (base64 chunks, 2 ids)     │
//! └──────────────────────────────────────────┘
//! ```

pub mod app;
pub mod canvas;
pub mod config;
pub mod constants;
pub mod drawing;
pub mod error;
pub mod export;
pub mod input;
pub mod terminal;
pub mod utils;

pub use app::{LoopState, Painter};
pub use error::{PaintError, Result};
