//! Canvas state
//!
//! Framebuffer, brush, stroke rasterization, cell-to-pixel mapping and
//! snapshot history.

pub mod brush;
pub mod framebuffer;
pub mod history;
pub mod mapper;
pub mod stroke;

pub use brush::{Brush, RadiusChange, Swatch};
pub use framebuffer::{FrameView, Framebuffer};
pub use history::History;
pub use mapper::CoordinateMapper;
pub use stroke::{StrokePhase, StrokeRasterizer};
