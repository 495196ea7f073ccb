//! Geometric drawing primitives
//!
//! Pixel-exact shapes used by the stroke rasterizer:
//! - Filled discs (brush stamps)
//! - Bresenham lines (interpolation between mouse samples)

pub mod geometry;

pub use geometry::{disc_spans, line_points, Point, Span};
