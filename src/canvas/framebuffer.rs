//! RGBA framebuffer
//!
//! Row-major, 4 bytes per pixel, dimensions fixed at construction.

use log::trace;

use crate::constants::MAX_CANVAS_EDGE;
use crate::drawing::Span;
use crate::error::{PaintError, Result};
use crate::utils::Rgba;

/// Read-only view of framebuffer contents, handed to the encoder and exporters
#[derive(Debug, Clone, Copy)]
pub struct FrameView<'a> {
    pub width: u32,
    pub height: u32,
    pub data: &'a [u8],
}

impl<'a> FrameView<'a> {
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y as usize * self.width as usize + x as usize) * 4;
        Some(Rgba::from_bytes(&self.data[idx..idx + 4]))
    }
}

#[derive(Debug, Clone)]
pub struct Framebuffer {
    width: u32,
    height: u32,
    background: Rgba,
    data: Vec<u8>,
}

impl Framebuffer {
    /// Allocate a canvas filled with `background`.
    pub fn new(width: u32, height: u32, background: Rgba) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(PaintError::Config(format!(
                "canvas must be at least 1x1, got {}x{}",
                width, height
            )));
        }
        if width > MAX_CANVAS_EDGE || height > MAX_CANVAS_EDGE {
            return Err(PaintError::Config(format!(
                "canvas {}x{} exceeds {} pixel edge limit",
                width, height, MAX_CANVAS_EDGE
            )));
        }
        let len = width as usize * height as usize * 4;
        let mut fb = Self {
            width,
            height,
            background,
            data: vec![0; len],
        };
        fb.clear();
        Ok(fb)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn background(&self) -> Rgba {
        self.background
    }

    #[inline]
    fn offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * 4
    }

    fn check(&self, x: i64, y: i64) -> Result<(u32, u32)> {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return Err(PaintError::Bounds {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }
        Ok((x as u32, y as u32))
    }

    pub fn pixel(&self, x: i64, y: i64) -> Result<Rgba> {
        let (x, y) = self.check(x, y)?;
        let idx = self.offset(x, y);
        Ok(Rgba::from_bytes(&self.data[idx..idx + 4]))
    }

    pub fn set_pixel(&mut self, x: i64, y: i64, color: Rgba) -> Result<()> {
        let (x, y) = self.check(x, y)?;
        let idx = self.offset(x, y);
        self.data[idx..idx + 4].copy_from_slice(&color.to_bytes());
        Ok(())
    }

    /// Fill a horizontal span, clipped to the canvas.
    /// Returns the number of pixels written.
    pub fn fill_span(&mut self, span: Span, color: Rgba) -> usize {
        if span.y < 0 || span.y >= self.height as i64 {
            return 0;
        }
        let x0 = span.x0.max(0);
        let x1 = span.x1.min(self.width as i64 - 1);
        if x0 > x1 {
            return 0;
        }
        let px = color.to_bytes();
        let start = self.offset(x0 as u32, span.y as u32);
        let end = self.offset(x1 as u32, span.y as u32) + 4;
        for chunk in self.data[start..end].chunks_exact_mut(4) {
            chunk.copy_from_slice(&px);
        }
        (x1 - x0 + 1) as usize
    }

    /// Reset every pixel to the background color
    pub fn clear(&mut self) {
        let px = self.background.to_bytes();
        for chunk in self.data.chunks_exact_mut(4) {
            chunk.copy_from_slice(&px);
        }
        trace!("Framebuffer cleared to {}", self.background);
    }

    pub fn snapshot(&self) -> FrameView<'_> {
        FrameView {
            width: self.width,
            height: self.height,
            data: &self.data,
        }
    }

    /// Owned copy of the pixel bytes (for history)
    pub fn to_bytes(&self) -> Vec<u8> {
        self.data.clone()
    }

    /// Replace contents with a previously captured byte snapshot.
    pub fn restore(&mut self, bytes: Vec<u8>) -> Result<()> {
        if bytes.len() != self.data.len() {
            return Err(PaintError::Config(format!(
                "snapshot is {} bytes, canvas needs {}",
                bytes.len(),
                self.data.len()
            )));
        }
        self.data = bytes;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clear_fills_background() {
        let bg = Rgba::new(0, 0, 0, 0);
        let mut fb = Framebuffer::new(4, 4, bg).unwrap();
        fb.set_pixel(1, 2, Rgba::opaque(255, 0, 0)).unwrap();
        fb.set_pixel(3, 3, Rgba::opaque(0, 255, 0)).unwrap();
        fb.clear();
        for y in 0..4 {
            for x in 0..4 {
                assert_eq!(fb.pixel(x, y).unwrap(), bg);
            }
        }
        assert!(fb.snapshot().data.iter().all(|&b| b == 0));
    }

    #[test]
    fn test_new_uses_background() {
        let bg = Rgba::new(12, 12, 12, 255);
        let fb = Framebuffer::new(3, 2, bg).unwrap();
        assert_eq!(fb.snapshot().data.len(), 3 * 2 * 4);
        assert_eq!(fb.snapshot().pixel(2, 1), Some(bg));
        assert_eq!(fb.snapshot().pixel(3, 1), None);
    }

    #[test]
    fn test_out_of_bounds_rejected() {
        let mut fb = Framebuffer::new(4, 4, Rgba::TRANSPARENT).unwrap();
        let red = Rgba::opaque(255, 0, 0);
        assert!(matches!(
            fb.set_pixel(4, 0, red),
            Err(PaintError::Bounds { x: 4, y: 0, .. })
        ));
        assert!(fb.set_pixel(-1, 0, red).is_err());
        assert!(fb.pixel(0, 4).is_err());
        assert!(fb.snapshot().data.iter().all(|&b| b == 0));
    }

    #[test]
    fn test_zero_size_rejected() {
        assert!(Framebuffer::new(0, 4, Rgba::TRANSPARENT).is_err());
        assert!(Framebuffer::new(4, 0, Rgba::TRANSPARENT).is_err());
    }

    #[test]
    fn test_fill_span_clips() {
        let mut fb = Framebuffer::new(4, 2, Rgba::TRANSPARENT).unwrap();
        let c = Rgba::opaque(9, 9, 9);
        assert_eq!(fb.fill_span(Span { y: 1, x0: -3, x1: 10 }, c), 4);
        assert_eq!(fb.fill_span(Span { y: 2, x0: 0, x1: 1 }, c), 0);
        assert_eq!(fb.fill_span(Span { y: 0, x0: 5, x1: 9 }, c), 0);
        let wide = Span {
            y: 0,
            x0: i64::from(i32::MIN) - 10,
            x1: i64::from(i32::MAX) + 10,
        };
        assert_eq!(fb.fill_span(wide, c), 4);
        assert_eq!(fb.pixel(0, 1).unwrap(), c);
        assert_eq!(fb.pixel(3, 1).unwrap(), c);
        assert_eq!(fb.pixel(0, 0).unwrap(), Rgba::TRANSPARENT);
    }

    #[test]
    fn test_restore_checks_length() {
        let mut fb = Framebuffer::new(2, 2, Rgba::TRANSPARENT).unwrap();
        assert!(fb.restore(vec![0; 3]).is_err());
        assert!(fb.restore(vec![7; 16]).is_ok());
        assert_eq!(fb.pixel(1, 1).unwrap(), Rgba::new(7, 7, 7, 7));
    }
}
