//! Stroke rasterizer
//!
//! Turns pointer samples into disc stamps. Consecutive drag samples are
//! joined with a Bresenham line of stamps so fast motion leaves no gaps.

use log::trace;

use super::framebuffer::Framebuffer;
use crate::drawing::{disc_spans, line_points, Point};
use crate::utils::Rgba;

/// Stroke phase of a pointer sample
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrokePhase {
    Press,
    Drag,
    Release,
}

/// Holds the previous sample of the stroke in progress
#[derive(Debug, Default)]
pub struct StrokeRasterizer {
    last: Option<Point>,
}

impl StrokeRasterizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Previous sample of the current stroke, if any
    pub fn last(&self) -> Option<Point> {
        self.last
    }

    /// Forget the previous sample so the next press starts a new stroke
    pub fn reset(&mut self) {
        self.last = None;
    }

    /// Apply one sample. Returns true if any pixel was written.
    pub fn apply(
        &mut self,
        fb: &mut Framebuffer,
        phase: StrokePhase,
        at: Point,
        radius: u32,
        color: Rgba,
    ) -> bool {
        match phase {
            StrokePhase::Press => {
                let written = stamp(fb, at, radius, color);
                self.last = Some(at);
                written > 0
            }
            StrokePhase::Drag => {
                let written = match self.last {
                    Some(prev) => segment(fb, prev, at, radius, color),
                    None => stamp(fb, at, radius, color),
                };
                self.last = Some(at);
                written > 0
            }
            StrokePhase::Release => {
                self.last = None;
                false
            }
        }
    }
}

/// Stamp one disc. Pixels outside the canvas are clipped.
pub fn stamp(fb: &mut Framebuffer, center: Point, radius: u32, color: Rgba) -> usize {
    let r = radius as i64;
    let (x, y) = (center.x as i64, center.y as i64);
    if x + r < 0 || y + r < 0 || x - r >= fb.width() as i64 || y - r >= fb.height() as i64 {
        return 0;
    }
    disc_spans(center, radius)
        .map(|span| fb.fill_span(span, color))
        .sum()
}

/// Stamp a disc at every pixel of the line `from -> to`.
///
/// Endpoints outside the area a disc can reach are clipped first, so the
/// walk is bounded by the canvas size rather than the coordinates.
pub fn segment(fb: &mut Framebuffer, from: Point, to: Point, radius: u32, color: Rgba) -> usize {
    let Some((from, to)) = clip_to_reach(fb, from, to, radius) else {
        return 0;
    };
    trace!(
        "Segment ({}, {}) -> ({}, {}) r={}",
        from.x,
        from.y,
        to.x,
        to.y,
        radius
    );
    line_points(from, to)
        .map(|p| stamp(fb, p, radius, color))
        .sum()
}

/// Liang-Barsky clip of `from -> to` against the canvas grown by `radius`.
/// Segments already inside are returned untouched.
fn clip_to_reach(fb: &Framebuffer, from: Point, to: Point, radius: u32) -> Option<(Point, Point)> {
    let r = radius as f64;
    let (xmin, ymin) = (-r, -r);
    let xmax = fb.width() as f64 - 1.0 + r;
    let ymax = fb.height() as f64 - 1.0 + r;
    let inside = |p: Point| {
        let (x, y) = (p.x as f64, p.y as f64);
        x >= xmin && x <= xmax && y >= ymin && y <= ymax
    };
    if inside(from) && inside(to) {
        return Some((from, to));
    }

    let (x0, y0) = (from.x as f64, from.y as f64);
    let dx = to.x as f64 - x0;
    let dy = to.y as f64 - y0;
    let (mut t0, mut t1) = (0.0f64, 1.0f64);
    for (p, q) in [(-dx, x0 - xmin), (dx, xmax - x0), (-dy, y0 - ymin), (dy, ymax - y0)] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let t = q / p;
        if p < 0.0 {
            if t > t1 {
                return None;
            }
            t0 = t0.max(t);
        } else {
            if t < t0 {
                return None;
            }
            t1 = t1.min(t);
        }
    }
    let at = |t: f64| Point::new((x0 + t * dx).round() as i32, (y0 + t * dy).round() as i32);
    Some((at(t0), at(t1)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const INK: Rgba = Rgba::opaque(255, 0, 0);

    fn painted(fb: &Framebuffer) -> Vec<(u32, u32)> {
        let view = fb.snapshot();
        let mut out = Vec::new();
        for y in 0..view.height {
            for x in 0..view.width {
                if view.pixel(x, y) == Some(INK) {
                    out.push((x, y));
                }
            }
        }
        out
    }

    #[test]
    fn test_drag_line_has_no_gaps() {
        let mut fb = Framebuffer::new(16, 4, Rgba::TRANSPARENT).unwrap();
        let mut r = StrokeRasterizer::new();
        r.apply(&mut fb, StrokePhase::Press, Point::new(0, 0), 0, INK);
        r.apply(&mut fb, StrokePhase::Drag, Point::new(10, 0), 0, INK);
        let px = painted(&fb);
        assert_eq!(px, (0..=10).map(|x| (x, 0)).collect::<Vec<_>>());
    }

    #[test]
    fn test_press_stamps_disc() {
        let mut fb = Framebuffer::new(9, 9, Rgba::TRANSPARENT).unwrap();
        let mut r = StrokeRasterizer::new();
        assert!(r.apply(&mut fb, StrokePhase::Press, Point::new(4, 4), 1, INK));
        assert_eq!(
            painted(&fb),
            vec![(4, 3), (3, 4), (4, 4), (5, 4), (4, 5)]
        );
        assert_eq!(r.last(), Some(Point::new(4, 4)));
    }

    #[test]
    fn test_release_writes_nothing_and_breaks_stroke() {
        let mut fb = Framebuffer::new(20, 3, Rgba::TRANSPARENT).unwrap();
        let mut r = StrokeRasterizer::new();
        r.apply(&mut fb, StrokePhase::Press, Point::new(0, 1), 0, INK);
        let before = fb.to_bytes();
        assert!(!r.apply(&mut fb, StrokePhase::Release, Point::new(5, 1), 0, INK));
        assert_eq!(fb.to_bytes(), before);
        assert_eq!(r.last(), None);

        // Next stroke must not connect to (0, 1)
        r.apply(&mut fb, StrokePhase::Press, Point::new(19, 1), 0, INK);
        assert_eq!(painted(&fb), vec![(0, 1), (19, 1)]);
    }

    #[test]
    fn test_drag_without_press_stamps_only() {
        let mut fb = Framebuffer::new(8, 8, Rgba::TRANSPARENT).unwrap();
        let mut r = StrokeRasterizer::new();
        r.apply(&mut fb, StrokePhase::Drag, Point::new(3, 3), 0, INK);
        assert_eq!(painted(&fb), vec![(3, 3)]);
    }

    #[test]
    fn test_stamp_at_corner_clips() {
        let mut fb = Framebuffer::new(4, 4, Rgba::TRANSPARENT).unwrap();
        let n = stamp(&mut fb, Point::new(0, 0), 2, INK);
        // Quarter disc of radius 2 inside the canvas
        assert_eq!(n, 6);
        assert_eq!(painted(&fb).len(), 6);
    }

    #[test]
    fn test_extreme_coordinates_write_nothing() {
        let mut fb = Framebuffer::new(4, 4, Rgba::TRANSPARENT).unwrap();
        assert_eq!(stamp(&mut fb, Point::new(i32::MAX, 0), 1, INK), 0);
        assert_eq!(stamp(&mut fb, Point::new(i32::MIN, i32::MAX), 12, INK), 0);

        let mut r = StrokeRasterizer::new();
        assert!(!r.apply(&mut fb, StrokePhase::Press, Point::new(0, i32::MIN + 1), 2, INK));
        assert!(!r.apply(&mut fb, StrokePhase::Drag, Point::new(i32::MAX, i32::MIN), 2, INK));
        assert!(painted(&fb).is_empty());
    }

    #[test]
    fn test_far_segment_crosses_canvas() {
        let mut fb = Framebuffer::new(4, 4, Rgba::TRANSPARENT).unwrap();
        let n = segment(&mut fb, Point::new(i32::MIN, 1), Point::new(i32::MAX, 1), 0, INK);
        assert_eq!(n, 4);
        assert_eq!(painted(&fb), vec![(0, 1), (1, 1), (2, 1), (3, 1)]);
    }

    proptest! {
        #[test]
        fn prop_writes_stay_in_bounds(
            w in 1u32..24,
            h in 1u32..24,
            radius in 0u32..12,
            samples in prop::collection::vec(
                (
                    prop_oneof![-40i32..40, any::<i32>()],
                    prop_oneof![-40i32..40, any::<i32>()],
                ),
                1..8,
            ),
        ) {
            let bg = Rgba::new(1, 2, 3, 4);
            let mut fb = Framebuffer::new(w, h, bg).unwrap();
            let mut r = StrokeRasterizer::new();
            let mut phase = StrokePhase::Press;
            for (x, y) in samples {
                r.apply(&mut fb, phase, Point::new(x, y), radius, INK);
                phase = StrokePhase::Drag;
            }
            // Buffer size is unchanged and every pixel is either ink or background
            let view = fb.snapshot();
            prop_assert_eq!(view.data.len(), (w * h * 4) as usize);
            for px in view.data.chunks_exact(4) {
                let c = Rgba::from_bytes(px);
                prop_assert!(c == INK || c == bg);
            }
        }
    }
}
