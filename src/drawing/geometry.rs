//! Integer geometry for brush rasterization
//!
//! Discs are tested by squared distance (no anti-aliasing) and lines
//! are walked with Bresenham, so every result is exact and reproducible.

/// Integer pixel position. May lie outside the canvas; callers clip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Horizontal run of pixels `[x0, x1]` on row `y` (inclusive).
///
/// Wider than [`Point`] so discs around extreme centers cannot overflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub y: i64,
    pub x0: i64,
    pub x1: i64,
}

/// Rows of a filled disc centered at `center`.
///
/// A pixel (x, y) belongs to the disc iff `dx² + dy² <= r²`.
/// Radius 0 yields the single center pixel.
pub fn disc_spans(center: Point, radius: u32) -> impl Iterator<Item = Span> {
    let (cx, cy) = (center.x as i64, center.y as i64);
    let r = radius as i64;
    let r2 = r * r;
    (-r..=r).map(move |dy| {
        // Widest dx with dx² <= r² - dy²
        let rem = r2 - dy * dy;
        let mut half = (rem as f64).sqrt() as i64;
        while half * half > rem {
            half -= 1;
        }
        while (half + 1) * (half + 1) <= rem {
            half += 1;
        }
        Span {
            y: cy + dy,
            x0: cx - half,
            x1: cx + half,
        }
    })
}

/// Bresenham walk from `from` to `to`, both endpoints included.
pub fn line_points(from: Point, to: Point) -> LinePoints {
    let dx = (to.x as i64 - from.x as i64).abs();
    let dy = -(to.y as i64 - from.y as i64).abs();
    LinePoints {
        x: from.x as i64,
        y: from.y as i64,
        end_x: to.x as i64,
        end_y: to.y as i64,
        dx,
        dy,
        sx: if from.x < to.x { 1 } else { -1 },
        sy: if from.y < to.y { 1 } else { -1 },
        err: dx + dy,
        done: false,
    }
}

/// Iterator state for [`line_points`]
#[derive(Debug, Clone)]
pub struct LinePoints {
    x: i64,
    y: i64,
    end_x: i64,
    end_y: i64,
    dx: i64,
    dy: i64,
    sx: i64,
    sy: i64,
    err: i64,
    done: bool,
}

impl Iterator for LinePoints {
    type Item = Point;

    fn next(&mut self) -> Option<Point> {
        if self.done {
            return None;
        }
        let current = Point::new(self.x as i32, self.y as i32);
        if self.x == self.end_x && self.y == self.end_y {
            self.done = true;
            return Some(current);
        }
        let e2 = 2 * self.err;
        if e2 >= self.dy {
            self.err += self.dy;
            self.x += self.sx;
        }
        if e2 <= self.dx {
            self.err += self.dx;
            self.y += self.sy;
        }
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn disc_pixels(center: Point, radius: u32) -> Vec<(i64, i64)> {
        disc_spans(center, radius)
            .flat_map(|s| (s.x0..=s.x1).map(move |x| (x, s.y)))
            .collect()
    }

    #[test]
    fn test_disc_radius_zero_is_single_pixel() {
        assert_eq!(disc_pixels(Point::new(3, 4), 0), vec![(3, 4)]);
    }

    #[test]
    fn test_disc_matches_squared_distance() {
        let c = Point::new(0, 0);
        for radius in 1..6u32 {
            let got = disc_pixels(c, radius);
            let r = radius as i64;
            let mut want = Vec::new();
            for y in -r..=r {
                for x in -r..=r {
                    if x * x + y * y <= r * r {
                        want.push((x, y));
                    }
                }
            }
            assert_eq!(got, want, "radius {}", radius);
        }
    }

    #[test]
    fn test_disc_at_extreme_center() {
        let spans: Vec<_> = disc_spans(Point::new(i32::MAX, i32::MIN), 2).collect();
        assert_eq!(spans.len(), 5);
        assert_eq!(spans[0].y, i32::MIN as i64 - 2);
        assert_eq!(spans[2].x1, i32::MAX as i64 + 2);
    }

    #[test]
    fn test_horizontal_line_has_no_gaps() {
        let pts: Vec<_> = line_points(Point::new(0, 0), Point::new(10, 0)).collect();
        assert_eq!(pts.len(), 11);
        for (i, p) in pts.iter().enumerate() {
            assert_eq!(*p, Point::new(i as i32, 0));
        }
    }

    #[test]
    fn test_line_steps_are_8_connected() {
        let pts: Vec<_> = line_points(Point::new(7, -3), Point::new(-5, 20)).collect();
        assert_eq!(pts.first(), Some(&Point::new(7, -3)));
        assert_eq!(pts.last(), Some(&Point::new(-5, 20)));
        for w in pts.windows(2) {
            assert!((w[0].x - w[1].x).abs() <= 1);
            assert!((w[0].y - w[1].y).abs() <= 1);
        }
        // One point per step along the major axis
        assert_eq!(pts.len(), 24);
    }

    #[test]
    fn test_degenerate_line() {
        let pts: Vec<_> = line_points(Point::new(2, 2), Point::new(2, 2)).collect();
        assert_eq!(pts, vec![Point::new(2, 2)]);
    }
}
