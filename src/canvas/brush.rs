//! Brush state: palette selection and radius

use log::{debug, warn};

use crate::constants::{MAX_BRUSH_RADIUS, MIN_BRUSH_RADIUS};
use crate::error::PaintError;
use crate::utils::Rgba;

/// Named palette color
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Swatch {
    pub name: String,
    pub color: Rgba,
}

impl Swatch {
    pub fn new(name: impl Into<String>, color: Rgba) -> Self {
        Self {
            name: name.into(),
            color,
        }
    }
}

/// Outcome of a radius adjustment, for the status line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RadiusChange {
    Changed(u32),
    AtMinimum,
    AtMaximum,
    Unchanged,
}

#[derive(Debug, Clone)]
pub struct Brush {
    palette: Vec<Swatch>,
    index: usize,
    radius: u32,
    min_radius: u32,
    max_radius: u32,
}

impl Brush {
    /// Build a brush from a palette and an initial color.
    ///
    /// The initial color selects the matching palette entry; when none
    /// matches it is inserted at the front as "Current". Bounds are
    /// normalised so that `1 <= min <= max`.
    pub fn new(
        mut palette: Vec<Swatch>,
        color: Rgba,
        radius: u32,
        min_radius: u32,
        max_radius: u32,
    ) -> Self {
        let index = match palette.iter().position(|s| s.color == color) {
            Some(i) => i,
            None => {
                palette.insert(0, Swatch::new("Current", color));
                0
            }
        };
        let min_radius = min_radius.clamp(MIN_BRUSH_RADIUS, MAX_BRUSH_RADIUS);
        let max_radius = max_radius.clamp(min_radius, MAX_BRUSH_RADIUS);
        Self {
            palette,
            index,
            radius: radius.clamp(min_radius, max_radius),
            min_radius,
            max_radius,
        }
    }

    pub fn color(&self) -> Rgba {
        self.palette[self.index].color
    }

    pub fn swatch(&self) -> &Swatch {
        &self.palette[self.index]
    }

    pub fn radius(&self) -> u32 {
        self.radius
    }

    pub fn bounds(&self) -> (u32, u32) {
        (self.min_radius, self.max_radius)
    }

    pub fn palette(&self) -> &[Swatch] {
        &self.palette
    }

    /// Step through the palette, wrapping in both directions
    pub fn cycle_color(&mut self, step: i32) -> &Swatch {
        let len = self.palette.len() as i64;
        self.index = (self.index as i64 + step as i64).rem_euclid(len) as usize;
        debug!("Brush color -> {}", self.palette[self.index].name);
        &self.palette[self.index]
    }

    /// Select a palette entry directly. Out-of-range indices are ignored.
    pub fn select(&mut self, index: usize) -> Result<&Swatch, PaintError> {
        if index >= self.palette.len() {
            warn!("Palette index {} ignored ({} entries)", index, self.palette.len());
            return Err(PaintError::Config(format!(
                "palette index {} out of range (0..{})",
                index,
                self.palette.len()
            )));
        }
        self.index = index;
        Ok(&self.palette[index])
    }

    /// Add `delta` to the radius, clamped to the configured bounds
    pub fn adjust_radius(&mut self, delta: i32) -> RadiusChange {
        let target = (self.radius as i64 + delta as i64)
            .clamp(self.min_radius as i64, self.max_radius as i64) as u32;
        if target != self.radius {
            self.radius = target;
            debug!("Brush radius -> {}", target);
            RadiusChange::Changed(target)
        } else if delta < 0 {
            RadiusChange::AtMinimum
        } else if delta > 0 {
            RadiusChange::AtMaximum
        } else {
            RadiusChange::Unchanged
        }
    }
}
