//! Undo/redo over whole-framebuffer snapshots

use std::collections::VecDeque;

use log::debug;

use super::framebuffer::Framebuffer;

#[derive(Debug)]
pub struct History {
    undo: VecDeque<Vec<u8>>,
    redo: Vec<Vec<u8>>,
    limit: usize,
}

impl History {
    /// `limit` = max undo depth; 0 disables history
    pub fn new(limit: usize) -> Self {
        Self {
            undo: VecDeque::new(),
            redo: Vec::new(),
            limit,
        }
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    /// Record the current state before a mutation. Clears redo.
    pub fn checkpoint(&mut self, fb: &Framebuffer) {
        if self.limit == 0 {
            return;
        }
        if self.undo.len() == self.limit {
            self.undo.pop_front();
        }
        self.undo.push_back(fb.to_bytes());
        self.redo.clear();
    }

    /// Returns false when there is nothing to undo
    pub fn undo(&mut self, fb: &mut Framebuffer) -> bool {
        let Some(prev) = self.undo.pop_back() else {
            return false;
        };
        self.redo.push(fb.to_bytes());
        if let Err(e) = fb.restore(prev) {
            debug!("Undo snapshot rejected: {}", e);
            return false;
        }
        true
    }

    pub fn redo(&mut self, fb: &mut Framebuffer) -> bool {
        let Some(next) = self.redo.pop() else {
            return false;
        };
        self.undo.push_back(fb.to_bytes());
        if let Err(e) = fb.restore(next) {
            debug!("Redo snapshot rejected: {}", e);
            return false;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::Rgba;

    const RED: Rgba = Rgba::opaque(255, 0, 0);

    #[test]
    fn test_undo_redo() {
        let mut fb = Framebuffer::new(2, 2, Rgba::TRANSPARENT).unwrap();
        let mut h = History::new(8);
        assert!(!h.undo(&mut fb));

        h.checkpoint(&fb);
        fb.set_pixel(0, 0, RED).unwrap();

        assert!(h.undo(&mut fb));
        assert_eq!(fb.pixel(0, 0).unwrap(), Rgba::TRANSPARENT);
        assert!(h.can_redo());

        assert!(h.redo(&mut fb));
        assert_eq!(fb.pixel(0, 0).unwrap(), RED);
        assert!(!h.can_redo());
    }

    #[test]
    fn test_checkpoint_clears_redo() {
        let mut fb = Framebuffer::new(1, 1, Rgba::TRANSPARENT).unwrap();
        let mut h = History::new(8);
        h.checkpoint(&fb);
        fb.set_pixel(0, 0, RED).unwrap();
        h.undo(&mut fb);
        h.checkpoint(&fb);
        assert!(!h.can_redo());
    }

    #[test]
    fn test_limit_drops_oldest() {
        let mut fb = Framebuffer::new(1, 1, Rgba::TRANSPARENT).unwrap();
        let mut h = History::new(2);
        for v in 1..=3u8 {
            h.checkpoint(&fb);
            fb.set_pixel(0, 0, Rgba::new(v, v, v, v)).unwrap();
        }
        assert!(h.undo(&mut fb));
        assert!(h.undo(&mut fb));
        assert!(!h.undo(&mut fb));
        assert_eq!(fb.pixel(0, 0).unwrap(), Rgba::new(1, 1, 1, 1));
    }

    #[test]
    fn test_zero_limit_disables() {
        let fb = Framebuffer::new(1, 1, Rgba::TRANSPARENT).unwrap();
        let mut h = History::new(0);
        h.checkpoint(&fb);
        assert!(!h.can_undo());
    }
}
