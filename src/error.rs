//! Error taxonomy
//!
//! Parse, bounds and config errors are absorbed where they occur.
//! Transfer errors propagate to the event loop and end the session.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PaintError {
    /// Malformed mouse report (dropped, non-fatal)
    #[error("malformed mouse sequence: {0}")]
    Parse(String),

    /// Coordinate outside the canvas (clipped, non-fatal)
    #[error("pixel ({x}, {y}) outside {width}x{height} canvas")]
    Bounds {
        x: i64,
        y: i64,
        width: u32,
        height: u32,
    },

    /// Terminal write failed (fatal)
    #[error("terminal transfer failed: {0}")]
    Transfer(#[from] std::io::Error),

    /// Invalid configuration value (clamped or ignored, non-fatal)
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl PaintError {
    /// Whether the event loop must stop on this error
    pub fn is_fatal(&self) -> bool {
        matches!(self, PaintError::Transfer(_))
    }
}

pub type Result<T> = std::result::Result<T, PaintError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_transfer_is_fatal() {
        let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "gone");
        assert!(PaintError::from(io).is_fatal());
        assert!(!PaintError::Parse("x".into()).is_fatal());
        assert!(!PaintError::Config("radius".into()).is_fatal());
        assert!(!PaintError::Bounds {
            x: -1,
            y: 0,
            width: 4,
            height: 4
        }
        .is_fatal());
    }
}
