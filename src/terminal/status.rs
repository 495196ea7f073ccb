//! Status line below the canvas

use crate::canvas::Brush;

const KEY_HELP: &str = "[Q]uit  [C]olor  [ [ / ] ] Radius  [X]Clear  [U]ndo";

/// Status bar text with a one-shot message slot
#[derive(Debug, Default)]
pub struct StatusLine {
    message: Option<String>,
}

impl StatusLine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show `msg` on the next render only
    pub fn set_message(&mut self, msg: impl Into<String>) {
        self.message = Some(msg.into());
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Status text trimmed and padded to exactly `cols` characters
    pub fn text(&self, brush: &Brush, cols: u16) -> String {
        let swatch = brush.swatch();
        let mut line = format!(
            "Color: {} {}  Radius: {}",
            swatch.name,
            swatch.color.rgb_hex(),
            brush.radius()
        );
        if let Some(msg) = &self.message {
            line.push_str("  | ");
            line.push_str(msg);
        }
        // Help goes last so narrow terminals lose it first
        line.push_str("    ");
        line.push_str(KEY_HELP);
        let cols = cols as usize;
        let mut out: String = line.chars().take(cols).collect();
        let len = out.chars().count();
        out.extend(std::iter::repeat(' ').take(cols - len));
        out
    }

    /// Bytes drawing the line at 1-based `row`, cursor returned home.
    /// Consumes the pending message.
    pub fn render(&mut self, brush: &Brush, row: u16, cols: u16) -> Vec<u8> {
        let text = self.text(brush, cols);
        self.message = None;
        format!("\x1b[{};1H{}\x1b[H", row, text).into_bytes()
    }
}
