//! SGR mouse report decoding
//!
//! Incremental parser over raw stdin bytes. Recognises
//! `ESC [ < Cb ; Cx ; Cy M|m` mouse reports, passes other CSI sequences and
//! plain key bytes through, and keeps incomplete sequences buffered across
//! reads.

use bitflags::bitflags;
use log::trace;

use crate::constants::{MAX_CSI_LEN, MAX_SGR_MOUSE_LEN};
use crate::error::PaintError;

const ESC: u8 = 0x1b;

bitflags! {
    /// Modifier bits carried in the SGR button code
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Modifiers: u8 {
        const SHIFT = 0b0000_0100;
        const ALT   = 0b0000_1000;
        const CTRL  = 0b0001_0000;
    }
}

/// Button code bit set for motion reports
const MOTION_BIT: u16 = 32;
/// Button code bit set for wheel reports
const WHEEL_BIT: u16 = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
    /// Motion with no button held (any-motion tracking)
    None,
    WheelUp,
    WheelDown,
    /// Extra buttons (8-11) reported by some terminals
    Other(u16),
}

impl MouseButton {
    fn from_code(code: u16) -> Self {
        let low = code & 0b11;
        if code & 128 != 0 {
            return MouseButton::Other(code);
        }
        if code & WHEEL_BIT != 0 {
            return match low {
                0 => MouseButton::WheelUp,
                1 => MouseButton::WheelDown,
                _ => MouseButton::Other(code),
            };
        }
        match low {
            0 => MouseButton::Left,
            1 => MouseButton::Middle,
            2 => MouseButton::Right,
            _ => MouseButton::None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    Press,
    Drag,
    Release,
}

/// Decoded mouse report. Cells are 1-based as sent by the terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerEvent {
    pub kind: PointerKind,
    pub button: MouseButton,
    pub col: u16,
    pub row: u16,
    pub modifiers: Modifiers,
}

/// One unit of decoded input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    Pointer(PointerEvent),
    /// Plain byte (printable key or control code)
    Key(u8),
    /// Non-mouse CSI sequence, full bytes including `ESC [`
    Csi(Vec<u8>),
    /// ESC followed by a non-CSI byte
    Escape,
}

enum Step {
    Event(InputEvent, usize),
    /// Consumed bytes without producing an event
    Skip(usize),
    Incomplete,
}

/// Incremental input decoder
#[derive(Debug, Default)]
pub struct InputDecoder {
    buf: Vec<u8>,
}

impl InputDecoder {
    pub fn new() -> Self {
        Self {
            buf: Vec::with_capacity(64),
        }
    }

    /// Bytes held back waiting for the rest of a sequence
    pub fn pending(&self) -> &[u8] {
        &self.buf
    }

    /// Append input and return every complete event, in arrival order
    pub fn feed(&mut self, data: &[u8]) -> Vec<InputEvent> {
        self.buf.extend_from_slice(data);
        let mut events = Vec::new();
        let mut pos = 0;
        while pos < self.buf.len() {
            match self.step(&self.buf[pos..]) {
                Step::Event(ev, n) => {
                    events.push(ev);
                    pos += n;
                }
                Step::Skip(n) => pos += n,
                Step::Incomplete => break,
            }
        }
        self.buf.drain(..pos);
        events
    }

    fn step(&self, buf: &[u8]) -> Step {
        if buf[0] != ESC {
            return Step::Event(InputEvent::Key(buf[0]), 1);
        }
        if buf.len() < 2 {
            return Step::Incomplete;
        }
        if buf[1] != b'[' {
            // Leave the following byte for the next step
            return Step::Event(InputEvent::Escape, 1);
        }
        if buf.len() < 3 {
            return Step::Incomplete;
        }
        if buf[2] == b'<' {
            return sgr_step(buf);
        }
        csi_step(buf)
    }
}

/// Scan an SGR mouse report starting at `ESC [ <`
fn sgr_step(buf: &[u8]) -> Step {
    for (i, &b) in buf.iter().enumerate().skip(3) {
        match b {
            b'0'..=b'9' | b';' => {
                if i + 1 >= MAX_SGR_MOUSE_LEN {
                    trace!("Dropping overlong SGR mouse report");
                    return Step::Skip(i + 1);
                }
            }
            b'M' | b'm' => {
                return match parse_sgr_fields(&buf[3..i], b == b'm') {
                    Ok(ev) => Step::Event(InputEvent::Pointer(ev), i + 1),
                    Err(e) => {
                        trace!("{}", e);
                        Step::Skip(i + 1)
                    }
                };
            }
            _ => {
                // Foreign byte inside the report: drop the prefix, keep the byte
                trace!("Dropping SGR mouse report interrupted by 0x{:02x}", b);
                return Step::Skip(i);
            }
        }
    }
    Step::Incomplete
}

/// Parse `Cb;Cx;Cy` into a pointer event
fn parse_sgr_fields(fields: &[u8], release: bool) -> Result<PointerEvent, PaintError> {
    let text = std::str::from_utf8(fields)
        .map_err(|_| PaintError::Parse("non-ASCII mouse fields".to_string()))?;
    let mut parts = text.split(';');
    let mut next = |name: &str| -> Result<u16, PaintError> {
        parts
            .next()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| PaintError::Parse(format!("missing {} in {:?}", name, text)))?
            .parse::<u16>()
            .map_err(|e| PaintError::Parse(format!("bad {} in {:?}: {}", name, text, e)))
    };
    let code = next("button")?;
    let col = next("column")?;
    let row = next("row")?;
    if parts.next().is_some() {
        return Err(PaintError::Parse(format!("extra fields in {:?}", text)));
    }

    let kind = if release {
        PointerKind::Release
    } else if code & MOTION_BIT != 0 {
        PointerKind::Drag
    } else {
        PointerKind::Press
    };

    Ok(PointerEvent {
        kind,
        button: MouseButton::from_code(code & !(MOTION_BIT | 0b1_1100)),
        col,
        row,
        modifiers: Modifiers::from_bits_truncate((code & 0b1_1100) as u8),
    })
}

/// Pass through a generic CSI sequence
fn csi_step(buf: &[u8]) -> Step {
    for (i, &b) in buf.iter().enumerate().skip(2) {
        if (0x40..=0x7e).contains(&b) {
            return Step::Event(InputEvent::Csi(buf[..=i].to_vec()), i + 1);
        }
        if i + 1 >= MAX_CSI_LEN {
            trace!("Dropping overlong CSI sequence");
            return Step::Skip(i + 1);
        }
    }
    Step::Incomplete
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pointer(ev: &InputEvent) -> PointerEvent {
        match ev {
            InputEvent::Pointer(p) => *p,
            other => panic!("expected pointer event, got {:?}", other),
        }
    }

    #[test]
    fn test_press_and_release() {
        let mut d = InputDecoder::new();
        let evs = d.feed(b"\x1b[<0;5;10M\x1b[<0;5;10m");
        assert_eq!(evs.len(), 2);
        assert_eq!(
            pointer(&evs[0]),
            PointerEvent {
                kind: PointerKind::Press,
                button: MouseButton::Left,
                col: 5,
                row: 10,
                modifiers: Modifiers::empty(),
            }
        );
        let rel = pointer(&evs[1]);
        assert_eq!(rel.kind, PointerKind::Release);
        assert_eq!((rel.col, rel.row), (5, 10));
        assert!(d.pending().is_empty());
    }

    #[test]
    fn test_drag_and_hover() {
        let mut d = InputDecoder::new();
        let evs = d.feed(b"\x1b[<32;7;8M\x1b[<35;9;9M");
        let drag = pointer(&evs[0]);
        assert_eq!(drag.kind, PointerKind::Drag);
        assert_eq!(drag.button, MouseButton::Left);
        let hover = pointer(&evs[1]);
        assert_eq!(hover.kind, PointerKind::Drag);
        assert_eq!(hover.button, MouseButton::None);
    }

    #[test]
    fn test_buttons_and_modifiers() {
        let mut d = InputDecoder::new();
        let evs = d.feed(b"\x1b[<2;1;1M\x1b[<20;1;1M\x1b[<64;1;1M\x1b[<65;1;1M");
        assert_eq!(pointer(&evs[0]).button, MouseButton::Right);
        let ctrl_shift = pointer(&evs[1]);
        assert_eq!(ctrl_shift.button, MouseButton::Left);
        assert_eq!(ctrl_shift.modifiers, Modifiers::CTRL | Modifiers::SHIFT);
        assert_eq!(pointer(&evs[2]).button, MouseButton::WheelUp);
        assert_eq!(pointer(&evs[3]).button, MouseButton::WheelDown);
    }

    #[test]
    fn test_split_sequence_is_buffered() {
        let mut d = InputDecoder::new();
        assert!(d.feed(b"\x1b").is_empty());
        assert!(d.feed(b"[<0;12").is_empty());
        assert_eq!(d.pending(), b"\x1b[<0;12");
        let evs = d.feed(b"3;45Mq");
        assert_eq!(evs.len(), 2);
        let p = pointer(&evs[0]);
        assert_eq!((p.col, p.row), (123, 45));
        assert_eq!(evs[1], InputEvent::Key(b'q'));
    }

    #[test]
    fn test_every_split_point() {
        let seq = b"a\x1b[<32;10;20M\x1b[Ab";
        for cut in 0..=seq.len() {
            let mut d = InputDecoder::new();
            let mut evs = d.feed(&seq[..cut]);
            evs.extend(d.feed(&seq[cut..]));
            assert_eq!(evs.len(), 4, "cut at {}", cut);
            assert_eq!(evs[0], InputEvent::Key(b'a'));
            assert_eq!(pointer(&evs[1]).col, 10);
            assert_eq!(evs[2], InputEvent::Csi(b"\x1b[A".to_vec()));
            assert_eq!(evs[3], InputEvent::Key(b'b'));
        }
    }

    #[test]
    fn test_malformed_reports_are_dropped() {
        let mut d = InputDecoder::new();
        let evs = d.feed(b"\x1b[<0;;5M\x1b[<99999;1;1M\x1b[<1;2M\x1b[<1;2;3;4Mx");
        assert_eq!(evs, vec![InputEvent::Key(b'x')]);
        assert!(d.pending().is_empty());
    }

    #[test]
    fn test_interrupted_report_keeps_following_bytes() {
        let mut d = InputDecoder::new();
        let evs = d.feed(b"\x1b[<0;5c");
        assert_eq!(evs, vec![InputEvent::Key(b'c')]);
    }

    #[test]
    fn test_overlong_report_is_dropped() {
        let mut d = InputDecoder::new();
        let mut junk = b"\x1b[<".to_vec();
        junk.extend(std::iter::repeat(b'1').take(40));
        let evs = d.feed(&junk);
        assert!(evs.iter().all(|e| !matches!(e, InputEvent::Pointer(_))));
        assert!(d.pending().is_empty());
    }

    #[test]
    fn test_keys_pass_through() {
        let mut d = InputDecoder::new();
        let evs = d.feed(b"cC[]{}x\x03");
        let keys: Vec<u8> = evs
            .iter()
            .map(|e| match e {
                InputEvent::Key(b) => *b,
                other => panic!("unexpected {:?}", other),
            })
            .collect();
        assert_eq!(keys, b"cC[]{}x\x03".to_vec());
    }

    #[test]
    fn test_escape_then_key() {
        let mut d = InputDecoder::new();
        let evs = d.feed(b"\x1bq");
        assert_eq!(evs, vec![InputEvent::Escape, InputEvent::Key(b'q')]);
    }
}
