//! Kitty graphics protocol
//!
//! https://sw.kovidgoyal.net/kitty/graphics-protocol/
//!
//! Frames are sent as `ESC _ G <control> ; <base64> ESC \` sequences. The
//! control data is built from [`KittyParams`] rather than by string
//! concatenation so that chunk and key invariants can be checked in tests.
//! Two image ids alternate between frames: the new image is transmitted and
//! placed first, then the previously displayed one is deleted.

use std::io::Write;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use flate2::{write::ZlibEncoder, Compression};
use log::{debug, trace};

use crate::canvas::FrameView;
use crate::constants::{CURSOR_HOME, KITTY_APC_END, KITTY_APC_START, KITTY_CHUNK_SIZE};
use crate::error::{PaintError, Result};

/// Kitty command action (a)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KittyAction {
    /// Transmit only (a=t)
    Transmit,
    /// Transmit and display (a=T)
    TransmitAndDisplay,
    /// Display (a=p)
    Display,
    /// Delete (a=d)
    Delete,
    /// Query (a=q)
    Query,
}

impl KittyAction {
    fn as_char(self) -> char {
        match self {
            KittyAction::Transmit => 't',
            KittyAction::TransmitAndDisplay => 'T',
            KittyAction::Display => 'p',
            KittyAction::Delete => 'd',
            KittyAction::Query => 'q',
        }
    }

    fn from_value(value: &str) -> Option<Self> {
        Some(match value {
            "t" => KittyAction::Transmit,
            "T" => KittyAction::TransmitAndDisplay,
            "p" => KittyAction::Display,
            "d" => KittyAction::Delete,
            "q" => KittyAction::Query,
            _ => return None,
        })
    }
}

/// Pixel format (f)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KittyFormat {
    /// RGB (f=24)
    Rgb,
    /// RGBA (f=32)
    Rgba,
    /// PNG (f=100)
    Png,
}

impl KittyFormat {
    fn code(self) -> u32 {
        match self {
            KittyFormat::Rgb => 24,
            KittyFormat::Rgba => 32,
            KittyFormat::Png => 100,
        }
    }

    fn from_code(code: u32) -> Option<Self> {
        Some(match code {
            24 => KittyFormat::Rgb,
            32 => KittyFormat::Rgba,
            100 => KittyFormat::Png,
            _ => return None,
        })
    }
}

/// Control data of one graphics command. Unset keys are omitted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KittyParams {
    /// Action (a)
    pub action: Option<KittyAction>,
    /// Format (f)
    pub format: Option<KittyFormat>,
    /// Compression (o): z=zlib
    pub compression: Option<char>,
    /// Width in pixels (s)
    pub width: Option<u32>,
    /// Height in pixels (v)
    pub height: Option<u32>,
    /// Image ID (i)
    pub id: Option<u32>,
    /// Placement ID (p)
    pub placement: Option<u32>,
    /// Quiet mode (q): 1=no response on success, 2=no response
    pub quiet: Option<u8>,
    /// Cell columns to scale into (c)
    pub cols: Option<u32>,
    /// Cell rows to scale into (r)
    pub rows: Option<u32>,
    /// Cursor movement policy (C): 1=leave cursor in place
    pub cursor_movement: Option<u8>,
    /// Delete target (d)
    pub delete_target: Option<char>,
    /// Chunk continuation flag (m): 1=continue, 0=end
    pub more: Option<bool>,
}

impl KittyParams {
    /// Render `key=value,...` in a fixed key order
    pub fn encode(&self) -> String {
        let mut parts: Vec<String> = Vec::with_capacity(13);
        if let Some(a) = self.action {
            parts.push(format!("a={}", a.as_char()));
        }
        if let Some(f) = self.format {
            parts.push(format!("f={}", f.code()));
        }
        if let Some(o) = self.compression {
            parts.push(format!("o={}", o));
        }
        let numeric = [
            ("s", self.width),
            ("v", self.height),
            ("i", self.id),
            ("p", self.placement),
            ("q", self.quiet.map(u32::from)),
            ("c", self.cols),
            ("r", self.rows),
            ("C", self.cursor_movement.map(u32::from)),
        ];
        for (key, value) in numeric {
            if let Some(v) = value {
                parts.push(format!("{}={}", key, v));
            }
        }
        if let Some(d) = self.delete_target {
            parts.push(format!("d={}", d));
        }
        if let Some(m) = self.more {
            parts.push(format!("m={}", u8::from(m)));
        }
        parts.join(",")
    }

    /// Parse control data produced by [`KittyParams::encode`]
    pub fn parse(control: &str) -> Result<Self> {
        let mut params = KittyParams::default();
        if control.is_empty() {
            return Ok(params);
        }
        for part in control.split(',') {
            let (key, value) = part
                .split_once('=')
                .ok_or_else(|| PaintError::Parse(format!("kitty key without value: {:?}", part)))?;
            let num = || -> Result<u32> {
                value
                    .parse()
                    .map_err(|_| PaintError::Parse(format!("kitty {}={} is not a number", key, value)))
            };
            let small = || -> Result<u8> {
                u8::try_from(num()?)
                    .map_err(|_| PaintError::Parse(format!("kitty {}={} is out of range", key, value)))
            };
            match key {
                "a" => {
                    params.action = Some(KittyAction::from_value(value).ok_or_else(|| {
                        PaintError::Parse(format!("unknown kitty action {:?}", value))
                    })?)
                }
                "f" => {
                    params.format = Some(KittyFormat::from_code(num()?).ok_or_else(|| {
                        PaintError::Parse(format!("unknown kitty format {:?}", value))
                    })?)
                }
                "o" => params.compression = value.chars().next(),
                "s" => params.width = Some(num()?),
                "v" => params.height = Some(num()?),
                "i" => params.id = Some(num()?),
                "p" => params.placement = Some(num()?),
                "q" => params.quiet = Some(small()?),
                "c" => params.cols = Some(num()?),
                "r" => params.rows = Some(num()?),
                "C" => params.cursor_movement = Some(small()?),
                "d" => params.delete_target = value.chars().next(),
                "m" => params.more = Some(value == "1"),
                _ => trace!("Kitty: unknown param {}={}", key, value),
            }
        }
        Ok(params)
    }
}

/// One APC escape sequence: control data plus (possibly empty) base64 payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KittyChunk {
    pub params: KittyParams,
    pub payload: String,
}

impl KittyChunk {
    pub fn encode(&self) -> Vec<u8> {
        let control = self.params.encode();
        let mut out =
            Vec::with_capacity(KITTY_APC_START.len() + control.len() + self.payload.len() + 3);
        out.extend_from_slice(KITTY_APC_START);
        out.extend_from_slice(control.as_bytes());
        if !self.payload.is_empty() {
            out.push(b';');
            out.extend_from_slice(self.payload.as_bytes());
        }
        out.extend_from_slice(KITTY_APC_END);
        out
    }
}

/// Split `data` into base64 chunks of at most [`KITTY_CHUNK_SIZE`] bytes.
///
/// `first` is the control data of the first chunk; later chunks carry only
/// `m`. Every chunk but the last is marked `m=1`.
pub fn encode_transmission(first: KittyParams, data: &[u8]) -> Vec<KittyChunk> {
    let encoded = STANDARD.encode(data);
    // Base64 output is ASCII, so byte chunks are valid str slices
    let pieces: Vec<&str> = if encoded.is_empty() {
        vec![""]
    } else {
        encoded
            .as_bytes()
            .chunks(KITTY_CHUNK_SIZE)
            .map(|c| std::str::from_utf8(c).unwrap_or_default())
            .collect()
    };
    let last = pieces.len() - 1;
    let mut first = Some(first);
    pieces
        .into_iter()
        .enumerate()
        .map(|(i, piece)| {
            let mut params = first.take().unwrap_or_default();
            params.more = Some(i < last);
            KittyChunk {
                params,
                payload: piece.to_string(),
            }
        })
        .collect()
}

/// Extract graphics commands from a byte stream, skipping other output
pub fn parse_apc_stream(stream: &[u8]) -> Result<Vec<KittyChunk>> {
    let mut chunks = Vec::new();
    let mut rest = stream;
    while let Some(start) = find(rest, KITTY_APC_START) {
        let body_start = start + KITTY_APC_START.len();
        let end = find(&rest[body_start..], KITTY_APC_END)
            .ok_or_else(|| PaintError::Parse("unterminated graphics command".to_string()))?;
        let body = std::str::from_utf8(&rest[body_start..body_start + end])
            .map_err(|_| PaintError::Parse("graphics command is not UTF-8".to_string()))?;
        let (control, payload) = body.split_once(';').unwrap_or((body, ""));
        chunks.push(KittyChunk {
            params: KittyParams::parse(control)?,
            payload: payload.to_string(),
        });
        rest = &rest[body_start + end + KITTY_APC_END.len()..];
    }
    Ok(chunks)
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

/// Reassemble the raw bytes of one chunked transmission
pub fn decode_transmission(chunks: &[KittyChunk]) -> Result<Vec<u8>> {
    let joined: String = chunks.iter().map(|c| c.payload.as_str()).collect();
    let data = STANDARD
        .decode(joined.as_bytes())
        .map_err(|e| PaintError::Parse(format!("invalid base64 payload: {}", e)))?;
    match chunks.first().and_then(|c| c.params.compression) {
        Some('z') => {
            use std::io::Read;
            let mut out = Vec::new();
            flate2::read::ZlibDecoder::new(data.as_slice())
                .read_to_end(&mut out)
                .map_err(|e| PaintError::Parse(format!("zlib payload: {}", e)))?;
            Ok(out)
        }
        _ => Ok(data),
    }
}

/// Delete a placement and free its image data (a=d,d=I)
pub fn delete_command(id: u32, placement: Option<u32>) -> KittyChunk {
    KittyChunk {
        params: KittyParams {
            action: Some(KittyAction::Delete),
            delete_target: Some('I'),
            id: Some(id),
            placement,
            quiet: Some(2),
            ..Default::default()
        },
        payload: String::new(),
    }
}

/// Two image ids with an explicit displayed slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageSlots {
    ids: [u32; 2],
    active: Option<usize>,
}

impl ImageSlots {
    pub fn new(ids: [u32; 2]) -> Self {
        Self { ids, active: None }
    }

    pub fn ids(&self) -> [u32; 2] {
        self.ids
    }

    /// Id currently on screen
    pub fn displayed(&self) -> Option<u32> {
        self.active.map(|i| self.ids[i])
    }

    fn pending_index(&self) -> usize {
        match self.active {
            Some(i) => 1 - i,
            None => 0,
        }
    }

    /// Id the next frame will be transmitted under
    pub fn pending(&self) -> u32 {
        self.ids[self.pending_index()]
    }

    /// Mark the pending slot displayed. Returns the id it replaces.
    pub fn commit(&mut self) -> Option<u32> {
        let previous = self.displayed();
        self.active = Some(self.pending_index());
        previous
    }

    pub fn reset(&mut self) {
        self.active = None;
    }
}

/// Streams framebuffer snapshots to the terminal
#[derive(Debug)]
pub struct KittyEncoder {
    slots: ImageSlots,
    placement_id: u32,
    cols: u32,
    rows: u32,
    compress: bool,
    frames: u64,
}

impl KittyEncoder {
    /// `cols` x `rows` is the cell area the image is scaled into
    pub fn new(ids: [u32; 2], placement_id: u32, cols: u16, rows: u16, compress: bool) -> Self {
        Self {
            slots: ImageSlots::new(ids),
            placement_id,
            cols: cols.max(1) as u32,
            rows: rows.max(1) as u32,
            compress,
            frames: 0,
        }
    }

    pub fn slots(&self) -> &ImageSlots {
        &self.slots
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Build the chunk sequence for the next frame without writing it
    pub fn frame_chunks(&self, view: FrameView<'_>) -> Result<Vec<KittyChunk>> {
        let params = KittyParams {
            action: Some(KittyAction::TransmitAndDisplay),
            format: Some(KittyFormat::Rgba),
            compression: self.compress.then_some('z'),
            width: Some(view.width),
            height: Some(view.height),
            id: Some(self.slots.pending()),
            placement: Some(self.placement_id),
            quiet: Some(2),
            cols: Some(self.cols),
            rows: Some(self.rows),
            cursor_movement: Some(1),
            ..Default::default()
        };
        if self.compress {
            let mut z = ZlibEncoder::new(Vec::new(), Compression::fast());
            z.write_all(view.data)?;
            let packed = z.finish()?;
            Ok(encode_transmission(params, &packed))
        } else {
            Ok(encode_transmission(params, view.data))
        }
    }

    /// Transmit and place a frame, then delete the frame it replaces.
    ///
    /// Returns the id now on screen. Write failures are fatal transfer errors.
    pub fn present<W: Write>(&mut self, out: &mut W, view: FrameView<'_>) -> Result<u32> {
        let chunks = self.frame_chunks(view)?;
        out.write_all(CURSOR_HOME)?;
        for chunk in &chunks {
            out.write_all(&chunk.encode())?;
        }
        out.flush()?;

        let shown = self.slots.pending();
        if let Some(old) = self.slots.commit() {
            out.write_all(&delete_command(old, Some(self.placement_id)).encode())?;
            out.flush()?;
        }
        self.frames += 1;
        debug!(
            "Kitty: frame {} as image {} ({} chunks)",
            self.frames,
            shown,
            chunks.len()
        );
        Ok(shown)
    }

    /// Delete both images (end of session)
    pub fn release<W: Write>(&mut self, out: &mut W) -> Result<()> {
        for id in self.slots.ids() {
            out.write_all(&delete_command(id, None).encode())?;
        }
        out.flush()?;
        self.slots.reset();
        Ok(())
    }
}
