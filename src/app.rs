//! Painter: the render/event loop state machine
//!
//! Owns the framebuffer, brush, stroke state and Kitty encoder. Input bytes
//! go in through [`Painter::feed`]; frames and status text go out to the
//! writer. The blocking read itself lives in the binary.

use std::io::Write;
use std::path::PathBuf;

use log::{debug, info, trace, warn};

use crate::canvas::{
    Brush, CoordinateMapper, Framebuffer, History, RadiusChange, StrokePhase, StrokeRasterizer,
};
use crate::config::Config;
use crate::error::Result;
use crate::export;
use crate::input::{
    action_for_key, Action, InputDecoder, InputEvent, MouseButton, PointerEvent, PointerKind,
};
use crate::terminal::{KittyEncoder, StatusLine, TerminalSize};

/// Loop state
///
/// `Running` until the first frame is on screen, then `Clean`/`Dirty`
/// as the canvas changes and is re-sent. `Terminating` is final.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Running,
    Dirty,
    Clean,
    Terminating,
}

pub struct Painter<W: Write> {
    out: W,
    fb: Framebuffer,
    brush: Brush,
    stroke: StrokeRasterizer,
    mapper: CoordinateMapper,
    encoder: KittyEncoder,
    history: History,
    status: StatusLine,
    decoder: InputDecoder,
    state: LoopState,
    size: TerminalSize,
    /// 1-based row the status line is drawn on
    status_row: u16,
    export_dir: PathBuf,
}

impl<W: Write> Painter<W> {
    /// Build a painter for a terminal of `size`.
    ///
    /// The bottom `canvas.status_rows` rows are reserved for the status
    /// line; the canvas image is scaled into the rest.
    pub fn new(config: &Config, size: TerminalSize, out: W) -> Result<Self> {
        let fb = Framebuffer::new(config.canvas.width, config.canvas.height, config.background())?;
        let brush = Brush::new(
            config.swatches(),
            config.brush_color(),
            config.brush.radius,
            config.brush.min_radius,
            config.brush.max_radius,
        );

        let rows = size.rows.max(1);
        let cols = size.cols.max(1);
        let canvas_rows = rows.saturating_sub(config.canvas.status_rows).max(1);
        let status_row = (canvas_rows + 1).min(rows);

        let mapper = CoordinateMapper::new(cols, canvas_rows, fb.width(), fb.height());
        let encoder = KittyEncoder::new(
            config.graphics.image_ids,
            config.graphics.placement_id,
            cols,
            canvas_rows,
            config.graphics.compress,
        );

        info!(
            "Painter: canvas {}x{} on {}x{} cells ({} canvas rows)",
            fb.width(),
            fb.height(),
            cols,
            rows,
            canvas_rows
        );

        Ok(Self {
            out,
            fb,
            brush,
            stroke: StrokeRasterizer::new(),
            mapper,
            encoder,
            history: History::new(config.history.limit),
            status: StatusLine::new(),
            decoder: InputDecoder::new(),
            state: LoopState::Running,
            size: TerminalSize { cols, rows },
            status_row,
            export_dir: config.export_dir(),
        })
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn framebuffer(&self) -> &Framebuffer {
        &self.fb
    }

    pub fn brush(&self) -> &Brush {
        &self.brush
    }

    pub fn encoder(&self) -> &KittyEncoder {
        &self.encoder
    }

    pub fn mapper(&self) -> &CoordinateMapper {
        &self.mapper
    }

    pub fn status_row(&self) -> u16 {
        self.status_row
    }

    pub fn writer(&self) -> &W {
        &self.out
    }

    pub fn writer_mut(&mut self) -> &mut W {
        &mut self.out
    }

    /// Push the initial frame and status line
    pub fn start(&mut self) -> Result<()> {
        self.render()?;
        self.draw_status()
    }

    /// Process one read worth of input.
    ///
    /// Every decoded event is applied in order, then at most one frame is
    /// sent. Write failures are returned and end the session.
    pub fn feed(&mut self, data: &[u8]) -> Result<LoopState> {
        let events = self.decoder.feed(data);
        if events.is_empty() {
            return Ok(self.state);
        }

        for event in events {
            self.handle_event(event);
            if self.state == LoopState::Terminating {
                return Ok(self.state);
            }
        }

        if self.state == LoopState::Dirty {
            self.render()?;
        }
        self.draw_status()?;
        Ok(self.state)
    }

    /// Delete both images from the terminal. The painter is finished after this.
    pub fn shutdown(&mut self) -> Result<()> {
        self.state = LoopState::Terminating;
        self.encoder.release(&mut self.out)
    }

    fn handle_event(&mut self, event: InputEvent) {
        match event {
            InputEvent::Pointer(p) => self.handle_pointer(p),
            InputEvent::Key(byte) => match action_for_key(byte) {
                Some(action) => self.apply(action),
                None => trace!("Unbound key 0x{:02x}", byte),
            },
            InputEvent::Csi(seq) => trace!("Ignored CSI {:?}", String::from_utf8_lossy(&seq)),
            InputEvent::Escape => trace!("Ignored ESC"),
        }
    }

    fn handle_pointer(&mut self, p: PointerEvent) {
        if p.kind == PointerKind::Release || !self.mapper.contains_row(p.row) {
            // Release, or the pointer left the canvas (status row)
            self.stroke.reset();
            return;
        }
        if p.button != MouseButton::Left {
            return;
        }

        let at = self.mapper.map(p.col, p.row);
        let phase = if p.kind == PointerKind::Press {
            StrokePhase::Press
        } else {
            StrokePhase::Drag
        };
        if phase == StrokePhase::Press || self.stroke.last().is_none() {
            self.history.checkpoint(&self.fb);
        }

        let radius = self.brush.radius();
        let color = self.brush.color();
        if self.stroke.apply(&mut self.fb, phase, at, radius, color) {
            self.mark_dirty();
        }
    }

    fn apply(&mut self, action: Action) {
        debug!("Action: {:?}", action);
        match action {
            Action::Quit => {
                info!("Quit requested");
                self.state = LoopState::Terminating;
            }
            Action::NextColor | Action::PrevColor => {
                let step = if action == Action::NextColor { 1 } else { -1 };
                let name = self.brush.cycle_color(step).name.clone();
                self.status.set_message(format!("Color -> {}", name));
            }
            Action::Radius(delta) => {
                let msg = match self.brush.adjust_radius(delta) {
                    RadiusChange::Changed(r) => format!("Radius -> {}", r),
                    RadiusChange::AtMinimum => "Radius at minimum".to_string(),
                    RadiusChange::AtMaximum => "Radius at maximum".to_string(),
                    RadiusChange::Unchanged => return,
                };
                self.status.set_message(msg);
            }
            Action::Clear => {
                self.history.checkpoint(&self.fb);
                self.fb.clear();
                self.stroke.reset();
                self.mark_dirty();
                self.status.set_message("Canvas cleared");
            }
            Action::Undo => {
                if self.history.undo(&mut self.fb) {
                    self.stroke.reset();
                    self.mark_dirty();
                    self.status.set_message("Undo");
                } else {
                    self.status.set_message("Nothing to undo");
                }
            }
            Action::Redo => {
                if self.history.redo(&mut self.fb) {
                    self.stroke.reset();
                    self.mark_dirty();
                    self.status.set_message("Redo");
                } else {
                    self.status.set_message("Nothing to redo");
                }
            }
            Action::SavePng => {
                let result = export::save_png(self.fb.snapshot(), &self.export_dir);
                self.report_export(result);
            }
            Action::ExportText => {
                let result = export::save_text(
                    self.fb.snapshot(),
                    self.mapper.cols(),
                    self.mapper.rows(),
                    &self.export_dir,
                );
                self.report_export(result);
            }
        }
    }

    fn report_export(&mut self, result: anyhow::Result<PathBuf>) {
        match result {
            Ok(path) => {
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_else(|| path.display().to_string());
                self.status.set_message(format!("Saved {}", name));
            }
            Err(e) => {
                warn!("Export failed: {:#}", e);
                self.status.set_message(format!("Export failed: {}", e));
            }
        }
    }

    fn mark_dirty(&mut self) {
        if self.state != LoopState::Terminating {
            self.state = LoopState::Dirty;
        }
    }

    fn render(&mut self) -> Result<()> {
        self.encoder.present(&mut self.out, self.fb.snapshot())?;
        self.state = LoopState::Clean;
        Ok(())
    }

    fn draw_status(&mut self) -> Result<()> {
        let bytes = self
            .status
            .render(&self.brush, self.status_row, self.size.cols);
        self.out.write_all(&bytes)?;
        self.out.flush()?;
        Ok(())
    }
}
