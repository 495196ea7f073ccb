//! Canvas export
//!
//! PNG snapshots (Ctrl-S) and a luminance-ramp text rendering (Ctrl-E).

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::info;

use crate::canvas::FrameView;

/// Darkest to brightest
const LUMA_RAMP: &[u8] = b" .:-=+*#%@";

/// `<dir>/kpaint_<YYYYmmdd_HHMMSS>.<ext>`
pub fn export_path(dir: &Path, ext: &str) -> PathBuf {
    let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    dir.join(format!("kpaint_{}.{}", timestamp, ext))
}

/// Encode the view as an 8-bit RGBA PNG at `path`
pub fn write_png(view: FrameView<'_>, path: &Path) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    let mut encoder = png::Encoder::new(BufWriter::new(file), view.width, view.height);
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder.write_header()?;
    writer.write_image_data(view.data)?;
    Ok(())
}

/// Save a timestamped PNG into `dir`
pub fn save_png(view: FrameView<'_>, dir: &Path) -> Result<PathBuf> {
    let path = export_path(dir, "png");
    write_png(view, &path)?;
    info!("PNG saved: {}", path.display());
    Ok(path)
}

/// Render the canvas as text, one character per terminal cell.
///
/// Each cell samples the pixel under its center. Transparent pixels
/// render as spaces.
pub fn render_text(view: FrameView<'_>, cols: u16, rows: u16) -> String {
    let cols = cols.max(1);
    let rows = rows.max(1);
    let cw = view.width as f64 / cols as f64;
    let ch = view.height as f64 / rows as f64;

    let mut out = String::with_capacity((cols as usize + 1) * rows as usize);
    for row in 0..rows {
        let y = ((row as f64 + 0.5) * ch) as u32;
        let mut line = String::with_capacity(cols as usize);
        for col in 0..cols {
            let x = ((col as f64 + 0.5) * cw) as u32;
            let c = match view.pixel(x, y) {
                Some(px) if px.a > 0 => {
                    let idx = px.luminance() as usize * (LUMA_RAMP.len() - 1) / 255;
                    LUMA_RAMP[idx] as char
                }
                _ => ' ',
            };
            line.push(c);
        }
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

/// Save a timestamped text rendering into `dir`
pub fn save_text(view: FrameView<'_>, cols: u16, rows: u16, dir: &Path) -> Result<PathBuf> {
    let path = export_path(dir, "txt");
    std::fs::write(&path, render_text(view, cols, rows))
        .with_context(|| format!("Failed to write {}", path.display()))?;
    info!("Text export saved: {}", path.display());
    Ok(path)
}
