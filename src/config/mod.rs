//! Configuration file management
//!
//! Loads TOML configuration files and provides application settings.
//! Default config path: ~/.config/kpaint/config.toml

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::canvas::Swatch;
use crate::constants::{
    DEFAULT_IMAGE_IDS, DEFAULT_PLACEMENT_ID, MAX_BRUSH_RADIUS, MAX_CANVAS_EDGE, MAX_HISTORY_BYTES,
    MIN_BRUSH_RADIUS,
};
use crate::error::PaintError;
use crate::utils::{expand_path, parse_hex_color, Rgba};

/// Application settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Canvas settings
    pub canvas: CanvasConfig,
    /// Brush settings
    pub brush: BrushConfig,
    /// Graphics protocol settings
    pub graphics: GraphicsConfig,
    /// Undo history settings
    pub history: HistoryConfig,
    /// Path settings
    pub paths: PathConfig,
    /// Palette entries, cycled with c / C
    pub palette: Vec<PaletteEntry>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            canvas: CanvasConfig::default(),
            brush: BrushConfig::default(),
            graphics: GraphicsConfig::default(),
            history: HistoryConfig::default(),
            paths: PathConfig::default(),
            palette: default_palette(),
        }
    }
}

/// Canvas settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    /// Framebuffer width in pixels
    pub width: u32,
    /// Framebuffer height in pixels
    pub height: u32,
    /// Background color (RRGGBB or RRGGBBAA)
    pub background: String,
    /// Terminal rows reserved below the canvas for the status line
    pub status_rows: u16,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 400,
            background: "0c0c0cff".to_string(),
            status_rows: 1,
        }
    }
}

/// Brush settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrushConfig {
    /// Initial color (RRGGBB or RRGGBBAA)
    pub color: String,
    /// Initial radius in canvas pixels
    pub radius: u32,
    /// Smallest radius reachable with [ and {
    pub min_radius: u32,
    /// Largest radius reachable with ] and }
    pub max_radius: u32,
}

impl Default for BrushConfig {
    fn default() -> Self {
        Self {
            color: "ff6600ff".to_string(),
            radius: 10,
            min_radius: 1,
            max_radius: 64,
        }
    }
}

/// Named palette color
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaletteEntry {
    pub name: String,
    /// RRGGBB or RRGGBBAA
    pub color: String,
}

impl PaletteEntry {
    fn new(name: &str, color: &str) -> Self {
        Self {
            name: name.to_string(),
            color: color.to_string(),
        }
    }
}

/// Default palette
pub fn default_palette() -> Vec<PaletteEntry> {
    vec![
        PaletteEntry::new("Orange", "ff6600ff"),
        PaletteEntry::new("Sky", "00aaffff"),
        PaletteEntry::new("Lime", "78dc32ff"),
        PaletteEntry::new("Magenta", "c840dcff"),
        PaletteEntry::new("White", "f0f0f0ff"),
    ]
}

/// Graphics protocol settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphicsConfig {
    /// Image ids alternated between frames (must differ, non-zero)
    pub image_ids: [u32; 2],
    /// Placement id used for both images
    pub placement_id: u32,
    /// zlib-compress frame payloads (o=z)
    pub compress: bool,
}

impl Default for GraphicsConfig {
    fn default() -> Self {
        Self {
            image_ids: DEFAULT_IMAGE_IDS,
            placement_id: DEFAULT_PLACEMENT_ID,
            compress: false,
        }
    }
}

/// Undo history settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Maximum undo depth (0 = disabled)
    pub limit: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self { limit: 32 }
    }
}

/// Path settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathConfig {
    /// PNG / text export directory (~ is expanded)
    pub export_dir: String,
}

impl Default for PathConfig {
    fn default() -> Self {
        Self {
            export_dir: ".".to_string(),
        }
    }
}

impl Config {
    /// System-wide config path
    const SYSTEM_CONFIG_PATH: &'static str = "/etc/kpaint/config.toml";

    /// Get the path that would be used for loading config.
    /// Returns None if using built-in defaults.
    pub fn config_path(explicit: Option<&Path>) -> Option<PathBuf> {
        // 1. KPAINT_CONFIG environment variable
        if let Ok(path) = std::env::var("KPAINT_CONFIG") {
            let p = Path::new(&path);
            if p.exists() {
                return Some(p.to_path_buf());
            }
        }

        // 2. --config argument
        if let Some(p) = explicit {
            if p.exists() {
                return Some(p.to_path_buf());
            }
            warn!("Config file not found: {}", p.display());
        }

        // 3. User config: ~/.config/kpaint/config.toml
        if let Some(path) = user_config_path() {
            if path.exists() {
                return Some(path);
            }
        }

        // 4. System config: /etc/kpaint/config.toml
        let system_config = Path::new(Self::SYSTEM_CONFIG_PATH);
        if system_config.exists() {
            return Some(system_config.to_path_buf());
        }

        None
    }

    /// Load configuration, falling back to built-in defaults.
    ///
    /// The result is always sanitized; absorbed problems are logged.
    pub fn load(explicit: Option<&Path>) -> Self {
        let mut config = match Self::config_path(explicit) {
            Some(path) => match Self::load_from_file(&path) {
                Ok(config) => {
                    info!("Loaded config: {}", path.display());
                    config
                }
                Err(e) => {
                    warn!("Failed to load config {}: {:#}", path.display(), e);
                    Self::default()
                }
            },
            None => {
                info!("Using built-in default config");
                Self::default()
            }
        };
        for problem in config.sanitize() {
            warn!("{}", problem);
        }
        config
    }

    /// Load settings from specified path
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        Ok(config)
    }

    /// Clamp or replace invalid values. Returns what was fixed.
    pub fn sanitize(&mut self) -> Vec<PaintError> {
        let mut fixed = Vec::new();
        let defaults = Config::default();

        let canvas = &mut self.canvas;
        for (name, value, default) in [
            ("canvas.width", &mut canvas.width, defaults.canvas.width),
            ("canvas.height", &mut canvas.height, defaults.canvas.height),
        ] {
            if *value == 0 {
                fixed.push(PaintError::Config(format!("{} is 0, using {}", name, default)));
                *value = default;
            } else if *value > MAX_CANVAS_EDGE {
                fixed.push(PaintError::Config(format!(
                    "{} {} exceeds {}",
                    name, value, MAX_CANVAS_EDGE
                )));
                *value = MAX_CANVAS_EDGE;
            }
        }
        if parse_hex_color(&canvas.background).is_none() {
            fixed.push(PaintError::Config(format!(
                "canvas.background {:?} is not a hex color",
                canvas.background
            )));
            canvas.background = defaults.canvas.background.clone();
        }

        let brush = &mut self.brush;
        if parse_hex_color(&brush.color).is_none() {
            fixed.push(PaintError::Config(format!(
                "brush.color {:?} is not a hex color",
                brush.color
            )));
            brush.color = defaults.brush.color.clone();
        }
        let min = brush.min_radius.clamp(MIN_BRUSH_RADIUS, MAX_BRUSH_RADIUS);
        let max = brush.max_radius.clamp(min, MAX_BRUSH_RADIUS);
        if (min, max) != (brush.min_radius, brush.max_radius) {
            fixed.push(PaintError::Config(format!(
                "brush radius bounds {}..={} adjusted to {}..={}",
                brush.min_radius, brush.max_radius, min, max
            )));
            brush.min_radius = min;
            brush.max_radius = max;
        }
        let radius = brush.radius.clamp(min, max);
        if radius != brush.radius {
            fixed.push(PaintError::Config(format!(
                "brush.radius {} clamped to {}",
                brush.radius, radius
            )));
            brush.radius = radius;
        }

        let before = self.palette.len();
        self.palette.retain(|e| parse_hex_color(&e.color).is_some());
        if self.palette.len() != before {
            fixed.push(PaintError::Config(format!(
                "dropped {} palette entries with invalid colors",
                before - self.palette.len()
            )));
        }

        let graphics = &mut self.graphics;
        let [a, b] = graphics.image_ids;
        if a == 0 || b == 0 || a == b {
            fixed.push(PaintError::Config(format!(
                "graphics.image_ids {:?} must be two distinct non-zero ids",
                graphics.image_ids
            )));
            graphics.image_ids = DEFAULT_IMAGE_IDS;
        }
        if graphics.placement_id == 0 {
            fixed.push(PaintError::Config(
                "graphics.placement_id must be non-zero".to_string(),
            ));
            graphics.placement_id = DEFAULT_PLACEMENT_ID;
        }

        // Every undo step holds a full copy of the canvas
        let frame_bytes = self.canvas.width as usize * self.canvas.height as usize * 4;
        let max_depth = (MAX_HISTORY_BYTES / frame_bytes).max(1);
        if self.history.limit > max_depth {
            fixed.push(PaintError::Config(format!(
                "history.limit {} clamped to {} for a {}x{} canvas",
                self.history.limit, max_depth, self.canvas.width, self.canvas.height
            )));
            self.history.limit = max_depth;
        }

        fixed
    }

    pub fn background(&self) -> Rgba {
        parse_hex_color(&self.canvas.background).unwrap_or(Rgba::new(12, 12, 12, 255))
    }

    pub fn brush_color(&self) -> Rgba {
        parse_hex_color(&self.brush.color).unwrap_or(Rgba::opaque(255, 102, 0))
    }

    /// Palette with colors resolved. Invalid entries are skipped.
    pub fn swatches(&self) -> Vec<Swatch> {
        self.palette
            .iter()
            .filter_map(|e| parse_hex_color(&e.color).map(|c| Swatch::new(e.name.clone(), c)))
            .collect()
    }

    pub fn export_dir(&self) -> PathBuf {
        PathBuf::from(expand_path(&self.paths.export_dir))
    }

    /// Default settings as a TOML document
    pub fn default_toml() -> Result<String> {
        toml::to_string_pretty(&Config::default()).context("Failed to serialize default config")
    }

    /// Write default config to the user config path
    pub fn write_default_config() -> Result<PathBuf> {
        let path = user_config_path().context("Could not determine config directory")?;
        Self::write_default_config_to(&path)?;
        Ok(path)
    }

    pub fn write_default_config_to(path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let content = format!(
            "# kpaint configuration\n# Colors are RRGGBB or RRGGBBAA hex strings.\n\n{}",
            Self::default_toml()?
        );
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        info!("Wrote default config: {}", path.display());
        Ok(())
    }
}

/// ~/.config/kpaint/config.toml
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("kpaint").join("config.toml"))
}
