//! Global constants for kpaint
//!
//! Consolidates protocol limits, escape sequences, and brush bounds
//! to eliminate magic numbers throughout the codebase.

// ============================================================================
// Kitty Graphics Protocol
// ============================================================================

/// Maximum base64 payload bytes per APC escape sequence
pub const KITTY_CHUNK_SIZE: usize = 4096;

/// Image ids used by the two display slots
pub const DEFAULT_IMAGE_IDS: [u32; 2] = [4242, 4243];

/// Placement id shared by both slots
pub const DEFAULT_PLACEMENT_ID: u32 = 1;

/// APC introducer for graphics commands
pub const KITTY_APC_START: &[u8] = b"\x1b_G";

/// String terminator
pub const KITTY_APC_END: &[u8] = b"\x1b\\";

// ============================================================================
// Terminal Control Sequences
// ============================================================================

/// Any-motion tracking + SGR extended coordinates
pub const MOUSE_REPORTING_ON: &[u8] = b"\x1b[?1003h\x1b[?1006h";

/// Inverse of MOUSE_REPORTING_ON
pub const MOUSE_REPORTING_OFF: &[u8] = b"\x1b[?1003l\x1b[?1006l";

pub const CURSOR_HIDE: &[u8] = b"\x1b[?25l";

pub const CURSOR_SHOW: &[u8] = b"\x1b[?25h";

/// Clear screen and home cursor
pub const CLEAR_SCREEN: &[u8] = b"\x1b[2J\x1b[H";

pub const CURSOR_HOME: &[u8] = b"\x1b[H";

// ============================================================================
// Input
// ============================================================================

/// stdin read buffer size
pub const READ_BUF_SIZE: usize = 1024;

/// Longest SGR mouse report accepted before the sequence is dropped
/// (ESC [ < + three 5-digit fields + separators + final byte)
pub const MAX_SGR_MOUSE_LEN: usize = 32;

/// Longest generic CSI sequence buffered before it is dropped
pub const MAX_CSI_LEN: usize = 64;

// ============================================================================
// Brush & Canvas
// ============================================================================

/// Smallest brush radius ever allowed, regardless of config
pub const MIN_BRUSH_RADIUS: u32 = 1;

/// Largest configurable brush radius
pub const MAX_BRUSH_RADIUS: u32 = 256;

/// Largest canvas edge in pixels (keeps one frame under ~64MB)
pub const MAX_CANVAS_EDGE: u32 = 4096;

/// Pixel bytes the undo history may hold across all snapshots
pub const MAX_HISTORY_BYTES: usize = 512 * 1024 * 1024;

/// Fallback terminal grid when TIOCGWINSZ is unavailable
pub const FALLBACK_COLS: u16 = 80;
pub const FALLBACK_ROWS: u16 = 24;
