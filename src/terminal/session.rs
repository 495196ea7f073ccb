//! Terminal session
//!
//! Puts the controlling TTY into raw mode with SGR mouse reporting for
//! the lifetime of the session and restores everything on drop, including
//! on error paths.

use std::io::{self, Write};
use std::os::fd::{AsFd, AsRawFd};

use anyhow::{anyhow, Result};
use log::{info, warn};
use nix::errno::Errno;
use nix::sys::termios::{self, Termios};

use super::TerminalSize;
use crate::constants::{
    CLEAR_SCREEN, CURSOR_HIDE, CURSOR_SHOW, FALLBACK_COLS, FALLBACK_ROWS, MOUSE_REPORTING_OFF,
    MOUSE_REPORTING_ON,
};

pub struct TerminalSession {
    /// stdin file descriptor
    fd: i32,
    /// Original termios settings (for restoration)
    orig_termios: Termios,
}

impl TerminalSession {
    /// Enter raw mode, hide the cursor, clear the screen and enable mouse reporting
    pub fn acquire() -> Result<Self> {
        let stdin = io::stdin();
        let fd = stdin.as_raw_fd();

        // Save original settings
        let orig_termios =
            termios::tcgetattr(stdin.as_fd()).map_err(|e| anyhow!("tcgetattr failed: {}", e))?;

        // Set to raw mode
        let mut raw = orig_termios.clone();
        termios::cfmakeraw(&mut raw);
        termios::tcsetattr(stdin.as_fd(), termios::SetArg::TCSAFLUSH, &raw)
            .map_err(|e| anyhow!("tcsetattr failed: {}", e))?;

        // From here on Drop restores the terminal
        let session = Self { fd, orig_termios };

        let mut out = io::stdout().lock();
        out.write_all(CURSOR_HIDE)?;
        out.write_all(CLEAR_SCREEN)?;
        out.write_all(MOUSE_REPORTING_ON)?;
        out.flush()?;

        info!("Terminal session acquired (raw mode, SGR mouse)");
        Ok(session)
    }

    /// Current grid size from TIOCGWINSZ, 80x24 if unavailable
    pub fn size(&self) -> TerminalSize {
        let mut ws: libc::winsize = unsafe { std::mem::zeroed() };
        let ret = unsafe { libc::ioctl(libc::STDOUT_FILENO, libc::TIOCGWINSZ, &mut ws) };
        if ret < 0 || ws.ws_col == 0 || ws.ws_row == 0 {
            warn!(
                "TIOCGWINSZ unavailable, assuming {}x{}",
                FALLBACK_COLS, FALLBACK_ROWS
            );
            return TerminalSize {
                cols: FALLBACK_COLS,
                rows: FALLBACK_ROWS,
            };
        }
        TerminalSize {
            cols: ws.ws_col,
            rows: ws.ws_row,
        }
    }

    /// Blocking read from stdin. Ok(0) means end of input.
    pub fn read(&self, buf: &mut [u8]) -> io::Result<usize> {
        loop {
            match nix::unistd::read(self.fd, buf) {
                Ok(n) => return Ok(n),
                Err(Errno::EINTR) => continue,
                Err(e) => return Err(io::Error::from(e)),
            }
        }
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let mut out = io::stdout().lock();
        let _ = out.write_all(MOUSE_REPORTING_OFF);
        let _ = out.write_all(CURSOR_SHOW);
        let _ = out.flush();

        // Restore original termios settings
        let stdin = io::stdin();
        let _ = termios::tcsetattr(stdin.as_fd(), termios::SetArg::TCSAFLUSH, &self.orig_termios);
        info!("Terminal settings restored");
    }
}
