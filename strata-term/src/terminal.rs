//! The terminal context.
//!
//! One [`Terminal`] per process, built explicitly by the entry point
//! and passed down. Construction queries the tty size and takes over
//! the display (clear, cursor hidden); drop hands the terminal back
//! (attributes reset, screen cleared, cursor shown).

use std::io::{self, Stdout};

use log::{debug, warn};

use strata_tty::{window_size, WinchWatcher};

use crate::error::TermError;
use crate::screen::Screen;

pub struct Terminal {
    screen: Screen<Stdout>,
    winch: WinchWatcher,
}

impl Terminal {
    pub fn new() -> Result<Self, TermError> {
        let (cols, rows) = window_size()?;
        debug!("terminal is {cols}x{rows}");

        let mut screen = Screen::new(io::stdout(), cols, rows)?;
        screen.clear()?;
        screen.hide_cursor()?;
        screen.flush()?;

        Ok(Terminal {
            screen,
            winch: WinchWatcher::new()?,
        })
    }

    pub fn screen(&self) -> &Screen<Stdout> {
        &self.screen
    }

    pub fn screen_mut(&mut self) -> &mut Screen<Stdout> {
        &mut self.screen
    }

    /// Re-query the tty size and adopt it.
    pub fn resize(&mut self) -> Result<(u16, u16), TermError> {
        let (cols, rows) = window_size()?;
        self.screen.resize(cols, rows)?;
        Ok((cols, rows))
    }

    /// Block until the terminal is resized, then adopt the new size.
    pub fn wait_resize(&mut self) -> Result<(u16, u16), TermError> {
        let (cols, rows) = self.winch.wait()?;
        self.screen.resize(cols, rows)?;
        Ok((cols, rows))
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        let restore = self
            .screen
            .clear()
            .and_then(|_| self.screen.show_cursor())
            .and_then(|_| self.screen.flush());
        if let Err(e) = restore {
            warn!("failed to restore terminal on shutdown: {e}");
        }
    }
}
