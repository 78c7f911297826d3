//! The output escape family.
//!
//! One fixed xterm-compatible dialect; no capability negotiation.
//! Everything is a plain write so the emitters can be tested against
//! byte vectors.

use std::io::{self, Write};

pub const CURSOR_SHOW: &[u8] = b"\x1b[?25h";
pub const CURSOR_HIDE: &[u8] = b"\x1b[?25l";

pub const SGR_RESET: &[u8] = b"\x1b[0m";
pub const SGR_BOLD: &[u8] = b"\x1b[1m";
pub const SGR_UNDERSCORE: &[u8] = b"\x1b[4m";
pub const SGR_BLINK: &[u8] = b"\x1b[5m";
pub const SGR_REVERSE: &[u8] = b"\x1b[7m";

/// Reset attributes, erase the whole screen, home the cursor.
pub const CLEAR: &[u8] = b"\x1b[0m\x1b[2J\x1b[1;1H";

/// Move the cursor to a 0-based cell position.
pub fn goto<W: Write>(out: &mut W, row: i32, col: i32) -> io::Result<()> {
    write!(out, "\x1b[{};{}H", row + 1, col + 1)
}

/// Select a 256-color foreground.
pub fn fg<W: Write>(out: &mut W, color: u8) -> io::Result<()> {
    write!(out, "\x1b[38;5;{color}m")
}

/// Select a 256-color background.
pub fn bg<W: Write>(out: &mut W, color: u8) -> io::Result<()> {
    write!(out, "\x1b[48;5;{color}m")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn goto_is_one_based() {
        let mut buf = Vec::new();
        goto(&mut buf, 0, 0).unwrap();
        assert_eq!(buf, b"\x1b[1;1H");

        buf.clear();
        goto(&mut buf, 4, 11).unwrap();
        assert_eq!(buf, b"\x1b[5;12H");
    }

    #[test]
    fn color_selection() {
        let mut buf = Vec::new();
        fg(&mut buf, 7).unwrap();
        bg(&mut buf, 0).unwrap();
        assert_eq!(buf, b"\x1b[38;5;7m\x1b[48;5;0m");
    }
}
