//! Character cell representation
//!
//! A cell is one character position in a surface buffer: a character
//! value, 256-color foreground and background indices, and an
//! attribute mask. The TRANSPARENT attribute makes a cell invisible to
//! [`blend`](crate::Stage::blend) so lower layers show through.

use bitflags::bitflags;

bitflags! {
    /// Cell display attributes.
    ///
    /// Matches the SGR attributes the output sink knows how to emit.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct CellAttrs: u8 {
        const BOLD        = 0x01;
        const UNDERSCORE  = 0x02;
        const BLINK       = 0x04;
        const REVERSE     = 0x08;
        /// Not copied by blend operations; lower layers show through.
        const TRANSPARENT = 0x80;
    }
}

/// The first 8 indices of the 256-color palette.
pub mod color {
    pub const BLACK: u8 = 0;
    pub const RED: u8 = 1;
    pub const GREEN: u8 = 2;
    pub const YELLOW: u8 = 3;
    pub const BLUE: u8 = 4;
    pub const MAGENTA: u8 = 5;
    pub const CYAN: u8 = 6;
    pub const WHITE: u8 = 7;
}

/// A single cell in a surface buffer. Equality is structural.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    /// Character value. Non-printable values are drawn as a blank.
    pub ch: char,
    /// Foreground color (256-color palette index).
    pub fg: u8,
    /// Background color (256-color palette index).
    pub bg: u8,
    /// Display attributes.
    pub attrs: CellAttrs,
}

impl Default for Cell {
    /// The blank cell: a space, white on black, no attributes.
    fn default() -> Self {
        Cell {
            ch: ' ',
            fg: color::WHITE,
            bg: color::BLACK,
            attrs: CellAttrs::empty(),
        }
    }
}

impl Cell {
    pub fn new(ch: char) -> Self {
        Cell {
            ch,
            ..Default::default()
        }
    }

    pub fn with_fg(mut self, fg: u8) -> Self {
        self.fg = fg;
        self
    }

    pub fn with_bg(mut self, bg: u8) -> Self {
        self.bg = bg;
        self
    }

    pub fn with_attrs(mut self, attrs: CellAttrs) -> Self {
        self.attrs = attrs;
        self
    }

    /// True if blend operations skip this cell.
    pub fn is_transparent(&self) -> bool {
        self.attrs.contains(CellAttrs::TRANSPARENT)
    }
}
