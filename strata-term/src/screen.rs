//! The diffing terminal sink and the screen root.
//!
//! [`AnsiSink`] is the one real [`RenderSink`] implementation: it
//! walks a completed dirty region row by row and emits the smallest
//! escape stream that repaints it, diffing each cell's colors and
//! attributes against the previously emitted cell. [`Screen`] owns
//! the stage, the root surface, and the sink, and is what application
//! code renders into.

use std::io::Write;

use log::trace;

use strata_core::{Cell, CellAttrs, Point, Rect, RenderSink, Stage, Surface, SurfaceId};

use crate::ansi;
use crate::error::TermError;

/// Writes a completed dirty region to a terminal as ANSI escapes.
///
/// Emission is diff-minimized against `last`: colors and attributes
/// are only re-sent when they change from the previously emitted
/// cell. `last` resets at the start of every [`region_done`] call so
/// the first cell of a redraw always re-establishes full state.
///
/// `region_done` cannot fail by signature; a write error is stashed
/// and surfaced by [`Screen::render`] after the pass.
///
/// [`region_done`]: RenderSink::region_done
pub struct AnsiSink<W: Write> {
    out: W,
    last: Option<Cell>,
    stashed: Option<std::io::Error>,
}

impl<W: Write> AnsiSink<W> {
    pub fn new(out: W) -> Self {
        AnsiSink {
            out,
            last: None,
            stashed: None,
        }
    }

    /// The wrapped writer.
    pub fn writer_mut(&mut self) -> &mut W {
        // Direct writes bypass the diff state; force a full
        // re-establish on the next emitted cell.
        self.last = None;
        &mut self.out
    }

    /// Take the write error from the last render pass, if any.
    pub fn take_error(&mut self) -> Result<(), std::io::Error> {
        match self.stashed.take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn emit_region(&mut self, root: &Surface, dirty: Rect) -> std::io::Result<()> {
        trace!("emit region {:?}", dirty);
        self.last = None;

        for y in dirty.top.y..dirty.bottom.y {
            ansi::goto(&mut self.out, y, dirty.top.x)?;
            for x in dirty.top.x..dirty.bottom.x {
                if let Some(cell) = root.cell_at(Point::new(x, y)) {
                    self.emit_cell(cell)?;
                }
            }
        }
        self.out.flush()
    }

    fn emit_cell(&mut self, cell: &Cell) -> std::io::Result<()> {
        let attrs_changed = self.last.map_or(true, |p| p.attrs != cell.attrs);
        if attrs_changed {
            self.out.write_all(ansi::SGR_RESET)?;
            if cell.attrs.contains(CellAttrs::BOLD) {
                self.out.write_all(ansi::SGR_BOLD)?;
            }
            if cell.attrs.contains(CellAttrs::UNDERSCORE) {
                self.out.write_all(ansi::SGR_UNDERSCORE)?;
            }
            if cell.attrs.contains(CellAttrs::BLINK) {
                self.out.write_all(ansi::SGR_BLINK)?;
            }
            if cell.attrs.contains(CellAttrs::REVERSE) {
                self.out.write_all(ansi::SGR_REVERSE)?;
            }
        }
        // A reset wipes colors too, so attribute changes force both
        // colors to be re-sent.
        if attrs_changed || self.last.map_or(true, |p| p.fg != cell.fg) {
            ansi::fg(&mut self.out, cell.fg)?;
        }
        if attrs_changed || self.last.map_or(true, |p| p.bg != cell.bg) {
            ansi::bg(&mut self.out, cell.bg)?;
        }

        // Control characters would corrupt the layout.
        let ch = if cell.ch.is_control() { ' ' } else { cell.ch };
        let mut buf = [0u8; 4];
        self.out.write_all(ch.encode_utf8(&mut buf).as_bytes())?;

        self.last = Some(*cell);
        Ok(())
    }
}

impl<W: Write> RenderSink for AnsiSink<W> {
    fn region_done(&mut self, root: &Surface, dirty: Rect) {
        if let Err(e) = self.emit_region(root, dirty) {
            self.stashed = Some(e);
        }
    }
}

/// The screen: a stage whose root surface mirrors the terminal.
///
/// Not `Sync`; render and resize must come from one thread, and
/// `resize` must not run while a render pass is in flight.
pub struct Screen<W: Write> {
    stage: Stage,
    root: SurfaceId,
    sink: AnsiSink<W>,
    cursor_visible: bool,
}

impl<W: Write> Screen<W> {
    pub fn new(out: W, cols: u16, rows: u16) -> Result<Self, TermError> {
        let mut stage = Stage::new();
        let root = stage.create(cols, rows)?;
        Ok(Screen {
            stage,
            root,
            sink: AnsiSink::new(out),
            // Terminals start with the cursor shown.
            cursor_visible: true,
        })
    }

    /// The root surface application layers attach to.
    pub fn root(&self) -> SurfaceId {
        self.root
    }

    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    pub fn stage_mut(&mut self) -> &mut Stage {
        &mut self.stage
    }

    /// Dimensions of the root surface as `(cols, rows)`.
    pub fn size(&self) -> Result<(u16, u16), TermError> {
        let root = self.stage.get(self.root)?;
        Ok((root.width() as u16, root.height() as u16))
    }

    /// Composite changes from `id` up the tree and write the final
    /// region to the terminal.
    pub fn render(&mut self, id: SurfaceId) -> Result<(), TermError> {
        self.stage.render(id, &mut self.sink)?;
        self.sink.take_error()?;
        Ok(())
    }

    /// Erase the terminal and mark the whole root for repaint.
    pub fn clear(&mut self) -> Result<(), TermError> {
        self.sink.writer_mut().write_all(ansi::CLEAR)?;
        self.stage.invalidate(self.root)?;
        Ok(())
    }

    /// Adopt new terminal dimensions. Root content is discarded and
    /// the whole screen repaints on the next render.
    pub fn resize(&mut self, cols: u16, rows: u16) -> Result<(), TermError> {
        self.stage.resize(self.root, cols, rows)?;
        self.clear()
    }

    pub fn show_cursor(&mut self) -> Result<(), TermError> {
        if !self.cursor_visible {
            self.sink.writer_mut().write_all(ansi::CURSOR_SHOW)?;
            self.cursor_visible = true;
        }
        Ok(())
    }

    pub fn hide_cursor(&mut self) -> Result<(), TermError> {
        if self.cursor_visible {
            self.sink.writer_mut().write_all(ansi::CURSOR_HIDE)?;
            self.cursor_visible = false;
        }
        Ok(())
    }

    /// Place the cursor at a 0-based root-surface cell.
    pub fn move_cursor(&mut self, row: i32, col: i32) -> Result<(), TermError> {
        ansi::goto(self.sink.writer_mut(), row, col)?;
        Ok(())
    }

    /// Flush pending terminal writes.
    pub fn flush(&mut self) -> Result<(), TermError> {
        self.sink.writer_mut().flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_core::cell::color;

    fn stream(buf: &[u8]) -> String {
        String::from_utf8_lossy(buf).into_owned()
    }

    #[test]
    fn first_cell_reestablishes_full_state() {
        let mut screen = Screen::new(Vec::new(), 4, 2).unwrap();
        screen.render(screen.root()).unwrap();

        let out = stream(&screen.sink.out);
        // Row positioning for both rows of the fresh (fully dirty)
        // root, then reset + default white-on-black before the first
        // cell.
        assert!(out.starts_with("\x1b[1;1H\x1b[0m\x1b[38;5;7m\x1b[48;5;0m"));
        assert!(out.contains("\x1b[2;1H"));
    }

    #[test]
    fn unchanged_attributes_are_not_resent() {
        let mut screen = Screen::new(Vec::new(), 4, 1).unwrap();
        screen.render(screen.root()).unwrap();

        let out = stream(&screen.sink.out);
        // One reset and one fg/bg pair for four identical blanks.
        assert_eq!(out.matches("\x1b[0m").count(), 1);
        assert_eq!(out.matches("\x1b[38;5;").count(), 1);
        assert_eq!(out.matches("\x1b[48;5;").count(), 1);
        assert_eq!(out.matches(' ').count(), 4);
    }

    #[test]
    fn color_change_resends_only_that_color() {
        let mut screen = Screen::new(Vec::new(), 3, 1).unwrap();
        let root = screen.root();
        {
            let cells = screen.stage_mut().cells_mut(root).unwrap();
            cells[0] = Cell::new('a');
            cells[1] = Cell::new('b').with_fg(color::RED);
            cells[2] = Cell::new('c').with_fg(color::RED);
        }
        screen.render(root).unwrap();

        let out = stream(&screen.sink.out);
        // 'b' switches fg only; 'c' matches 'b' so nothing re-sent.
        assert_eq!(out.matches("\x1b[0m").count(), 1);
        assert_eq!(out.matches("\x1b[38;5;7m").count(), 1);
        assert_eq!(out.matches("\x1b[38;5;1m").count(), 1);
        assert_eq!(out.matches("\x1b[48;5;0m").count(), 1);
        assert!(out.contains("a\x1b[38;5;1mbc"));
    }

    #[test]
    fn attribute_change_resends_colors() {
        let mut screen = Screen::new(Vec::new(), 2, 1).unwrap();
        let root = screen.root();
        {
            let cells = screen.stage_mut().cells_mut(root).unwrap();
            cells[0] = Cell::new('x');
            cells[1] = Cell::new('y').with_attrs(CellAttrs::BOLD);
        }
        screen.render(root).unwrap();

        let out = stream(&screen.sink.out);
        // The bold cell resets, re-applies bold, and re-sends both
        // colors even though they did not change.
        assert!(out.contains("x\x1b[0m\x1b[1m\x1b[38;5;7m\x1b[48;5;0my"));
    }

    #[test]
    fn incremental_render_positions_per_row() {
        let mut screen = Screen::new(Vec::new(), 10, 4).unwrap();
        let root = screen.root();
        screen.render(root).unwrap();
        screen.sink.out.clear();

        screen
            .stage_mut()
            .invalidate_rect(root, Rect::new(2, 1, 5, 3))
            .unwrap();
        screen.render(root).unwrap();

        let out = stream(&screen.sink.out);
        assert!(out.contains("\x1b[2;3H"));
        assert!(out.contains("\x1b[3;3H"));
        assert!(!out.contains("\x1b[1;1H"));
        assert!(!out.contains("\x1b[4;"));
    }

    #[test]
    fn control_characters_render_as_spaces() {
        let mut screen = Screen::new(Vec::new(), 2, 1).unwrap();
        let root = screen.root();
        {
            let cells = screen.stage_mut().cells_mut(root).unwrap();
            cells[0] = Cell::new('\x07');
            cells[1] = Cell::new('\n');
        }
        screen.render(root).unwrap();

        let out = stream(&screen.sink.out);
        assert!(!out.contains('\x07'));
        assert!(!out.contains('\n'));
    }

    #[test]
    fn cursor_visibility_is_tracked() {
        let mut screen = Screen::new(Vec::new(), 2, 1).unwrap();
        screen.show_cursor().unwrap();
        assert!(screen.sink.out.is_empty());

        screen.hide_cursor().unwrap();
        screen.hide_cursor().unwrap();
        assert_eq!(screen.sink.out, ansi::CURSOR_HIDE);
    }

    #[test]
    fn move_cursor_emits_goto() {
        let mut screen = Screen::new(Vec::new(), 10, 5).unwrap();
        screen.move_cursor(2, 7).unwrap();
        assert_eq!(screen.sink.out, b"\x1b[3;8H");
    }

    #[test]
    fn resize_discards_and_marks_full_repaint() {
        let mut screen = Screen::new(Vec::new(), 4, 2).unwrap();
        let root = screen.root();
        screen.render(root).unwrap();

        screen.resize(6, 3).unwrap();
        assert_eq!(screen.size().unwrap(), (6, 3));
        assert_eq!(
            screen.stage().get(root).unwrap().dirty(),
            Rect::sized(6, 3)
        );
    }
}
