//! Moving-window demo.
//!
//! A bordered window over a shaded backdrop; arrow keys move it,
//! `h` hides and shows it, `q` quits. Run with RUST_LOG=debug for a
//! trace of what the compositor repaints.

use std::time::Duration;

use strata_core::cell::color;
use strata_core::{Cell, CellAttrs, Point, SurfaceId};
use strata_input::{Decoder, Key};
use strata_term::{TermError, Terminal};
use strata_tty::RawTty;

const WIN_W: u16 = 24;
const WIN_H: u16 = 8;

fn paint_backdrop(term: &mut Terminal) -> Result<SurfaceId, TermError> {
    let (cols, rows) = term.screen().size()?;
    let stage = term.screen_mut().stage_mut();
    let backdrop = stage.create(cols, rows)?;
    stage.fill(
        backdrop,
        Cell::new('.').with_fg(color::BLUE).with_bg(color::BLACK),
        None,
    )?;
    Ok(backdrop)
}

fn paint_window(term: &mut Terminal) -> Result<SurfaceId, TermError> {
    let stage = term.screen_mut().stage_mut();
    let win = stage.create(WIN_W, WIN_H)?;
    stage.fill(win, Cell::new(' ').with_bg(color::CYAN), None)?;

    let cells = stage.cells_mut(win)?;
    let w = WIN_W as usize;
    for x in 0..w {
        cells[x] = Cell::new('─').with_bg(color::CYAN);
        cells[(WIN_H as usize - 1) * w + x] = Cell::new('─').with_bg(color::CYAN);
    }
    for y in 0..WIN_H as usize {
        cells[y * w] = Cell::new('│').with_bg(color::CYAN);
        cells[y * w + w - 1] = Cell::new('│').with_bg(color::CYAN);
    }
    for (i, ch) in "arrows move, h hides, q quits".chars().enumerate() {
        if 2 + i < w - 2 {
            cells[w + 2 + i] = Cell::new(ch)
                .with_fg(color::BLACK)
                .with_bg(color::CYAN)
                .with_attrs(CellAttrs::BOLD);
        }
    }
    Ok(win)
}

fn run() -> Result<(), TermError> {
    let mut term = Terminal::new()?;
    let raw = RawTty::new()?;
    let mut keys = Decoder::new(raw);

    let backdrop = paint_backdrop(&mut term)?;
    let win = paint_window(&mut term)?;

    let root = term.screen().root();
    {
        let stage = term.screen_mut().stage_mut();
        stage.add_layer(root, backdrop, 0)?;
        stage.add_layer_at(root, win, Point::new(4, 2), 1)?;
    }
    term.screen_mut().render(root)?;

    let mut pos = Point::new(4, 2);
    let mut visible = true;
    loop {
        let key = match keys.wait_for_key(Some(Duration::from_millis(100)))? {
            Some(key) => key,
            None => continue,
        };

        match key {
            Key::UP => pos.y -= 1,
            Key::DOWN => pos.y += 1,
            Key::LEFT => pos.x -= 1,
            Key::RIGHT => pos.x += 1,
            Key::ESCAPE => break,
            k if k.as_char() == Some('q') => break,
            k if k.as_char() == Some('h') => {
                visible = !visible;
                let stage = term.screen_mut().stage_mut();
                if visible {
                    stage.show(win)?;
                } else {
                    stage.hide(win)?;
                }
                term.screen_mut().render(root)?;
                continue;
            }
            _ => continue,
        }
        term.screen_mut().stage_mut().move_to(win, pos)?;
        term.screen_mut().render(root)?;
    }
    Ok(())
}

fn main() {
    env_logger::init();
    if let Err(e) = run() {
        eprintln!("strata-demo: {e}");
        std::process::exit(1);
    }
}
