/// Presentation layer: double-buffered, diff-based terminal renderer.
///
/// How it works:
///   1. Build the next frame into `front` buffer (array of Cell)
///   2. Compare each cell with `back` buffer (previous frame)
///   3. Only emit terminal commands for cells that changed
///   4. All commands are batched with `queue!`, flushed once at the end
///   5. Swap front/back
///
/// Every grid cell becomes a `cell_width`-column rectangle filled with the
/// tile's palette color. The player is drawn last, on top of its cell.

use std::io::{self, BufWriter, Write};

use crossterm::{
    cursor::{self, MoveTo},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};

use crate::domain::tile::Rgb;
use crate::sim::engine::Engine;
use super::palette::{Paint, Palette};

// ── Cell: the unit of the back-buffer ──

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
struct Cell {
    ch: char,
    fg: Color,
    bg: Color,
}

impl Cell {
    /// Explicit dark background for every "empty" terminal cell, so gaps
    /// between rows match the cell color on terminals that show them.
    const BASE_BG: Color = Color::Rgb { r: 22, g: 22, b: 35 };

    const BLANK: Cell = Cell { ch: ' ', fg: Color::White, bg: Cell::BASE_BG };

    /// Sentinel cell used to invalidate the back buffer.
    /// Different from any real cell, so every position will be diff'd.
    const INVALID: Cell = Cell { ch: '?', fg: Color::Magenta, bg: Color::Magenta };

    fn new(ch: char, fg: Color, bg: Color) -> Self {
        Cell { ch, fg, bg }
    }
}

fn to_color(c: Rgb) -> Color {
    Color::Rgb { r: c.r, g: c.g, b: c.b }
}

// ── FrameBuffer: a 2D grid of Cells ──

#[derive(Debug)]
struct FrameBuffer {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    fn new(w: usize, h: usize) -> Self {
        FrameBuffer { width: w, height: h, cells: vec![Cell::BLANK; w * h] }
    }

    fn resize(&mut self, w: usize, h: usize) {
        if self.width != w || self.height != h {
            self.width = w;
            self.height = h;
            self.cells = vec![Cell::BLANK; w * h];
        }
    }

    fn clear(&mut self) {
        self.cells.fill(Cell::BLANK);
    }

    fn set(&mut self, x: usize, y: usize, cell: Cell) {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x] = cell;
        }
    }

    fn get(&self, x: usize, y: usize) -> Cell {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x]
        } else {
            Cell::BLANK
        }
    }

    /// Write a string at (x, y) with given colors. Each char occupies 1 column.
    fn put_str(&mut self, x: usize, y: usize, s: &str, fg: Color, bg: Color) {
        for (i, ch) in s.chars().enumerate() {
            if x + i >= self.width { break; }
            self.set(x + i, y, Cell::new(ch, fg, bg));
        }
    }

    /// Fill a whole row, then write `s` from the left edge.
    fn put_bar(&mut self, y: usize, s: &str, fg: Color, bg: Color) {
        for x in 0..self.width {
            self.set(x, y, Cell::new(' ', fg, bg));
        }
        self.put_str(0, y, s, fg, bg);
    }
}

// ── Renderer ──

const HUD_ROW: usize = 0;
const MAP_ROW: usize = 2;
const MAP_COL: usize = 2;

const HUD_BG: Color = Color::Rgb { r: 20, g: 20, b: 60 };
const MSG_BG: Color = Color::Rgb { r: 200, g: 180, b: 50 };

/// Everything around the grid that the shell wants on screen.
#[derive(Clone, Debug)]
pub struct Hud<'a> {
    pub level_name: &'a str,
    pub level_index: usize,
    pub level_count: usize,
    pub message: &'a str,
    pub paused: bool,
}

pub struct Renderer {
    writer: BufWriter<io::Stdout>,
    front: FrameBuffer,
    back: FrameBuffer,
    term_w: usize,
    term_h: usize,
    palette: Palette,
    cell_width: usize,
}

impl Renderer {
    pub fn new(palette: Palette, cell_width: usize) -> Self {
        Renderer {
            writer: BufWriter::with_capacity(16384, io::stdout()),
            front: FrameBuffer::new(0, 0),
            back: FrameBuffer::new(0, 0),
            term_w: 0,
            term_h: 0,
            palette,
            cell_width: cell_width.max(1),
        }
    }

    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            self.writer,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            SetBackgroundColor(Cell::BASE_BG),
            Clear(ClearType::All)
        )?;

        let (tw, th) = terminal::size().unwrap_or((80, 24));
        self.term_w = tw as usize;
        self.term_h = th as usize;
        self.front.resize(self.term_w, self.term_h);
        self.back.resize(self.term_w, self.term_h);
        // Force full repaint on first frame: back ≠ front for every cell.
        self.back.cells.fill(Cell::INVALID);

        Ok(())
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        execute!(
            self.writer,
            ResetColor,
            cursor::Show,
            terminal::LeaveAlternateScreen
        )?;
        terminal::disable_raw_mode()
    }

    /// Draw the engine's current grid and player.
    pub fn render(&mut self, engine: &Engine, hud: &Hud) -> io::Result<()> {
        let (tw, th) = terminal::size().unwrap_or((80, 24));
        if tw as usize != self.term_w || th as usize != self.term_h {
            self.term_w = tw as usize;
            self.term_h = th as usize;
            self.front.resize(self.term_w, self.term_h);
            self.back.resize(self.term_w, self.term_h);
            self.back.cells.fill(Cell::INVALID);
            queue!(self.writer, SetBackgroundColor(Cell::BASE_BG), Clear(ClearType::All))?;
        }

        self.front.clear();
        self.compose(engine, hud);
        self.flush_diff()?;
        std::mem::swap(&mut self.front, &mut self.back);
        Ok(())
    }

    // ── Compose: build front buffer content ──

    fn compose(&mut self, engine: &Engine, hud: &Hud) {
        let grid = engine.grid();

        let title = format!(
            " ROCKFALL  Level {}/{}  {}  tick {} ",
            hud.level_index + 1, hud.level_count, hud.level_name, engine.tick(),
        );
        self.front.put_bar(HUD_ROW, &title, Color::White, HUD_BG);

        for (x, y, tile) in grid.iter() {
            if let Some(paint) = self.palette.paint(tile) {
                self.compose_cell(x, y, paint, Color::Black);
            }
        }
        let p = engine.player();
        let player = self.palette.player();
        self.compose_cell(p.x, p.y, player, Color::White);

        let msg_row = MAP_ROW + grid.height() + 1;
        if hud.paused {
            self.front.put_bar(msg_row, " PAUSED  [F1/Space] Resume ", Color::Black, MSG_BG);
        } else if !hud.message.is_empty() {
            self.front.put_bar(msg_row, &format!(" {} ", hud.message), Color::Black, MSG_BG);
        }

        let help = " Arrows/WASD:Move  R:Restart  N/P:Level  F1:Pause  Q/Esc:Quit";
        self.front.put_str(0, msg_row + 2, help, Color::DarkGrey, Cell::BASE_BG);
    }

    /// Fill the rectangle of grid cell (gx, gy). The glyph sits in the first column.
    fn compose_cell(&mut self, gx: usize, gy: usize, paint: Paint, fg: Color) {
        let col = MAP_COL + gx * self.cell_width;
        let row = MAP_ROW + gy;
        let bg = to_color(paint.fill);
        for i in 0..self.cell_width {
            let ch = if i == 0 { paint.glyph } else { ' ' };
            self.front.set(col + i, row, Cell::new(ch, fg, bg));
        }
    }

    // ── Diff flush: only write changed cells ──

    fn flush_diff(&mut self) -> io::Result<()> {
        let mut last_fg = Color::White;
        let mut last_bg = Cell::BASE_BG;
        let mut cursor_at: Option<(usize, usize)> = None;

        queue!(self.writer,
            SetForegroundColor(Color::White),
            SetBackgroundColor(Cell::BASE_BG),
        )?;

        for y in 0..self.front.height {
            for x in 0..self.front.width {
                let cell = self.front.get(x, y);
                if cell == self.back.get(x, y) {
                    continue;
                }

                if cursor_at != Some((x, y)) {
                    queue!(self.writer, MoveTo(x as u16, y as u16))?;
                }
                if cell.fg != last_fg {
                    queue!(self.writer, SetForegroundColor(cell.fg))?;
                    last_fg = cell.fg;
                }
                if cell.bg != last_bg {
                    queue!(self.writer, SetBackgroundColor(cell.bg))?;
                    last_bg = cell.bg;
                }
                queue!(self.writer, Print(cell.ch))?;
                cursor_at = Some((x + 1, y));
            }
        }

        self.writer.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_buffer_clips_out_of_range_writes() {
        let mut fb = FrameBuffer::new(3, 2);
        fb.put_str(1, 0, "abcdef", Color::White, Color::Black);
        assert_eq!(fb.get(1, 0).ch, 'a');
        assert_eq!(fb.get(2, 0).ch, 'b');
        fb.set(5, 5, Cell::INVALID);
        assert_eq!(fb.get(5, 5), Cell::BLANK);
    }

    #[test]
    fn put_bar_fills_the_row() {
        let mut fb = FrameBuffer::new(4, 1);
        fb.put_bar(0, "x", Color::Black, MSG_BG);
        assert_eq!(fb.get(0, 0), Cell::new('x', Color::Black, MSG_BG));
        assert_eq!(fb.get(3, 0), Cell::new(' ', Color::Black, MSG_BG));
    }
}
