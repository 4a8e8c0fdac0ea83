use crate::framebuffer::Framebuffer;
use crossterm::{
    cursor, execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{
        self, BeginSynchronizedUpdate, Clear, ClearType, DisableLineWrap, EnableLineWrap,
        EndSynchronizedUpdate, EnterAlternateScreen, LeaveAlternateScreen,
    },
};
use std::io::{self, Write};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Cell {
    pub(crate) ch: char,
    pub(crate) fg: Color,
    pub(crate) bg: Color,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            ch: ' ',
            fg: Color::White,
            bg: Color::Black,
        }
    }
}

pub(crate) struct CellBuffer {
    pub(crate) w: u16,
    pub(crate) h: u16,
    pub(crate) cells: Vec<Cell>,
}

impl CellBuffer {
    pub(crate) fn new(w: u16, h: u16) -> Self {
        Self {
            w,
            h,
            cells: vec![Cell::default(); (w as usize) * (h as usize)],
        }
    }
    pub(crate) fn idx(&self, x: u16, y: u16) -> usize {
        (y as usize) * (self.w as usize) + (x as usize)
    }
    pub(crate) fn set(&mut self, x: u16, y: u16, c: Cell) {
        if x < self.w && y < self.h {
            let i = self.idx(x, y);
            self.cells[i] = c;
        }
    }
    pub(crate) fn clear(&mut self, bg: Color) {
        for c in &mut self.cells {
            c.ch = ' ';
            c.fg = Color::White;
            c.bg = bg;
        }
    }
}

pub(crate) struct Terminal {
    pub(crate) out: io::Stdout,
    pub(crate) cols: u16,
    pub(crate) rows: u16,
    pub(crate) prev: CellBuffer,
    pub(crate) cur: CellBuffer,
}

impl Terminal {
    pub(crate) fn begin() -> anyhow::Result<Self> {
        let mut out = io::stdout();
        execute!(
            out,
            EnterAlternateScreen,
            cursor::Hide,
            DisableLineWrap,
            terminal::Clear(ClearType::All)
        )?;
        terminal::enable_raw_mode()?;

        let (cols, rows) = terminal::size()?;
        Ok(Self {
            out,
            cols,
            rows,
            prev: CellBuffer::new(cols, rows),
            cur: CellBuffer::new(cols, rows),
        })
    }

    pub(crate) fn end(&mut self) -> anyhow::Result<()> {
        queue!(
            self.out,
            BeginSynchronizedUpdate,
            ResetColor,
            Clear(ClearType::All),
            cursor::Show,
            EnableLineWrap,
            EndSynchronizedUpdate,
            LeaveAlternateScreen
        )?;
        self.out.flush()?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    pub(crate) fn resize_if_needed(&mut self) -> anyhow::Result<bool> {
        let (c, r) = terminal::size()?;
        if c == self.cols && r == self.rows {
            return Ok(false);
        }
        self.cols = c;
        self.rows = r;
        self.prev = CellBuffer::new(c, r);
        self.cur = CellBuffer::new(c, r);
        queue!(self.out, Clear(ClearType::All))?;
        log::debug!("terminal resized to {c}x{r}");
        Ok(true)
    }

    pub(crate) fn present(&mut self, diff_only: bool) -> anyhow::Result<()> {
        queue!(self.out, BeginSynchronizedUpdate)?;

        let mut last_fg = None;
        let mut last_bg = None;

        for y in 0..self.rows {
            for x in 0..self.cols {
                let i = self.cur.idx(x, y);
                let c = self.cur.cells[i];
                if diff_only && c == self.prev.cells[i] {
                    continue;
                }

                queue!(self.out, cursor::MoveTo(x, y))?;

                if last_fg != Some(c.fg) {
                    queue!(self.out, SetForegroundColor(c.fg))?;
                    last_fg = Some(c.fg);
                }
                if last_bg != Some(c.bg) {
                    queue!(self.out, SetBackgroundColor(c.bg))?;
                    last_bg = Some(c.bg);
                }

                queue!(self.out, Print(c.ch))?;
            }
        }

        queue!(self.out, ResetColor, EndSynchronizedUpdate)?;
        self.out.flush()?;
        self.prev.cells.copy_from_slice(&self.cur.cells);
        Ok(())
    }
}

/* -----------------------------
   Braille encoding: 2×4 pixels -> U+2800..U+28FF
------------------------------ */

fn braille_bit(dx: i32, dy: i32) -> u8 {
    // Dot mapping:
    // (0,0)=1 (0,1)=2 (0,2)=4 (0,3)=64
    // (1,0)=8 (1,1)=16 (1,2)=32 (1,3)=128
    match (dx, dy) {
        (0, 0) => 0x01,
        (0, 1) => 0x02,
        (0, 2) => 0x04,
        (0, 3) => 0x40,
        (1, 0) => 0x08,
        (1, 1) => 0x10,
        (1, 2) => 0x20,
        (1, 3) => 0x80,
        _ => 0x00,
    }
}

/// Terminal cells needed to show a `w`×`h` bitmap.
pub(crate) fn cells_for(w: i32, h: i32) -> (u16, u16) {
    (((w + 1) / 2) as u16, ((h + 3) / 4) as u16)
}

/// Pack lit bitmap pixels into braille glyphs, one cell per 2×4 block.
pub(crate) fn bitmap_to_cells(fb: &Framebuffer, out: &mut CellBuffer, fg: Color, bg: Color) {
    let (cols, rows) = cells_for(fb.width(), fb.height());

    for cy in 0..rows.min(out.h) {
        for cx in 0..cols.min(out.w) {
            let px0 = cx as i32 * 2;
            let py0 = cy as i32 * 4;

            let mut mask: u8 = 0;
            for dy in 0..4 {
                for dx in 0..2 {
                    let x = px0 + dx;
                    let y = py0 + dy;
                    if x >= fb.width() || y >= fb.height() {
                        continue;
                    }
                    if fb.pixel(x, y) {
                        mask |= braille_bit(dx, dy);
                    }
                }
            }

            let ch = char::from_u32(0x2800 + (mask as u32)).unwrap_or(' ');
            out.set(cx, cy, Cell { ch, fg, bg });
        }
    }
}

pub(crate) fn draw_text(buf: &mut CellBuffer, x: u16, y: u16, s: &str, fg: Color, bg: Color) {
    for (i, ch) in s.chars().enumerate() {
        let xx = x.saturating_add(i as u16);
        if xx >= buf.w || y >= buf.h {
            break;
        }
        buf.set(xx, y, Cell { ch, fg, bg });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framebuffer::{screen_words, SCREEN_H, SCREEN_W};

    #[test]
    fn screen_fits_in_braille_cells() {
        assert_eq!(cells_for(SCREEN_W, SCREEN_H), (72, 42));
        assert_eq!(cells_for(3, 5), (2, 2));
    }

    #[test]
    fn pixels_become_braille_dots() {
        let mut words = screen_words();
        let mut fb = Framebuffer::screen(&mut words);
        fb.set_pixel(0, 0, true);
        fb.set_pixel(1, 3, true);
        fb.set_pixel(3, 5, true);

        let mut buf = CellBuffer::new(80, 50);
        bitmap_to_cells(&fb, &mut buf, Color::White, Color::Black);
        assert_eq!(buf.cells[buf.idx(0, 0)].ch, '\u{2881}');
        assert_eq!(buf.cells[buf.idx(1, 1)].ch, '\u{2810}');
        assert_eq!(buf.cells[buf.idx(2, 0)].ch, '\u{2800}');
        // Columns past the bitmap are left alone.
        assert_eq!(buf.cells[buf.idx(72, 0)].ch, ' ');
    }

    #[test]
    fn small_terminal_clips() {
        let mut words = screen_words();
        let mut fb = Framebuffer::screen(&mut words);
        fb.fill_rect(0, 0, SCREEN_W, SCREEN_H, true);
        let mut buf = CellBuffer::new(10, 4);
        bitmap_to_cells(&fb, &mut buf, Color::White, Color::Black);
        assert!(buf.cells.iter().all(|c| c.ch == '\u{28FF}'));
    }

    #[test]
    fn text_stops_at_the_edge() {
        let mut buf = CellBuffer::new(5, 1);
        draw_text(&mut buf, 3, 0, "abc", Color::White, Color::Black);
        assert_eq!(buf.cells[3].ch, 'a');
        assert_eq!(buf.cells[4].ch, 'b');
    }
}
