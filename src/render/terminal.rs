use std::io::{Stdout, Write, stdout};

use bracket_terminal::prelude::RGB;
use crossterm::{
    cursor::{Hide, MoveTo, Show},
    execute, queue,
    style::{Color, Print, SetForegroundColor},
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};

use crate::error::EngineResult;

use super::{BufferSurface, Cell, Surface};

/// Crossterm-backed surface. Draws into a back buffer and flushes it whole
/// on `present`.
pub struct TerminalSurface {
    out: Stdout,
    buffer: BufferSurface,
    active: bool,
}

impl TerminalSurface {
    pub fn new(width: i32, height: i32) -> EngineResult<Self> {
        let mut out = stdout();
        terminal::enable_raw_mode()?;
        execute!(out, EnterAlternateScreen, Hide)?;
        Ok(Self {
            out,
            buffer: BufferSurface::new(width, height),
            active: true,
        })
    }
}

fn to_color(color: RGB) -> Color {
    let channel = |value: f32| (value.clamp(0.0, 1.0) * 255.0).round() as u8;
    Color::Rgb {
        r: channel(color.r),
        g: channel(color.g),
        b: channel(color.b),
    }
}

impl Surface for TerminalSurface {
    fn size(&self) -> (i32, i32) {
        self.buffer.size()
    }

    fn clear(&mut self) {
        self.buffer.clear();
    }

    fn fill(&mut self, glyph: char, color: RGB) {
        self.buffer.fill(glyph, color);
    }

    fn set(&mut self, x: i32, y: i32, glyph: char, color: RGB) {
        self.buffer.set(x, y, glyph, color);
    }

    fn cell(&self, x: i32, y: i32) -> Option<Cell> {
        self.buffer.cell(x, y)
    }

    fn present(&mut self) -> EngineResult<()> {
        let (width, _) = self.buffer.size();
        let mut current = None;
        for (idx, cell) in self.buffer.cells().iter().enumerate() {
            let x = (idx as i32 % width) as u16;
            let y = (idx as i32 / width) as u16;
            if x == 0 {
                queue!(self.out, MoveTo(0, y))?;
            }
            if current != Some(cell.color) {
                queue!(self.out, SetForegroundColor(to_color(cell.color)))?;
                current = Some(cell.color);
            }
            queue!(self.out, Print(cell.glyph))?;
        }
        self.out.flush()?;
        self.buffer.present()
    }

    fn destroy(&mut self) -> EngineResult<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;
        execute!(self.out, Show, LeaveAlternateScreen)?;
        terminal::disable_raw_mode()?;
        Ok(())
    }
}

impl Drop for TerminalSurface {
    fn drop(&mut self) {
        let _ = self.destroy();
    }
}
