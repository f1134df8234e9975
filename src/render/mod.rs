pub mod terminal;

use bracket_terminal::prelude::{BLACK, RGB};

use crate::error::EngineResult;

pub const SCREEN_WIDTH: i32 = 80;
pub const SCREEN_HEIGHT: i32 = 25;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Cell {
    pub glyph: char,
    pub color: RGB,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            glyph: ' ',
            color: RGB::named(BLACK),
        }
    }
}

/// A grid of fixed-width character cells.
///
/// Writes outside the grid are dropped. Nothing reaches the user until
/// `present`.
pub trait Surface {
    fn size(&self) -> (i32, i32);

    fn clear(&mut self);

    fn fill(&mut self, glyph: char, color: RGB);

    fn set(&mut self, x: i32, y: i32, glyph: char, color: RGB);

    fn cell(&self, x: i32, y: i32) -> Option<Cell>;

    fn present(&mut self) -> EngineResult<()>;

    fn destroy(&mut self) -> EngineResult<()> {
        Ok(())
    }

    fn print(&mut self, x: i32, y: i32, text: &str, color: RGB) {
        for (offset, glyph) in text.chars().enumerate() {
            self.set(x + offset as i32, y, glyph, color);
        }
    }

    fn row_text(&self, y: i32) -> String {
        let (width, _) = self.size();
        (0..width)
            .filter_map(|x| self.cell(x, y))
            .map(|cell| cell.glyph)
            .collect()
    }
}

/// In-memory surface. Backs the terminal and stands in for it when headless.
#[derive(Clone, Debug)]
pub struct BufferSurface {
    width: i32,
    height: i32,
    cells: Vec<Cell>,
}

impl BufferSurface {
    pub fn new(width: i32, height: i32) -> Self {
        let size = (width.max(0) * height.max(0)) as usize;
        Self {
            width,
            height,
            cells: vec![Cell::default(); size],
        }
    }

    fn idx(&self, x: i32, y: i32) -> Option<usize> {
        if x >= 0 && x < self.width && y >= 0 && y < self.height {
            Some((y * self.width + x) as usize)
        } else {
            None
        }
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }
}

impl Surface for BufferSurface {
    fn size(&self) -> (i32, i32) {
        (self.width, self.height)
    }

    fn clear(&mut self) {
        self.cells.iter_mut().for_each(|cell| *cell = Cell::default());
    }

    fn fill(&mut self, glyph: char, color: RGB) {
        self.cells
            .iter_mut()
            .for_each(|cell| *cell = Cell { glyph, color });
    }

    fn set(&mut self, x: i32, y: i32, glyph: char, color: RGB) {
        if let Some(idx) = self.idx(x, y) {
            self.cells[idx] = Cell { glyph, color };
        }
    }

    fn cell(&self, x: i32, y: i32) -> Option<Cell> {
        self.idx(x, y).map(|idx| self.cells[idx])
    }

    fn present(&mut self) -> EngineResult<()> {
        Ok(())
    }
}
