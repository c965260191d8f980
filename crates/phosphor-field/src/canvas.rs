//! Persistent grid of colored cells the particles are drawn into.

use phosphor_core::Rgb;
use ratatui::{
    style::Style,
    text::{Line, Span},
};
use unicode_width::UnicodeWidthChar;

/// Colors closer than this to the background count as background.
const BLANK_THRESHOLD: u8 = 8;

/// One terminal cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub glyph: char,
    pub fg: Rgb,
    pub bg: Rgb,
}

impl Cell {
    pub fn blank(background: Rgb) -> Self {
        Self {
            glyph: ' ',
            fg: background,
            bg: background,
        }
    }

    pub fn is_blank(&self) -> bool {
        self.glyph == ' '
    }
}

/// A `width` x `height` grid of cells over a solid background.
#[derive(Debug, Clone, PartialEq)]
pub struct Canvas {
    width: u16,
    height: u16,
    background: Rgb,
    cells: Vec<Cell>,
}

impl Canvas {
    pub fn new(width: u16, height: u16, background: Rgb) -> Self {
        Self {
            width,
            height,
            background,
            cells: vec![Cell::blank(background); width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn background(&self) -> Rgb {
        self.background
    }

    fn index(&self, x: u16, y: u16) -> Option<usize> {
        (x < self.width && y < self.height).then(|| y as usize * self.width as usize + x as usize)
    }

    pub fn get(&self, x: u16, y: u16) -> Option<&Cell> {
        self.index(x, y).map(|i| &self.cells[i])
    }

    pub fn get_mut(&mut self, x: u16, y: u16) -> Option<&mut Cell> {
        self.index(x, y).map(|i| &mut self.cells[i])
    }

    /// Iterate over every cell with its coordinates, row by row.
    pub fn cells_mut(&mut self) -> impl Iterator<Item = (u16, u16, &mut Cell)> {
        let width = self.width.max(1) as usize;
        self.cells
            .iter_mut()
            .enumerate()
            .map(move |(i, cell)| ((i % width) as u16, (i / width) as u16, cell))
    }

    /// Reset every cell to the background.
    pub fn clear(&mut self) {
        self.cells.fill(Cell::blank(self.background));
    }

    /// Move every cell `amount` of the way toward the background.
    ///
    /// Cells that end up indistinguishable from the background are blanked,
    /// so repeated partial fades always finish.
    pub fn fade(&mut self, amount: f32) {
        if amount >= 1.0 {
            self.clear();
            return;
        }
        let background = self.background;
        for cell in &mut self.cells {
            cell.fg = cell.fg.lerp(background, amount);
            cell.bg = cell.bg.lerp(background, amount);
            if cell.fg.distance(background) < BLANK_THRESHOLD {
                cell.glyph = ' ';
                cell.fg = background;
            }
            if cell.bg.distance(background) < BLANK_THRESHOLD {
                cell.bg = background;
            }
        }
    }

    /// Draw `glyph` at `(x, y)`. Out of bounds and zero-width glyphs are ignored.
    pub fn plot(&mut self, x: u16, y: u16, glyph: char, fg: Rgb, bg: Rgb) {
        if glyph.width().unwrap_or(0) == 0 {
            return;
        }
        if let Some(cell) = self.get_mut(x, y) {
            *cell = Cell { glyph, fg, bg };
        }
    }

    /// Convert to ratatui lines, one span per cell.
    ///
    /// A double-width glyph covers the cell to its right; one that would run
    /// past the right edge is drawn as a space.
    pub fn to_lines(&self) -> Vec<Line<'static>> {
        (0..self.height)
            .map(|y| {
                let mut spans = Vec::with_capacity(self.width as usize);
                let mut x = 0;
                while x < self.width {
                    let Some(cell) = self.get(x, y) else { break };
                    let style = Style::new().fg(cell.fg.into()).bg(cell.bg.into());
                    let width = cell.glyph.width().unwrap_or(0) as u16;
                    if width == 2 && x + 1 < self.width {
                        spans.push(Span::styled(cell.glyph.to_string(), style));
                        x += 2;
                    } else {
                        let glyph = if width == 1 { cell.glyph } else { ' ' };
                        spans.push(Span::styled(glyph.to_string(), style));
                        x += 1;
                    }
                }
                Line::from(spans)
            })
            .collect()
    }
}
