//! The paint editor's model.
//!
//! The editor works on a square grid where cells may still be undetermined
//! (`?`). Text and painting stay in sync through [`PaintGrid::parse`] and
//! [`PaintGrid::to_text`]; only a fully determined grid can be handed to the
//! generator through [`PaintGrid::resolve`].

use std::fmt;

use crate::{error::PaintError, grid::Grid, pos::Pos2};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PaintCell {
    Dead,
    Alive,
    #[default]
    Unknown,
}
impl PaintCell {
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '0' => Some(Self::Dead),
            '1' => Some(Self::Alive),
            '?' => Some(Self::Unknown),
            _ => None,
        }
    }
    pub fn as_char(self) -> char {
        match self {
            Self::Dead => '0',
            Self::Alive => '1',
            Self::Unknown => '?',
        }
    }
}
impl From<bool> for PaintCell {
    fn from(alive: bool) -> Self {
        if alive { Self::Alive } else { Self::Dead }
    }
}

/// A square grid of editor cells, row-major
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaintGrid {
    size: usize,
    cells: Vec<PaintCell>,
}

impl PaintGrid {
    /// Parses editor text
    ///
    /// The grid is as large as the longest line or the number of lines,
    /// whichever is bigger; missing cells are undetermined.
    pub fn parse(text: &str) -> Result<Self, PaintError> {
        let lines: Vec<&str> = text
            .split('\n')
            .map(|l| l.strip_suffix('\r').unwrap_or(l))
            .collect();

        let mut rows = Vec::with_capacity(lines.len());
        for (line, chars) in lines.iter().enumerate() {
            let row = chars
                .chars()
                .enumerate()
                .map(|(column, found)| {
                    PaintCell::from_char(found).ok_or(PaintError::InvalidCharacter {
                        line: line + 1,
                        column: column + 1,
                        found,
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            rows.push(row);
        }

        let longest = rows.iter().map(Vec::len).max().unwrap_or(0);
        let size = rows.len().max(longest);
        let mut cells = vec![PaintCell::Unknown; size * size];
        for (y, row) in rows.iter().enumerate() {
            cells[y * size..y * size + row.len()].copy_from_slice(row);
        }
        Ok(Self { size, cells })
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn get(&self, pos: Pos2) -> Option<PaintCell> {
        self.index(pos).map(|i| self.cells[i])
    }

    fn index(&self, pos: Pos2) -> Option<usize> {
        let size = self.size as i32;
        if (0..size).contains(&pos.x) && (0..size).contains(&pos.y) {
            Some(pos.y as usize * self.size + pos.x as usize)
        } else {
            None
        }
    }

    /// Paints one cell, positions outside the grid are ignored
    pub fn paint(&mut self, pos: Pos2, cell: PaintCell) {
        if let Some(i) = self.index(pos) {
            self.cells[i] = cell;
        }
    }

    /// Paints every cell on the line between `from` and `to`, both included
    pub fn paint_line(&mut self, from: Pos2, to: Pos2, cell: PaintCell) {
        let dx = (to.x - from.x).abs();
        let dy = (to.y - from.y).abs();
        let sx = if from.x < to.x { 1 } else { -1 };
        let sy = if from.y < to.y { 1 } else { -1 };
        let mut err = dx - dy;
        let mut pos = from;
        loop {
            self.paint(pos, cell);
            if pos == to {
                break;
            }
            let e2 = 2 * err;
            if e2 > -dy {
                err -= dy;
                pos.x += sx;
            }
            if e2 < dx {
                err += dx;
                pos.y += sy;
            }
        }
    }

    pub fn unknown_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c == PaintCell::Unknown).count()
    }

    /// Whether the grid can be applied as a model
    pub fn is_resolved(&self) -> bool {
        self.size > 0 && self.unknown_count() == 0
    }

    /// Converts a fully determined grid into a model
    pub fn resolve(&self) -> Result<Grid, PaintError> {
        let unknown = self.unknown_count();
        if unknown > 0 || self.size == 0 {
            return Err(PaintError::Unresolved(unknown));
        }
        let bits = self.cells.iter().map(|&c| c == PaintCell::Alive).collect();
        Grid::from_bits(self.size, bits).map_err(|_| PaintError::Unresolved(0))
    }

    pub fn to_text(&self) -> String {
        self.to_string()
    }
}

impl From<&Grid> for PaintGrid {
    fn from(grid: &Grid) -> Self {
        Self {
            size: grid.size(),
            cells: grid.bits().iter().map(|&b| PaintCell::from(b)).collect(),
        }
    }
}

impl fmt::Display for PaintGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (y, row) in self.cells.chunks(self.size.max(1)).enumerate() {
            if y > 0 {
                f.write_str("\n")?;
            }
            for cell in row {
                write!(f, "{}", cell.as_char())?;
            }
        }
        Ok(())
    }
}

/// Drops every row and then every column made only of `?`
///
/// Lines are first padded with `?` to the longest line.
pub fn clean_unknown_margins(text: &str) -> String {
    let lines: Vec<&str> = text.split('\n').collect();
    let width = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);

    let rows: Vec<Vec<char>> = lines
        .iter()
        .map(|l| {
            let mut row: Vec<char> = l.chars().collect();
            row.resize(width, '?');
            row
        })
        .filter(|row| row.iter().any(|&c| c != '?'))
        .collect();
    if rows.is_empty() {
        return String::new();
    }

    let keep: Vec<bool> = (0..width)
        .map(|col| rows.iter().any(|row| row[col] != '?'))
        .collect();
    rows.iter()
        .map(|row| {
            row.iter()
                .zip(&keep)
                .filter(|&(_, &k)| k)
                .map(|(&c, _)| c)
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// A freehand stroke, painting a line between consecutive drag positions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Brush {
    cell: PaintCell,
    last: Option<Pos2>,
}

impl Brush {
    pub fn new(cell: PaintCell) -> Self {
        Self { cell, last: None }
    }

    pub fn set_cell(&mut self, cell: PaintCell) {
        self.cell = cell;
    }

    #[inline]
    pub fn is_drawing(&self) -> bool {
        self.last.is_some()
    }

    pub fn press(&mut self, grid: &mut PaintGrid, pos: Pos2) {
        grid.paint(pos, self.cell);
        self.last = Some(pos);
    }

    /// Continues the stroke, does nothing unless pressed
    pub fn drag(&mut self, grid: &mut PaintGrid, pos: Pos2) {
        if let Some(last) = self.last {
            grid.paint_line(last, pos, self.cell);
            self.last = Some(pos);
        }
    }

    /// Ends the stroke, returning whether one was in progress
    pub fn release(&mut self) -> bool {
        self.last.take().is_some()
    }
}
