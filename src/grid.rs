use std::{fmt, str::FromStr};

use crate::error::GridError;

/// A square model of binary cells, stored row-major
///
/// A grid is never resized in place; every zoom step builds a new one.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Grid {
    size: usize,
    cells: Vec<bool>,
}

impl Grid {
    /// Creates an all-dead grid of `size * size` cells
    pub fn new(size: usize) -> Self {
        debug_assert!(size > 0, "grid must have at least one cell");
        Self {
            size,
            cells: vec![false; size * size],
        }
    }

    /// The built-in seed: a 3x3 grid with a single live centre cell
    pub fn seed() -> Self {
        let mut grid = Self::new(3);
        grid.set(1, 1, true);
        grid
    }

    pub fn from_rows<R: AsRef<[bool]>>(rows: &[R]) -> Result<Self, GridError> {
        let size = rows.len();
        if size == 0 {
            return Err(GridError::Empty);
        }

        let mut cells = Vec::with_capacity(size * size);
        for (row, values) in rows.iter().enumerate() {
            let values = values.as_ref();
            if values.len() != size {
                return Err(GridError::NotSquare {
                    row,
                    len: values.len(),
                    size,
                });
            }
            cells.extend_from_slice(values);
        }
        Ok(Self { size, cells })
    }

    /// Wraps row-major bits, `bits.len()` must be `size * size`
    pub fn from_bits(size: usize, bits: Vec<bool>) -> Result<Self, GridError> {
        if size == 0 {
            return Err(GridError::Empty);
        }
        if bits.len() != size * size {
            return Err(GridError::NotSquare {
                row: bits.len() / size,
                len: bits.len() % size,
                size,
            });
        }
        Ok(Self { size, cells: bits })
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Reads a cell, clamping each coordinate into the grid independently
    ///
    /// Reads past an edge return the border cell, as if the border repeated
    /// outwards forever.
    #[inline]
    pub fn get(&self, x: i32, y: i32) -> bool {
        let hi = self.size as i32 - 1;
        let x = x.clamp(0, hi) as usize;
        let y = y.clamp(0, hi) as usize;
        self.cells[y * self.size + x]
    }

    /// Writes a cell, the caller guarantees `(x, y)` is inside the grid
    #[inline]
    pub fn set(&mut self, x: usize, y: usize, value: bool) {
        debug_assert!(x < self.size && y < self.size, "({x}, {y}) out of bounds");
        self.cells[y * self.size + x] = value;
    }

    /// The cells flattened row-major
    #[inline]
    pub fn bits(&self) -> &[bool] {
        &self.cells
    }

    #[inline]
    pub fn rows(&self) -> impl Iterator<Item = &[bool]> {
        self.cells.chunks(self.size)
    }

    pub fn alive_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c).count()
    }

    pub(crate) fn cells_mut(&mut self) -> &mut [bool] {
        &mut self.cells
    }
}

impl Default for Grid {
    fn default() -> Self {
        Self::seed()
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.rows().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            for &cell in row {
                f.write_str(if cell { "1" } else { "0" })?;
            }
        }
        Ok(())
    }
}

impl FromStr for Grid {
    type Err = GridError;

    /// Parses newline-delimited lines of `0` and `1`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rows = s
            .lines()
            .enumerate()
            .map(|(line, text)| {
                text.chars()
                    .enumerate()
                    .map(|(column, c)| match c {
                        '0' => Ok(false),
                        '1' => Ok(true),
                        found => Err(GridError::InvalidCell {
                            line: line + 1,
                            column: column + 1,
                            found,
                        }),
                    })
                    .collect::<Result<Vec<_>, _>>()
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_rows(&rows)
    }
}
