use crate::{Grid, Pos2};

/// A rectangular window onto a grid, `tl` inclusive and `br` exclusive
///
/// The window may reach past the grid; those cells are simply not drawn.
pub struct GridWindow<'a> {
    tl: Pos2,
    br: Pos2,
    grid: &'a Grid,
}
impl<'a> GridWindow<'a> {
    pub fn new(grid: &'a Grid, top_left: Pos2, bottom_right: Pos2) -> Self {
        Self {
            tl: top_left,
            br: bottom_right,
            grid,
        }
    }

    /// Live cells inside the window, in row-major order
    pub fn iter(&self) -> impl Iterator<Item = Pos2> + '_ {
        let size = self.grid.size() as i32;
        let ys = self.tl.y.max(0)..self.br.y.min(size);
        ys.flat_map(move |y| {
            let xs = self.tl.x.max(0)..self.br.x.min(size);
            xs.map(move |x| Pos2::new(x, y))
        })
        .filter(move |p| self.grid.get(p.x, p.y))
    }
}
