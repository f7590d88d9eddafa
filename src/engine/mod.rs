//! The recursive model generator.
//!
//! Every parent cell of the current model expands into a 2x2 block of
//! children in the next model. Each child reads four of the parent's nine
//! neighbours (see [`neighborhood::CHILD_INPUTS`]) and the rule table turns
//! that pattern into the child's state.

mod neighborhood;

use self::neighborhood::{CHILD_OFFSETS, Neighborhood};
use crate::{Grid, Pos2, RuleTable, ViewBox};
use rayon::prelude::*;

/// Generates the next model from `current`
///
/// Without a view the whole model is expanded and the result is twice the
/// size. With a view (in `current`'s coordinates) the result keeps the same
/// size and only the area starting at `view.min` is re-derived, which is a
/// zoom by 2 followed by a crop.
pub fn generate_next_model(current: &Grid, rule: &RuleTable, view: Option<ViewBox>) -> Grid {
    let plan = Plan::new(current, view);
    let mut next = Grid::new(plan.size);
    for (band, cells) in next.cells_mut().chunks_mut(plan.band_len()).enumerate() {
        plan.fill_band(current, rule, band, cells);
    }
    log::debug!(
        "generated {0}x{0} model from {1}x{1} (rule {2}, view {3:?})",
        plan.size,
        current.size(),
        rule.rule_id(),
        view
    );
    next
}

/// Same as [`generate_next_model`], splitting the output into bands of two
/// rows that rayon fills independently
pub fn generate_next_model_parallel(
    current: &Grid,
    rule: &RuleTable,
    view: Option<ViewBox>,
) -> Grid {
    let plan = Plan::new(current, view);
    let mut next = Grid::new(plan.size);
    next.cells_mut()
        .par_chunks_mut(plan.band_len())
        .enumerate()
        .for_each(|(band, cells)| plan.fill_band(current, rule, band, cells));
    log::debug!(
        "generated {0}x{0} model from {1}x{1} in parallel (rule {2}, view {3:?})",
        plan.size,
        current.size(),
        rule.rule_id(),
        view
    );
    next
}

/// Output size and parent offset of one generation step
struct Plan {
    size: usize,
    origin: Pos2,
}

impl Plan {
    fn new(current: &Grid, view: Option<ViewBox>) -> Self {
        match view {
            Some(view) => Self {
                // zooming by 2 then cropping by 2
                size: current.size(),
                origin: view.min,
            },
            None => Self {
                size: current.size() * 2,
                origin: Pos2::zero(),
            },
        }
    }

    /// Cells in one band, i.e. two output rows
    #[inline]
    fn band_len(&self) -> usize {
        self.size * 2
    }

    /// Fills the output rows `2 * band` and `2 * band + 1`
    ///
    /// The last band of an odd sized output only holds one row; children that
    /// fall outside it are dropped.
    fn fill_band(&self, current: &Grid, rule: &RuleTable, band: usize, cells: &mut [bool]) {
        let rows = cells.len() / self.size;
        let yp = band as i32 + self.origin.y;
        for block in 0..self.size.div_ceil(2) {
            let xp = block as i32 + self.origin.x;
            let children = Neighborhood::sample(current, xp, yp).children(rule);
            for (&(dx, dy), state) in CHILD_OFFSETS.iter().zip(children) {
                let x = block * 2 + dx;
                if x < self.size && dy < rows {
                    cells[dy * self.size + x] = state;
                }
            }
        }
    }
}
