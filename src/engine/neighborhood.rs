use crate::{grid::Grid, rule::RuleTable};

/// Which of the nine neighbours feed each child, first input being the most
/// significant bit of the pattern
///
/// Neighbours are numbered like a keypad: `7 8 9` is the row above the parent,
/// `4 5 6` the parent's row and `1 2 3` the row below.
///
/// ```text
/// +------+-----------+------+
/// |   a2 |  a1    b3 | b2   |
/// | a3   |  a0    b0 |   b1 |
/// | c1   |  c0    d0 |   d3 |
/// |   c2 |  c3    d1 | d2   |
/// +------+-----------+------+
/// ```
pub(super) const CHILD_INPUTS: [[usize; 4]; 4] = [
    [5, 8, 7, 4], // a, top left
    [5, 6, 9, 8], // b, top right
    [5, 4, 1, 2], // c, bottom left
    [5, 2, 3, 6], // d, bottom right
];

/// Offset of each child inside its 2x2 block, same order as [`CHILD_INPUTS`]
pub(super) const CHILD_OFFSETS: [(usize, usize); 4] = [(0, 0), (1, 0), (0, 1), (1, 1)];

/// The 3x3 neighbourhood of a parent cell, sampled with border clamping
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct Neighborhood {
    // index 0 is unused so the keypad numbers index directly
    values: [bool; 10],
}

impl Neighborhood {
    pub(super) fn sample(grid: &Grid, xp: i32, yp: i32) -> Self {
        let mut values = [false; 10];
        for (i, value) in values.iter_mut().enumerate().skip(1) {
            let col = (i as i32 - 1) % 3 - 1;
            let row = 1 - (i as i32 - 1) / 3;
            *value = grid.get(xp + col, yp + row);
        }
        Self { values }
    }

    /// The 4-bit pattern read by one child
    #[inline]
    pub(super) fn pattern(&self, child: usize) -> usize {
        CHILD_INPUTS[child]
            .iter()
            .fold(0, |acc, &n| (acc << 1) | self.values[n] as usize)
    }

    /// The next state of the four children `a, b, c, d`
    #[inline]
    pub(super) fn children(&self, rule: &RuleTable) -> [bool; 4] {
        std::array::from_fn(|child| rule.output(self.pattern(child)))
    }
}
