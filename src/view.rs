use crate::Pos2;

/// A square region of grid coordinates, `min` inclusive and `max` exclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ViewBox {
    pub min: Pos2,
    pub max: Pos2,
}

impl ViewBox {
    /// The box covering a whole `size * size` grid
    pub fn full(size: i32) -> Self {
        Self {
            min: Pos2::zero(),
            max: Pos2::splat(size),
        }
    }

    /// A `size * size` box centred on `focus` where possible, translated (never
    /// shrunk) to stay inside `[0, max_extent]` on both axes
    pub fn centered(focus: Pos2, size: i32, max_extent: i32) -> Self {
        let half = size / 2;
        let clamp_axis = |v: i32| {
            let v = v - half;
            if v < 0 {
                0
            } else if v + size > max_extent {
                max_extent - size
            } else {
                v
            }
        };

        let min = Pos2::new(clamp_axis(focus.x), clamp_axis(focus.y));
        Self {
            min,
            max: min + Pos2::splat(size),
        }
    }

    #[inline]
    pub fn size(&self) -> i32 {
        self.max.x - self.min.x
    }

    #[inline]
    pub fn contains(&self, pos: Pos2) -> bool {
        (self.min.x..self.max.x).contains(&pos.x) && (self.min.y..self.max.y).contains(&pos.y)
    }
}

/// The view used to zoom into a `size * size` model around `focus`
///
/// The zoom factor is 2, so the view covers half of the model (rounded up so
/// odd sizes are still fully re-derived).
pub fn zoom_in_view(focus: Pos2, size: usize) -> ViewBox {
    let size = size as i32;
    ViewBox::centered(focus, (size + 1) / 2, size)
}

/// The largest power of two a model can be scaled by and still fit a
/// `width * height` display, at least 1
pub fn display_scale(width: u32, height: u32, size: usize) -> u32 {
    let fit = width.min(height) as usize / size.max(1);
    if fit == 0 {
        1
    } else {
        1 << fit.ilog2()
    }
}

/// Which way a click on the model zooms
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoomMode {
    /// The model does not fill the display yet: expand the whole model
    Out,
    /// The model fills the display: re-derive the half around the click
    In,
}
impl ZoomMode {
    pub fn choose(display: (u32, u32), size: usize) -> Self {
        if display_scale(display.0, display.1, size) > 1 {
            Self::Out
        } else {
            Self::In
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_to_origin() {
        let view = ViewBox::centered(Pos2::new(1, 1), 2, 3);

        assert_eq!(view.min, Pos2::new(0, 0));
        assert_eq!(view.max, Pos2::new(2, 2));
    }

    #[test]
    fn centres_when_room() {
        let view = ViewBox::centered(Pos2::new(8, 6), 4, 16);

        assert_eq!(view.min, Pos2::new(6, 4));
        assert_eq!(view.size(), 4);
    }

    #[test]
    fn shifts_back_from_far_edge() {
        let view = ViewBox::centered(Pos2::new(15, 2), 4, 16);

        assert_eq!(view.min, Pos2::new(12, 0));
        assert_eq!(view.max, Pos2::new(16, 4));
    }

    #[test]
    fn contains_is_half_open() {
        let view = ViewBox::full(3);

        assert!(view.contains(Pos2::new(0, 2)));
        assert!(!view.contains(Pos2::new(3, 0)));
        assert!(!view.contains(Pos2::new(-1, 0)));
    }

    #[test]
    fn zoom_in_view_rounds_up() {
        assert_eq!(zoom_in_view(Pos2::new(5, 5), 6).size(), 3);
        assert_eq!(zoom_in_view(Pos2::new(0, 0), 3).size(), 2);
        assert_eq!(zoom_in_view(Pos2::new(2, 2), 3).min, Pos2::new(1, 1));
    }

    #[test]
    fn display_scale_is_power_of_two() {
        assert_eq!(display_scale(100, 80, 3), 16);
        assert_eq!(display_scale(64, 64, 32), 2);
        assert_eq!(display_scale(63, 64, 32), 1);
        assert_eq!(display_scale(10, 10, 40), 1);
    }

    #[test]
    fn zoom_mode_follows_scale() {
        assert_eq!(ZoomMode::choose((80, 24), 6), ZoomMode::Out);
        assert_eq!(ZoomMode::choose((80, 24), 12), ZoomMode::Out);
        assert_eq!(ZoomMode::choose((80, 24), 13), ZoomMode::In);
    }
}
