use std::collections::VecDeque;

use crate::{
    engine,
    error::SessionError,
    grid::Grid,
    pos::Pos2,
    rule::{RuleId, RuleTable},
    share,
    view::{self, ViewBox, ZoomMode},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExplorerConfig {
    /// How many previous models [`Explorer::undo`] can go back to
    pub history_depth: usize,
    /// Generate with rayon instead of on the calling thread
    pub parallel: bool,
}
impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            history_depth: 1,
            parallel: false,
        }
    }
}

/// The explorer's state: the current model, its rule and a short history
///
/// The current model is only ever replaced, never changed in place.
#[derive(Debug, Clone)]
pub struct Explorer {
    config: ExplorerConfig,
    rule: RuleId,
    table: RuleTable,
    model: Grid,
    history: VecDeque<Grid>,
    generation: usize,
}

impl Explorer {
    pub fn new(rule: RuleId, seed: Grid, config: ExplorerConfig) -> Self {
        Self {
            config,
            rule,
            table: rule.table(),
            model: seed,
            history: VecDeque::with_capacity(config.history_depth),
            generation: 0,
        }
    }

    #[inline]
    pub fn model(&self) -> &Grid {
        &self.model
    }
    #[inline]
    pub fn rule(&self) -> RuleId {
        self.rule
    }
    #[inline]
    pub fn config(&self) -> &ExplorerConfig {
        &self.config
    }
    /// Zoom steps taken since the last seed
    #[inline]
    pub fn generation(&self) -> usize {
        self.generation
    }
    #[inline]
    pub fn can_undo(&self) -> bool {
        !self.history.is_empty()
    }

    /// Changes the rule used by the following zoom steps, the current model
    /// is kept
    pub fn set_rule(&mut self, rule: RuleId) {
        self.rule = rule;
        self.table = rule.table();
    }

    /// Starts over from `seed`, forgetting the history
    pub fn apply_seed(&mut self, seed: Grid) {
        log::info!("applying {0}x{0} seed", seed.size());
        self.model = seed;
        self.history.clear();
        self.generation = 0;
    }

    /// Expands the whole model, doubling its size
    pub fn zoom_out(&mut self) -> &Grid {
        self.step(None)
    }

    /// Zooms by 2 into the half of the model around `focus`, keeping its size
    pub fn zoom_in(&mut self, focus: Pos2) -> &Grid {
        let view = view::zoom_in_view(focus, self.model.size());
        self.step(Some(view))
    }

    /// Zooms the way a click on a `display` sized view does: out while the
    /// model is smaller than the display, in around `focus` once it fills it
    pub fn zoom_at(&mut self, focus: Pos2, display: (u32, u32)) -> &Grid {
        match ZoomMode::choose(display, self.model.size()) {
            ZoomMode::Out => self.zoom_out(),
            ZoomMode::In => self.zoom_in(focus),
        }
    }

    /// Goes back to the previous model
    pub fn undo(&mut self) -> Result<&Grid, SessionError> {
        let previous = self.history.pop_back().ok_or(SessionError::NothingToUndo)?;
        self.model = previous;
        self.generation = self.generation.saturating_sub(1);
        Ok(&self.model)
    }

    /// A link reproducing this session's rule, and its current model when
    /// `include_model` is set
    pub fn share_url(&self, base: &str, include_model: bool) -> String {
        share::share_url(base, self.rule, include_model.then_some(&self.model))
    }

    fn step(&mut self, view: Option<ViewBox>) -> &Grid {
        let next = if self.config.parallel {
            engine::generate_next_model_parallel(&self.model, &self.table, view)
        } else {
            engine::generate_next_model(&self.model, &self.table, view)
        };

        let previous = std::mem::replace(&mut self.model, next);
        if self.config.history_depth > 0 {
            if self.history.len() == self.config.history_depth {
                self.history.pop_front();
            }
            self.history.push_back(previous);
        }
        self.generation += 1;
        &self.model
    }
}

impl Default for Explorer {
    fn default() -> Self {
        Self::new(RuleId::DEFAULT, Grid::seed(), ExplorerConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zoom_out_doubles() {
        let mut explorer = Explorer::default();

        assert_eq!(explorer.zoom_out().size(), 6);
        assert_eq!(explorer.zoom_out().size(), 12);
        assert_eq!(explorer.generation(), 2);
    }

    #[test]
    fn zoom_in_keeps_size() {
        let mut explorer = Explorer::default();
        explorer.zoom_out();

        assert_eq!(explorer.zoom_in(Pos2::new(5, 5)).size(), 6);
    }

    #[test]
    fn zoom_at_switches_mode() {
        let mut explorer = Explorer::default();

        // a 3x3 model on an 8x8 display is scaled by 2, so it expands
        assert_eq!(explorer.zoom_at(Pos2::zero(), (8, 8)).size(), 6);
        // 6x6 on 8x8 no longer scales
        assert_eq!(explorer.zoom_at(Pos2::zero(), (8, 8)).size(), 6);
    }

    #[test]
    fn undo_is_one_step_by_default() {
        let mut explorer = Explorer::default();
        explorer.zoom_out();
        explorer.zoom_out();

        assert_eq!(explorer.undo().map(Grid::size), Ok(6));
        assert_eq!(explorer.undo(), Err(SessionError::NothingToUndo));
        assert_eq!(explorer.model().size(), 6);
    }

    #[test]
    fn deeper_history() {
        let config = ExplorerConfig {
            history_depth: 3,
            ..Default::default()
        };
        let mut explorer = Explorer::new(RuleId::DEFAULT, Grid::seed(), config);
        for _ in 0..4 {
            explorer.zoom_out();
        }

        let sizes: Vec<usize> = std::iter::from_fn(|| explorer.undo().ok().map(Grid::size)).collect();
        assert_eq!(sizes, vec![24, 12, 6]);
    }

    #[test]
    fn no_history() {
        let config = ExplorerConfig {
            history_depth: 0,
            ..Default::default()
        };
        let mut explorer = Explorer::new(RuleId::DEFAULT, Grid::seed(), config);
        explorer.zoom_out();

        assert!(!explorer.can_undo());
    }

    #[test]
    fn rule_change_keeps_model() {
        let mut explorer = Explorer::default();
        explorer.zoom_out();
        explorer.set_rule(RuleId::new(0));

        assert_eq!(explorer.model().size(), 6);
        assert_eq!(explorer.zoom_out().alive_count(), 0);
    }

    #[test]
    fn seed_resets_history() {
        let mut explorer = Explorer::default();
        explorer.zoom_out();
        explorer.apply_seed(Grid::new(2));

        assert!(!explorer.can_undo());
        assert_eq!(explorer.generation(), 0);
        assert_eq!(explorer.model(), &Grid::new(2));
    }

    #[test]
    fn parallel_session_matches() {
        let config = ExplorerConfig {
            parallel: true,
            ..Default::default()
        };
        let mut serial = Explorer::default();
        let mut parallel = Explorer::new(RuleId::DEFAULT, Grid::seed(), config);
        for _ in 0..3 {
            serial.zoom_out();
            parallel.zoom_out();
        }
        serial.zoom_in(Pos2::new(3, 17));
        parallel.zoom_in(Pos2::new(3, 17));

        assert_eq!(serial.model(), parallel.model());
    }

    #[test]
    fn shares_state() {
        let explorer = Explorer::default();

        assert_eq!(explorer.share_url("p", false), "p?ruleId=1385");
        assert_eq!(explorer.share_url("p", true), "p?ruleId=1385&dm=C%2C000");
    }
}
