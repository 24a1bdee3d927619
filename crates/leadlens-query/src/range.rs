//! Revenue range resolution.
//!
//! [`RangeResolver`] computes the slider bounds from accounts that survive
//! every filter except the revenue filter. [`RangeState`] holds the user's
//! selected range between recomputations and decides how it follows the
//! bounds.

use serde::{Deserialize, Serialize};
use tracing::debug;

use leadlens_core::config::RevenueConfig;
use leadlens_core::{FilterSpec, RevenueRange};

use crate::compiled::REVENUE_BIT;
use crate::leave_one_out::LeaveOneOut;

#[derive(Debug, Clone, Copy)]
pub struct RangeResolver {
    fallback: RevenueRange,
}

impl RangeResolver {
    pub fn new(fallback: RevenueRange) -> Self {
        Self { fallback }
    }

    pub fn from_config(config: &RevenueConfig) -> Self {
        Self::new(config.default_range())
    }

    /// Min and max positive revenue among accounts surviving with the revenue
    /// filter lifted, or the fallback range when there is none.
    pub fn bounds(&self, loo: &LeaveOneOut<'_>) -> RevenueRange {
        let index = loo.index();

        let bounds = (0..index.account_count() as u32)
            .filter(|a| loo.account_survives_without(*a, REVENUE_BIT))
            .map(|a| index.revenue(a))
            .filter(|revenue| *revenue > 0.0)
            .fold(None, |acc: Option<RevenueRange>, revenue| {
                Some(match acc {
                    None => RevenueRange::new(revenue, revenue),
                    Some(r) => RevenueRange::new(r.min.min(revenue), r.max.max(revenue)),
                })
            });

        match bounds {
            Some(bounds) => bounds,
            None => {
                debug!("No positive revenue in scope, using fallback bounds");
                self.fallback
            }
        }
    }
}

impl Default for RangeResolver {
    fn default() -> Self {
        Self::new(RevenueRange::DEFAULT)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RangeMode {
    /// Selection tracks the bounds.
    #[default]
    Auto,
    /// Selection was edited and is only clamped into new bounds.
    Manual,
}

/// Selected revenue range and its tracking mode.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RangeState {
    mode: RangeMode,
    selected: RevenueRange,
}

impl RangeState {
    pub fn new(bounds: RevenueRange) -> Self {
        Self {
            mode: RangeMode::Auto,
            selected: bounds,
        }
    }

    pub fn mode(&self) -> RangeMode {
        self.mode
    }

    pub fn selected(&self) -> RevenueRange {
        self.selected
    }

    /// Follows freshly computed bounds.
    pub fn on_bounds(&mut self, bounds: RevenueRange) {
        self.selected = match self.mode {
            RangeMode::Auto => bounds,
            RangeMode::Manual => self.selected.intersect(&bounds).unwrap_or(bounds),
        };
    }

    pub fn set_min(&mut self, min: f64) {
        self.set_range(RevenueRange::new(min, self.selected.max));
    }

    pub fn set_max(&mut self, max: f64) {
        self.set_range(RevenueRange::new(self.selected.min, max));
    }

    /// Slider edit.
    pub fn set_range(&mut self, range: RevenueRange) {
        self.mode = RangeMode::Manual;
        self.selected = range;
    }

    /// Filters were reset.
    pub fn reset(&mut self, bounds: RevenueRange) {
        *self = Self::new(bounds);
    }

    /// A saved filter set was loaded.
    pub fn load_saved(&mut self, range: Option<RevenueRange>, bounds: RevenueRange) {
        self.mode = RangeMode::Auto;
        self.selected = range.unwrap_or(bounds);
    }

    /// Writes the selection as the revenue constraint. In auto mode the
    /// selection equals the tracked bounds, so every positive revenue in
    /// scope passes and the null revenue policy still applies.
    pub fn apply_to(&self, spec: &mut FilterSpec) {
        spec.account_revenue_range = Some(self.selected);
    }
}

impl Default for RangeState {
    fn default() -> Self {
        Self::new(RevenueRange::DEFAULT)
    }
}
