//! Grid strategy pipeline
//!
//! snapshot -> weighted ATR -> pivots -> recommendation -> grid schedule.
//! Every stage is a pure function; nothing here logs or performs I/O.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::slice;

use crate::config::StrategyConfig;
use crate::error::StrategyError;
use crate::grid::{grid_profit_pct, optimize_grid_settings, GridLevel, GridSchedule};
use crate::indicators::weighted_atr;
use crate::pivots::PivotLevels;
use crate::recommendation::{PivotDistances, Recommendation};
use crate::{IndicatorSnapshot, OhlcvBar};

/// Everything derived from one snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridStrategy {
    pub current_price: Decimal,
    pub pivots: PivotLevels,
    pub atr: Decimal,
    pub distances: PivotDistances,
    pub recommendation: Recommendation,
    pub grid: GridSchedule,
    pub grid_profit_pct: Decimal,
}

impl GridStrategy {
    /// Ladder rungs for display
    pub fn levels(&self) -> Vec<GridLevel> {
        self.grid.levels(self.recommendation, self.current_price)
    }
}

/// Run the full pipeline on one snapshot
///
/// The close is used as the current price. The ATR is the volume-weighted
/// true range of the snapshot treated as a single bar, which is its
/// `high - low`.
pub fn compute_grid_strategy(
    snapshot: &IndicatorSnapshot,
    config: &StrategyConfig,
) -> Result<GridStrategy, StrategyError> {
    config.validate()?;
    snapshot.validate()?;

    let current_price = snapshot.close;
    let pivots = PivotLevels::calculate(snapshot.high, snapshot.low, snapshot.close)?;

    let bar = OhlcvBar::from(snapshot);
    let atr = weighted_atr([slice::from_ref(&bar)])?;

    let distances = PivotDistances::calculate(current_price, pivots.r1, pivots.s1)?;
    let recommendation = distances.classify(&config.thresholds());

    let grid = optimize_grid_settings(
        current_price,
        atr,
        recommendation,
        pivots.s1,
        pivots.r1,
        config.num_grids,
    )?;
    let grid_profit_pct = grid_profit_pct(grid.grid_size, current_price)?;

    Ok(GridStrategy {
        current_price,
        pivots,
        atr,
        distances,
        recommendation,
        grid,
        grid_profit_pct,
    })
}
