//! Grid schedule optimizer
//!
//! Turns a directional call, an ATR reading and the S1/R1 band into concrete
//! grid-bot settings. Entry and exit are clamped to the pivot band so that no
//! grid order sits beyond the recommended support/resistance. The stop-loss
//! is a flat 5% from entry in the adverse direction, independent of ATR.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::StrategyError;
use crate::Recommendation;

/// Default number of grid rungs
pub const DEFAULT_NUM_GRIDS: u32 = 10;

/// Grid spacing as a fraction of ATR
const GRID_SIZE_ATR_FRACTION: Decimal = dec!(0.5);

const LONG_STOP_FACTOR: Decimal = dec!(0.95);
const SHORT_STOP_FACTOR: Decimal = dec!(1.05);

/// Concrete grid-bot settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridSchedule {
    pub grid_size: Decimal,
    pub num_grids: u32,
    pub entry_point: Decimal,
    pub exit_point: Decimal,
    pub stop_loss: Decimal,
    pub take_profit: Decimal,
}

/// One rung of the grid ladder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridLevel {
    /// 1-based rung number, counted from the entry point
    pub index: u32,
    pub price: Decimal,
    /// Rung lies on the profitable side of the current price
    pub in_profit_zone: bool,
}

/// Compute grid settings for a recommendation
///
/// ```text
/// grid_size = atr * 0.5
/// half_span = (num_grids / 2) * grid_size
/// LONG:    entry = max(price - half_span, s1), exit = min(price + half_span, r1), stop = entry * 0.95
/// SHORT:   entry = min(price + half_span, r1), exit = max(price - half_span, s1), stop = entry * 1.05
/// NEUTRAL: entry = exit = price, stop = entry * 0.95
/// take_profit = exit
/// ```
pub fn optimize_grid_settings(
    current_price: Decimal,
    atr: Decimal,
    recommendation: Recommendation,
    s1: Decimal,
    r1: Decimal,
    num_grids: u32,
) -> Result<GridSchedule, StrategyError> {
    if current_price <= Decimal::ZERO {
        return Err(StrategyError::InvalidInput {
            name: "current_price",
            value: current_price,
        });
    }
    if num_grids == 0 {
        return Err(StrategyError::InvalidInput {
            name: "num_grids",
            value: Decimal::ZERO,
        });
    }

    let overflow = || StrategyError::overflow("grid");

    let grid_size = atr
        .checked_mul(GRID_SIZE_ATR_FRACTION)
        .ok_or_else(overflow)?;
    if grid_size <= Decimal::ZERO {
        return Err(StrategyError::InvalidInput {
            name: "grid_size",
            value: grid_size,
        });
    }

    let half_span = (Decimal::from(num_grids) / dec!(2))
        .checked_mul(grid_size)
        .ok_or_else(overflow)?;
    let below = current_price.checked_sub(half_span).ok_or_else(overflow)?;
    let above = current_price.checked_add(half_span).ok_or_else(overflow)?;

    let (entry_point, exit_point, stop_factor) = match recommendation {
        Recommendation::Long => (below.max(s1), above.min(r1), LONG_STOP_FACTOR),
        Recommendation::Short => (above.min(r1), below.max(s1), SHORT_STOP_FACTOR),
        // No directional bias, yet the long-side stop is applied as-is
        Recommendation::Neutral => (current_price, current_price, LONG_STOP_FACTOR),
    };
    let stop_loss = entry_point.checked_mul(stop_factor).ok_or_else(overflow)?;

    Ok(GridSchedule {
        grid_size,
        num_grids,
        entry_point,
        exit_point,
        stop_loss,
        take_profit: exit_point,
    })
}

/// Expected capture per rung, in percent of the current price
pub fn grid_profit_pct(grid_size: Decimal, current_price: Decimal) -> Result<Decimal, StrategyError> {
    if current_price <= Decimal::ZERO {
        return Err(StrategyError::InvalidPrice(current_price));
    }
    grid_size
        .checked_div(current_price)
        .and_then(|ratio| ratio.checked_mul(dec!(100)))
        .ok_or(StrategyError::overflow("grid profit"))
}

impl GridSchedule {
    /// Rungs stepped from the entry point toward the exit point
    ///
    /// LONG steps upward and SHORT downward, stopping at the exit point or
    /// after `num_grids` rungs. NEUTRAL has no ladder.
    pub fn levels(&self, recommendation: Recommendation, current_price: Decimal) -> Vec<GridLevel> {
        let step = match recommendation {
            Recommendation::Long => self.grid_size,
            Recommendation::Short => -self.grid_size,
            Recommendation::Neutral => return Vec::new(),
        };

        (0..self.num_grids)
            .map_while(|i| {
                let offset = Decimal::from(i).checked_mul(step)?;
                Some((i, self.entry_point.checked_add(offset)?))
            })
            .take_while(|(_, price)| match recommendation {
                Recommendation::Long => *price <= self.exit_point,
                _ => *price >= self.exit_point,
            })
            .map(|(i, price)| GridLevel {
                index: i + 1,
                price,
                in_profit_zone: match recommendation {
                    Recommendation::Long => price > current_price,
                    _ => price < current_price,
                },
            })
            .collect()
    }

    /// Width of the traded band
    pub fn span(&self) -> Decimal {
        (self.exit_point - self.entry_point).abs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_long_example() {
        let g = optimize_grid_settings(
            dec!(100),
            dec!(4),
            Recommendation::Long,
            dec!(99),
            dec!(106),
            10,
        )
        .unwrap();

        assert_eq!(g.grid_size, dec!(2));
        assert_eq!(g.num_grids, 10);
        assert_eq!(g.entry_point, dec!(99));
        assert_eq!(g.exit_point, dec!(106));
        assert_eq!(g.stop_loss, dec!(94.05));
        assert_eq!(g.take_profit, dec!(106));
        assert_eq!(g.span(), dec!(7));
    }

    #[test]
    fn test_long_unclamped_when_band_is_wide() {
        let g = optimize_grid_settings(
            dec!(100),
            dec!(1),
            Recommendation::Long,
            dec!(90),
            dec!(120),
            10,
        )
        .unwrap();
        // half_span = 5 * 0.5 = 2.5
        assert_eq!(g.entry_point, dec!(97.5));
        assert_eq!(g.exit_point, dec!(102.5));
    }

    #[test]
    fn test_short_clamped_to_band() {
        let g = optimize_grid_settings(
            dec!(100),
            dec!(4),
            Recommendation::Short,
            dec!(94),
            dec!(101),
            10,
        )
        .unwrap();

        assert_eq!(g.entry_point, dec!(101));
        assert_eq!(g.exit_point, dec!(94));
        assert_eq!(g.stop_loss, dec!(106.05));
        assert_eq!(g.take_profit, g.exit_point);
    }

    #[test]
    fn test_neutral_stop_loss_quirk() {
        let g = optimize_grid_settings(
            dec!(100),
            dec!(4),
            Recommendation::Neutral,
            dec!(90),
            dec!(110),
            10,
        )
        .unwrap();

        assert_eq!(g.entry_point, dec!(100));
        assert_eq!(g.exit_point, dec!(100));
        assert_eq!(g.take_profit, dec!(100));
        // Long-side 5% stop even though there is no direction
        assert_eq!(g.stop_loss, dec!(95));
    }

    #[test]
    fn test_clamping_bounds_hold() {
        let prices = [dec!(0.5), dec!(50), dec!(100), dec!(1000)];
        let atrs = [dec!(0.01), dec!(1), dec!(40)];

        for price in prices {
            for atr in atrs {
                let s1 = price * dec!(0.97);
                let r1 = price * dec!(1.06);

                let long =
                    optimize_grid_settings(price, atr, Recommendation::Long, s1, r1, 10).unwrap();
                assert!(long.entry_point >= s1);
                assert!(long.exit_point <= r1);

                let short =
                    optimize_grid_settings(price, atr, Recommendation::Short, s1, r1, 10).unwrap();
                assert!(short.entry_point <= r1);
                assert!(short.exit_point >= s1);
            }
        }
    }

    #[test]
    fn test_num_grids_is_configurable() {
        let g = optimize_grid_settings(
            dec!(100),
            dec!(1),
            Recommendation::Long,
            dec!(80),
            dec!(120),
            20,
        )
        .unwrap();
        // half_span = 10 * 0.5 = 5
        assert_eq!(g.num_grids, 20);
        assert_eq!(g.entry_point, dec!(95));
        assert_eq!(g.exit_point, dec!(105));
    }

    #[test]
    fn test_invalid_inputs() {
        let zero_atr =
            optimize_grid_settings(dec!(100), dec!(0), Recommendation::Long, dec!(99), dec!(106), 10);
        assert!(matches!(
            zero_atr,
            Err(StrategyError::InvalidInput { name: "grid_size", .. })
        ));

        let bad_price =
            optimize_grid_settings(dec!(0), dec!(4), Recommendation::Long, dec!(99), dec!(106), 10);
        assert!(matches!(
            bad_price,
            Err(StrategyError::InvalidInput { name: "current_price", .. })
        ));

        let no_grids =
            optimize_grid_settings(dec!(100), dec!(4), Recommendation::Long, dec!(99), dec!(106), 0);
        assert!(matches!(
            no_grids,
            Err(StrategyError::InvalidInput { name: "num_grids", .. })
        ));
    }

    #[test]
    fn test_half_span_overflow_is_an_error() {
        let g = optimize_grid_settings(
            dec!(100),
            Decimal::MAX,
            Recommendation::Long,
            dec!(99),
            dec!(106),
            10,
        );
        assert_eq!(g, Err(StrategyError::Overflow { stage: "grid" }));
    }

    #[test]
    fn test_grid_profit_pct() {
        assert_eq!(grid_profit_pct(dec!(2), dec!(100)).unwrap(), dec!(2));
        assert_eq!(grid_profit_pct(dec!(0.00005), dec!(0.0125)).unwrap(), dec!(0.4));
        assert!(grid_profit_pct(dec!(2), dec!(0)).is_err());
        assert_eq!(
            grid_profit_pct(Decimal::MAX / dec!(2), dec!(0.0000000000000001)),
            Err(StrategyError::Overflow {
                stage: "grid profit"
            })
        );
    }

    #[test]
    fn test_long_levels_stop_at_exit() {
        let g = optimize_grid_settings(
            dec!(100),
            dec!(4),
            Recommendation::Long,
            dec!(99),
            dec!(106),
            10,
        )
        .unwrap();
        let levels = g.levels(Recommendation::Long, dec!(100));

        let prices: Vec<Decimal> = levels.iter().map(|l| l.price).collect();
        assert_eq!(prices, vec![dec!(99), dec!(101), dec!(103), dec!(105)]);
        assert_eq!(levels[0].index, 1);
        assert!(!levels[0].in_profit_zone);
        assert!(levels[1].in_profit_zone);
    }

    #[test]
    fn test_short_levels_step_down() {
        let g = optimize_grid_settings(
            dec!(100),
            dec!(4),
            Recommendation::Short,
            dec!(94),
            dec!(101),
            10,
        )
        .unwrap();
        let prices: Vec<Decimal> = g
            .levels(Recommendation::Short, dec!(100))
            .iter()
            .map(|l| l.price)
            .collect();
        assert_eq!(prices, vec![dec!(101), dec!(99), dec!(97), dec!(95)]);
    }

    #[test]
    fn test_levels_capped_by_num_grids() {
        let g = optimize_grid_settings(
            dec!(100),
            dec!(0.2),
            Recommendation::Long,
            dec!(50),
            dec!(150),
            4,
        )
        .unwrap();
        // grid_size 0.1, half_span 0.2: entry 99.8, exit 100.2
        let levels = g.levels(Recommendation::Long, dec!(100));
        assert_eq!(levels.len(), 4);
        assert_eq!(levels[3].price, dec!(100.1));
        assert!(g.levels(Recommendation::Neutral, dec!(100)).is_empty());
    }
}
