//! Classic floor-trader pivot points

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::StrategyError;

/// Seven-level pivot ladder derived from one high/low/close triple
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PivotLevels {
    pub pivot: Decimal,
    pub r1: Decimal,
    pub r2: Decimal,
    pub r3: Decimal,
    pub s1: Decimal,
    pub s2: Decimal,
    pub s3: Decimal,
}

impl PivotLevels {
    /// Calculate the ladder
    ///
    /// ```text
    /// pivot = (high + low + close) / 3
    /// r1 = 2*pivot - low          s1 = 2*pivot - high
    /// r2 = pivot + (high - low)   s2 = pivot - (high - low)
    /// r3 = high + 2*(pivot - low) s3 = low - 2*(high - pivot)
    /// ```
    ///
    /// Fails with [`StrategyError::Overflow`] when a level leaves the decimal range.
    pub fn calculate(high: Decimal, low: Decimal, close: Decimal) -> Result<Self, StrategyError> {
        let pivot = div(add(add(high, low)?, close)?, dec!(3))?;
        let range = sub(high, low)?;
        let twice_pivot = mul(dec!(2), pivot)?;

        Ok(PivotLevels {
            pivot,
            r1: sub(twice_pivot, low)?,
            s1: sub(twice_pivot, high)?,
            r2: add(pivot, range)?,
            s2: sub(pivot, range)?,
            r3: add(high, mul(dec!(2), sub(pivot, low)?)?)?,
            s3: sub(low, mul(dec!(2), sub(high, pivot)?)?)?,
        })
    }

    /// Levels from lowest to highest: S3, S2, S1, P, R1, R2, R3
    pub fn ladder(&self) -> [(&'static str, Decimal); 7] {
        [
            ("S3", self.s3),
            ("S2", self.s2),
            ("S1", self.s1),
            ("Pivot", self.pivot),
            ("R1", self.r1),
            ("R2", self.r2),
            ("R3", self.r3),
        ]
    }

    /// `s3 <= s2 <= s1 <= pivot <= r1 <= r2 <= r3`
    ///
    /// Holds whenever the close lies inside `[low, high]`.
    pub fn is_monotonic(&self) -> bool {
        self.ladder().windows(2).all(|w| w[0].1 <= w[1].1)
    }
}

fn add(a: Decimal, b: Decimal) -> Result<Decimal, StrategyError> {
    a.checked_add(b).ok_or(StrategyError::overflow("pivots"))
}

fn sub(a: Decimal, b: Decimal) -> Result<Decimal, StrategyError> {
    a.checked_sub(b).ok_or(StrategyError::overflow("pivots"))
}

fn mul(a: Decimal, b: Decimal) -> Result<Decimal, StrategyError> {
    a.checked_mul(b).ok_or(StrategyError::overflow("pivots"))
}

fn div(a: Decimal, b: Decimal) -> Result<Decimal, StrategyError> {
    a.checked_div(b).ok_or(StrategyError::overflow("pivots"))
}
