//! Directional recommendation from the price's distance to R1 and S1

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::StrategyError;

/// Default minimum distance (percent) to the far pivot
pub const DEFAULT_FAR_THRESHOLD: Decimal = dec!(4.5);

/// Default maximum distance (percent) to the near pivot
pub const DEFAULT_NEAR_THRESHOLD: Decimal = dec!(3.0);

/// Directional call for a grid bot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Recommendation {
    Long,
    Short,
    Neutral,
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Recommendation::Long => write!(f, "LONG"),
            Recommendation::Short => write!(f, "SHORT"),
            Recommendation::Neutral => write!(f, "NEUTRAL"),
        }
    }
}

/// Percentage thresholds for a directional call
///
/// LONG needs the price more than `far` percent below R1 and less than
/// `near` percent above S1; SHORT is the mirror image. Both comparisons are
/// strict, so a distance exactly on a threshold falls through to NEUTRAL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendationThresholds {
    pub far: Decimal,
    pub near: Decimal,
}

impl Default for RecommendationThresholds {
    fn default() -> Self {
        RecommendationThresholds {
            far: DEFAULT_FAR_THRESHOLD,
            near: DEFAULT_NEAR_THRESHOLD,
        }
    }
}

/// Distance from the current price to R1 and S1, in percent of the price
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PivotDistances {
    pub to_r1_pct: Decimal,
    pub to_s1_pct: Decimal,
}

impl PivotDistances {
    pub fn calculate(
        current_price: Decimal,
        r1: Decimal,
        s1: Decimal,
    ) -> Result<Self, StrategyError> {
        if current_price <= Decimal::ZERO {
            return Err(StrategyError::InvalidPrice(current_price));
        }

        let pct = |distance: Option<Decimal>| {
            distance
                .and_then(|d| d.checked_div(current_price))
                .and_then(|d| d.checked_mul(dec!(100)))
                .ok_or(StrategyError::overflow("pivot distances"))
        };

        Ok(PivotDistances {
            to_r1_pct: pct(r1.checked_sub(current_price))?,
            to_s1_pct: pct(current_price.checked_sub(s1))?,
        })
    }

    pub fn classify(&self, thresholds: &RecommendationThresholds) -> Recommendation {
        if self.to_r1_pct > thresholds.far && self.to_s1_pct < thresholds.near {
            Recommendation::Long
        } else if self.to_s1_pct > thresholds.far && self.to_r1_pct < thresholds.near {
            Recommendation::Short
        } else {
            Recommendation::Neutral
        }
    }
}

/// Classify the current price against R1/S1
pub fn recommend(
    current_price: Decimal,
    r1: Decimal,
    s1: Decimal,
    thresholds: &RecommendationThresholds,
) -> Result<Recommendation, StrategyError> {
    Ok(PivotDistances::calculate(current_price, r1, s1)?.classify(thresholds))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(price: Decimal, r1: Decimal, s1: Decimal) -> Recommendation {
        recommend(price, r1, s1, &RecommendationThresholds::default()).unwrap()
    }

    #[test]
    fn test_long_example() {
        let d = PivotDistances::calculate(dec!(100), dec!(106), dec!(99)).unwrap();
        assert_eq!(d.to_r1_pct, dec!(6));
        assert_eq!(d.to_s1_pct, dec!(1));
        assert_eq!(rec(dec!(100), dec!(106), dec!(99)), Recommendation::Long);
    }

    #[test]
    fn test_short_mirror() {
        assert_eq!(rec(dec!(100), dec!(101), dec!(94)), Recommendation::Short);
    }

    #[test]
    fn test_neutral_when_both_far() {
        assert_eq!(rec(dec!(100), dec!(110), dec!(90)), Recommendation::Neutral);
    }

    #[test]
    fn test_far_threshold_is_exclusive() {
        // distance_to_r1 exactly 4.5
        assert_eq!(rec(dec!(100), dec!(104.5), dec!(99)), Recommendation::Neutral);
        assert_eq!(rec(dec!(100), dec!(104.51), dec!(99)), Recommendation::Long);
        // distance_to_s1 exactly 4.5
        assert_eq!(rec(dec!(100), dec!(101), dec!(95.5)), Recommendation::Neutral);
    }

    #[test]
    fn test_near_threshold_is_exclusive() {
        // distance_to_s1 exactly 3.0
        assert_eq!(rec(dec!(100), dec!(106), dec!(97)), Recommendation::Neutral);
        assert_eq!(rec(dec!(100), dec!(106), dec!(97.01)), Recommendation::Long);
        // distance_to_r1 exactly 3.0
        assert_eq!(rec(dec!(100), dec!(103), dec!(94)), Recommendation::Neutral);
    }

    #[test]
    fn test_custom_thresholds() {
        let loose = RecommendationThresholds {
            far: dec!(2),
            near: dec!(5),
        };
        let r = recommend(dec!(100), dec!(103), dec!(96), &loose).unwrap();
        assert_eq!(r, Recommendation::Long);
    }

    #[test]
    fn test_non_positive_price() {
        let t = RecommendationThresholds::default();
        assert_eq!(
            recommend(Decimal::ZERO, dec!(1), dec!(1), &t),
            Err(StrategyError::InvalidPrice(Decimal::ZERO))
        );
        assert!(recommend(dec!(-5), dec!(1), dec!(1), &t).is_err());
    }

    #[test]
    fn test_distance_overflow_is_an_error() {
        let tiny = dec!(0.0000000000000001);
        assert_eq!(
            PivotDistances::calculate(tiny, Decimal::MAX / dec!(2), Decimal::ZERO),
            Err(StrategyError::Overflow {
                stage: "pivot distances"
            })
        );
    }

    #[test]
    fn test_display_and_serde() {
        assert_eq!(Recommendation::Long.to_string(), "LONG");
        assert_eq!(
            serde_json::to_string(&Recommendation::Neutral).unwrap(),
            "\"NEUTRAL\""
        );
    }
}
