//! Core data types shared by the grid optimizer and the screener

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::StrategyError;

/// Trading symbol using Arc<str> for cheap cloning
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Symbol(#[serde(with = "arc_str_serde")] std::sync::Arc<str>);

mod arc_str_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::sync::Arc;

    pub fn serialize<S>(value: &Arc<str>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(value)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Arc<str>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(Arc::from(s.trim()))
    }
}

impl Symbol {
    pub fn new(s: impl AsRef<str>) -> Self {
        Symbol(std::sync::Arc::from(s.as_ref().trim()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Exchange-qualified ticker as the scanner expects it, e.g. `BYBIT:BTCUSDT.P`
    pub fn ticker(&self, exchange: &str) -> String {
        format!("{}:{}", exchange.to_uppercase(), self.0)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Symbol {
    fn from(s: &str) -> Self {
        Symbol::new(s)
    }
}

/// Candle interval supported by the indicator scanner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Interval {
    #[serde(rename = "1m")]
    OneMinute,
    #[serde(rename = "5m")]
    FiveMinutes,
    #[serde(rename = "15m")]
    FifteenMinutes,
    #[serde(rename = "30m")]
    ThirtyMinutes,
    #[serde(rename = "1h")]
    OneHour,
    #[serde(rename = "2h")]
    TwoHours,
    #[serde(rename = "4h")]
    FourHours,
    #[serde(rename = "1d")]
    OneDay,
    #[serde(rename = "1W")]
    OneWeek,
    #[serde(rename = "1M")]
    OneMonth,
}

/// Valid interval strings, in ascending order
pub const INTERVALS: &[&str] = &["1m", "5m", "15m", "30m", "1h", "2h", "4h", "1d", "1W", "1M"];

impl Interval {
    pub fn as_str(self) -> &'static str {
        match self {
            Interval::OneMinute => "1m",
            Interval::FiveMinutes => "5m",
            Interval::FifteenMinutes => "15m",
            Interval::ThirtyMinutes => "30m",
            Interval::OneHour => "1h",
            Interval::TwoHours => "2h",
            Interval::FourHours => "4h",
            Interval::OneDay => "1d",
            Interval::OneWeek => "1W",
            Interval::OneMonth => "1M",
        }
    }

    /// Column suffix the scanner uses for this interval (daily has none)
    pub fn column_suffix(self) -> &'static str {
        match self {
            Interval::OneMinute => "|1",
            Interval::FiveMinutes => "|5",
            Interval::FifteenMinutes => "|15",
            Interval::ThirtyMinutes => "|30",
            Interval::OneHour => "|60",
            Interval::TwoHours => "|120",
            Interval::FourHours => "|240",
            Interval::OneDay => "",
            Interval::OneWeek => "|1W",
            Interval::OneMonth => "|1M",
        }
    }
}

impl FromStr for Interval {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // "1m" and "1M" differ only by case, so match exactly first
        match s.trim() {
            "1m" => Ok(Interval::OneMinute),
            "1M" => Ok(Interval::OneMonth),
            other => match other.to_lowercase().as_str() {
                "5m" => Ok(Interval::FiveMinutes),
                "15m" => Ok(Interval::FifteenMinutes),
                "30m" => Ok(Interval::ThirtyMinutes),
                "1h" | "60m" => Ok(Interval::OneHour),
                "2h" => Ok(Interval::TwoHours),
                "4h" => Ok(Interval::FourHours),
                "1d" => Ok(Interval::OneDay),
                "1w" => Ok(Interval::OneWeek),
                _ => Err(format!(
                    "Unknown interval: {}. Use one of {}",
                    s,
                    INTERVALS.join(", ")
                )),
            },
        }
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One point-in-time indicator read for a symbol, in fixed-precision decimals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndicatorSnapshot {
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
    pub volume: Decimal,
    /// Opening price, when the scanner reported one
    #[serde(default)]
    pub open: Option<Decimal>,
}

impl IndicatorSnapshot {
    /// Create a snapshot with validation
    pub fn new(
        high: Decimal,
        low: Decimal,
        close: Decimal,
        volume: Decimal,
    ) -> Result<Self, StrategyError> {
        let snapshot = Self {
            high,
            low,
            close,
            volume,
            open: None,
        };
        snapshot.validate()?;
        Ok(snapshot)
    }

    /// Attach the opening price, re-validating the snapshot
    pub fn with_open(mut self, open: Decimal) -> Result<Self, StrategyError> {
        self.open = Some(open);
        self.validate()?;
        Ok(self)
    }

    /// Check `high >= low` and that no field, `open` included, is negative
    pub fn validate(&self) -> Result<(), StrategyError> {
        let open = self.open.unwrap_or_default();
        for (name, value) in [
            ("high", self.high),
            ("low", self.low),
            ("close", self.close),
            ("volume", self.volume),
            ("open", open),
        ] {
            if value.is_sign_negative() && !value.is_zero() {
                return Err(StrategyError::InvalidInput { name, value });
            }
        }

        if self.high < self.low {
            return Err(StrategyError::InvalidInput {
                name: "high - low",
                value: self.high - self.low,
            });
        }

        Ok(())
    }
}

/// OHLCV bar used for true-range calculations
///
/// Bars are passed as slices ordered oldest to newest; the slice position is
/// the only ordering key needed for the previous-close lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OhlcvBar {
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
    pub volume: Decimal,
}

impl From<&IndicatorSnapshot> for OhlcvBar {
    fn from(s: &IndicatorSnapshot) -> Self {
        OhlcvBar {
            high: s.high,
            low: s.low,
            close: s.close,
            volume: s.volume,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_interval_parsing() {
        assert_eq!("1d".parse::<Interval>().unwrap(), Interval::OneDay);
        assert_eq!("4H".parse::<Interval>().unwrap(), Interval::FourHours);
        assert_eq!("1m".parse::<Interval>().unwrap(), Interval::OneMinute);
        assert_eq!("1M".parse::<Interval>().unwrap(), Interval::OneMonth);
        assert_eq!("1w".parse::<Interval>().unwrap(), Interval::OneWeek);
        assert!("3d".parse::<Interval>().is_err());
    }

    #[test]
    fn test_interval_round_trips_through_display() {
        for s in INTERVALS {
            let interval: Interval = s.parse().unwrap();
            assert_eq!(interval.to_string(), *s);
        }
    }

    #[test]
    fn test_column_suffix() {
        assert_eq!(Interval::OneDay.column_suffix(), "");
        assert_eq!(Interval::FourHours.column_suffix(), "|240");
        assert_eq!(Interval::OneWeek.column_suffix(), "|1W");
    }

    #[test]
    fn test_symbol_ticker() {
        let symbol = Symbol::new(" CKBUSDT.P ");
        assert_eq!(symbol.as_str(), "CKBUSDT.P");
        assert_eq!(symbol.ticker("bybit"), "BYBIT:CKBUSDT.P");
    }

    #[test]
    fn test_snapshot_validation() {
        assert!(IndicatorSnapshot::new(dec!(110), dec!(100), dec!(105), dec!(1000)).is_ok());
        assert!(IndicatorSnapshot::new(dec!(100), dec!(100), dec!(100), dec!(0)).is_ok());

        let inverted = IndicatorSnapshot::new(dec!(99), dec!(100), dec!(100), dec!(1));
        assert!(matches!(
            inverted,
            Err(StrategyError::InvalidInput { name: "high - low", .. })
        ));

        let negative_volume = IndicatorSnapshot::new(dec!(110), dec!(100), dec!(105), dec!(-1));
        assert!(matches!(
            negative_volume,
            Err(StrategyError::InvalidInput { name: "volume", .. })
        ));
    }

    #[test]
    fn test_snapshot_open() {
        let s = IndicatorSnapshot::new(dec!(110), dec!(100), dec!(105), dec!(1)).unwrap();
        assert_eq!(s.open, None);
        assert_eq!(s.with_open(dec!(101)).unwrap().open, Some(dec!(101)));
        assert!(matches!(
            s.with_open(dec!(-1)),
            Err(StrategyError::InvalidInput { name: "open", .. })
        ));

        // snapshots serialized without an open still load
        let json = r#"{"high":"110","low":"100","close":"105","volume":"1"}"#;
        let parsed: IndicatorSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(parsed, s);
    }
}
