//! Snapshot normalizer
//!
//! Converts raw floating-point indicator readings into [`IndicatorSnapshot`]
//! decimals. Every float goes through its shortest round-trip string form
//! before being parsed, so `0.1` becomes exactly `0.1` rather than the
//! binary expansion `0.1000000000000000055511151231...`.

use rust_decimal::Decimal;
use serde_json::Value;
use std::str::FromStr;

use crate::error::StrategyError;
use crate::tradingview::RawIndicators;
use crate::IndicatorSnapshot;

/// Largest scale a `Decimal` can carry
const MAX_DECIMAL_PLACES: usize = 28;

/// Convert a float to a decimal via its shortest round-trip representation
///
/// Readings that would lose digits past the decimal's scale are rejected
/// rather than rounded.
pub fn decimal_from_f64(value: f64) -> Result<Decimal, String> {
    if !value.is_finite() {
        return Err(format!("{} is not a finite number", value));
    }
    // f64's Display is the shortest string that parses back to the same value
    let repr = value.to_string();
    let places = repr.split_once('.').map_or(0, |(_, fraction)| fraction.len());
    if places > MAX_DECIMAL_PLACES {
        return Err(format!(
            "{} needs {} decimal places, more than the {} a decimal can hold",
            repr, places, MAX_DECIMAL_PLACES
        ));
    }
    Decimal::from_str(&repr).map_err(|e| format!("{} ({})", repr, e))
}

/// Convert one named raw field
pub fn field_to_decimal(raw: &RawIndicators, field: &str) -> Result<Decimal, StrategyError> {
    match raw.get(field) {
        None | Some(Value::Null) => Err(StrategyError::conversion(field, "field is missing")),
        Some(Value::Number(n)) => {
            let value = n
                .as_f64()
                .ok_or_else(|| StrategyError::conversion(field, format!("{} is not numeric", n)))?;
            decimal_from_f64(value).map_err(|reason| StrategyError::conversion(field, reason))
        }
        Some(other) => Err(StrategyError::conversion(
            field,
            format!("{} is not numeric", other),
        )),
    }
}

/// Build a validated snapshot from the `high`, `low`, `close` and `volume` readings
///
/// `open` is optional; when the scanner returned it, it must convert cleanly.
pub fn normalize_snapshot(raw: &RawIndicators) -> Result<IndicatorSnapshot, StrategyError> {
    let high = field_to_decimal(raw, "high")?;
    let low = field_to_decimal(raw, "low")?;
    let close = field_to_decimal(raw, "close")?;
    let volume = field_to_decimal(raw, "volume")?;

    let snapshot = IndicatorSnapshot::new(high, low, close, volume)?;
    match raw.get("open") {
        None | Some(Value::Null) => Ok(snapshot),
        Some(_) => snapshot.with_open(field_to_decimal(raw, "open")?),
    }
}
