//! TradingView scanner request/response types

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

use crate::Interval;

/// Indicator columns requested for every symbol
pub const DEFAULT_INDICATORS: &[&str] = &[
    "open", "high", "low", "close", "volume", "change", "RSI", "RSI[1]", "ATR", "EMA20", "EMA50",
];

/// Scanner column name for an indicator at an interval, e.g. `RSI|240`
pub fn column_name(indicator: &str, interval: Interval) -> String {
    format!("{}{}", indicator, interval.column_suffix())
}

/// Body of a `POST /{screener}/scan` request
#[derive(Debug, Clone, Serialize)]
pub struct ScanRequest {
    pub symbols: ScanSymbols,
    pub columns: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScanSymbols {
    pub tickers: Vec<String>,
    pub query: ScanQuery,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ScanQuery {
    pub types: Vec<String>,
}

impl ScanRequest {
    pub fn new(tickers: Vec<String>, indicators: &[&str], interval: Interval) -> Self {
        ScanRequest {
            symbols: ScanSymbols {
                tickers,
                query: ScanQuery::default(),
            },
            columns: indicators
                .iter()
                .map(|name| column_name(name, interval))
                .collect(),
        }
    }
}

/// Scanner response: one row per ticker found
#[derive(Debug, Clone, Deserialize)]
pub struct ScanResponse {
    #[serde(default)]
    pub data: Vec<ScanRow>,
    #[serde(rename = "totalCount", default)]
    pub total_count: usize,
}

/// `s` is the exchange-qualified ticker, `d` the column values in request order
#[derive(Debug, Clone, Deserialize)]
pub struct ScanRow {
    pub s: String,
    pub d: Vec<Value>,
}

/// Raw indicator values for one symbol, keyed by indicator name
///
/// Values are kept as JSON so that a `null` (absent) reading can be told
/// apart from a non-numeric one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawIndicators {
    values: HashMap<String, Value>,
}

impl RawIndicators {
    pub fn new() -> Self {
        Self::default()
    }

    /// Zip the requested indicator names with a row's values
    ///
    /// Nulls are dropped, so a missing reading is simply absent.
    pub fn from_row(indicators: &[&str], row: &ScanRow) -> Self {
        let values = indicators
            .iter()
            .zip(row.d.iter())
            .filter(|(_, value)| !value.is_null())
            .map(|(name, value)| (name.to_string(), value.clone()))
            .collect();
        RawIndicators { values }
    }

    pub fn insert(&mut self, name: impl Into<String>, value: Value) {
        self.values.insert(name.into(), value);
    }

    /// Builder-style insert of a numeric reading (used by tests and fixtures)
    pub fn with(mut self, name: &str, value: f64) -> Self {
        self.insert(name, serde_json::json!(value));
        self
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Numeric reading, `None` when absent or not a number
    pub fn number(&self, name: &str) -> Option<f64> {
        self.values.get(name).and_then(Value::as_f64)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_names_carry_interval_suffix() {
        assert_eq!(column_name("RSI", Interval::FourHours), "RSI|240");
        assert_eq!(column_name("close", Interval::OneDay), "close");
    }

    #[test]
    fn test_request_serialization() {
        let request = ScanRequest::new(
            vec!["BYBIT:BTCUSDT.P".to_string()],
            &["RSI", "close"],
            Interval::FourHours,
        );
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["symbols"]["tickers"][0], "BYBIT:BTCUSDT.P");
        assert_eq!(json["symbols"]["query"]["types"], serde_json::json!([]));
        assert_eq!(json["columns"], serde_json::json!(["RSI|240", "close|240"]));
    }

    #[test]
    fn test_row_parsing_drops_nulls() {
        let body = r#"{"totalCount":1,"data":[{"s":"BYBIT:CKBUSDT.P","d":[0.0125,null,"n/a"]}]}"#;
        let response: ScanResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.total_count, 1);

        let raw = RawIndicators::from_row(&["close", "RSI", "change"], &response.data[0]);
        assert_eq!(raw.number("close"), Some(0.0125));
        assert!(raw.get("RSI").is_none());
        assert!(raw.get("change").is_some());
        assert_eq!(raw.number("change"), None);
    }

    #[test]
    fn test_empty_response() {
        let response: ScanResponse = serde_json::from_str(r#"{"totalCount":0,"data":[]}"#).unwrap();
        assert!(response.data.is_empty());
    }
}
