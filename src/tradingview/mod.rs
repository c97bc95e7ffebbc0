//! TradingView scanner client for per-symbol indicator snapshots
//! No API key needed for the public scanner endpoint.

mod client;
mod types;

pub use client::{parse_scan_response, IndicatorSource, ScannerClient, SCANNER_API_BASE};
pub use types::*;
