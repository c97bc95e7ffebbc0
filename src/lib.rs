//! Maverick Book
//!
//! Grid bot settings from classic pivot points and a volume-weighted ATR,
//! plus a concurrent RSI screener for crypto perpetual futures.
//!
//! The grid pipeline is pure and works on fixed-precision decimals:
//!
//! ```
//! use maverick_book::{compute_grid_strategy, config::StrategyConfig, IndicatorSnapshot, Recommendation};
//! use rust_decimal_macros::dec;
//!
//! let snapshot = IndicatorSnapshot::new(dec!(108), dec!(100), dec!(100), dec!(250)).unwrap();
//! let strategy = compute_grid_strategy(&snapshot, &StrategyConfig::default()).unwrap();
//! assert_eq!(strategy.recommendation, Recommendation::Long);
//! assert_eq!(strategy.grid.grid_size, dec!(4));
//! ```

pub mod config;
pub mod error;
pub mod grid;
pub mod indicators;
pub mod normalize;
pub mod pivots;
pub mod recommendation;
pub mod screener;
pub mod strategy;
pub mod tradingview;
pub mod types;

pub use config::Config;
pub use error::{FetchError, StrategyError};
pub use grid::{GridLevel, GridSchedule};
pub use normalize::normalize_snapshot;
pub use pivots::PivotLevels;
pub use recommendation::{Recommendation, RecommendationThresholds};
pub use strategy::{compute_grid_strategy, GridStrategy};
pub use types::*;
