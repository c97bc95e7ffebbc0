//! Configuration management
//!
//! Handles loading and parsing of JSON configuration files, with `.env` /
//! environment overrides for the market data source.

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::StrategyError;
use crate::grid::DEFAULT_NUM_GRIDS;
use crate::recommendation::{
    RecommendationThresholds, DEFAULT_FAR_THRESHOLD, DEFAULT_NEAR_THRESHOLD,
};
use crate::{Interval, Symbol};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub market: MarketConfig,
    pub strategy: StrategyConfig,
    pub screener: ScreenerConfig,
}

impl Config {
    /// Load configuration from JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path.as_ref()).with_context(|| {
            format!("Failed to read config file {}", path.as_ref().display())
        })?;
        let mut config: Config =
            serde_json::from_str(&contents).context("Failed to parse config JSON")?;
        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    /// Load from `path` if given, otherwise defaults plus environment
    pub fn load(path: Option<&str>) -> Result<Self> {
        match path {
            Some(p) => Self::from_file(p),
            None => {
                let mut config = Config::default();
                config.apply_env();
                config.validate()?;
                Ok(config)
            }
        }
    }

    /// Override the market source from `MAVERICK_EXCHANGE` / `MAVERICK_SCREENER`
    pub fn apply_env(&mut self) {
        if let Ok(exchange) = std::env::var("MAVERICK_EXCHANGE") {
            self.market.exchange = exchange;
        }
        if let Ok(screener) = std::env::var("MAVERICK_SCREENER") {
            self.market.screener = screener;
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.strategy
            .validate()
            .context("Invalid 'strategy' section")?;
        self.screener.validate().context("Invalid 'screener' section")
    }
}

/// Market data source for the grid optimizer
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketConfig {
    pub exchange: String,
    pub screener: String,
    pub interval: Interval,
    pub timeout_secs: u64,
}

impl Default for MarketConfig {
    fn default() -> Self {
        MarketConfig {
            exchange: "BYBIT".to_string(),
            screener: "crypto".to_string(),
            interval: Interval::OneDay,
            timeout_secs: 30,
        }
    }
}

/// Grid strategy parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrategyConfig {
    pub num_grids: u32,
    /// Minimum percent distance to the far pivot (R1 for LONG, S1 for SHORT)
    pub long_threshold_far: Decimal,
    /// Maximum percent distance to the near pivot
    pub long_threshold_near: Decimal,
}

impl Default for StrategyConfig {
    fn default() -> Self {
        StrategyConfig {
            num_grids: DEFAULT_NUM_GRIDS,
            long_threshold_far: DEFAULT_FAR_THRESHOLD,
            long_threshold_near: DEFAULT_NEAR_THRESHOLD,
        }
    }
}

impl StrategyConfig {
    pub fn thresholds(&self) -> RecommendationThresholds {
        RecommendationThresholds {
            far: self.long_threshold_far,
            near: self.long_threshold_near,
        }
    }

    pub fn validate(&self) -> Result<(), StrategyError> {
        if self.num_grids == 0 {
            return Err(StrategyError::InvalidInput {
                name: "num_grids",
                value: Decimal::ZERO,
            });
        }
        if self.long_threshold_far <= Decimal::ZERO {
            return Err(StrategyError::InvalidInput {
                name: "long_threshold_far",
                value: self.long_threshold_far,
            });
        }
        if self.long_threshold_near <= Decimal::ZERO {
            return Err(StrategyError::InvalidInput {
                name: "long_threshold_near",
                value: self.long_threshold_near,
            });
        }
        Ok(())
    }
}

/// RSI screener settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenerConfig {
    pub symbols: Vec<String>,
    pub exchange: String,
    pub screener: String,
    pub interval: Interval,
    /// Concurrent scanner requests
    pub max_workers: usize,
    /// How long a completed screen is reused
    pub cache_ttl_secs: u64,
    pub rsi_low: f64,
    pub rsi_high: f64,
}

impl Default for ScreenerConfig {
    fn default() -> Self {
        ScreenerConfig {
            symbols: DEFAULT_SCREEN_SYMBOLS.iter().map(|s| s.to_string()).collect(),
            exchange: "BYBIT".to_string(),
            screener: "crypto".to_string(),
            interval: Interval::FourHours,
            max_workers: 20,
            cache_ttl_secs: 180,
            rsi_low: 30.0,
            rsi_high: 70.0,
        }
    }
}

impl ScreenerConfig {
    /// Configured symbols, trimmed and deduplicated in order
    pub fn symbols(&self) -> Vec<Symbol> {
        let mut seen = std::collections::HashSet::new();
        self.symbols
            .iter()
            .map(Symbol::new)
            .filter(|s| !s.as_str().is_empty() && seen.insert(s.clone()))
            .collect()
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_workers == 0 {
            anyhow::bail!("max_workers must be at least 1");
        }
        if !(0.0..=100.0).contains(&self.rsi_low)
            || !(0.0..=100.0).contains(&self.rsi_high)
            || self.rsi_low > self.rsi_high
        {
            anyhow::bail!(
                "RSI band [{}, {}] must lie within 0..=100 with low <= high",
                self.rsi_low,
                self.rsi_high
            );
        }
        Ok(())
    }
}

/// Bybit USDT perpetuals screened when no list is configured
pub const DEFAULT_SCREEN_SYMBOLS: &[&str] = &[
    "1000BONKUSDT.P", "1000FLOKIUSDT.P", "1000PEPEUSDT.P", "1INCHUSDT.P", "AAVEUSDT.P",
    "ADAUSDT.P", "ALGOUSDT.P", "APEUSDT.P", "APTUSDT.P", "ARBUSDT.P",
    "ARUSDT.P", "ATOMUSDT.P", "AVAXUSDT.P", "BCHUSDT.P", "BNBUSDT.P",
    "BTCUSDT.P", "CKBUSDT.P", "CRVUSDT.P", "DOGEUSDT.P", "DOTUSDT.P",
    "DYDXUSDT.P", "EGLDUSDT.P", "ENAUSDT.P", "ETCUSDT.P", "ETHUSDT.P",
    "FILUSDT.P", "GALAUSDT.P", "HBARUSDT.P", "ICPUSDT.P", "INJUSDT.P",
    "JUPUSDT.P", "KASUSDT.P", "LDOUSDT.P", "LINKUSDT.P", "LTCUSDT.P",
    "MKRUSDT.P", "NEARUSDT.P", "ONDOUSDT.P", "OPUSDT.P", "ORDIUSDT.P",
    "PENDLEUSDT.P", "RENDERUSDT.P", "RUNEUSDT.P", "SEIUSDT.P", "SOLUSDT.P",
    "STXUSDT.P", "SUIUSDT.P", "TIAUSDT.P", "TONUSDT.P", "TRXUSDT.P",
    "UNIUSDT.P", "WLDUSDT.P", "XLMUSDT.P", "XRPUSDT.P",
];
