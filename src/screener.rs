//! RSI screener
//!
//! Fans out one scanner request per symbol with at most `max_workers` in
//! flight, drops symbols whose fetch fails, and caches the completed screen
//! for `cache_ttl_secs`. Filtering and summary statistics work on the cached
//! readings without touching the network.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use indicatif::ProgressBar;
use itertools::Itertools;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{Mutex, Semaphore};
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::config::ScreenerConfig;
use crate::tradingview::IndicatorSource;
use crate::Symbol;

/// Indicator column holding the RSI value
pub const RSI_INDICATOR: &str = "RSI";

/// RSI reading for one symbol; `rsi` is `None` when the scanner had no value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RsiReading {
    pub symbol: Symbol,
    pub rsi: Option<f64>,
}

impl RsiReading {
    pub fn in_band(&self, low: f64, high: f64) -> bool {
        self.rsi.is_some_and(|rsi| rsi >= low && rsi <= high)
    }
}

/// One completed screen
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreenSnapshot {
    pub fetched_at: DateTime<Utc>,
    pub readings: Vec<RsiReading>,
}

impl ScreenSnapshot {
    pub fn new(readings: Vec<RsiReading>) -> Self {
        ScreenSnapshot {
            fetched_at: Utc::now(),
            readings,
        }
    }

    /// Readings inside `[low, high]`, highest RSI first
    pub fn in_range(&self, low: f64, high: f64) -> Vec<&RsiReading> {
        self.readings
            .iter()
            .filter(|r| r.in_band(low, high))
            .sorted_by_key(|r| std::cmp::Reverse(OrderedFloat(r.rsi.unwrap_or(f64::NAN))))
            .collect()
    }

    /// Readings for the requested symbols, in request order
    pub fn select(&self, symbols: &[Symbol]) -> Vec<&RsiReading> {
        symbols
            .iter()
            .filter_map(|s| self.readings.iter().find(|r| &r.symbol == s))
            .collect()
    }

    pub fn summary(&self, low: f64, high: f64) -> ScreenSummary {
        let values: Vec<f64> = self.readings.iter().filter_map(|r| r.rsi).collect();

        ScreenSummary {
            total: self.readings.len(),
            with_rsi: values.len(),
            average_rsi: if values.is_empty() {
                None
            } else {
                Some(values.iter().mean())
            },
            in_range: self.readings.iter().filter(|r| r.in_band(low, high)).count(),
        }
    }

    /// Write `symbol,rsi,fetched_at` rows
    pub fn write_csv(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let mut writer = csv::Writer::from_path(path)
            .with_context(|| format!("Failed to create {}", path.display()))?;

        writer.write_record(["symbol", "rsi", "fetched_at"])?;
        let fetched_at = self.fetched_at.format("%Y-%m-%d %H:%M:%S").to_string();
        for reading in &self.readings {
            let rsi = reading.rsi.map(|v| format!("{:.2}", v)).unwrap_or_default();
            writer.write_record([reading.symbol.as_str(), rsi.as_str(), fetched_at.as_str()])?;
        }
        writer.flush()?;

        info!("Saved {} rows to {}", self.readings.len(), path.display());
        Ok(())
    }
}

/// Headline numbers for a screen
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreenSummary {
    pub total: usize,
    pub with_rsi: usize,
    pub average_rsi: Option<f64>,
    pub in_range: usize,
}

struct CachedScreen {
    snapshot: Arc<ScreenSnapshot>,
    stored_at: Instant,
}

/// Concurrent RSI screener over an [`IndicatorSource`]
pub struct RsiScreener<S> {
    source: Arc<S>,
    config: ScreenerConfig,
    ttl: Duration,
    cache: Mutex<Option<CachedScreen>>,
    progress: Option<ProgressBar>,
}

impl<S> RsiScreener<S>
where
    S: IndicatorSource + 'static,
{
    pub fn new(source: S, config: ScreenerConfig) -> Self {
        RsiScreener {
            source: Arc::new(source),
            ttl: Duration::from_secs(config.cache_ttl_secs),
            config,
            cache: Mutex::new(None),
            progress: None,
        }
    }

    /// Tick `progress` once per finished symbol
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = Some(progress);
        self
    }

    pub fn config(&self) -> &ScreenerConfig {
        &self.config
    }

    /// Cached screen if still fresh, otherwise a new one
    pub async fn screen(&self) -> Arc<ScreenSnapshot> {
        let mut cache = self.cache.lock().await;

        if let Some(cached) = cache.as_ref() {
            if cached.stored_at.elapsed() < self.ttl {
                debug!(
                    "Using cached screen from {} ({} readings)",
                    cached.snapshot.fetched_at,
                    cached.snapshot.readings.len()
                );
                return Arc::clone(&cached.snapshot);
            }
        }

        let snapshot = Arc::new(self.fetch_all().await);
        *cache = Some(CachedScreen {
            snapshot: Arc::clone(&snapshot),
            stored_at: Instant::now(),
        });
        snapshot
    }

    /// Drop the cached screen so the next call refetches
    pub async fn invalidate(&self) {
        *self.cache.lock().await = None;
    }

    /// Fetch every configured symbol, keeping only successful reads
    pub async fn fetch_all(&self) -> ScreenSnapshot {
        let symbols = self.config.symbols();
        let permits = Arc::new(Semaphore::new(self.config.max_workers.max(1)));
        let mut tasks = JoinSet::new();

        info!(
            "Screening {} symbols on {} ({}) with {} workers",
            symbols.len(),
            self.config.exchange,
            self.config.interval,
            self.config.max_workers
        );

        for symbol in symbols {
            let source = Arc::clone(&self.source);
            let permits = Arc::clone(&permits);
            let exchange = self.config.exchange.clone();
            let screener = self.config.screener.clone();
            let interval = self.config.interval;

            tasks.spawn(async move {
                let _permit = permits.acquire_owned().await;
                let result = source
                    .fetch_indicators(&symbol, &exchange, &screener, interval)
                    .await;
                (symbol, result)
            });
        }

        let mut readings = Vec::new();
        let mut failed = 0usize;

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((symbol, Ok(raw))) => readings.push(RsiReading {
                    rsi: raw.number(RSI_INDICATOR),
                    symbol,
                }),
                Ok((symbol, Err(e))) => {
                    warn!("Error fetching data for {}: {}", symbol, e);
                    failed += 1;
                }
                Err(e) => {
                    warn!("Screener task failed: {}", e);
                    failed += 1;
                }
            }
            if let Some(pb) = &self.progress {
                pb.inc(1);
            }
        }

        info!(
            "Screen complete: {} readings, {} failures",
            readings.len(),
            failed
        );

        ScreenSnapshot::new(readings)
    }
}
