//! Grid command - fetch one snapshot and print grid bot settings

use anyhow::{Context, Result};
use maverick_book::config::StrategyConfig;
use maverick_book::tradingview::{IndicatorSource, ScannerClient};
use maverick_book::{
    compute_grid_strategy, normalize_snapshot, Config, GridStrategy, IndicatorSnapshot, Symbol,
};
use std::time::Duration;
use tracing::{debug, info};

pub fn run(
    config_path: Option<String>,
    symbol: String,
    exchange_override: Option<String>,
    interval_override: Option<String>,
    num_grids_override: Option<u32>,
    json: bool,
) -> Result<()> {
    let mut config = Config::load(config_path.as_deref())?;

    if let Some(exchange) = exchange_override {
        info!("Overriding exchange to: {}", exchange);
        config.market.exchange = exchange;
    }
    if let Some(interval) = interval_override {
        config.market.interval = interval.parse().map_err(anyhow::Error::msg)?;
        info!("Overriding interval to: {}", config.market.interval);
    }
    if let Some(num_grids) = num_grids_override {
        info!("Overriding number of grids to: {}", num_grids);
        config.strategy.num_grids = num_grids;
    }

    let symbol = Symbol::new(symbol);
    let market = &config.market;
    let client = ScannerClient::with_timeout(Duration::from_secs(market.timeout_secs))?;

    info!(
        "Fetching {} from {} ({}, {})",
        symbol, market.exchange, market.screener, market.interval
    );
    let rt = tokio::runtime::Runtime::new()?;
    let raw = rt
        .block_on(client.fetch_indicators(&symbol, &market.exchange, &market.screener, market.interval))
        .with_context(|| format!("Error fetching data for {}", symbol))?;
    debug!("Received {} indicator values", raw.len());

    let snapshot = normalize_snapshot(&raw)
        .with_context(|| format!("Unusable snapshot for {}", symbol))?;
    let strategy = compute_grid_strategy(&snapshot, &config.strategy)
        .with_context(|| format!("Unable to compute grid strategy for {}", symbol))?;

    info!(
        "{}: {} (grid size {}, {} grids)",
        symbol, strategy.recommendation, strategy.grid.grid_size, strategy.grid.num_grids
    );

    if json {
        println!("{}", serde_json::to_string_pretty(&strategy)?);
    } else {
        print_report(&symbol, &snapshot, &strategy, &config.strategy);
    }

    Ok(())
}

fn print_report(
    symbol: &Symbol,
    snapshot: &IndicatorSnapshot,
    s: &GridStrategy,
    params: &StrategyConfig,
) {
    let thresholds = params.thresholds();

    println!("\n{}", "=".repeat(60));
    println!("GRID OPTIMIZATION: {}", symbol);
    println!("{}", "=".repeat(60));

    println!("\nPivot Points");
    for (name, level) in s.pivots.ladder().iter().rev() {
        println!("  {:<8} {:.8}", name, level);
    }

    println!("\nMarket Data");
    if let Some(open) = snapshot.open {
        println!("  Open:            {:.8}", open);
    }
    println!("  High / Low:      {:.8} / {:.8}", snapshot.high, snapshot.low);
    println!("  Current Price:   {:.8}", s.current_price);
    println!("  ATR:             {:.8}", s.atr);
    println!("  Grid Profit (%): {:.2}%", s.grid_profit_pct);

    println!("\nStrategy Recommendation: {}", s.recommendation);

    println!("\nOptimized Grid Settings");
    println!("  Entry Point:     {:.8}", s.grid.entry_point);
    println!("  Exit Point:      {:.8}", s.grid.exit_point);
    println!("  Stop Loss:       {:.8}", s.grid.stop_loss);
    println!("  Take Profit:     {:.8}", s.grid.take_profit);
    println!("  Grid Size:       {:.8}", s.grid.grid_size);
    println!("  Number of Grids: {}", s.grid.num_grids);
    println!("  Band Width:      {:.8}", s.grid.span());

    let levels = s.levels();
    if !levels.is_empty() {
        println!("\nGrid Levels");
        for level in &levels {
            let marker = if level.in_profit_zone { "+" } else { "-" };
            println!("  {} #{:<3} {:.8}", marker, level.index, level.price);
        }
    }

    println!("\nStrategy Explanation");
    println!(
        "  Distance from price to R1: {:.2}%",
        s.distances.to_r1_pct
    );
    println!(
        "  Distance from price to S1: {:.2}%",
        s.distances.to_s1_pct
    );
    println!(
        "  LONG needs R1 > {}% away and S1 < {}% away; SHORT is the mirror image.",
        thresholds.far, thresholds.near
    );
    println!("  Orders are placed between entry and exit, clamped to the S1/R1 band,");
    println!("  with a stop loss 5% beyond the entry point.");
    println!("{}\n", "=".repeat(60));
}
