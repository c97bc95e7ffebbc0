//! Screen command - RSI screen over a list of perpetual futures symbols

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use maverick_book::screener::{RsiScreener, ScreenSnapshot};
use maverick_book::tradingview::ScannerClient;
use maverick_book::{Config, Symbol};
use std::time::Duration;
use tracing::info;

#[allow(clippy::too_many_arguments)]
pub fn run(
    config_path: Option<String>,
    low: Option<f64>,
    high: Option<f64>,
    symbols: Option<String>,
    interval: Option<String>,
    show: Option<String>,
    output: Option<String>,
    watch: Option<u64>,
    refresh: bool,
) -> Result<()> {
    let mut config = Config::load(config_path.as_deref())?;
    let screener_config = &mut config.screener;

    if let Some(low) = low {
        screener_config.rsi_low = low;
    }
    if let Some(high) = high {
        screener_config.rsi_high = high;
    }
    if let Some(list) = symbols {
        screener_config.symbols = list
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
    }
    if let Some(interval) = interval {
        screener_config.interval = interval.parse().map_err(anyhow::Error::msg)?;
    }
    screener_config.validate()?;

    let selected: Vec<Symbol> = show
        .map(|s| s.split(',').map(Symbol::new).collect())
        .unwrap_or_default();

    let client = ScannerClient::with_timeout(Duration::from_secs(config.market.timeout_secs))?;
    let total = config.screener.symbols().len();
    let pb = ProgressBar::new(total as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("⚡ {percent:>3}%|{bar:40}| {pos}/{len} [{elapsed}<{eta}] {msg}")?
            .progress_chars("█░ "),
    );

    let screener = RsiScreener::new(client, config.screener).with_progress(pb.clone());
    let (low, high) = (screener.config().rsi_low, screener.config().rsi_high);

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async {
        loop {
            if refresh {
                screener.invalidate().await;
            }
            pb.reset();
            pb.set_message("fetching...");
            let snapshot = screener.screen().await;
            pb.finish_and_clear();

            print_report(&snapshot, low, high, &selected);

            if let Some(path) = &output {
                snapshot.write_csv(path)?;
                println!("Saved {} rows to {}", snapshot.readings.len(), path);
            }

            let Some(secs) = watch else {
                break;
            };
            info!("Next refresh in {}s", secs);
            tokio::select! {
                _ = tokio::time::sleep(Duration::from_secs(secs)) => {}
                _ = tokio::signal::ctrl_c() => {
                    info!("Interrupted, stopping watch");
                    break;
                }
            }
        }
        Ok::<(), anyhow::Error>(())
    })?;

    Ok(())
}

fn print_report(snapshot: &ScreenSnapshot, low: f64, high: f64, selected: &[Symbol]) {
    let summary = snapshot.summary(low, high);

    println!("\n{}", "=".repeat(60));
    println!("CRYPTO SELECTOR");
    println!("{}", "=".repeat(60));
    println!(
        "  Last update:       {}",
        snapshot.fetched_at.format("%Y-%m-%d %H:%M:%S %Z")
    );
    println!("  Total Symbols:     {}", summary.total);
    match summary.average_rsi {
        Some(avg) => println!("  Avg RSI:           {:.2}", avg),
        None => println!("  Avg RSI:           n/a"),
    }
    println!("  Symbols in Range:  {}", summary.in_range);
    println!("{}", "=".repeat(60));

    let in_range = snapshot.in_range(low, high);
    println!("\nSymbols in Range ({}-{})", low, high);
    if in_range.is_empty() {
        println!("  No symbols found in the selected RSI range.");
    } else {
        println!("  {:<24} {:>8}", "Symbol", "RSI");
        println!("  {}", "-".repeat(33));
        for reading in in_range {
            println!(
                "  {:<24} {:>8.2}",
                reading.symbol.as_str(),
                reading.rsi.unwrap_or_default()
            );
        }
    }

    if !selected.is_empty() {
        println!("\nDetailed Symbol View");
        for reading in snapshot.select(selected) {
            let zone = match reading.rsi {
                Some(v) if v <= 30.0 => "oversold",
                Some(v) if v >= 70.0 => "overbought",
                Some(_) => "",
                None => "no data",
            };
            match reading.rsi {
                Some(v) => println!("  {:<24} {:>8.2} {}", reading.symbol.as_str(), v, zone),
                None => println!("  {:<24} {:>8} {}", reading.symbol.as_str(), "-", zone),
            }
        }
    }
    println!();
}
