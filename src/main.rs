//! Maverick Book - main entry point
//!
//! This binary provides two subcommands:
//! - grid: Pivot-point grid bot settings for one symbol
//! - screen: RSI screen across a list of perpetual futures symbols

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;

#[derive(Parser, Debug)]
#[command(name = "maverick-book")]
#[command(about = "Pivot-point grid bot optimizer and RSI screener", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to configuration file (defaults are used when omitted)
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Optimize grid bot settings from pivot points and ATR
    Grid {
        /// Symbol to analyze. E.g., "CKBUSDT"
        #[arg(short, long, default_value = "CKBUSDT")]
        symbol: String,

        /// Exchange (overrides config)
        #[arg(short, long)]
        exchange: Option<String>,

        /// Snapshot interval (overrides config). E.g., "1d", "4h"
        #[arg(short, long)]
        interval: Option<String>,

        /// Number of grids (overrides config)
        #[arg(short, long)]
        num_grids: Option<u32>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Screen symbols by RSI
    Screen {
        /// Lower bound of the RSI band (overrides config)
        #[arg(long)]
        low: Option<f64>,

        /// Upper bound of the RSI band (overrides config)
        #[arg(long)]
        high: Option<f64>,

        /// Symbols to screen (comma-separated). E.g., "BTCUSDT.P,ETHUSDT.P"
        #[arg(long)]
        symbols: Option<String>,

        /// RSI interval (overrides config). E.g., "4h"
        #[arg(short, long)]
        interval: Option<String>,

        /// Symbols to show in detail (comma-separated)
        #[arg(long)]
        show: Option<String>,

        /// Write readings to a CSV file
        #[arg(short, long)]
        output: Option<String>,

        /// Re-screen every N seconds, reusing results while the cache is fresh
        #[arg(short, long)]
        watch: Option<u64>,

        /// Ignore the cached screen and refetch on every cycle
        #[arg(long)]
        refresh: bool,
    },
}

fn setup_logging(verbose: bool, command_name: &str, file_only: bool) -> Result<()> {
    std::fs::create_dir_all("logs")?;

    // {command}_{date}.log
    let log_filename = format!(
        "{}_{}.log",
        command_name,
        chrono::Local::now().format("%Y-%m-%d_%H-%M-%S")
    );
    let log_path = PathBuf::from("logs").join(&log_filename);

    // Filter out noisy HTTP crates
    let level = if verbose { "debug" } else { "info" };
    let filter_str = format!(
        "{},hyper=warn,hyper_util=warn,reqwest=warn,rustls=warn,h2=warn",
        level
    );
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&filter_str));

    let file_appender = tracing_appender::rolling::never("logs", &log_filename);

    if file_only {
        // Keep the console clean for the progress bar
        let file_layer = tracing_subscriber::fmt::layer()
            .with_writer(file_appender)
            .with_target(true)
            .with_line_number(true)
            .with_file(true)
            .with_ansi(false);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(file_layer)
            .init();
    } else {
        let console_layer = tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_line_number(true)
            .with_file(true)
            .with_ansi(true);

        // Same format as the console, without ANSI colors
        let file_layer = tracing_subscriber::fmt::layer()
            .with_writer(file_appender)
            .with_target(true)
            .with_line_number(true)
            .with_file(true)
            .with_ansi(false);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(console_layer)
            .with(file_layer)
            .init();
    }

    info!("Logging initialized");
    info!("Log file: {}", log_path.display());

    Ok(())
}

fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    let (command_name, file_only) = match &cli.command {
        Commands::Grid { .. } => ("grid", false),
        Commands::Screen { .. } => ("screen", true),
    };

    setup_logging(cli.verbose, command_name, file_only)?;

    match cli.command {
        Commands::Grid {
            symbol,
            exchange,
            interval,
            num_grids,
            json,
        } => commands::grid::run(cli.config, symbol, exchange, interval, num_grids, json),

        Commands::Screen {
            low,
            high,
            symbols,
            interval,
            show,
            output,
            watch,
            refresh,
        } => commands::screen::run(
            cli.config, low, high, symbols, interval, show, output, watch, refresh,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_screen_flags_parse() {
        let cli = Cli::try_parse_from([
            "maverick-book",
            "screen",
            "--watch",
            "60",
            "--refresh",
            "--symbols",
            "BTCUSDT.P,ETHUSDT.P",
        ])
        .unwrap();

        match cli.command {
            Commands::Screen {
                watch,
                refresh,
                symbols,
                ..
            } => {
                assert_eq!(watch, Some(60));
                assert!(refresh);
                assert_eq!(symbols.as_deref(), Some("BTCUSDT.P,ETHUSDT.P"));
            }
            other => panic!("expected screen command, got {:?}", other),
        }
    }

    #[test]
    fn test_grid_defaults() {
        let cli = Cli::try_parse_from(["maverick-book", "grid", "-n", "20"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Grid { ref symbol, num_grids: Some(20), json: false, .. } if symbol == "CKBUSDT"
        ));
    }

    #[test]
    fn test_setup_logging_console_and_file() {
        // Only subscriber installed in this test binary
        assert!(setup_logging(false, "test", false).is_ok());
    }
}
