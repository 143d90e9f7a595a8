//! StockSignal CLI: per-symbol reports and the HTTP server.
//!
//! Commands:
//! - `signal` - quick RSI / moving-average signal
//! - `indicators` - latest value of every indicator
//! - `analyze` - rule-based technical analysis (scored or sequential)
//! - `sentiment` - headline sentiment
//! - `verdict` - technical analysis combined with sentiment
//! - `enhanced` - additive enhanced signal
//! - `serve` - run the HTTP API
//!
//! Reports print as pretty JSON on stdout; logs go to stderr.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use stocksignal_core::analysis::AnalyzerMode;
use stocksignal_core::config::{AppConfig, MarketDataSource, NewsSource};
use stocksignal_core::Pipeline;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "stocksignal",
    about = "StockSignal CLI: technical signals with news sentiment"
)]
struct Cli {
    /// Path to a TOML config file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// News API key (overrides the config file).
    #[arg(long, global = true, env = "NEWS_API_KEY", hide_env_values = true)]
    news_api_key: Option<String>,

    /// Headline source.
    #[arg(long, global = true, value_enum)]
    news_source: Option<NewsSourceArg>,

    /// Use deterministic synthetic market data (no network).
    #[arg(long, global = true, default_value_t = false, conflicts_with = "csv_dir")]
    synthetic: bool,

    /// Read market data from <DIR>/<SYMBOL>.csv instead of Yahoo.
    #[arg(long, global = true)]
    csv_dir: Option<PathBuf>,

    /// History window (e.g. 6mo, 1y, 5y, ytd, max).
    #[arg(long, global = true)]
    period: Option<String>,

    /// Bar interval (1d, 5d, 1wk, 1mo, 3mo).
    #[arg(long, global = true)]
    interval: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum NewsSourceArg {
    Newsapi,
    Yahoo,
    None,
}

impl From<NewsSourceArg> for NewsSource {
    fn from(arg: NewsSourceArg) -> Self {
        match arg {
            NewsSourceArg::Newsapi => NewsSource::Newsapi,
            NewsSourceArg::Yahoo => NewsSource::Yahoo,
            NewsSourceArg::None => NewsSource::None,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Quick signal from RSI extremes and the moving-average cross.
    Signal {
        /// Ticker symbol (e.g., AAPL).
        symbol: String,
    },
    /// Latest value of every indicator.
    Indicators {
        /// Ticker symbol (e.g., AAPL).
        symbol: String,
    },
    /// Rule-based technical analysis.
    Analyze {
        /// Ticker symbol (e.g., AAPL).
        symbol: String,

        /// Analyzer: scored or sequential. Defaults to the config value.
        #[arg(long)]
        mode: Option<AnalyzerMode>,
    },
    /// Headline sentiment.
    Sentiment {
        /// Ticker symbol (e.g., AAPL).
        symbol: String,
    },
    /// Technical analysis combined with headline sentiment.
    Verdict {
        /// Ticker symbol (e.g., AAPL).
        symbol: String,
    },
    /// Additive enhanced signal.
    Enhanced {
        /// Ticker symbol (e.g., AAPL).
        symbol: String,
    },
    /// Run the HTTP API.
    Serve {
        /// Bind address. Defaults to the config value (127.0.0.1).
        #[arg(long)]
        host: Option<String>,

        /// Port. Defaults to the config value (8000).
        #[arg(long)]
        port: Option<u16>,
    },
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let mut config = load_config(&cli)?;

    match cli.command {
        Commands::Signal { symbol } => print_json(&pipeline(&config)?.signal(&symbol)?),
        Commands::Indicators { symbol } => print_json(&pipeline(&config)?.indicators(&symbol)?),
        Commands::Analyze { symbol, mode } => {
            if let Some(mode) = mode {
                config.analyzer.mode = mode;
            }
            print_json(&pipeline(&config)?.analyze_symbol(&symbol)?)
        }
        Commands::Sentiment { symbol } => print_json(&pipeline(&config)?.sentiment(&symbol)?),
        Commands::Verdict { symbol } => print_json(&pipeline(&config)?.final_verdict(&symbol)?),
        Commands::Enhanced { symbol } => print_json(&pipeline(&config)?.enhanced(&symbol)?),
        Commands::Serve { host, port } => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            run_serve(&config)
        }
    }
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// File (or defaults), then `NEWS_API_KEY`, then command-line flags.
fn load_config(cli: &Cli) -> Result<AppConfig> {
    let mut config = match &cli.config {
        Some(path) => AppConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => AppConfig::default(),
    }
    .with_env_overrides();

    if let Some(key) = &cli.news_api_key {
        config.news.api_key = Some(key.clone());
    }
    if let Some(source) = cli.news_source {
        config.news.source = source.into();
    }
    if cli.synthetic {
        config.market_data.source = MarketDataSource::Synthetic;
    }
    if let Some(dir) = &cli.csv_dir {
        config.market_data.source = MarketDataSource::Csv;
        config.market_data.csv_dir = Some(dir.clone());
    }
    if let Some(period) = &cli.period {
        config.market_data.period = period.clone();
    }
    if let Some(interval) = &cli.interval {
        config.market_data.interval = interval.clone();
    }

    config.validate()?;
    Ok(config)
}

fn pipeline(config: &AppConfig) -> Result<Pipeline> {
    Pipeline::from_config(config).context("building pipeline")
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn run_serve(config: &AppConfig) -> Result<()> {
    // Built outside the runtime: the blocking HTTP clients must not be
    // created or dropped on an async worker.
    let pipeline = Arc::new(pipeline(config)?);
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("starting tokio runtime")?;

    runtime
        .block_on(stocksignal_server::serve(&config.server, Arc::clone(&pipeline)))
        .with_context(|| format!("serving on {}:{}", config.server.host, config.server.port))?;
    drop(runtime);
    Ok(())
}
