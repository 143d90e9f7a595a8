//! End-to-end request flow: fetch, indicators, analysis, sentiment, verdict.
//!
//! A [`Pipeline`] owns its collaborators behind trait objects and holds no
//! mutable state, so one instance serves concurrent requests. Every call is
//! blocking (providers do network I/O); async callers run it on a blocking
//! thread.

use crate::analysis::{
    trading_signal, AnalysisError, AnalysisResult, AnalyzerMode, SignalAnalyzer, SimpleSignal,
};
use crate::config::{AppConfig, ConfigError, MarketDataSource, NewsSource};
use crate::data::{
    CircuitBreaker, CsvProvider, DataError, MarketDataProvider, SyntheticProvider, VolumeSummary,
    YahooProvider, DEFAULT_INTERVAL, DEFAULT_PERIOD,
};
use crate::domain::PriceSeries;
use crate::indicators::{IndicatorParams, IndicatorSet};
use crate::news::{
    headline_titles, NewsApiProvider, NewsError, NewsProvider, NoNews, YahooNewsProvider,
    MAX_HEADLINES,
};
use crate::sentiment::{LexiconScorer, SentimentReport, SentimentScorer};
use crate::verdict::{enhanced_signal, EnhancedSignal, FinalVerdict};
use chrono::NaiveDate;
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("invalid stock symbol '{0}'")]
    InvalidSymbol(String),

    #[error(transparent)]
    Data(#[from] DataError),

    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    #[error(transparent)]
    News(#[from] NewsError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// A per-symbol payload tagged with the symbol it was computed for.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SymbolReport<T> {
    pub stock_symbol: String,
    #[serde(flatten)]
    pub report: T,
}

/// Indicator set plus the series extent it was computed over.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndicatorSnapshot {
    pub indicators: IndicatorSet,
    pub bars: usize,
    pub as_of: NaiveDate,
}

pub struct Pipeline {
    market: Arc<dyn MarketDataProvider>,
    news: Arc<dyn NewsProvider>,
    scorer: Arc<dyn SentimentScorer>,
    analyzer: Box<dyn SignalAnalyzer>,
    params: IndicatorParams,
    period: String,
    interval: String,
    max_articles: usize,
    resolve_company_name: bool,
}

/// Trimmed, upper-cased ticker. Letters, digits and `.-^=` only.
pub fn normalize_symbol(raw: &str) -> Result<String, PipelineError> {
    let symbol = raw.trim().to_uppercase();
    let valid = !symbol.is_empty()
        && symbol.len() <= 20
        && symbol
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '^' | '='));
    if valid {
        Ok(symbol)
    } else {
        Err(PipelineError::InvalidSymbol(raw.to_string()))
    }
}

impl Pipeline {
    /// Pipeline with the scored analyzer, default windows and the lexicon scorer.
    pub fn new(market: Arc<dyn MarketDataProvider>, news: Arc<dyn NewsProvider>) -> Self {
        Self {
            market,
            news,
            scorer: Arc::new(LexiconScorer::new()),
            analyzer: AnalyzerMode::default().analyzer(),
            params: IndicatorParams::default(),
            period: DEFAULT_PERIOD.into(),
            interval: DEFAULT_INTERVAL.into(),
            max_articles: MAX_HEADLINES,
            resolve_company_name: true,
        }
    }

    /// Build providers and settings from configuration.
    pub fn from_config(config: &AppConfig) -> Result<Self, PipelineError> {
        config.validate()?;

        let md = &config.market_data;
        let market: Arc<dyn MarketDataProvider> = match md.source {
            MarketDataSource::Yahoo => Arc::new(YahooProvider::new(
                md.timeout(),
                md.max_retries,
                Arc::new(CircuitBreaker::default_provider()),
            )?),
            MarketDataSource::Csv => {
                let dir = md.csv_dir.clone().ok_or_else(|| {
                    ConfigError::Invalid("market_data.csv_dir is required".into())
                })?;
                Arc::new(CsvProvider::new(dir))
            }
            MarketDataSource::Synthetic => Arc::new(SyntheticProvider::default()),
        };

        let nc = &config.news;
        let news: Arc<dyn NewsProvider> = match nc.source {
            NewsSource::Newsapi => Arc::new(NewsApiProvider::new(
                nc.api_key.clone().unwrap_or_default(),
                nc.language.clone(),
                nc.max_articles,
                nc.timeout(),
            )?),
            NewsSource::Yahoo => Arc::new(YahooNewsProvider::new(nc.max_articles, nc.timeout())?),
            NewsSource::None => Arc::new(NoNews),
        };

        tracing::info!(
            market = market.name(),
            news = news.name(),
            mode = %config.analyzer.mode,
            "pipeline configured"
        );

        Ok(Self::new(market, news)
            .with_mode(config.analyzer.mode)
            .with_params(config.analyzer.params.clone())
            .with_window(&md.period, &md.interval)
            .with_max_articles(nc.max_articles)
            .with_company_name_resolution(nc.resolve_company_name))
    }

    pub fn with_mode(mut self, mode: AnalyzerMode) -> Self {
        self.analyzer = mode.analyzer();
        self
    }

    pub fn with_scorer(mut self, scorer: Arc<dyn SentimentScorer>) -> Self {
        self.scorer = scorer;
        self
    }

    pub fn with_params(mut self, params: IndicatorParams) -> Self {
        self.params = params;
        self
    }

    pub fn with_window(mut self, period: &str, interval: &str) -> Self {
        self.period = period.to_string();
        self.interval = interval.to_string();
        self
    }

    pub fn with_max_articles(mut self, max_articles: usize) -> Self {
        self.max_articles = max_articles.clamp(1, MAX_HEADLINES);
        self
    }

    pub fn with_company_name_resolution(mut self, enabled: bool) -> Self {
        self.resolve_company_name = enabled;
        self
    }

    pub fn analyzer_name(&self) -> &str {
        self.analyzer.name()
    }

    /// Fetch the configured window for `symbol`.
    pub fn series(&self, symbol: &str) -> Result<PriceSeries, PipelineError> {
        let symbol = normalize_symbol(symbol)?;
        let series = self.market.fetch(&symbol, &self.period, &self.interval)?;
        tracing::debug!(symbol = %symbol, bars = series.len(), "series loaded");
        Ok(series)
    }

    fn snapshot(&self, series: &PriceSeries) -> IndicatorSnapshot {
        let volume = VolumeSummary::from_series(series);
        IndicatorSnapshot {
            indicators: IndicatorSet::compute(series, &self.params)
                .with_volume_summary(volume.todays_volume, volume.avg_volume_20),
            bars: series.len(),
            as_of: series.last().date,
        }
    }

    /// Latest value of every indicator.
    pub fn indicators(
        &self,
        symbol: &str,
    ) -> Result<SymbolReport<IndicatorSnapshot>, PipelineError> {
        let series = self.series(symbol)?;
        Ok(SymbolReport {
            stock_symbol: series.symbol().to_string(),
            report: self.snapshot(&series),
        })
    }

    /// Single-factor quick signal.
    pub fn signal(&self, symbol: &str) -> Result<SymbolReport<SimpleSignal>, PipelineError> {
        let series = self.series(symbol)?;
        let set = IndicatorSet::compute(&series, &self.params);
        Ok(SymbolReport {
            stock_symbol: series.symbol().to_string(),
            report: trading_signal(&set)?,
        })
    }

    /// Analyze a caller-supplied indicator set. Non-finite values count as undefined.
    pub fn analyze(&self, indicators: IndicatorSet) -> Result<AnalysisResult, AnalysisError> {
        self.analyzer.analyze(&indicators.sanitized())
    }

    /// Fetch, compute and analyze.
    pub fn analyze_symbol(
        &self,
        symbol: &str,
    ) -> Result<SymbolReport<AnalysisResult>, PipelineError> {
        let series = self.series(symbol)?;
        let snapshot = self.snapshot(&series);
        Ok(SymbolReport {
            stock_symbol: series.symbol().to_string(),
            report: self.analyzer.analyze(&snapshot.indicators)?,
        })
    }

    /// Headline sentiment. Provider failures degrade to Neutral with no titles.
    pub fn sentiment(&self, symbol: &str) -> Result<SymbolReport<SentimentReport>, PipelineError> {
        let symbol = normalize_symbol(symbol)?;
        let report = self.sentiment_for(&symbol);
        Ok(SymbolReport {
            stock_symbol: symbol,
            report,
        })
    }

    fn news_query(&self, symbol: &str) -> String {
        if !self.resolve_company_name {
            return symbol.to_string();
        }
        match self.market.company_name(symbol) {
            Some(name) if !name.trim().is_empty() => name,
            _ => symbol.to_string(),
        }
    }

    fn sentiment_for(&self, symbol: &str) -> SentimentReport {
        let query = self.news_query(symbol);
        match self.news.fetch_headlines(&query) {
            Ok(headlines) => {
                let titles = headline_titles(&headlines, self.max_articles);
                let report = SentimentReport::from_titles(self.scorer.as_ref(), titles);
                tracing::info!(
                    symbol,
                    query = %query,
                    titles = report.news_titles.len(),
                    sentiment = %report.sentiment,
                    "sentiment scored"
                );
                report
            }
            Err(e) => {
                tracing::warn!(
                    symbol,
                    query = %query,
                    error = %e,
                    "news fetch failed, sentiment neutral"
                );
                SentimentReport::neutral()
            }
        }
    }

    /// Technical analysis combined with headline sentiment.
    pub fn final_verdict(&self, symbol: &str) -> Result<FinalVerdict, PipelineError> {
        let series = self.series(symbol)?;
        let snapshot = self.snapshot(&series);
        let technical = self.analyzer.analyze(&snapshot.indicators)?;
        let report = self.sentiment_for(series.symbol());
        let verdict = FinalVerdict::new(series.symbol(), technical, report);
        tracing::info!(
            symbol = %verdict.stock_symbol,
            technical = %verdict.technical_action,
            sentiment = %verdict.sentiment,
            final_action = %verdict.final_action,
            "verdict"
        );
        Ok(verdict)
    }

    /// Additive score over oversold, MA cross, positive news and volume.
    pub fn enhanced(&self, symbol: &str) -> Result<SymbolReport<EnhancedSignal>, PipelineError> {
        let series = self.series(symbol)?;
        let snapshot = self.snapshot(&series);
        let report = self.sentiment_for(series.symbol());
        Ok(SymbolReport {
            stock_symbol: series.symbol().to_string(),
            report: enhanced_signal(&snapshot.indicators, report.sentiment)?,
        })
    }
}
