//! Application configuration.
//!
//! Stored as TOML; every section and field has a default, so an empty file
//! (or no file) is a valid configuration. The news API key may also come from
//! the `NEWS_API_KEY` environment variable, which wins over the file.

use crate::analysis::AnalyzerMode;
use crate::data::{check_interval, period_days, DEFAULT_INTERVAL, DEFAULT_PERIOD};
use crate::indicators::IndicatorParams;
use crate::news::MAX_HEADLINES;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Environment variable holding the news API key.
pub const NEWS_API_KEY_ENV: &str = "NEWS_API_KEY";

/// Upper bound on `market_data.max_retries`.
pub const MAX_RETRIES: u32 = 10;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub market_data: MarketDataConfig,
    pub news: NewsConfig,
    pub analyzer: AnalyzerConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 8000,
        }
    }
}

/// Which market-data provider to use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarketDataSource {
    #[default]
    Yahoo,
    Csv,
    Synthetic,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketDataConfig {
    pub source: MarketDataSource,
    pub period: String,
    pub interval: String,
    pub timeout_secs: u64,
    pub max_retries: u32,
    /// Directory of `<SYMBOL>.csv` files for the csv source.
    pub csv_dir: Option<PathBuf>,
}

impl Default for MarketDataConfig {
    fn default() -> Self {
        Self {
            source: MarketDataSource::default(),
            period: DEFAULT_PERIOD.into(),
            interval: DEFAULT_INTERVAL.into(),
            timeout_secs: 30,
            max_retries: 3,
            csv_dir: None,
        }
    }
}

impl MarketDataConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Which headline provider to use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NewsSource {
    #[default]
    Newsapi,
    Yahoo,
    None,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewsConfig {
    pub source: NewsSource,
    pub api_key: Option<String>,
    pub max_articles: usize,
    pub language: String,
    pub timeout_secs: u64,
    /// Search by company long name instead of the ticker.
    pub resolve_company_name: bool,
}

impl Default for NewsConfig {
    fn default() -> Self {
        Self {
            source: NewsSource::default(),
            api_key: None,
            max_articles: MAX_HEADLINES,
            language: "en".into(),
            timeout_secs: 15,
            resolve_company_name: true,
        }
    }
}

impl NewsConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    pub mode: AnalyzerMode,
    pub params: IndicatorParams,
}

impl AppConfig {
    /// Load a configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse and validate a configuration from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Fill the news API key from `NEWS_API_KEY` when set and non-empty.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(key) = std::env::var(NEWS_API_KEY_ENV) {
            if !key.trim().is_empty() {
                self.news.api_key = Some(key);
            }
        }
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.news.max_articles == 0 {
            return Err(ConfigError::Invalid("news.max_articles must be >= 1".into()));
        }
        if self.market_data.source == MarketDataSource::Csv && self.market_data.csv_dir.is_none() {
            return Err(ConfigError::Invalid(
                "market_data.csv_dir is required for the csv source".into(),
            ));
        }
        if self.market_data.max_retries > MAX_RETRIES {
            return Err(ConfigError::Invalid(format!(
                "market_data.max_retries must be <= {MAX_RETRIES}"
            )));
        }
        let today = chrono::Utc::now().date_naive();
        period_days(&self.market_data.period, today)
            .and_then(|_| check_interval(&self.market_data.interval))
            .map_err(|e| ConfigError::Invalid(format!("market_data: {e}")))?;
        let p = &self.analyzer.params;
        let windows = [
            ("short_ma", p.short_ma),
            ("long_ma", p.long_ma),
            ("rsi", p.rsi),
            ("macd_fast", p.macd_fast),
            ("macd_slow", p.macd_slow),
            ("macd_signal", p.macd_signal),
            ("bollinger", p.bollinger),
            ("atr", p.atr),
            ("levels", p.levels),
            ("volume", p.volume),
        ];
        if let Some((name, _)) = windows.iter().find(|(_, w)| *w == 0) {
            return Err(ConfigError::Invalid(format!(
                "analyzer.params.{name} must be >= 1"
            )));
        }
        if p.bollinger < 2 {
            return Err(ConfigError::Invalid(
                "analyzer.params.bollinger must be >= 2".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_is_all_defaults() {
        let config = AppConfig::from_toml("").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.market_data.period, "1y");
        assert_eq!(config.market_data.interval, "1d");
        assert_eq!(config.news.max_articles, 12);
        assert_eq!(config.analyzer.mode, AnalyzerMode::Scored);
        assert_eq!(config.analyzer.params.long_ma, 200);
    }

    #[test]
    fn partial_sections_override_defaults() {
        let config = AppConfig::from_toml(
            r#"
            [server]
            port = 9000

            [market_data]
            period = "2y"

            [news]
            source = "yahoo"
            resolve_company_name = false

            [analyzer]
            mode = "sequential"

            [analyzer.params]
            short_ma = 20
            "#,
        )
        .unwrap();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.market_data.period, "2y");
        assert_eq!(config.market_data.interval, "1d");
        assert_eq!(config.news.source, NewsSource::Yahoo);
        assert!(!config.news.resolve_company_name);
        assert_eq!(config.analyzer.mode, AnalyzerMode::Sequential);
        assert_eq!(config.analyzer.params.short_ma, 20);
        assert_eq!(config.analyzer.params.long_ma, 200);
    }

    #[test]
    fn unknown_enum_value_is_parse_error() {
        let err = AppConfig::from_toml("[analyzer]\nmode = \"random\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn zero_window_is_invalid() {
        let err = AppConfig::from_toml("[analyzer.params]\nrsi = 0\n").unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid config: analyzer.params.rsi must be >= 1"
        );
    }

    #[test]
    fn csv_source_needs_directory() {
        let err = AppConfig::from_toml("[market_data]\nsource = \"csv\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
        let config =
            AppConfig::from_toml("[market_data]\nsource = \"csv\"\ncsv_dir = \"data\"\n").unwrap();
        assert_eq!(config.market_data.csv_dir, Some(PathBuf::from("data")));
    }

    #[test]
    fn intraday_interval_is_invalid() {
        let err = AppConfig::from_toml("[market_data]\ninterval = \"5m\"\n").unwrap_err();
        assert!(err.to_string().contains("5m"), "{err}");
        assert!(AppConfig::from_toml("[market_data]\nperiod = \"fortnight\"\n").is_err());
    }

    #[test]
    fn retry_count_is_bounded() {
        assert!(AppConfig::from_toml("[market_data]\nmax_retries = 10\n").is_ok());
        let err = AppConfig::from_toml("[market_data]\nmax_retries = 33\n").unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid config: market_data.max_retries must be <= 10"
        );
    }

    #[test]
    fn reads_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stocksignal.toml");
        std::fs::write(&path, "[news]\napi_key = \"abc\"\n").unwrap();
        let config = AppConfig::from_file(&path).unwrap();
        assert_eq!(config.news.api_key.as_deref(), Some("abc"));

        let missing = AppConfig::from_file(&dir.path().join("nope.toml")).unwrap_err();
        assert!(matches!(missing, ConfigError::Read { .. }));
    }
}
