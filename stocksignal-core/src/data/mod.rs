//! Market-data adapter: providers and normalization into a PriceSeries.

pub mod adapter;
pub mod circuit_breaker;
pub mod csv_file;
pub mod provider;
pub mod synthetic;
pub mod yahoo;

pub use adapter::{normalize, VolumeSummary};
pub use circuit_breaker::CircuitBreaker;
pub use csv_file::CsvProvider;
pub use provider::{
    check_interval, period_days, DataError, MarketDataProvider, RawBar, DEFAULT_INTERVAL,
    DEFAULT_PERIOD,
};
pub use synthetic::SyntheticProvider;
pub use yahoo::YahooProvider;
