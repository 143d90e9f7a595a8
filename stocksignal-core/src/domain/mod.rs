//! Domain types for StockSignal

pub mod bar;
pub mod signal;

pub use bar::{PriceBar, PriceSeries, SeriesError};
pub use signal::{Action, FinalAction, Sentiment};
