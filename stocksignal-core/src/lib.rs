//! StockSignal Core: indicators, rule-based analysis, sentiment and verdicts.
//!
//! Data flows one way through the crate:
//! - `data`: fetch and normalize a price series (Yahoo, CSV, synthetic)
//! - `indicators`: compute the latest indicator set from the series
//! - `analysis`: turn the indicator set into an action with reasons
//! - `news` + `sentiment`: score recent headlines
//! - `verdict`: combine the technical action with sentiment
//!
//! `pipeline` wires the stages behind trait objects; `config` loads settings.

pub mod analysis;
pub mod config;
pub mod data;
pub mod domain;
pub mod indicators;
pub mod news;
pub mod pipeline;
pub mod sentiment;
pub mod verdict;

pub use pipeline::{Pipeline, PipelineError};

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: everything shared across server worker threads is
    /// Send + Sync.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        // Domain types
        require_send::<domain::PriceBar>();
        require_sync::<domain::PriceBar>();
        require_send::<domain::PriceSeries>();
        require_sync::<domain::PriceSeries>();
        require_send::<indicators::IndicatorSet>();
        require_sync::<indicators::IndicatorSet>();
        require_send::<analysis::AnalysisResult>();
        require_sync::<analysis::AnalysisResult>();
        require_send::<verdict::FinalVerdict>();
        require_sync::<verdict::FinalVerdict>();

        // Providers and the pipeline
        require_send::<data::YahooProvider>();
        require_sync::<data::YahooProvider>();
        require_send::<data::CircuitBreaker>();
        require_sync::<data::CircuitBreaker>();
        require_send::<news::NewsApiProvider>();
        require_sync::<news::NewsApiProvider>();
        require_send::<Pipeline>();
        require_sync::<Pipeline>();

        // Errors cross thread boundaries inside JoinHandle results
        require_send::<PipelineError>();
        require_sync::<PipelineError>();
    }

    /// Analyzers see only the indicator set: no provider, no series, no I/O.
    #[test]
    fn analyzer_trait_takes_only_indicators() {
        fn _check_trait_object_builds(
            analyzer: &dyn analysis::SignalAnalyzer,
            set: &indicators::IndicatorSet,
        ) -> Result<analysis::AnalysisResult, analysis::AnalysisError> {
            analyzer.analyze(set)
        }
    }
}
