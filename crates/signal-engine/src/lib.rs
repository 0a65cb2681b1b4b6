//! Anomaly Signal Engine
//!
//! Groups revenue observations into per-country series and runs the four
//! statistical detectors (z-score, momentum, correlation breakdown, IQR
//! outlier), each producing normalized 0-100 signal scores.

mod correlation;
mod iqr;
mod momentum;
mod series;
mod signal;
mod statistics;
mod zscore;

pub use series::{group_by_country, CountrySeries, SeriesPoint};
pub use signal::{
    extract_all, CorrelationWindow, Extractor, SignalConfig, SignalKind, SignalScore, EXTRACTORS,
};
pub use statistics::{mean, normalize, quantile, StatisticalSummary};

use thiserror::Error;

/// Invalid engine parameters
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{field} must be a positive finite number, got {value}")]
    NotPositive { field: &'static str, value: f64 },
    #[error("{field} value {value} is out of range [{min}, {max}]")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
    #[error("min_history must be at least 2, got {0}")]
    MinHistory(usize),
    #[error("Trailing correlation window must cover at least one month")]
    EmptyWindow,
}
