//! Revenue Anomaly Scoring Engine
//!
//! Turns country/month revenue observations into a composite 0-100 anomaly
//! score and a batch-relative severity label per (country, month).
//!
//! # Example
//!
//! ```
//! use revenue_validator::{Month, RevenueObservation};
//! use scoring_engine::{score, Severity};
//!
//! let observations: Vec<RevenueObservation> = [100.0, 100.0, 100.0, 100.0, 500.0]
//!     .iter()
//!     .enumerate()
//!     .map(|(i, r)| RevenueObservation::new("FRANCE", Month::new(1995, i as u32 + 1).unwrap(), *r))
//!     .collect();
//!
//! let records = score(&observations).unwrap();
//! assert_eq!(records[0].month.to_string(), "1995-05");
//! assert_eq!(records[0].severity, Severity::Severe);
//! ```

mod classifier;
mod combiner;
mod config;
mod pipeline;
mod record;

pub use classifier::{Severity, SeverityClassifier, SeverityThresholds};
pub use combiner::{CombinedScore, ComponentScores, ScoreCombiner, SignalReading};
pub use config::{EngineConfig, SignalWeights};
pub use pipeline::{score, AnomalyEngine};
pub use record::{AnomalyRecord, ScoredBatch};

pub use signal_engine::{ConfigError, CorrelationWindow, SignalConfig, SignalKind};

use revenue_validator::ValidationError;
use thiserror::Error;

/// Errors that abort a scoring run
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScoringError {
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),
}
