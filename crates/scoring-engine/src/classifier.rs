//! Quartile-relative severity classifier
//!
//! Severity is relative to the batch being scored: the quartiles of the run's
//! composite scores are computed first, then every score is labelled against
//! them. A score equal to a boundary falls in the lower bucket.

use std::fmt;

use serde::{Deserialize, Serialize};
use signal_engine::quantile;

/// Severity bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Severity {
    Normal,
    Minor,
    Moderate,
    Severe,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Normal => "Normal",
            Severity::Minor => "Minor",
            Severity::Moderate => "Moderate",
            Severity::Severe => "Severe",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The 25th, 50th and 75th percentiles of one run's composite scores
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeverityThresholds {
    pub p25: f64,
    pub p50: f64,
    pub p75: f64,
}

impl SeverityThresholds {
    /// Quartiles of the given scores; `None` for an empty batch
    pub fn from_scores(scores: &[f64]) -> Option<Self> {
        let mut sorted = scores.to_vec();
        sorted.sort_by(f64::total_cmp);
        Some(Self {
            p25: quantile(&sorted, 0.25)?,
            p50: quantile(&sorted, 0.50)?,
            p75: quantile(&sorted, 0.75)?,
        })
    }

    pub fn classify(&self, score: f64) -> Severity {
        if score <= self.p25 {
            Severity::Normal
        } else if score <= self.p50 {
            Severity::Minor
        } else if score <= self.p75 {
            Severity::Moderate
        } else {
            Severity::Severe
        }
    }
}

/// Two-pass batch classifier
#[derive(Debug, Default, Clone, Copy)]
pub struct SeverityClassifier;

impl SeverityClassifier {
    pub fn new() -> Self {
        Self
    }

    /// Label every score against the batch's own quartiles.
    /// Labels are returned in input order.
    pub fn classify_batch(&self, scores: &[f64]) -> Option<(SeverityThresholds, Vec<Severity>)> {
        let thresholds = SeverityThresholds::from_scores(scores)?;
        let labels = scores.iter().map(|s| thresholds.classify(*s)).collect();
        Some((thresholds, labels))
    }
}
