//! Pipeline output records

use std::cmp::Ordering;

use revenue_validator::Month;
use serde::Serialize;
use signal_engine::SignalKind;

use crate::classifier::{Severity, SeverityThresholds};
use crate::combiner::ComponentScores;

/// Scored (country, month)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnomalyRecord {
    pub country: String,
    pub month: Month,
    /// Weighted combination of `component_scores`, in [0, 100]
    pub composite_score: f64,
    pub severity: Severity,
    pub component_scores: ComponentScores,
    pub revenue: f64,
    /// Signed distance from the country mean in standard deviations
    pub revenue_zscore: Option<f64>,
    /// Percent change from the previous observation
    pub revenue_mom_change: Option<f64>,
    /// Signals at or above the flag threshold
    pub anomaly_types: Vec<SignalKind>,
}

impl AnomalyRecord {
    /// Output order: composite score descending, then country, then month
    pub fn output_order(a: &AnomalyRecord, b: &AnomalyRecord) -> Ordering {
        b.composite_score
            .total_cmp(&a.composite_score)
            .then_with(|| a.country.cmp(&b.country))
            .then_with(|| a.month.cmp(&b.month))
    }

    pub fn is_severe(&self) -> bool {
        self.severity == Severity::Severe
    }
}

/// One run's records together with the quartiles used to label them
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredBatch {
    pub records: Vec<AnomalyRecord>,
    /// `None` when nothing was scorable
    pub thresholds: Option<SeverityThresholds>,
}

impl ScoredBatch {
    pub fn empty() -> Self {
        Self {
            records: Vec::new(),
            thresholds: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of records per severity, lowest first
    pub fn severity_counts(&self) -> [(Severity, usize); 4] {
        let mut counts = [
            (Severity::Normal, 0),
            (Severity::Minor, 0),
            (Severity::Moderate, 0),
            (Severity::Severe, 0),
        ];
        for record in &self.records {
            counts[record.severity as usize].1 += 1;
        }
        counts
    }
}
