//! Alert threshold evaluator

use revenue_validator::Month;
use scoring_engine::AnomalyRecord;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Which records are eligible for an alert
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertScope {
    /// Every month in the run
    #[default]
    AllMonths,
    /// Only the most recent month present in the run
    LatestMonth,
}

/// Alert configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertConfig {
    pub scope: AlertScope,
}

/// Outcome of evaluating a scored run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlertDecision {
    /// True iff at least one eligible record is Severe
    pub should_notify: bool,
    /// Severe records in pipeline order
    pub severe_records: Vec<AnomalyRecord>,
}

impl AlertDecision {
    pub fn count(&self) -> usize {
        self.severe_records.len()
    }
}

/// Evaluator bound to a configuration
pub struct AlertEvaluator {
    config: AlertConfig,
}

impl AlertEvaluator {
    pub fn new(config: AlertConfig) -> Self {
        debug!("Creating alert evaluator with config: {:?}", config);
        Self { config }
    }

    pub fn evaluate(&self, records: &[AnomalyRecord]) -> AlertDecision {
        evaluate_with_scope(records, self.config.scope)
    }
}

impl Default for AlertEvaluator {
    fn default() -> Self {
        Self::new(AlertConfig::default())
    }
}

/// Decide whether any record in the run is severe enough to notify
pub fn evaluate(records: &[AnomalyRecord]) -> AlertDecision {
    evaluate_with_scope(records, AlertScope::AllMonths)
}

/// `evaluate`, restricted to the records `scope` allows
pub fn evaluate_with_scope(records: &[AnomalyRecord], scope: AlertScope) -> AlertDecision {
    let latest: Option<Month> = match scope {
        AlertScope::AllMonths => None,
        AlertScope::LatestMonth => records.iter().map(|r| r.month).max(),
    };

    let severe_records: Vec<AnomalyRecord> = records
        .iter()
        .filter(|r| r.is_severe())
        .filter(|r| latest.map_or(true, |m| r.month == m))
        .cloned()
        .collect();

    let decision = AlertDecision {
        should_notify: !severe_records.is_empty(),
        severe_records,
    };

    if decision.should_notify {
        info!(
            scope = ?scope,
            "{} severe anomalies eligible for notification",
            decision.count()
        );
    } else {
        debug!(scope = ?scope, "No severe anomalies; nothing to notify");
    }
    decision
}
