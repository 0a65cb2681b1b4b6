//! Anomaly scoring pipeline
//!
//! validate -> group into series -> extract signals -> combine -> classify ->
//! assemble sorted records. Pure: no I/O, no state kept between runs.

use std::collections::BTreeMap;

use revenue_validator::{Month, RevenueObservation, Validator};
use signal_engine::{extract_all, group_by_country, SignalKind, SignalScore};
use tracing::{debug, info};

use crate::classifier::SeverityClassifier;
use crate::combiner::ScoreCombiner;
use crate::config::EngineConfig;
use crate::record::{AnomalyRecord, ScoredBatch};
use crate::ScoringError;

/// Configured scoring engine
pub struct AnomalyEngine {
    config: EngineConfig,
    validator: Validator,
    combiner: ScoreCombiner,
    classifier: SeverityClassifier,
}

impl AnomalyEngine {
    /// Create an engine; fails if the configuration is invalid
    pub fn new(config: EngineConfig) -> Result<Self, ScoringError> {
        config.validate()?;
        debug!("Creating anomaly engine with config: {:?}", config);
        Ok(Self {
            combiner: ScoreCombiner::new(config.weights.clone()),
            config,
            validator: Validator::new(),
            classifier: SeverityClassifier::new(),
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Score a batch of observations, returning ordered records
    pub fn score(
        &self,
        observations: &[RevenueObservation],
    ) -> Result<Vec<AnomalyRecord>, ScoringError> {
        Ok(self.score_batch(observations)?.records)
    }

    /// Score a batch and also return the quartiles used for labelling
    pub fn score_batch(
        &self,
        observations: &[RevenueObservation],
    ) -> Result<ScoredBatch, ScoringError> {
        // All-or-nothing: reject before any scoring
        self.validator.validate(observations)?;

        let series = group_by_country(observations);
        let scorable = series
            .iter()
            .filter(|s| s.has_history(self.config.signals.min_history))
            .count();
        debug!(
            "Grouped {} observations into {} series ({} scorable, {} with gaps)",
            observations.len(),
            series.len(),
            scorable,
            series.iter().filter(|s| s.gap_count() > 0).count()
        );
        if scorable == 0 {
            info!("No country has enough history; nothing to score");
            return Ok(ScoredBatch::empty());
        }

        let signals = extract_all(&series, &self.config.signals);
        let combined = self
            .combiner
            .combine(signals.iter().flat_map(|(_, scores)| scores.iter()));

        let composites: Vec<f64> = combined.iter().map(|c| c.composite).collect();
        let Some((thresholds, labels)) = self.classifier.classify_batch(&composites) else {
            return Ok(ScoredBatch::empty());
        };

        let revenue: BTreeMap<(&str, Month), f64> = series
            .iter()
            .flat_map(|s| {
                s.points
                    .iter()
                    .map(move |p| ((s.country.as_str(), p.month), p.revenue))
            })
            .collect();

        let mut records: Vec<AnomalyRecord> = combined
            .into_iter()
            .zip(labels)
            .map(|(c, severity)| {
                let anomaly_types = c
                    .components
                    .iter()
                    .filter(|(_, r)| r.value >= self.config.flag_threshold)
                    .map(|(kind, _)| kind)
                    .collect();
                AnomalyRecord {
                    revenue: revenue
                        .get(&(c.country.as_str(), c.month))
                        .copied()
                        .unwrap_or_default(),
                    revenue_zscore: c.components.reading(SignalKind::ZScore).map(|r| r.raw),
                    revenue_mom_change: c
                        .components
                        .reading(SignalKind::Momentum)
                        .map(|r| r.raw * 100.0),
                    anomaly_types,
                    composite_score: c.composite,
                    severity,
                    component_scores: c.components,
                    country: c.country,
                    month: c.month,
                }
            })
            .collect();
        records.sort_by(AnomalyRecord::output_order);

        let batch = ScoredBatch {
            records,
            thresholds: Some(thresholds),
        };
        let counts = batch.severity_counts();
        info!(
            records = batch.records.len(),
            p25 = thresholds.p25,
            p50 = thresholds.p50,
            p75 = thresholds.p75,
            "Scored run: {} normal, {} minor, {} moderate, {} severe",
            counts[0].1,
            counts[1].1,
            counts[2].1,
            counts[3].1
        );
        Ok(batch)
    }

    /// Raw output of every extractor, for inspection
    pub fn signals(
        &self,
        observations: &[RevenueObservation],
    ) -> Result<Vec<SignalScore>, ScoringError> {
        self.validator.validate(observations)?;
        let series = group_by_country(observations);
        Ok(extract_all(&series, &self.config.signals)
            .into_iter()
            .flat_map(|(_, scores)| scores)
            .collect())
    }
}

/// Score observations with the default configuration
pub fn score(observations: &[RevenueObservation]) -> Result<Vec<AnomalyRecord>, ScoringError> {
    AnomalyEngine::new(EngineConfig::default())?.score(observations)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::Severity;

    fn obs(country: &str, month: u32, revenue: f64) -> RevenueObservation {
        RevenueObservation::new(country, Month::new(1995, month).unwrap(), revenue)
    }

    #[test]
    fn test_empty_input_is_empty_output() {
        assert!(score(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_single_month_countries_are_not_scored() {
        let records = score(&[obs("A", 1, 10.0), obs("B", 1, 20.0)]).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_short_country_absent_from_output() {
        let records = score(&[
            obs("A", 1, 10.0),
            obs("A", 2, 12.0),
            obs("A", 3, 11.0),
            obs("B", 2, 20.0),
        ])
        .unwrap();
        assert_eq!(records.len(), 3);
        assert!(records.iter().all(|r| r.country == "A"));
    }

    #[test]
    fn test_first_month_has_no_momentum() {
        let records = score(&[obs("A", 1, 10.0), obs("A", 2, 20.0)]).unwrap();
        let first = records.iter().find(|r| r.month == Month::new(1995, 1).unwrap());
        let first = first.unwrap();
        assert_eq!(first.component_scores.get(SignalKind::Momentum), None);
        assert_eq!(first.revenue_mom_change, None);
        assert_eq!(first.component_scores.available(), 3);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = EngineConfig::default();
        config.signals.epsilon = -1.0;
        assert!(matches!(
            AnomalyEngine::new(config),
            Err(ScoringError::Config(_))
        ));
    }

    #[test]
    fn test_spike_is_flagged() {
        let records = score(&[
            obs("A", 1, 100.0),
            obs("A", 2, 100.0),
            obs("A", 3, 100.0),
            obs("A", 4, 100.0),
            obs("A", 5, 500.0),
        ])
        .unwrap();
        let top = &records[0];
        assert_eq!(top.month, Month::new(1995, 5).unwrap());
        assert_eq!(top.severity, Severity::Severe);
        assert!(top.anomaly_types.contains(&SignalKind::Momentum));
        assert!(top.anomaly_types.contains(&SignalKind::Iqr));
        assert_eq!(top.revenue, 500.0);
        assert!((top.revenue_mom_change.unwrap() - 400.0).abs() < 1e-9);
    }

    #[test]
    fn test_signals_inspection() {
        let engine = AnomalyEngine::new(EngineConfig::default()).unwrap();
        let signals = engine
            .signals(&[obs("A", 1, 1.0), obs("A", 2, 2.0), obs("A", 3, 3.0)])
            .unwrap();
        // 3 zscore + 2 momentum + 3 correlation + 3 iqr
        assert_eq!(signals.len(), 11);
    }
}
