//! Score combiner
//!
//! Merges per-signal readings into one composite score per (country, month).
//! A signal missing for lack of history is `None`, never zero, and its weight
//! is redistributed over the signals that are present.

use std::collections::BTreeMap;

use revenue_validator::Month;
use serde::ser::{Serialize, SerializeMap, Serializer};
use signal_engine::{SignalKind, SignalScore};
use tracing::debug;

use crate::config::SignalWeights;

/// One signal's contribution to a record
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignalReading {
    /// Normalized score in [0, 100]
    pub value: f64,
    /// Un-normalized statistic
    pub raw: f64,
}

/// Readings for the four signals; absent means "not enough history"
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComponentScores {
    readings: [Option<SignalReading>; 4],
}

impl ComponentScores {
    pub fn set(&mut self, kind: SignalKind, reading: SignalReading) {
        self.readings[kind.index()] = Some(reading);
    }

    pub fn reading(&self, kind: SignalKind) -> Option<SignalReading> {
        self.readings[kind.index()]
    }

    /// Normalized score for a signal, if it was computed
    pub fn get(&self, kind: SignalKind) -> Option<f64> {
        self.reading(kind).map(|r| r.value)
    }

    /// Present signals in canonical order
    pub fn iter(&self) -> impl Iterator<Item = (SignalKind, SignalReading)> + '_ {
        SignalKind::ALL
            .iter()
            .filter_map(|kind| self.reading(*kind).map(|r| (*kind, r)))
    }

    pub fn available(&self) -> usize {
        self.readings.iter().flatten().count()
    }

    pub fn is_empty(&self) -> bool {
        self.available() == 0
    }

    /// Weighted average of present signals with renormalized weights.
    /// `None` when no signal is present.
    pub fn composite(&self, weights: &SignalWeights) -> Option<f64> {
        let (weighted, total) = self
            .iter()
            .fold((0.0, 0.0), |(sum, total), (kind, reading)| {
                let w = weights.get(kind);
                (sum + w * reading.value, total + w)
            });
        if total > 0.0 {
            Some((weighted / total).clamp(0.0, 100.0))
        } else {
            None
        }
    }
}

/// Serialized as `{signal_name: value}` over present signals only
impl Serialize for ComponentScores {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.available()))?;
        for (kind, reading) in self.iter() {
            map.serialize_entry(kind.as_str(), &reading.value)?;
        }
        map.end()
    }
}

/// Combined result for one (country, month)
#[derive(Debug, Clone, PartialEq)]
pub struct CombinedScore {
    pub country: String,
    pub month: Month,
    pub components: ComponentScores,
    pub composite: f64,
}

/// Weighted-average score combiner
pub struct ScoreCombiner {
    weights: SignalWeights,
}

impl ScoreCombiner {
    pub fn new(weights: SignalWeights) -> Self {
        Self { weights }
    }

    /// Combine every signal's scores. Needs the full output of all extractors.
    /// Points with no signal at all are left out.
    pub fn combine<'a, I>(&self, signal_scores: I) -> Vec<CombinedScore>
    where
        I: IntoIterator<Item = &'a SignalScore>,
    {
        let mut points: BTreeMap<(String, Month), ComponentScores> = BTreeMap::new();
        for score in signal_scores {
            points
                .entry((score.country.clone(), score.month))
                .or_default()
                .set(
                    score.signal,
                    SignalReading {
                        value: score.value,
                        raw: score.raw,
                    },
                );
        }

        let combined: Vec<CombinedScore> = points
            .into_iter()
            .filter_map(|((country, month), components)| {
                let composite = components.composite(&self.weights)?;
                Some(CombinedScore {
                    country,
                    month,
                    components,
                    composite,
                })
            })
            .collect();

        debug!("Combined scores for {} points", combined.len());
        combined
    }
}

impl Default for ScoreCombiner {
    fn default() -> Self {
        Self::new(SignalWeights::default())
    }
}
