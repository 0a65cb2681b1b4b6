//! Signal kinds, scores and the extractor dispatch table

use std::fmt;

use rayon::prelude::*;
use revenue_validator::Month;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::series::CountrySeries;
use crate::{correlation, iqr, momentum, zscore, ConfigError};

/// The four anomaly detectors
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalKind {
    /// Distance from the country's own mean
    ZScore,
    /// Month-over-month relative change
    Momentum,
    /// Divergence from the cross-country trend
    Correlation,
    /// Position outside the interquartile fence
    Iqr,
}

impl SignalKind {
    pub const ALL: [SignalKind; 4] = [
        SignalKind::ZScore,
        SignalKind::Momentum,
        SignalKind::Correlation,
        SignalKind::Iqr,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SignalKind::ZScore => "zscore",
            SignalKind::Momentum => "momentum",
            SignalKind::Correlation => "correlation",
            SignalKind::Iqr => "iqr",
        }
    }

    /// Position in `ALL`
    pub fn index(&self) -> usize {
        match self {
            SignalKind::ZScore => 0,
            SignalKind::Momentum => 1,
            SignalKind::Correlation => 2,
            SignalKind::Iqr => 3,
        }
    }
}

impl fmt::Display for SignalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One detector's normalized reading for a (country, month)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalScore {
    pub country: String,
    pub month: Month,
    pub signal: SignalKind,
    /// Normalized score in [0, 100]
    pub value: f64,
    /// Un-normalized statistic behind `value`
    pub raw: f64,
}

impl SignalScore {
    pub fn new(country: &str, month: Month, signal: SignalKind, value: f64, raw: f64) -> Self {
        Self {
            country: country.to_string(),
            month,
            signal,
            value,
            raw,
        }
    }
}

/// How the correlation signal derives a country's ratio to the cross-country mean
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CorrelationWindow {
    /// Average ratio over the whole series
    #[default]
    Full,
    /// Average ratio over up to `months` observations preceding the scored one
    Trailing { months: usize },
}

/// Parameters shared by the extractors
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignalConfig {
    /// Minimum observations a country needs before any signal is emitted
    pub min_history: usize,
    /// Guard for divisions by a zero revenue or zero spread
    pub epsilon: f64,
    /// Standard deviations at which the z-score signal saturates
    pub zscore_cap: f64,
    /// Relative change at which the momentum signal saturates
    pub momentum_cap: f64,
    /// Relative residual at which the correlation signal saturates
    pub correlation_residual_threshold: f64,
    pub correlation_window: CorrelationWindow,
    /// Fence width in IQRs
    pub iqr_multiplier: f64,
}

impl Default for SignalConfig {
    fn default() -> Self {
        Self {
            min_history: 2,
            epsilon: 1e-9,
            zscore_cap: 4.0,
            momentum_cap: 2.0,
            correlation_residual_threshold: 1.0,
            correlation_window: CorrelationWindow::Full,
            iqr_multiplier: 1.5,
        }
    }
}

impl SignalConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_history < 2 {
            return Err(ConfigError::MinHistory(self.min_history));
        }
        for (field, value) in [
            ("epsilon", self.epsilon),
            ("zscore_cap", self.zscore_cap),
            ("momentum_cap", self.momentum_cap),
            (
                "correlation_residual_threshold",
                self.correlation_residual_threshold,
            ),
            ("iqr_multiplier", self.iqr_multiplier),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::NotPositive { field, value });
            }
        }
        if let CorrelationWindow::Trailing { months: 0 } = self.correlation_window {
            return Err(ConfigError::EmptyWindow);
        }
        Ok(())
    }
}

/// Uniform extractor signature
pub type Extractor = fn(&[CountrySeries], &SignalConfig) -> Vec<SignalScore>;

/// Dispatch table of every registered signal
pub const EXTRACTORS: [(SignalKind, Extractor); 4] = [
    (SignalKind::ZScore, zscore::extract),
    (SignalKind::Momentum, momentum::extract),
    (SignalKind::Correlation, correlation::extract),
    (SignalKind::Iqr, iqr::extract),
];

/// Run every extractor, in parallel, returning scores grouped by signal
/// in dispatch-table order
pub fn extract_all(
    series: &[CountrySeries],
    config: &SignalConfig,
) -> Vec<(SignalKind, Vec<SignalScore>)> {
    EXTRACTORS
        .par_iter()
        .map(|(kind, extract)| {
            let scores = extract(series, config);
            debug!("{} signal produced {} scores", kind, scores.len());
            (*kind, scores)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dispatch_table_matches_kinds() {
        for (i, (kind, _)) in EXTRACTORS.iter().enumerate() {
            assert_eq!(kind.index(), i);
            assert_eq!(SignalKind::ALL[i], *kind);
        }
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(SignalConfig::default().validate().is_ok());
    }

    #[test]
    fn test_config_rejects_bad_values() {
        let config = SignalConfig {
            zscore_cap: 0.0,
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::NotPositive {
                field: "zscore_cap",
                value: 0.0
            })
        );

        let config = SignalConfig {
            min_history: 1,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::MinHistory(1)));

        let config = SignalConfig {
            correlation_window: CorrelationWindow::Trailing { months: 0 },
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::EmptyWindow));
    }

    #[test]
    fn test_signal_kind_names() {
        let names: Vec<String> = SignalKind::ALL.iter().map(|k| k.to_string()).collect();
        assert_eq!(names, vec!["zscore", "momentum", "correlation", "iqr"]);
    }
}
