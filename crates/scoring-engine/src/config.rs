//! Engine configuration

use serde::{Deserialize, Serialize};
use signal_engine::{ConfigError, SignalConfig, SignalKind};

/// Relative weight of each signal in the composite score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignalWeights {
    pub zscore: f64,
    pub momentum: f64,
    pub correlation: f64,
    pub iqr: f64,
}

impl Default for SignalWeights {
    fn default() -> Self {
        Self {
            zscore: 0.25,
            momentum: 0.25,
            correlation: 0.25,
            iqr: 0.25,
        }
    }
}

impl SignalWeights {
    pub fn get(&self, kind: SignalKind) -> f64 {
        match kind {
            SignalKind::ZScore => self.zscore,
            SignalKind::Momentum => self.momentum,
            SignalKind::Correlation => self.correlation,
            SignalKind::Iqr => self.iqr,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("weights.zscore", self.zscore),
            ("weights.momentum", self.momentum),
            ("weights.correlation", self.correlation),
            ("weights.iqr", self.iqr),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::NotPositive { field, value });
            }
        }
        Ok(())
    }
}

/// Full scoring engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Extractor parameters
    pub signals: SignalConfig,
    /// Combiner weights
    pub weights: SignalWeights,
    /// Component score at which a signal is listed in a record's anomaly types
    pub flag_threshold: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            signals: SignalConfig::default(),
            weights: SignalWeights::default(),
            flag_threshold: 50.0,
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.signals.validate()?;
        self.weights.validate()?;
        if !(0.0..=100.0).contains(&self.flag_threshold) {
            return Err(ConfigError::OutOfRange {
                field: "flag_threshold",
                value: self.flag_threshold,
                min: 0.0,
                max: 100.0,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(EngineConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_zero_weight() {
        let config = EngineConfig {
            weights: SignalWeights {
                iqr: 0.0,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NotPositive { field: "weights.iqr", .. })
        ));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: EngineConfig =
            serde_json::from_str(r#"{"signals": {"zscore_cap": 3.0}, "flag_threshold": 60.0}"#)
                .unwrap();
        assert_eq!(config.signals.zscore_cap, 3.0);
        assert_eq!(config.signals.momentum_cap, 2.0);
        assert_eq!(config.weights, SignalWeights::default());
        assert_eq!(config.flag_threshold, 60.0);
    }
}
