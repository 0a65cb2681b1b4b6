//! Input validator for revenue observations

use std::collections::HashSet;

use tracing::{debug, warn};

use crate::error::ValidationError;
use crate::month::Month;
use crate::observation::RevenueObservation;

/// Result of checking a whole batch
#[derive(Debug, Clone)]
pub struct ValidationResult {
    /// Whether every observation is valid
    pub valid: bool,
    /// All problems found, in input order
    pub errors: Vec<ValidationError>,
    /// Number of observations checked
    pub records_checked: usize,
}

impl ValidationResult {
    /// Create a valid result
    pub fn valid(records_checked: usize) -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
            records_checked,
        }
    }

    /// Create an invalid result with errors
    pub fn invalid(errors: Vec<ValidationError>, records_checked: usize) -> Self {
        Self {
            valid: false,
            errors,
            records_checked,
        }
    }
}

/// Validator for revenue observation batches
#[derive(Debug, Default, Clone, Copy)]
pub struct Validator;

impl Validator {
    pub fn new() -> Self {
        Self
    }

    /// Validate a single observation in isolation
    pub fn validate_observation(&self, obs: &RevenueObservation) -> Result<(), ValidationError> {
        if obs.country.trim().is_empty() {
            return Err(ValidationError::MissingCountry {
                month: obs.month.to_string(),
            });
        }
        if !obs.revenue.is_finite() {
            return Err(ValidationError::NonFiniteRevenue {
                country: obs.country.clone(),
                month: obs.month.to_string(),
            });
        }
        if obs.revenue < 0.0 {
            return Err(ValidationError::NegativeRevenue {
                country: obs.country.clone(),
                month: obs.month.to_string(),
                revenue: obs.revenue,
            });
        }
        Ok(())
    }

    /// Validate a batch, stopping at the first problem
    pub fn validate(&self, observations: &[RevenueObservation]) -> Result<(), ValidationError> {
        let mut seen: HashSet<(&str, Month)> = HashSet::with_capacity(observations.len());
        for obs in observations {
            if let Err(e) = self.validate_observation(obs) {
                warn!("Rejecting input: {}", e);
                return Err(e);
            }
            if !seen.insert((obs.country.as_str(), obs.month)) {
                let e = ValidationError::DuplicateObservation {
                    country: obs.country.clone(),
                    month: obs.month.to_string(),
                };
                warn!("Rejecting input: {}", e);
                return Err(e);
            }
        }
        debug!("Validated {} observations", observations.len());
        Ok(())
    }

    /// Check a batch and collect every problem
    pub fn check(&self, observations: &[RevenueObservation]) -> ValidationResult {
        let mut seen: HashSet<(&str, Month)> = HashSet::with_capacity(observations.len());
        let mut errors = Vec::new();
        for obs in observations {
            if let Err(e) = self.validate_observation(obs) {
                errors.push(e);
            }
            if !seen.insert((obs.country.as_str(), obs.month)) {
                errors.push(ValidationError::DuplicateObservation {
                    country: obs.country.clone(),
                    month: obs.month.to_string(),
                });
            }
        }
        if errors.is_empty() {
            ValidationResult::valid(observations.len())
        } else {
            ValidationResult::invalid(errors, observations.len())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obs(country: &str, year: i32, month: u32, revenue: f64) -> RevenueObservation {
        RevenueObservation::new(country, Month::new(year, month).unwrap(), revenue)
    }

    #[test]
    fn test_valid_batch() {
        let validator = Validator::new();
        let batch = vec![
            obs("FRANCE", 1995, 1, 100.0),
            obs("FRANCE", 1995, 2, 0.0),
            obs("GERMANY", 1995, 1, 250.0),
        ];
        assert!(validator.validate(&batch).is_ok());
        assert!(validator.check(&batch).valid);
    }

    #[test]
    fn test_negative_revenue() {
        let validator = Validator::new();
        let err = validator
            .validate(&[obs("FRANCE", 1995, 1, -1.0)])
            .unwrap_err();
        assert_eq!(err.offending(), Some(("FRANCE", "1995-01")));
    }

    #[test]
    fn test_non_finite_revenue() {
        let validator = Validator::new();
        assert!(matches!(
            validator.validate(&[obs("FRANCE", 1995, 1, f64::NAN)]),
            Err(ValidationError::NonFiniteRevenue { .. })
        ));
    }

    #[test]
    fn test_duplicate_pair() {
        let validator = Validator::new();
        let batch = vec![
            obs("FRANCE", 1995, 3, 100.0),
            obs("GERMANY", 1995, 3, 100.0),
            obs("FRANCE", 1995, 3, 120.0),
        ];
        assert_eq!(
            validator.validate(&batch),
            Err(ValidationError::DuplicateObservation {
                country: "FRANCE".to_string(),
                month: "1995-03".to_string(),
            })
        );
    }

    #[test]
    fn test_blank_country() {
        let validator = Validator::new();
        assert!(matches!(
            validator.validate(&[obs("  ", 1995, 1, 1.0)]),
            Err(ValidationError::MissingCountry { .. })
        ));
    }

    #[test]
    fn test_check_collects_all() {
        let validator = Validator::new();
        let batch = vec![
            obs("FRANCE", 1995, 1, -5.0),
            obs("FRANCE", 1995, 1, 5.0),
            obs("", 1995, 2, 5.0),
        ];
        let result = validator.check(&batch);
        assert!(!result.valid);
        assert_eq!(result.errors.len(), 3);
        assert_eq!(result.records_checked, 3);
    }
}
