//! Validation Error Types

use thiserror::Error;

/// Errors raised while validating revenue input
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// Revenue below zero
    #[error("{country} {month}: revenue {revenue} is negative")]
    NegativeRevenue {
        country: String,
        month: String,
        revenue: f64,
    },

    /// Revenue is NaN or infinite
    #[error("{country} {month}: revenue is not a finite number")]
    NonFiniteRevenue { country: String, month: String },

    /// Second observation for the same (country, month)
    #[error("Duplicate observation for {country} {month}")]
    DuplicateObservation { country: String, month: String },

    /// Country name is empty or whitespace
    #[error("Missing country name for {month}")]
    MissingCountry { month: String },

    /// Year/month pair that does not exist on the calendar
    #[error("Invalid month: {year}-{month}")]
    InvalidMonth { year: i32, month: u32 },

    /// Unparseable month text
    #[error("Invalid data format: {0}")]
    InvalidFormat(String),
}

impl ValidationError {
    /// The (country, month) the error refers to, when there is one
    pub fn offending(&self) -> Option<(&str, &str)> {
        match self {
            ValidationError::NegativeRevenue { country, month, .. }
            | ValidationError::NonFiniteRevenue { country, month }
            | ValidationError::DuplicateObservation { country, month } => {
                Some((country.as_str(), month.as_str()))
            }
            ValidationError::MissingCountry { month } => Some(("", month.as_str())),
            ValidationError::InvalidMonth { .. } | ValidationError::InvalidFormat(_) => None,
        }
    }
}
