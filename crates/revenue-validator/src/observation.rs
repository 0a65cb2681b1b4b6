//! Revenue records

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::month::Month;

/// Aggregated revenue for one country in one month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevenueObservation {
    pub country: String,
    pub month: Month,
    pub revenue: f64,
}

impl RevenueObservation {
    pub fn new(country: impl Into<String>, month: Month, revenue: f64) -> Self {
        Self {
            country: country.into(),
            month,
            revenue,
        }
    }
}

/// Warehouse row shape: country, year, month number, aggregated revenue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRevenueRow {
    pub country: String,
    pub year: i32,
    pub month: u32,
    pub revenue: f64,
}

impl TryFrom<RawRevenueRow> for RevenueObservation {
    type Error = ValidationError;

    fn try_from(row: RawRevenueRow) -> Result<Self, Self::Error> {
        let month = Month::new(row.year, row.month)?;
        Ok(RevenueObservation {
            country: row.country,
            month,
            revenue: row.revenue,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_row_conversion() {
        let row = RawRevenueRow {
            country: "FRANCE".to_string(),
            year: 1995,
            month: 3,
            revenue: 1200.5,
        };
        let obs = RevenueObservation::try_from(row).unwrap();
        assert_eq!(obs.country, "FRANCE");
        assert_eq!(obs.month.to_string(), "1995-03");
        assert_eq!(obs.revenue, 1200.5);
    }

    #[test]
    fn test_raw_row_bad_month() {
        let row = RawRevenueRow {
            country: "FRANCE".to_string(),
            year: 1995,
            month: 14,
            revenue: 10.0,
        };
        assert_eq!(
            RevenueObservation::try_from(row),
            Err(ValidationError::InvalidMonth { year: 1995, month: 14 })
        );
    }
}
