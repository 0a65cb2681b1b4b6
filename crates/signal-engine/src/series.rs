//! Per-country revenue series

use std::collections::BTreeMap;

use revenue_validator::{Month, RevenueObservation};

/// One month of a country's series
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesPoint {
    pub month: Month,
    pub revenue: f64,
}

/// A country's observations ordered by month
#[derive(Debug, Clone, PartialEq)]
pub struct CountrySeries {
    pub country: String,
    /// Strictly increasing by month; gaps allowed
    pub points: Vec<SeriesPoint>,
}

impl CountrySeries {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Revenue values in month order
    pub fn revenues(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.revenue).collect()
    }

    /// Whether the series has enough history to be scored
    pub fn has_history(&self, min_history: usize) -> bool {
        self.points.len() >= min_history
    }

    /// Number of calendar months missing between the first and last point
    pub fn gap_count(&self) -> usize {
        match (self.points.first(), self.points.last()) {
            (Some(first), Some(last)) => {
                let span = first.month.months_until(&last.month) as usize + 1;
                span - self.points.len()
            }
            _ => 0,
        }
    }
}

/// Group validated observations into series, ordered by country name.
///
/// Expects at most one observation per (country, month).
pub fn group_by_country(observations: &[RevenueObservation]) -> Vec<CountrySeries> {
    let mut grouped: BTreeMap<&str, Vec<SeriesPoint>> = BTreeMap::new();
    for obs in observations {
        grouped.entry(obs.country.as_str()).or_default().push(SeriesPoint {
            month: obs.month,
            revenue: obs.revenue,
        });
    }

    grouped
        .into_iter()
        .map(|(country, mut points)| {
            points.sort_by_key(|p| p.month);
            CountrySeries {
                country: country.to_string(),
                points,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obs(country: &str, year: i32, month: u32, revenue: f64) -> RevenueObservation {
        RevenueObservation::new(country, Month::new(year, month).unwrap(), revenue)
    }

    #[test]
    fn test_grouping_orders_countries_and_months() {
        let series = group_by_country(&[
            obs("GERMANY", 1995, 2, 20.0),
            obs("FRANCE", 1995, 3, 3.0),
            obs("FRANCE", 1995, 1, 1.0),
            obs("GERMANY", 1995, 1, 10.0),
        ]);
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].country, "FRANCE");
        assert_eq!(series[0].revenues(), vec![1.0, 3.0]);
        assert_eq!(series[1].country, "GERMANY");
        assert_eq!(series[1].revenues(), vec![10.0, 20.0]);
    }

    #[test]
    fn test_gap_count() {
        let series = group_by_country(&[
            obs("FRANCE", 1995, 1, 1.0),
            obs("FRANCE", 1995, 4, 1.0),
            obs("FRANCE", 1995, 5, 1.0),
        ]);
        assert_eq!(series[0].gap_count(), 2);
        assert!(series[0].has_history(2));
        assert!(!series[0].has_history(4));
    }
}
