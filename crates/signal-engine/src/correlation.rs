//! Correlation-breakdown signal
//!
//! A country's expected revenue for a month is the cross-country mean for that
//! month scaled by the country's typical ratio to that mean. The score is the
//! relative residual between actual and expected revenue.

use std::collections::BTreeMap;

use revenue_validator::Month;

use crate::series::CountrySeries;
use crate::signal::{CorrelationWindow, SignalConfig, SignalKind, SignalScore};
use crate::statistics::{mean, normalize};

/// Mean revenue per month across every country observed in that month
fn cross_country_mean(series: &[CountrySeries]) -> BTreeMap<Month, f64> {
    let mut by_month: BTreeMap<Month, Vec<f64>> = BTreeMap::new();
    for s in series {
        for p in &s.points {
            by_month.entry(p.month).or_default().push(p.revenue);
        }
    }
    by_month
        .into_iter()
        .map(|(month, values)| (month, mean(&values)))
        .collect()
}

pub(crate) fn extract(series: &[CountrySeries], config: &SignalConfig) -> Vec<SignalScore> {
    let trend = cross_country_mean(series);
    let mut scores = Vec::new();

    for s in series.iter().filter(|s| s.has_history(config.min_history)) {
        let market: Vec<f64> = s
            .points
            .iter()
            .map(|p| trend.get(&p.month).copied().unwrap_or(0.0))
            .collect();
        // Months where the market is empty carry no ratio information
        let ratios: Vec<Option<f64>> = s
            .points
            .iter()
            .zip(&market)
            .map(|(p, &m)| (m > config.epsilon).then(|| p.revenue / m))
            .collect();

        for (i, p) in s.points.iter().enumerate() {
            let window: Vec<f64> = match config.correlation_window {
                CorrelationWindow::Full => ratios.iter().flatten().copied().collect(),
                CorrelationWindow::Trailing { months } => ratios[i.saturating_sub(months)..i]
                    .iter()
                    .flatten()
                    .copied()
                    .collect(),
            };
            let ratio = match (window.is_empty(), config.correlation_window) {
                (false, _) => mean(&window),
                (true, CorrelationWindow::Full) => 1.0,
                (true, CorrelationWindow::Trailing { .. }) => continue,
            };

            let expected = ratio * market[i];
            let residual = if expected.is_finite() {
                (p.revenue - expected).abs() / expected.max(config.epsilon)
            } else {
                // Same residual measured in ratio units
                (p.revenue / market[i] - ratio).abs() / ratio
            };
            scores.push(SignalScore::new(
                &s.country,
                p.month,
                SignalKind::Correlation,
                normalize(residual, config.correlation_residual_threshold),
                residual,
            ));
        }
    }
    scores
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::group_by_country;
    use revenue_validator::RevenueObservation;

    fn obs(country: &str, month: u32, revenue: f64) -> RevenueObservation {
        RevenueObservation::new(country, Month::new(1995, month).unwrap(), revenue)
    }

    fn scores_for<'a>(scores: &'a [SignalScore], country: &str) -> Vec<&'a SignalScore> {
        scores.iter().filter(|s| s.country == country).collect()
    }

    #[test]
    fn test_proportional_countries_score_zero() {
        // B is always twice A, so both follow the shared trend exactly
        let mut input = Vec::new();
        for (m, base) in [(1, 100.0), (2, 150.0), (3, 90.0), (4, 200.0)] {
            input.push(obs("A", m, base));
            input.push(obs("B", m, base * 2.0));
        }
        let scores = extract(&group_by_country(&input), &SignalConfig::default());
        assert_eq!(scores.len(), 8);
        assert!(scores.iter().all(|s| s.value < 1e-9));
    }

    #[test]
    fn test_diverging_country_scores_higher() {
        let mut input = Vec::new();
        for m in 1..=6 {
            input.push(obs("A", m, 100.0));
            input.push(obs("B", m, 100.0));
            input.push(obs("C", m, if m == 6 { 400.0 } else { 100.0 }));
        }
        let scores = extract(&group_by_country(&input), &SignalConfig::default());
        let c = scores_for(&scores, "C");
        let c_last = c.last().map(|s| s.value).unwrap_or(0.0);
        assert!(c[..5].iter().all(|s| s.value < c_last));
        let a = scores_for(&scores, "A");
        assert!(a.last().map(|s| s.value).unwrap_or(100.0) < c_last);
    }

    #[test]
    fn test_extreme_revenues_stay_bounded() {
        let mut input = Vec::new();
        for (m, a, b, c) in [
            (1, f64::MAX, 0.0, f64::MAX),
            (2, 0.0, f64::MAX, f64::MAX),
            (3, f64::MAX, 0.0, 1.0),
            (4, 1e308, 1e308, 0.0),
        ] {
            input.push(obs("A", m, a));
            input.push(obs("B", m, b));
            input.push(obs("C", m, c));
        }
        let scores = extract(&group_by_country(&input), &SignalConfig::default());
        assert_eq!(scores.len(), 12);
        for s in &scores {
            assert!((0.0..=100.0).contains(&s.value), "{} {}: {}", s.country, s.month, s.value);
            assert!(!s.raw.is_nan());
        }
    }

    #[test]
    fn test_flat_identical_countries_are_exactly_zero() {
        let mut input = Vec::new();
        for m in 1..=4 {
            for country in ["A", "B", "C"] {
                input.push(obs(country, m, 0.1));
            }
        }
        let scores = extract(&group_by_country(&input), &SignalConfig::default());
        assert!(scores.iter().all(|s| s.value == 0.0));
    }

    #[test]
    fn test_trailing_window_skips_first_month() {
        let mut input = Vec::new();
        for m in 1..=4 {
            input.push(obs("A", m, 100.0 * m as f64));
            input.push(obs("B", m, 50.0));
        }
        let config = SignalConfig {
            correlation_window: CorrelationWindow::Trailing { months: 2 },
            ..Default::default()
        };
        let scores = extract(&group_by_country(&input), &config);
        let a = scores_for(&scores, "A");
        assert_eq!(a.len(), 3);
        assert_eq!(a[0].month, Month::new(1995, 2).unwrap());
    }

    #[test]
    fn test_all_zero_revenue() {
        let input = vec![obs("A", 1, 0.0), obs("A", 2, 0.0), obs("B", 1, 0.0), obs("B", 2, 0.0)];
        let scores = extract(&group_by_country(&input), &SignalConfig::default());
        assert_eq!(scores.len(), 4);
        assert!(scores.iter().all(|s| s.value == 0.0));
    }
}
