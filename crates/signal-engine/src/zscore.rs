//! Z-score signal: distance of each month from the country's own mean

use crate::series::CountrySeries;
use crate::signal::{SignalConfig, SignalKind, SignalScore};
use crate::statistics::{normalize, StatisticalSummary};

pub(crate) fn extract(series: &[CountrySeries], config: &SignalConfig) -> Vec<SignalScore> {
    let mut scores = Vec::new();
    for s in series.iter().filter(|s| s.has_history(config.min_history)) {
        let stats = StatisticalSummary::compute(&s.revenues());
        for p in &s.points {
            let (value, raw) = if stats.std_dev > 0.0 {
                let z = (p.revenue - stats.mean) / stats.std_dev;
                (normalize(z.abs(), config.zscore_cap), z)
            } else {
                (0.0, 0.0)
            };
            scores.push(SignalScore::new(&s.country, p.month, SignalKind::ZScore, value, raw));
        }
    }
    scores
}
