//! IQR outlier signal: distance beyond the Tukey fence

use crate::series::CountrySeries;
use crate::signal::{SignalConfig, SignalKind, SignalScore};
use crate::statistics::{normalize, StatisticalSummary};

pub(crate) fn extract(series: &[CountrySeries], config: &SignalConfig) -> Vec<SignalScore> {
    let mut scores = Vec::new();
    for s in series.iter().filter(|s| s.has_history(config.min_history)) {
        let stats = StatisticalSummary::compute(&s.revenues());
        let spread = config.iqr_multiplier * (stats.q3 - stats.q1);
        let lower = stats.q1 - spread;
        let upper = stats.q3 + spread;
        // Zero at the fence, saturating one fence-width further out
        let scale = spread.max(config.epsilon);

        for p in &s.points {
            let beyond = if p.revenue < lower {
                lower - p.revenue
            } else if p.revenue > upper {
                p.revenue - upper
            } else {
                0.0
            };
            let raw = beyond / scale;
            scores.push(SignalScore::new(
                &s.country,
                p.month,
                SignalKind::Iqr,
                normalize(raw, 1.0),
                raw,
            ));
        }
    }
    scores
}
