//! Momentum signal: relative change against the previous observation

use crate::series::CountrySeries;
use crate::signal::{SignalConfig, SignalKind, SignalScore};
use crate::statistics::normalize;

pub(crate) fn extract(series: &[CountrySeries], config: &SignalConfig) -> Vec<SignalScore> {
    let mut scores = Vec::new();
    for s in series.iter().filter(|s| s.has_history(config.min_history)) {
        // First point has no predecessor and gets no score
        for pair in s.points.windows(2) {
            let (prev, cur) = (pair[0], pair[1]);
            let change = (cur.revenue - prev.revenue) / prev.revenue.max(config.epsilon);
            scores.push(SignalScore::new(
                &s.country,
                cur.month,
                SignalKind::Momentum,
                normalize(change.abs(), config.momentum_cap),
                change,
            ));
        }
    }
    scores
}
