//! Statistical helpers shared by the signal extractors

/// Summary statistics of one revenue series
#[derive(Debug, Clone, Default)]
pub struct StatisticalSummary {
    /// Number of values
    pub count: usize,
    /// Mean value
    pub mean: f64,
    /// Sample standard deviation (n - 1)
    pub std_dev: f64,
    /// Minimum value
    pub min: f64,
    /// Maximum value
    pub max: f64,
    /// First quartile
    pub q1: f64,
    /// Third quartile
    pub q3: f64,
}

impl StatisticalSummary {
    /// Compute summary statistics from a slice of values
    pub fn compute(values: &[f64]) -> Self {
        if values.is_empty() {
            return Self::default();
        }

        let n = values.len();
        let min = values.iter().cloned().fold(f64::MAX, f64::min);
        let max = values.iter().cloned().fold(f64::MIN, f64::max);
        let mean = mean(values);

        // Constant series are exactly zero-variance; skip the float sum
        let std_dev = if n < 2 || min == max {
            0.0
        } else {
            let m2: f64 = values.iter().map(|v| (v - mean) * (v - mean)).sum();
            if m2.is_finite() {
                (m2 / (n - 1) as f64).sqrt()
            } else {
                scaled_std_dev(values, mean)
            }
        };

        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);

        Self {
            count: n,
            mean,
            std_dev,
            min,
            max,
            q1: quantile(&sorted, 0.25).unwrap_or(0.0),
            q3: quantile(&sorted, 0.75).unwrap_or(0.0),
        }
    }
}

/// Arithmetic mean; exact for constant input
pub fn mean(values: &[f64]) -> f64 {
    let Some(&first) = values.first() else {
        return 0.0;
    };
    if values.iter().all(|&v| v == first) {
        return first;
    }
    let n = values.len() as f64;
    let sum: f64 = values.iter().sum();
    if sum.is_finite() {
        return sum / n;
    }
    // Sum overflowed: average in units of the largest magnitude
    let scale = max_abs(values.iter().copied());
    values.iter().map(|v| v / scale).sum::<f64>() / n * scale
}

/// Sample standard deviation for values whose squared deviations overflow
fn scaled_std_dev(values: &[f64], mean: f64) -> f64 {
    let scale = max_abs(values.iter().map(|v| v - mean));
    if scale == 0.0 || !scale.is_finite() {
        return 0.0;
    }
    let m2: f64 = values
        .iter()
        .map(|v| (v - mean) / scale)
        .map(|d| d * d)
        .sum();
    (m2 / (values.len() - 1) as f64).sqrt() * scale
}

fn max_abs(values: impl Iterator<Item = f64>) -> f64 {
    values.fold(0.0, |m, v| m.max(v.abs()))
}

/// Quantile of an ascending-sorted slice, linear interpolation between
/// closest ranks. `p` is clamped to [0, 1].
pub fn quantile(sorted: &[f64], p: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let h = (sorted.len() - 1) as f64 * p.clamp(0.0, 1.0);
    let lo = h.floor() as usize;
    let hi = h.ceil() as usize;
    let frac = h - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

/// Clamp `value` into [0, cap] and scale to [0, 100]. NaN saturates at 100.
pub fn normalize(value: f64, cap: f64) -> f64 {
    if value.is_nan() {
        return 100.0;
    }
    value.clamp(0.0, cap) / cap * 100.0
}
