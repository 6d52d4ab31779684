//! Descriptive statistics over numeric samples.

use desercion_model::{HistogramBin, NumericSummary};

/// Summarize a sample. Non-finite values are ignored; an empty sample has no
/// summary.
///
/// The standard deviation uses the sample (n - 1) denominator and is `None`
/// for a single value.
pub fn summarize(values: &[f64]) -> Option<NumericSummary> {
    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if sorted.is_empty() {
        return None;
    }
    sorted.sort_by(f64::total_cmp);

    let count = sorted.len();
    let mean = sorted.iter().sum::<f64>() / count as f64;
    let std = (count > 1).then(|| {
        let squares: f64 = sorted.iter().map(|v| (v - mean).powi(2)).sum();
        (squares / (count - 1) as f64).sqrt()
    });

    Some(NumericSummary {
        count,
        mean,
        std,
        min: sorted[0],
        q1: quantile_sorted(&sorted, 0.25),
        median: quantile_sorted(&sorted, 0.5),
        q3: quantile_sorted(&sorted, 0.75),
        max: sorted[count - 1],
    })
}

/// Linear-interpolation quantile of an ascending, non-empty sample.
///
/// Position is `q * (n - 1)`, the same rule as numpy's default.
pub fn quantile_sorted(sorted: &[f64], q: f64) -> f64 {
    let last = sorted.len().saturating_sub(1);
    let position = q.clamp(0.0, 1.0) * last as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * fraction
}

/// Equal-width histogram over the finite values.
///
/// Bins are half-open except the last, which also includes the maximum. When
/// every value is equal the range is widened to `value ± 0.5`.
pub fn histogram(values: &[f64], bins: usize) -> Vec<HistogramBin> {
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.is_empty() || bins == 0 {
        return Vec::new();
    }

    let mut min = finite.iter().copied().fold(f64::INFINITY, f64::min);
    let mut max = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if min == max {
        min -= 0.5;
        max += 0.5;
    }
    let width = (max - min) / bins as f64;

    let mut counts = vec![0usize; bins];
    for value in finite {
        let idx = (((value - min) / width) as usize).min(bins - 1);
        counts[idx] += 1;
    }

    counts
        .into_iter()
        .enumerate()
        .map(|(idx, count)| HistogramBin {
            lower: min + width * idx as f64,
            upper: if idx + 1 == bins {
                max
            } else {
                min + width * (idx + 1) as f64
            },
            count,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_matches_describe() {
        let summary = summarize(&[18.0, 20.0, 22.0, 24.0, 41.0]).unwrap();
        assert_eq!(summary.count, 5);
        assert!((summary.mean - 25.0).abs() < 1e-9);
        assert_eq!(summary.min, 18.0);
        assert_eq!(summary.q1, 20.0);
        assert_eq!(summary.median, 22.0);
        assert_eq!(summary.q3, 24.0);
        assert_eq!(summary.max, 41.0);
        // sample variance = (49 + 25 + 9 + 1 + 256) / 4 = 85
        assert!((summary.std.unwrap() - 85.0_f64.sqrt()).abs() < 1e-9);
    }

    #[test]
    fn quartiles_interpolate() {
        let summary = summarize(&[1.0, 2.0, 3.0, 4.0]).unwrap();
        assert_eq!(summary.q1, 1.75);
        assert_eq!(summary.median, 2.5);
        assert_eq!(summary.q3, 3.25);
    }

    #[test]
    fn single_value_has_no_std() {
        let summary = summarize(&[19.0]).unwrap();
        assert_eq!(summary.std, None);
        assert_eq!(summary.median, 19.0);
        assert!(summarize(&[]).is_none());
        assert!(summarize(&[f64::NAN]).is_none());
    }

    #[test]
    fn histogram_closes_last_bin() {
        let bins = histogram(&[0.0, 1.0, 2.0, 3.0, 4.0], 2);
        assert_eq!(bins.len(), 2);
        assert_eq!(bins[0].count, 2);
        assert_eq!(bins[1].count, 3);
        assert_eq!(bins[1].upper, 4.0);
    }

    #[test]
    fn histogram_widens_degenerate_range() {
        let bins = histogram(&[20.0, 20.0], 4);
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), 2);
        assert_eq!(bins[0].lower, 19.5);
        assert_eq!(bins[3].upper, 20.5);
        assert!(histogram(&[], 30).is_empty());
    }
}
