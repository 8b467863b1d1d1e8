//! Descriptive statistics over a slice of values.

/// Arithmetic mean, `None` for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Median, averaging the two middle values for an even length.
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

/// Sample standard deviation (n - 1 denominator).
///
/// Fewer than two values have no spread and yield 0.
pub fn sample_std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }

    let Some(avg) = mean(values) else {
        return 0.0;
    };

    // Identical values must give exactly 0, not a rounding residue.
    if values.iter().all(|v| *v == values[0]) {
        return 0.0;
    }

    let sq_diff: f64 = values.iter().map(|v| (v - avg).powi(2)).sum();
    (sq_diff / (values.len() - 1) as f64).sqrt()
}
