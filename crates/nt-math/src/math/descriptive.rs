//! Simple descriptive statistics over sequences with gaps.

/// Arithmetic mean of the present values, `None` when nothing is present.
pub fn mean(values: &[Option<f64>]) -> Option<f64> {
    let present: Vec<f64> = values.iter().flatten().copied().collect();
    if present.is_empty() {
        return None;
    }
    Some(present.iter().sum::<f64>() / present.len() as f64)
}

/// Population variance of the present values.
pub fn population_variance(values: &[Option<f64>]) -> Option<f64> {
    let avg = mean(values)?;
    let present: Vec<f64> = values.iter().flatten().copied().collect();
    let sum_sq = present.iter().map(|v| (v - avg).powi(2)).sum::<f64>();
    Some(sum_sq / present.len() as f64)
}

/// Population standard deviation of the present values.
pub fn population_std_dev(values: &[Option<f64>]) -> Option<f64> {
    population_variance(values).map(f64::sqrt)
}
