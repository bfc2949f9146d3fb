/// Grouping of [Welford Online](https://en.wikipedia.org/wiki/Algorithms_for_calculating_variance#Welford's_online_algorithm)
/// algorithms for calculating running values such as the mean in one pass through.
pub mod welford_online {
    /// Calculates the next mean.
    pub fn calculate_mean<T>(mut prev_mean: T, next_value: T, count: T) -> T
    where
        T: Copy + std::ops::Sub<Output = T> + std::ops::Div<Output = T> + std::ops::AddAssign,
    {
        prev_mean += (next_value - prev_mean) / count;
        prev_mean
    }
}

/// Arithmetic mean of the dataset, skipping missing (`NaN`) values.
///
/// Returns `NaN` if the dataset contains no defined values.
pub fn mean_skip_missing(values: impl IntoIterator<Item = f64>) -> f64 {
    let (mean, count) = values
        .into_iter()
        .filter(|value| !value.is_nan())
        .fold((0.0, 0.0), |(mean, count), value| {
            let count = count + 1.0;
            (welford_online::calculate_mean(mean, value, count), count)
        });

    if count == 0.0 { f64::NAN } else { mean }
}
