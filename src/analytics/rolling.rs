//! Trailing moving averages and spike scores over a count series

/// Per-bucket rolling statistics for one category
#[derive(Debug, Clone, PartialEq)]
pub struct RollingPoint {
    /// Count observed in this bucket
    pub count: u64,

    /// Trailing mean over the window ending at this bucket (inclusive),
    /// absent until the first full window
    pub mean: Option<f64>,
}

impl RollingPoint {
    /// `count / mean`, absent when the mean is missing or zero
    #[must_use]
    pub fn spike_score(&self) -> Option<f64> {
        match self.mean {
            Some(mean) if mean > 0.0 => Some(self.count as f64 / mean),
            _ => None,
        }
    }
}

/// Compute a simple trailing moving average of `window` values
///
/// The window includes the current value. Points before the first full
/// window have no mean.
#[must_use]
pub fn rolling_means(counts: &[u64], window: usize) -> Vec<RollingPoint> {
    let window = window.max(1);
    let mut points = Vec::with_capacity(counts.len());
    // u128 holds any window of u64 counts without overflow
    let mut sum: u128 = 0;

    for (i, &count) in counts.iter().enumerate() {
        sum += u128::from(count);
        if i >= window {
            sum -= u128::from(counts[i - window]);
        }

        let mean = (i + 1 >= window).then(|| sum as f64 / window as f64);
        points.push(RollingPoint { count, mean });
    }

    points
}
