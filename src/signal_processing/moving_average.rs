use super::filter::SignalFilter;

/// Symmetric moving average over `[i - window/2, i + window/2]`
///
/// Samples outside the sequence are not padded: near the edges the mean is
/// taken over the points that exist, so the boundary region is biased toward
/// the interior and should not feed threshold decisions.
///
/// A `window_size` of 0 returns the input unchanged.
///
/// # Example
/// ```
/// use ecgpeaks::signal_processing::moving_average;
///
/// let smoothed = moving_average(&[0.0, 3.0, 0.0], 2);
/// assert_eq!(smoothed, vec![1.5, 1.0, 1.5]);
/// ```
pub fn moving_average(data: &[f64], window_size: usize) -> Vec<f64> {
    if data.is_empty() || window_size == 0 {
        return data.to_vec();
    }

    let half = window_size / 2;
    let last = data.len() - 1;

    (0..data.len())
        .map(|i| {
            let lo = i.saturating_sub(half);
            let hi = i.saturating_add(half).min(last);
            let window = &data[lo..=hi];
            window.iter().sum::<f64>() / window.len() as f64
        })
        .collect()
}

/// Moving average smoothing filter
///
/// Stateless wrapper around [`moving_average`] for use behind the
/// `SignalFilter` seam.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MovingAverage {
    window_size: usize,
}

impl MovingAverage {
    /// Create a new moving average filter
    ///
    /// # Arguments
    /// * `window_size` - Neighbourhood width (larger = smoother, 0 = pass-through)
    pub fn new(window_size: usize) -> Self {
        Self { window_size }
    }

    pub fn window_size(&self) -> usize {
        self.window_size
    }
}

impl SignalFilter for MovingAverage {
    fn apply(&self, data: &[f64]) -> Vec<f64> {
        moving_average(data, self.window_size)
    }
}
