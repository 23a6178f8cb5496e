use super::filter::SignalFilter;
use super::moving_average::moving_average;

/// Difference-of-averages bandpass approximation
///
/// Returns `moving_average(data, low_window) - moving_average(data, high_window)`
/// element by element. With `low_window` the broader of the two this keeps
/// the energy between the two smoothing cutoffs, with QRS complexes showing
/// up as a dip flanked by two positive lobes.
///
/// This is not a frequency-selective filter and has no standard passband.
/// Downstream threshold tuning depends on the sign convention (broad minus
/// fine), so the subtraction order must not be swapped.
pub fn bandpass(data: &[f64], low_window: usize, high_window: usize) -> Vec<f64> {
    let low_passed = moving_average(data, low_window);
    let high_passed = moving_average(data, high_window);

    low_passed
        .iter()
        .zip(&high_passed)
        .map(|(low, high)| low - high)
        .collect()
}

/// Naive two-window bandpass filter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NaiveBandpass {
    low_window: usize,
    high_window: usize,
}

impl NaiveBandpass {
    /// # Arguments
    /// * `low_window` - Broad smoothing window (mostly baseline)
    /// * `high_window` - Fine smoothing window (signal plus noise)
    pub fn new(low_window: usize, high_window: usize) -> Self {
        Self {
            low_window,
            high_window,
        }
    }

    pub fn low_window(&self) -> usize {
        self.low_window
    }

    pub fn high_window(&self) -> usize {
        self.high_window
    }
}

impl SignalFilter for NaiveBandpass {
    fn apply(&self, data: &[f64]) -> Vec<f64> {
        bandpass(data, self.low_window, self.high_window)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_broad_minus_fine_ordering() {
        let data = [0.0, 0.0, 0.0, 9.0, 0.0, 0.0, 0.0];
        let out = bandpass(&data, 4, 0);

        // broad average at the spike is 9/5, fine (pass-through) is 9
        assert_relative_eq!(out[3], 9.0 / 5.0 - 9.0);
        // two samples away the broad window (4 points at the edge) still sees it
        assert_relative_eq!(out[1], 9.0 / 4.0);
        assert!(out[3] < 0.0);
    }

    #[test]
    fn test_not_a_spectral_filter() {
        // Difference of two smoothing passes: constant and linear trends
        // cancel wherever both windows fit, nothing more is promised.
        let offset = vec![3.0; 40];
        for value in bandpass(&offset, 20, 5) {
            assert_relative_eq!(value, 0.0, epsilon = 1e-12);
        }

        let ramp: Vec<f64> = (0..40).map(|i| i as f64).collect();
        let out = bandpass(&ramp, 20, 5);
        for value in &out[10..30] {
            assert_relative_eq!(*value, 0.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_equal_windows_cancel() {
        let data: Vec<f64> = (0..25).map(|i| ((i * 7) % 5) as f64).collect();
        for value in bandpass(&data, 6, 6) {
            assert_relative_eq!(value, 0.0);
        }
    }

    #[test]
    fn test_length_and_empty() {
        let data: Vec<f64> = (0..13).map(|i| i as f64 * 0.5).collect();
        assert_eq!(bandpass(&data, 20, 5).len(), 13);
        assert!(bandpass(&[], 20, 5).is_empty());
        assert_eq!(NaiveBandpass::new(20, 5).apply(&data), bandpass(&data, 20, 5));
    }
}
