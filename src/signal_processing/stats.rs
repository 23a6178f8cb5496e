use rolling_stats::Stats;
use serde::Serialize;

/// Arithmetic mean of a sequence, 0.0 when empty
pub fn mean(data: &[f64]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    data.iter().sum::<f64>() / data.len() as f64
}

/// Summary statistics of a set of values
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StatsSummary {
    pub count: usize,
    pub mean: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
}

impl StatsSummary {
    pub fn from_stats(stats: &Stats<f64>) -> Option<Self> {
        if stats.count == 0 {
            return None;
        }
        Some(Self {
            count: stats.count,
            mean: stats.mean,
            std_dev: stats.std_dev,
            min: stats.min,
            max: stats.max,
        })
    }

    /// Multiply every statistic except the count by `factor`
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            count: self.count,
            mean: self.mean * factor,
            std_dev: self.std_dev * factor,
            min: self.min * factor,
            max: self.max * factor,
        }
    }
}

/// Statistics of the gaps between consecutive peak indices, in samples
///
/// `None` when fewer than two peaks are given.
pub fn interval_stats(peaks: &[usize]) -> Option<StatsSummary> {
    let mut stats: Stats<f64> = Stats::new();
    for pair in peaks.windows(2) {
        stats.update((pair[1] - pair[0]) as f64);
    }
    StatsSummary::from_stats(&stats)
}

/// Mean heart rate in beats per minute from peak indices
pub fn heart_rate_bpm(peaks: &[usize], sample_rate_hz: f64) -> Option<f64> {
    let intervals = interval_stats(peaks)?;
    if intervals.mean <= 0.0 {
        return None;
    }
    Some(60.0 * sample_rate_hz / intervals.mean)
}
