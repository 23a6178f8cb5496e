/// Common trait for whole-sequence filters
///
/// Implemented by `MovingAverage` and `NaiveBandpass`. Filters hold only
/// their parameters, so one instance can be shared by every worker.
pub trait SignalFilter: Send + Sync {
    /// Filter a complete sequence, returning a new sequence of equal length
    fn apply(&self, data: &[f64]) -> Vec<f64>;
}
