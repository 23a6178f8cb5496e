pub mod bandpass;
pub mod filter;
pub mod moving_average;
pub mod peak_detector;
pub mod stats;

pub use bandpass::{NaiveBandpass, bandpass};
pub use filter::SignalFilter;
pub use moving_average::{MovingAverage, moving_average};
pub use peak_detector::{DynamicPeakDetector, LocalStats, detect_peaks_dynamic};
pub use stats::{StatsSummary, heart_rate_bpm, interval_stats, mean};
