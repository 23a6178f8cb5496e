//! Default tuning values and file naming conventions
//!
//! The window sizes and refractory period are expressed in samples and were
//! tuned against 360 Hz MIT-BIH style recordings. Recordings sampled at a
//! different rate need these scaled accordingly.

/// Column holding the analysed channel (0-based, MLII in MIT-BIH exports).
pub const DEFAULT_COLUMN: usize = 2;

/// Sampling rate assumed for rhythm statistics.
pub const DEFAULT_SAMPLE_RATE_HZ: f64 = 360.0;

/// Moving-average window used for the smoothed trace.
pub const DEFAULT_SMOOTHING_WINDOW: usize = 10;

/// Broad window of the bandpass approximation.
pub const DEFAULT_BANDPASS_LOW_WINDOW: usize = 20;

/// Fine window of the bandpass approximation.
pub const DEFAULT_BANDPASS_HIGH_WINDOW: usize = 5;

/// Neighbourhood used for the detector's local statistics.
pub const DEFAULT_DETECTOR_WINDOW: usize = 100;

/// Standard deviations above the local mean a peak must clear.
pub const DEFAULT_THRESHOLD_MULTIPLIER: f64 = 2.0;

/// Minimum gap between accepted peaks.
pub const DEFAULT_REFRACTORY_PERIOD: usize = 200;

/// Extension of recordings picked up during directory discovery.
pub const DEFAULT_EXTENSION: &str = "csv";

/// Appended to a recording's stem to name its exported results.
pub const DEFAULT_RESULTS_SUFFIX: &str = "_results.csv";

/// Appended to a recording's stem to locate its reference annotations.
pub const DEFAULT_GROUND_TRUTH_SUFFIX: &str = "_peaks.txt";

/// Maximum distance in samples between a detection and its reference peak.
pub const DEFAULT_MATCH_TOLERANCE: usize = 15;
