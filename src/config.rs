//! Configuration for the ECG peak analysis pipeline.
//!
//! All sections can be loaded from a TOML file. Missing keys fall back to
//! the defaults in [`crate::constants`]:
//!
//! ```toml
//! [ingest]
//! column = 1
//! sample_rate_hz = 250.0
//!
//! [pipeline.detector]
//! window_size = 70
//! multiplier = 1.8
//! refractory_period = 140
//! ```

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Deserialize;

use crate::constants::*;
use crate::error::{EcgError, Result};

/// Complete analysis configuration
///
/// Use `AnalysisConfig::default()` for the reference tuning.
///
/// # Example
/// ```
/// use ecgpeaks::config::AnalysisConfig;
///
/// let mut config = AnalysisConfig::default();
/// config.pipeline.detector.multiplier = 2.5;
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Delimited-text ingestion
    pub ingest: IngestConfig,
    /// Filter and detector parameters
    pub pipeline: PipelineConfig,
    /// Discovery, export and worker pool
    pub batch: BatchConfig,
    /// Comparison against reference annotations
    pub evaluation: EvaluationConfig,
}

impl AnalysisConfig {
    /// Parse a configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(|e| EcgError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| EcgError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Reject values the ingestion and rhythm statistics cannot work with.
    ///
    /// Window sizes and the refractory period are not checked: zero is a
    /// defined pass-through / disabled setting for each of them.
    pub fn validate(&self) -> Result<()> {
        if !self.ingest.delimiter.is_ascii() {
            return Err(EcgError::Config(format!(
                "delimiter must be a single ASCII character, got {:?}",
                self.ingest.delimiter
            )));
        }
        if self.ingest.sample_rate_hz.is_nan() || self.ingest.sample_rate_hz <= 0.0 {
            return Err(EcgError::Config(format!(
                "sample rate must be positive, got {}",
                self.ingest.sample_rate_hz
            )));
        }
        if !self.pipeline.detector.multiplier.is_finite() {
            return Err(EcgError::Config("threshold multiplier must be finite".into()));
        }
        if self.batch.results_suffix.is_empty() {
            return Err(EcgError::Config("results suffix must not be empty".into()));
        }
        Ok(())
    }
}

/// Delimited-text ingestion configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    /// 0-based column holding the analysed channel
    pub column: usize,
    /// Field delimiter
    pub delimiter: char,
    /// Sampling rate in Hz, only used for rhythm statistics
    pub sample_rate_hz: f64,
}

impl IngestConfig {
    pub(crate) fn delimiter_byte(&self) -> u8 {
        // validate() guarantees ASCII
        self.delimiter as u8
    }
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            column: DEFAULT_COLUMN,
            delimiter: ',',
            sample_rate_hz: DEFAULT_SAMPLE_RATE_HZ,
        }
    }
}

/// Filter and detector parameters, all in samples
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Moving-average window for the smoothed trace (0 = pass-through)
    pub smoothing_window: usize,
    /// Broad smoothing window of the bandpass approximation
    pub bandpass_low_window: usize,
    /// Fine smoothing window of the bandpass approximation
    pub bandpass_high_window: usize,
    /// Dynamic threshold detector
    pub detector: DetectorConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            smoothing_window: DEFAULT_SMOOTHING_WINDOW,
            bandpass_low_window: DEFAULT_BANDPASS_LOW_WINDOW,
            bandpass_high_window: DEFAULT_BANDPASS_HIGH_WINDOW,
            detector: DetectorConfig::default(),
        }
    }
}

/// Dynamic threshold peak detector configuration
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Local statistics neighbourhood width
    pub window_size: usize,
    /// Threshold sensitivity (standard deviations above the local mean)
    pub multiplier: f64,
    /// Minimum index gap between accepted peaks (0 disables suppression)
    pub refractory_period: usize,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            window_size: DEFAULT_DETECTOR_WINDOW,
            multiplier: DEFAULT_THRESHOLD_MULTIPLIER,
            refractory_period: DEFAULT_REFRACTORY_PERIOD,
        }
    }
}

/// Discovery, export and worker pool configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Extension of recordings picked up from a directory (case-insensitive)
    pub extension: String,
    /// Appended to the recording stem to name its results file
    pub results_suffix: String,
    /// Where results are written; defaults to the recording's own directory
    pub output_dir: Option<PathBuf>,
    /// Number of worker threads, 0 = available parallelism
    pub threads: usize,
    /// Write per-recording peak files
    pub export: bool,
    /// Add smoothed and bandpassed columns to the exported peak files
    pub export_filtered: bool,
}

impl BatchConfig {
    /// Resolve `threads`, substituting the machine's parallelism for 0
    pub fn worker_count(&self) -> usize {
        if self.threads > 0 {
            return self.threads;
        }
        std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1)
    }
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            extension: DEFAULT_EXTENSION.to_string(),
            results_suffix: DEFAULT_RESULTS_SUFFIX.to_string(),
            output_dir: None,
            threads: 0,
            export: true,
            export_filtered: false,
        }
    }
}

/// Ground-truth comparison configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EvaluationConfig {
    /// Appended to the recording stem to find reference peaks; `None` disables
    pub ground_truth_suffix: Option<String>,
    /// Maximum detection-to-reference distance in samples
    pub tolerance: usize,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            ground_truth_suffix: Some(DEFAULT_GROUND_TRUTH_SUFFIX.to_string()),
            tolerance: DEFAULT_MATCH_TOLERANCE,
        }
    }
}

/// Worker counts for a benchmark sweep
///
/// # Parsing formats
/// - `4` - a single degree
/// - `1,2,4,8` - explicit list
/// - `1-8` - inclusive range
/// - `1-16:4` - inclusive range with step (1, 5, 9, 13)
///
/// # Example
/// ```
/// use ecgpeaks::config::ThreadDegrees;
///
/// let degrees: ThreadDegrees = "1-4".parse().unwrap();
/// assert_eq!(degrees.as_slice(), &[1, 2, 3, 4]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThreadDegrees(Vec<usize>);

impl ThreadDegrees {
    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }
}

impl fmt::Display for ThreadDegrees {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|d| d.to_string()).collect();
        write!(f, "{}", parts.join(","))
    }
}

fn parse_degree(s: &str) -> std::result::Result<usize, String> {
    let degree: usize = s
        .trim()
        .parse()
        .map_err(|_| format!("invalid thread count: {}", s.trim()))?;
    if degree == 0 {
        return Err("thread count must be positive".to_string());
    }
    Ok(degree)
}

impl FromStr for ThreadDegrees {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err("empty thread count list".to_string());
        }

        if let Some((range, rest)) = s.split_once('-') {
            let (end, step) = match rest.split_once(':') {
                Some((end, step)) => (end, parse_degree(step)?),
                None => (rest, 1),
            };
            let start = parse_degree(range)?;
            let end = parse_degree(end)?;
            if start > end {
                return Err(format!("range start {} exceeds end {}", start, end));
            }
            return Ok(Self((start..=end).step_by(step).collect()));
        }

        s.split(',')
            .map(parse_degree)
            .collect::<std::result::Result<Vec<_>, _>>()
            .map(Self)
    }
}
