mod csv;
mod json;
mod peaks;
mod text;

use chrono::Utc;

use crate::batch::{BatchReport, BenchmarkRun};
use crate::error::Result;

pub use self::csv::CsvFormatter;
pub use self::json::JsonFormatter;
pub use self::peaks::{export_peaks, results_path};
pub use self::text::TextFormatter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Csv,
    Json,
}

/// Renders batch summaries for the terminal or for other tools
pub trait ReportFormatter: Send {
    fn format_report(&self, report: &BatchReport) -> Result<String>;

    fn format_benchmark(&self, runs: &[BenchmarkRun]) -> Result<String>;
}

pub fn create_formatter(format: OutputFormat, verbose: bool) -> Box<dyn ReportFormatter> {
    match format {
        OutputFormat::Text => Box::new(TextFormatter::new(verbose)),
        OutputFormat::Csv => Box::new(CsvFormatter),
        OutputFormat::Json => Box::new(JsonFormatter),
    }
}

pub fn iso8601_timestamp() -> String {
    Utc::now().format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}

fn millis(duration: std::time::Duration) -> f64 {
    duration.as_nanos() as f64 / 1e6
}

#[cfg(test)]
pub(crate) mod fixtures {
    use std::path::PathBuf;
    use std::time::Duration;

    use crate::batch::{BatchReport, BenchmarkRun, RecordingFailure, RecordingResult};
    use crate::ground_truth::evaluate_detections;
    use crate::signal_processing::interval_stats;

    pub fn report() -> BatchReport {
        let peaks = vec![100, 400, 700];
        BatchReport {
            results: vec![RecordingResult {
                name: "100".to_string(),
                path: PathBuf::from("data/100.csv"),
                sample_count: 1000,
                dropped_rows: 2,
                raw_mean: -0.25,
                peak_count: peaks.len(),
                rr_interval_ms: interval_stats(&peaks).map(|s| s.scaled(1000.0 / 360.0)),
                heart_rate_bpm: Some(72.0),
                evaluation: Some(evaluate_detections(&peaks, &[101, 399, 702], 15)),
                peaks,
                output_path: Some(PathBuf::from("data/100_results.csv")),
                elapsed: Duration::from_millis(12),
                worker: 0,
            }],
            failures: vec![RecordingFailure {
                name: "101".to_string(),
                path: PathBuf::from("data/101.csv"),
                error: "Unable to read data/101.csv: denied".to_string(),
            }],
            threads: 2,
            elapsed: Duration::from_millis(30),
        }
    }

    pub fn benchmark() -> Vec<BenchmarkRun> {
        vec![
            BenchmarkRun {
                threads: 1,
                elapsed: Duration::from_millis(40),
                succeeded: 3,
                failed: 0,
            },
            BenchmarkRun {
                threads: 4,
                elapsed: Duration::from_millis(15),
                succeeded: 3,
                failed: 0,
            },
        ]
    }
}
