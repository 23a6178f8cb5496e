use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use crate::config::IngestConfig;
use crate::error::{EcgError, Result};

/// Row accounting for one ingested file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestReport {
    /// Data rows seen after the header
    pub rows: usize,
    /// Rows whose designated column was missing or not a number
    pub dropped_rows: usize,
}

/// A named single-channel sample sequence
///
/// Samples are uniformly spaced in time; the index is the only time axis.
#[derive(Debug, Clone)]
pub struct Recording {
    name: String,
    path: PathBuf,
    samples: Vec<f64>,
    report: IngestReport,
}

impl Recording {
    /// Build a recording from samples already in memory
    pub fn from_samples(name: impl Into<String>, samples: Vec<f64>) -> Self {
        let rows = samples.len();
        Self {
            name: name.into(),
            path: PathBuf::new(),
            samples,
            report: IngestReport {
                rows,
                dropped_rows: 0,
            },
        }
    }

    /// Load the configured column of a delimited text file
    ///
    /// The first row is always treated as a header. A row whose column is
    /// missing or does not parse as a number is dropped with a warning; only
    /// failing to read the file is an error.
    pub fn load(path: &Path, config: &IngestConfig) -> Result<Self> {
        let file = File::open(path).map_err(|source| EcgError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let (samples, report) = read_column(BufReader::new(file), path, config)?;

        if report.dropped_rows > 0 {
            log::warn!(
                "{}: dropped {} of {} rows",
                path.display(),
                report.dropped_rows,
                report.rows
            );
        }

        Ok(Self {
            name: recording_name(path),
            path: path.to_path_buf(),
            samples,
            report,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn ingest_report(&self) -> IngestReport {
        self.report
    }
}

/// File stem used to name a recording and its derived files
pub fn recording_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

fn read_column<R: Read>(
    reader: R,
    path: &Path,
    config: &IngestConfig,
) -> Result<(Vec<f64>, IngestReport)> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .delimiter(config.delimiter_byte())
        .from_reader(reader);

    let mut samples = Vec::new();
    let mut report = IngestReport::default();

    for (row_no, result) in reader.records().enumerate() {
        report.rows += 1;
        // +2: 1-based, and the header occupies line 1
        let line = row_no + 2;

        let record = match result {
            Ok(record) => record,
            Err(e) if e.is_io_error() => {
                return Err(EcgError::Csv {
                    path: path.to_path_buf(),
                    source: e,
                });
            }
            Err(e) => {
                log::warn!("{}:{}: unreadable row: {}", path.display(), line, e);
                report.dropped_rows += 1;
                continue;
            }
        };

        match record.get(config.column).map(str::parse::<f64>) {
            Some(Ok(value)) => samples.push(value),
            Some(Err(_)) => {
                log::warn!(
                    "{}:{}: could not parse value {:?}",
                    path.display(),
                    line,
                    record.get(config.column).unwrap_or_default()
                );
                report.dropped_rows += 1;
            }
            None => {
                log::warn!(
                    "{}:{}: missing column {} (row has {} fields)",
                    path.display(),
                    line,
                    config.column,
                    record.len()
                );
                report.dropped_rows += 1;
            }
        }
    }

    Ok((samples, report))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str, column: usize) -> (Vec<f64>, IngestReport) {
        let config = IngestConfig {
            column,
            ..IngestConfig::default()
        };
        read_column(text.as_bytes(), Path::new("test.csv"), &config).unwrap()
    }

    #[test]
    fn test_reads_designated_column() {
        let (samples, report) = parse("idx,time,mlii\n0,0.0,-0.145\n1,0.003, -0.120 \n", 2);
        assert_eq!(samples, vec![-0.145, -0.120]);
        assert_eq!(report, IngestReport { rows: 2, dropped_rows: 0 });
    }

    #[test]
    fn test_header_always_skipped() {
        // Header is numeric, still skipped
        let (samples, _) = parse("1,2,3\n4,5,6\n", 1);
        assert_eq!(samples, vec![5.0]);
    }

    #[test]
    fn test_malformed_rows_are_dropped() {
        let text = "a,b,c\n0,0,1.5\n1,0,oops\n2,0\n3,0,2.5\n";
        let (samples, report) = parse(text, 2);
        assert_eq!(samples, vec![1.5, 2.5]);
        assert_eq!(report.rows, 4);
        assert_eq!(report.dropped_rows, 2);
    }

    #[test]
    fn test_header_only_is_empty() {
        let (samples, report) = parse("a,b,c\n", 0);
        assert!(samples.is_empty());
        assert_eq!(report.rows, 0);
    }

    #[test]
    fn test_custom_delimiter() {
        let config = IngestConfig {
            column: 1,
            delimiter: ';',
            ..IngestConfig::default()
        };
        let (samples, _) =
            read_column("t;v\n0;1.25\n1;-3\n".as_bytes(), Path::new("x"), &config).unwrap();
        assert_eq!(samples, vec![1.25, -3.0]);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = Recording::load(
            Path::new("/nonexistent/dir/100.csv"),
            &IngestConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, EcgError::Io { .. }));
    }

    #[test]
    fn test_recording_name_is_stem() {
        assert_eq!(recording_name(Path::new("/data/mitbih/100.csv")), "100");
        let recording = Recording::from_samples("synthetic", vec![1.0, 2.0]);
        assert_eq!(recording.name(), "synthetic");
        assert_eq!(recording.len(), 2);
        assert!(!recording.is_empty());
    }
}
