use super::{ReportFormatter, millis};
use crate::batch::{BatchReport, BenchmarkRun};
use crate::error::{EcgError, Result};

pub struct CsvFormatter;

const REPORT_HEADER: [&str; 12] = [
    "recording",
    "samples",
    "dropped_rows",
    "raw_mean",
    "peaks",
    "heart_rate_bpm",
    "rr_mean_ms",
    "rr_std_ms",
    "sensitivity",
    "ppv",
    "elapsed_ms",
    "error",
];

fn finish(writer: ::csv::Writer<Vec<u8>>) -> Result<String> {
    let bytes = writer
        .into_inner()
        .map_err(|e| EcgError::Summary(::csv::Error::from(e.into_error())))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn optional<T>(value: Option<T>, f: impl Fn(T) -> String) -> String {
    value.map(f).unwrap_or_default()
}

impl ReportFormatter for CsvFormatter {
    fn format_report(&self, report: &BatchReport) -> Result<String> {
        let mut writer = ::csv::Writer::from_writer(Vec::new());
        writer.write_record(REPORT_HEADER)?;

        for result in &report.results {
            writer.write_record([
                result.name.clone(),
                result.sample_count.to_string(),
                result.dropped_rows.to_string(),
                format!("{:.6}", result.raw_mean),
                result.peak_count.to_string(),
                optional(result.heart_rate_bpm, |v| format!("{:.2}", v)),
                optional(result.rr_interval_ms, |s| format!("{:.2}", s.mean)),
                optional(result.rr_interval_ms, |s| format!("{:.2}", s.std_dev)),
                optional(result.evaluation, |e| format!("{:.4}", e.sensitivity())),
                optional(result.evaluation, |e| {
                    format!("{:.4}", e.positive_predictive_value())
                }),
                format!("{:.2}", millis(result.elapsed)),
                String::new(),
            ])?;
        }

        for failure in &report.failures {
            let mut row = vec![String::new(); REPORT_HEADER.len()];
            row[0] = failure.name.clone();
            row[REPORT_HEADER.len() - 1] = failure.error.clone();
            writer.write_record(&row)?;
        }

        finish(writer)
    }

    fn format_benchmark(&self, runs: &[BenchmarkRun]) -> Result<String> {
        let mut writer = ::csv::Writer::from_writer(Vec::new());
        writer.write_record(["threads", "elapsed_ms", "succeeded", "failed"])?;
        for run in runs {
            writer.write_record([
                run.threads.to_string(),
                format!("{:.3}", millis(run.elapsed)),
                run.succeeded.to_string(),
                run.failed.to_string(),
            ])?;
        }
        finish(writer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::fixtures;

    #[test]
    fn test_report_rows() {
        let text = CsvFormatter.format_report(&fixtures::report()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);

        let header_cols = lines[0].split(',').count();
        assert_eq!(lines[1].split(',').count(), header_cols);
        assert!(lines[1].starts_with("100,1000,2,-0.250000,3,72.00,833.33,"));
        assert!(lines[2].starts_with("101,,,"));
        assert!(lines[2].ends_with(",Unable to read data/101.csv: denied"));
    }

    #[test]
    fn test_names_with_delimiters_stay_one_field() {
        let mut report = fixtures::report();
        report.results[0].name = "patient 1, lead II".to_string();
        report.failures[0].error = "bad \"quote\", here".to_string();
        let text = CsvFormatter.format_report(&report).unwrap();

        let mut reader = ::csv::Reader::from_reader(text.as_bytes());
        let rows: Vec<::csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].len(), 12);
        assert_eq!(&rows[0][0], "patient 1, lead II");
        assert_eq!(&rows[0][1], "1000");
        assert_eq!(rows[1].len(), 12);
        assert_eq!(&rows[1][11], "bad \"quote\", here");
    }

    #[test]
    fn test_benchmark_rows() {
        let text = CsvFormatter.format_benchmark(&fixtures::benchmark()).unwrap();
        assert_eq!(
            text,
            "threads,elapsed_ms,succeeded,failed\n1,40.000,3,0\n4,15.000,3,0\n"
        );
    }
}
