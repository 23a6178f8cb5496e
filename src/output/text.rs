use super::{ReportFormatter, millis};
use crate::batch::{BatchReport, BenchmarkRun};
use crate::error::Result;

pub struct TextFormatter {
    verbose: bool,
}

impl TextFormatter {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }
}

fn or_dash<T>(value: Option<T>, f: impl Fn(T) -> String) -> String {
    value.map(f).unwrap_or_else(|| "-".to_string())
}

impl ReportFormatter for TextFormatter {
    fn format_report(&self, report: &BatchReport) -> Result<String> {
        let mut out = String::new();

        out.push_str(&format!(
            "{:<30} {:>9} {:>6} {:>8} {:>10} {:>6} {:>6} {:>9}\n",
            "Recording", "Samples", "Peaks", "HR", "RR (ms)", "Sens", "PPV", "Time (ms)"
        ));
        out.push_str(&format!("{}\n", "-".repeat(91)));

        for result in &report.results {
            let hr = or_dash(result.heart_rate_bpm, |v| format!("{:.1}", v));
            let rr = or_dash(result.rr_interval_ms, |s| format!("{:.1}", s.mean));
            let sens = or_dash(result.evaluation, |e| format!("{:.3}", e.sensitivity()));
            let ppv = or_dash(result.evaluation, |e| {
                format!("{:.3}", e.positive_predictive_value())
            });
            out.push_str(&format!(
                "{:<30} {:>9} {:>6} {:>8} {:>10} {:>6} {:>6} {:>9.1}\n",
                result.name,
                result.sample_count,
                result.peak_count,
                hr,
                rr,
                sens,
                ppv,
                millis(result.elapsed)
            ));

            if self.verbose {
                if let Some(rr) = result.rr_interval_ms {
                    out.push_str(&format!(
                        "    RR interval: {:.1} ± {:.1} ms (min {:.1}, max {:.1})\n",
                        rr.mean, rr.std_dev, rr.min, rr.max
                    ));
                }
                if result.dropped_rows > 0 {
                    out.push_str(&format!("    Dropped rows: {}\n", result.dropped_rows));
                }
                if let Some(path) = &result.output_path {
                    out.push_str(&format!("    Results: {}\n", path.display()));
                }
            }
        }

        for failure in &report.failures {
            out.push_str(&format!("{:<30} ERROR: {}\n", failure.name, failure.error));
        }

        out.push_str(&format!(
            "\nProcessed {} of {} recordings with {} workers in {:.1} ms\n",
            report.results.len(),
            report.total(),
            report.threads,
            millis(report.elapsed)
        ));
        Ok(out)
    }

    fn format_benchmark(&self, runs: &[BenchmarkRun]) -> Result<String> {
        let mut out = format!("{:>8} {:>12} {:>6} {:>6}\n", "Threads", "Time (ms)", "OK", "Failed");
        let baseline = runs.first().map(|r| millis(r.elapsed));

        for run in runs {
            out.push_str(&format!(
                "{:>8} {:>12.1} {:>6} {:>6}",
                run.threads,
                millis(run.elapsed),
                run.succeeded,
                run.failed
            ));
            if let Some(base) = baseline.filter(|b| *b > 0.0) {
                out.push_str(&format!("  x{:.2}", base / millis(run.elapsed).max(f64::EPSILON)));
            }
            out.push('\n');
        }
        Ok(out)
    }
}
