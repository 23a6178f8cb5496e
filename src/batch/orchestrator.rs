use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};

use serde::{Serialize, Serializer};

use super::discovery::WorkItem;
use super::sink::DiagnosticSink;
use crate::config::AnalysisConfig;
use crate::error::Result;
use crate::ground_truth::{Evaluation, evaluate_detections, load_ground_truth};
use crate::output::{export_peaks, results_path};
use crate::pipeline::PeakPipeline;
use crate::recording::{Recording, recording_name};
use crate::signal_processing::{StatsSummary, heart_rate_bpm, interval_stats, mean};

fn serialize_millis<S: Serializer>(
    duration: &Duration,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_f64(duration.as_nanos() as f64 / 1e6)
}

/// Outcome of one successfully processed recording
#[derive(Debug, Clone, Serialize)]
pub struct RecordingResult {
    pub name: String,
    pub path: PathBuf,
    pub sample_count: usize,
    pub dropped_rows: usize,
    pub raw_mean: f64,
    #[serde(skip)]
    pub peaks: Vec<usize>,
    pub peak_count: usize,
    /// Inter-peak intervals in milliseconds
    pub rr_interval_ms: Option<StatsSummary>,
    pub heart_rate_bpm: Option<f64>,
    pub evaluation: Option<Evaluation>,
    pub output_path: Option<PathBuf>,
    #[serde(rename = "elapsed_ms", serialize_with = "serialize_millis")]
    pub elapsed: Duration,
    pub worker: usize,
}

/// A recording that was skipped
#[derive(Debug, Clone, Serialize)]
pub struct RecordingFailure {
    pub name: String,
    pub path: PathBuf,
    pub error: String,
}

/// Results of one pass over all work items
///
/// Successes and failures each keep discovery order.
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub results: Vec<RecordingResult>,
    pub failures: Vec<RecordingFailure>,
    pub threads: usize,
    #[serde(rename = "elapsed_ms", serialize_with = "serialize_millis")]
    pub elapsed: Duration,
}

impl BatchReport {
    pub fn total(&self) -> usize {
        self.results.len() + self.failures.len()
    }
}

/// Wall-clock time of a full batch at one concurrency degree
#[derive(Debug, Clone, Serialize)]
pub struct BenchmarkRun {
    pub threads: usize,
    #[serde(rename = "elapsed_ms", serialize_with = "serialize_millis")]
    pub elapsed: Duration,
    pub succeeded: usize,
    pub failed: usize,
}

pub type ItemOutcome = std::result::Result<RecordingResult, RecordingFailure>;

/// Runs the peak pipeline over a set of recordings on a worker pool
///
/// Work items are queued on a bounded channel and pulled by whichever worker
/// is free, so long recordings do not hold up a static partition. Each worker
/// owns the recording it is processing; the only shared resource is the
/// diagnostic sink. Results come back tagged with their item index and land
/// in that item's slot.
///
/// A failing item is reported and skipped; it never stops the batch.
#[derive(Debug)]
pub struct BatchRunner {
    config: AnalysisConfig,
    pipeline: PeakPipeline,
    sink: DiagnosticSink,
}

impl BatchRunner {
    pub fn new(config: AnalysisConfig) -> Self {
        Self {
            pipeline: PeakPipeline::new(&config.pipeline),
            config,
            sink: DiagnosticSink::stdout(),
        }
    }

    pub fn with_sink(mut self, sink: DiagnosticSink) -> Self {
        self.sink = sink;
        self
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Process all items with the configured worker count
    pub fn run(&self, items: &[WorkItem]) -> BatchReport {
        self.run_with_threads(items, self.config.batch.worker_count())
    }

    /// Process all items on `threads` workers (at least one, at most one per item)
    pub fn run_with_threads(&self, items: &[WorkItem], threads: usize) -> BatchReport {
        let start = Instant::now();
        let threads = threads.clamp(1, items.len().max(1));
        log::info!("Processing {} recordings on {} workers", items.len(), threads);

        let mut slots: Vec<Option<ItemOutcome>> = (0..items.len()).map(|_| None).collect();
        let (job_tx, job_rx) = crossbeam_channel::bounded::<usize>(threads * 2);
        let (result_tx, result_rx) = crossbeam_channel::unbounded::<(usize, ItemOutcome)>();

        thread::scope(|scope| {
            for worker in 0..threads {
                let job_rx = job_rx.clone();
                let result_tx = result_tx.clone();
                scope.spawn(move || {
                    for index in job_rx.iter() {
                        let outcome = self.process_item_isolated(&items[index], worker);
                        if result_tx.send((index, outcome)).is_err() {
                            break;
                        }
                    }
                });
            }
            drop(job_rx);
            drop(result_tx);

            for index in 0..items.len() {
                if job_tx.send(index).is_err() {
                    break;
                }
            }
            drop(job_tx);

            for (index, outcome) in result_rx.iter() {
                slots[index] = Some(outcome);
            }
        });

        let mut results = Vec::new();
        let mut failures = Vec::new();
        for outcome in slots.into_iter().flatten() {
            match outcome {
                Ok(result) => results.push(result),
                Err(failure) => failures.push(failure),
            }
        }

        let elapsed = start.elapsed();
        log::info!(
            "Batch finished: {} ok, {} failed in {:.1} ms",
            results.len(),
            failures.len(),
            elapsed.as_secs_f64() * 1000.0
        );

        BatchReport {
            results,
            failures,
            threads,
            elapsed,
        }
    }

    /// Re-run the whole batch once per concurrency degree
    ///
    /// Runs share nothing but the item list; each one re-reads and re-exports
    /// every recording.
    pub fn benchmark(&self, items: &[WorkItem], degrees: &[usize]) -> Vec<BenchmarkRun> {
        degrees
            .iter()
            .map(|&threads| {
                let report = self.run_with_threads(items, threads);
                self.sink.emit(&[format!(
                    "Total time with {} threads: {} ms",
                    threads,
                    report.elapsed.as_millis()
                )]);
                BenchmarkRun {
                    threads,
                    elapsed: report.elapsed,
                    succeeded: report.results.len(),
                    failed: report.failures.len(),
                }
            })
            .collect()
    }

    /// [`process_item`](Self::process_item), with a panic turned into a failure
    fn process_item_isolated(&self, item: &WorkItem, worker: usize) -> ItemOutcome {
        panic::catch_unwind(AssertUnwindSafe(|| self.process_item(item, worker))).unwrap_or_else(
            |payload| {
                let reason = payload
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| payload.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic".to_string());
                log::error!("[worker {}] {} panicked: {}", worker, item.name, reason);
                self.sink.emit(&[format!(
                    "Error processing {}: {}",
                    item.path.display(),
                    reason
                )]);
                Err(RecordingFailure {
                    name: item.name.clone(),
                    path: item.path.clone(),
                    error: format!("processing panicked: {}", reason),
                })
            },
        )
    }

    /// Run the pipeline on one item and emit its diagnostics as one block
    pub fn process_item(&self, item: &WorkItem, worker: usize) -> ItemOutcome {
        let start = Instant::now();
        let mut lines = vec![format!("Processing file: {}", item.path.display())];

        let outcome = self.analyze(item, worker, &mut lines);
        let elapsed = start.elapsed();

        let outcome = match outcome {
            Ok(mut result) => {
                result.elapsed = elapsed;
                lines.push(format!(
                    "Processing time for {}: {} ms",
                    item.name,
                    elapsed.as_millis()
                ));
                log::info!(
                    "[worker {}] {}: {} peaks in {:.1} ms",
                    worker,
                    item.name,
                    result.peak_count,
                    elapsed.as_secs_f64() * 1000.0
                );
                Ok(result)
            }
            Err(e) => {
                lines.push(format!("Error processing {}: {}", item.path.display(), e));
                log::error!("[worker {}] skipping {}: {}", worker, item.name, e);
                Err(RecordingFailure {
                    name: item.name.clone(),
                    path: item.path.clone(),
                    error: e.to_string(),
                })
            }
        };

        self.sink.emit(&lines);
        outcome
    }

    fn analyze(
        &self,
        item: &WorkItem,
        worker: usize,
        lines: &mut Vec<String>,
    ) -> Result<RecordingResult> {
        let recording = Recording::load(&item.path, &self.config.ingest)?;
        let samples = recording.samples();
        let report = recording.ingest_report();

        if report.dropped_rows > 0 {
            lines.push(format!(
                "Loaded {} data points ({} rows dropped).",
                samples.len(),
                report.dropped_rows
            ));
        } else {
            lines.push(format!("Loaded {} data points.", samples.len()));
        }

        let raw_mean = mean(samples);
        lines.push(format!("Average raw signal value: {}", raw_mean));

        let output = self.pipeline.process(samples);
        let bandpass = self.pipeline.bandpass();
        lines.push(format!(
            "Applied moving average filter with window size {}.",
            self.pipeline.smoother().window_size()
        ));
        lines.push(format!(
            "Applied naive bandpass filter with window sizes {} (low-pass) and {} (high-pass).",
            bandpass.low_window(),
            bandpass.high_window()
        ));
        lines.push(format!(
            "Detected {} peaks in the bandpassed data using dynamic thresholding.",
            output.peaks.len()
        ));

        let batch = &self.config.batch;
        let output_path = if batch.export {
            let path = results_path(&item.path, batch);
            let filtered = batch.export_filtered.then_some(&output);
            export_peaks(&path, samples, &output.peaks, filtered)?;
            lines.push(format!(
                "Exported peak detection results to {}",
                path.display()
            ));
            Some(path)
        } else {
            None
        };

        let evaluation = self.evaluate(&item.path, &output.peaks);
        if let Some(eval) = &evaluation {
            lines.push(format!(
                "Sensitivity {:.3}, PPV {:.3} (TP {}, FP {}, FN {})",
                eval.sensitivity(),
                eval.positive_predictive_value(),
                eval.true_positives,
                eval.false_positives,
                eval.false_negatives
            ));
        }

        let sample_rate = self.config.ingest.sample_rate_hz;
        Ok(RecordingResult {
            name: item.name.clone(),
            path: item.path.clone(),
            sample_count: samples.len(),
            dropped_rows: report.dropped_rows,
            raw_mean,
            peak_count: output.peaks.len(),
            rr_interval_ms: interval_stats(&output.peaks).map(|s| s.scaled(1000.0 / sample_rate)),
            heart_rate_bpm: heart_rate_bpm(&output.peaks, sample_rate),
            peaks: output.peaks,
            evaluation,
            output_path,
            elapsed: Duration::ZERO,
            worker,
        })
    }

    /// Score against `<stem><suffix>` next to the recording, if it exists
    fn evaluate(&self, recording_path: &Path, peaks: &[usize]) -> Option<Evaluation> {
        let suffix = self.config.evaluation.ground_truth_suffix.as_deref()?;
        let stem = recording_name(recording_path);
        let truth_path = recording_path.with_file_name(format!("{}{}", stem, suffix));
        if !truth_path.is_file() {
            return None;
        }

        match load_ground_truth(&truth_path) {
            Ok(truth) => Some(evaluate_detections(
                peaks,
                &truth,
                self.config.evaluation.tolerance,
            )),
            Err(e) => {
                log::warn!("Ignoring ground truth: {}", e);
                None
            }
        }
    }
}
