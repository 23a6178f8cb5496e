use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;

use ecgpeaks::batch::{BatchRunner, DiagnosticSink, discover_recordings};
use ecgpeaks::config::{AnalysisConfig, ThreadDegrees};
use ecgpeaks::output::{OutputFormat, create_formatter};

#[derive(Parser, Debug)]
#[command(name = "ecgpeaks")]
#[command(about = "Batch ECG filtering and adaptive-threshold peak detection", long_about = None)]
struct Args {
    /// Recording file, or a directory of recordings
    #[arg(default_value = "data")]
    input: PathBuf,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Summary format: text, csv, json
    #[arg(short = 'f', long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Increase output verbosity
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress per-recording progress lines
    #[arg(short = 'q', long)]
    quiet: bool,

    /// Worker threads (0 = available CPUs)
    #[arg(short = 'j', long)]
    threads: Option<usize>,

    /// Time the whole batch at each worker count (e.g., "1,2,4,8", "1-8", "1-16:4")
    #[arg(long)]
    benchmark: Option<ThreadDegrees>,

    /// Directory for exported peak files (default: next to each recording)
    #[arg(short = 'o', long)]
    output_dir: Option<PathBuf>,

    /// Skip writing per-recording peak files
    #[arg(long)]
    no_export: bool,

    /// Add smoothed and bandpassed columns to exported peak files
    #[arg(long)]
    export_filtered: bool,

    /// Zero-based column holding the samples
    #[arg(long)]
    column: Option<usize>,

    /// Sample rate in Hz, used for rhythm statistics
    #[arg(long)]
    sample_rate: Option<f64>,

    /// Moving-average smoothing window
    #[arg(long)]
    smoothing: Option<usize>,

    /// Broad bandpass window
    #[arg(long)]
    low_window: Option<usize>,

    /// Narrow bandpass window
    #[arg(long)]
    high_window: Option<usize>,

    /// Detector window
    #[arg(short = 'w', long)]
    window: Option<usize>,

    /// Detector threshold multiplier
    #[arg(short = 'm', long)]
    multiplier: Option<f64>,

    /// Minimum samples between peaks
    #[arg(short = 'r', long)]
    refractory: Option<usize>,

    /// Ground truth match tolerance in samples
    #[arg(long)]
    tolerance: Option<usize>,
}

fn build_config(args: &Args) -> anyhow::Result<AnalysisConfig> {
    let mut config = match args.config {
        Some(ref path) => AnalysisConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => AnalysisConfig::default(),
    };

    if let Some(column) = args.column {
        config.ingest.column = column;
    }
    if let Some(sample_rate) = args.sample_rate {
        config.ingest.sample_rate_hz = sample_rate;
    }
    if let Some(smoothing) = args.smoothing {
        config.pipeline.smoothing_window = smoothing;
    }
    if let Some(low) = args.low_window {
        config.pipeline.bandpass_low_window = low;
    }
    if let Some(high) = args.high_window {
        config.pipeline.bandpass_high_window = high;
    }
    if let Some(window) = args.window {
        config.pipeline.detector.window_size = window;
    }
    if let Some(multiplier) = args.multiplier {
        config.pipeline.detector.multiplier = multiplier;
    }
    if let Some(refractory) = args.refractory {
        config.pipeline.detector.refractory_period = refractory;
    }
    if let Some(tolerance) = args.tolerance {
        config.evaluation.tolerance = tolerance;
    }
    if let Some(threads) = args.threads {
        config.batch.threads = threads;
    }
    if args.output_dir.is_some() {
        config.batch.output_dir = args.output_dir.clone();
    }
    if args.no_export {
        config.batch.export = false;
    }
    if args.export_filtered {
        config.batch.export_filtered = true;
    }

    config.validate()?;
    Ok(config)
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = match args.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config = build_config(&args)?;

    if let Some(ref dir) = config.batch.output_dir {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create output directory {}", dir.display()))?;
    }

    let items = discover_recordings(&args.input, &config.batch)?;
    log::info!("Found {} recordings in {}", items.len(), args.input.display());

    let sink = if args.quiet {
        DiagnosticSink::silent()
    } else {
        DiagnosticSink::stdout()
    };
    let runner = BatchRunner::new(config).with_sink(sink);
    let formatter = create_formatter(args.format, args.verbose > 0);

    let summary = match args.benchmark {
        Some(ref degrees) => {
            let runs = runner.benchmark(&items, degrees.as_slice());
            formatter.format_benchmark(&runs)?
        }
        None => {
            let report = runner.run(&items);
            formatter.format_report(&report)?
        }
    };
    print!("{}", summary);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_defaults() {
        let args = Args::parse_from([
            "ecgpeaks",
            "recordings",
            "-w",
            "80",
            "-m",
            "1.5",
            "--refractory",
            "150",
            "--no-export",
            "-j",
            "3",
        ]);
        let config = build_config(&args).unwrap();

        assert_eq!(args.input, PathBuf::from("recordings"));
        assert_eq!(config.pipeline.detector.window_size, 80);
        assert_eq!(config.pipeline.detector.multiplier, 1.5);
        assert_eq!(config.pipeline.detector.refractory_period, 150);
        assert_eq!(config.pipeline.smoothing_window, 10);
        assert_eq!(config.batch.threads, 3);
        assert!(!config.batch.export);
    }

    #[test]
    fn test_benchmark_degrees_parse() {
        let args = Args::parse_from(["ecgpeaks", "--benchmark", "1-4"]);
        assert_eq!(
            args.benchmark.as_ref().map(|d| d.as_slice().to_vec()),
            Some(vec![1, 2, 3, 4])
        );
    }

    #[test]
    fn test_invalid_override_rejected() {
        let args = Args::parse_from(["ecgpeaks", "--sample-rate", "0"]);
        assert!(build_config(&args).is_err());
    }
}
