use anyhow::{Context, Result};
use clap::Parser;
use ecgpeaks::simulation::{
    AdditiveNoiseConfig, BaselineWanderConfig, MAX_RR_JITTER, NoiseConfig, PowerlineConfig,
    SyntheticEcgConfig, generate_noisy_ecg, save_ground_truth, save_recording,
};
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "generate_ecg")]
#[command(about = "Generate synthetic ECG recordings with reference R peaks")]
struct Args {
    /// TOML signal and noise configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output directory
    #[arg(short, long, default_value = "data/synthetic")]
    output_dir: PathBuf,

    /// Number of recordings
    #[arg(short = 'n', long, default_value_t = 4)]
    count: u32,

    /// Base seed for reproducibility
    #[arg(short, long)]
    seed: Option<u64>,

    /// Recording duration in seconds
    #[arg(short, long)]
    duration: Option<f64>,

    /// Sample rate in Hz
    #[arg(long)]
    sample_rate: Option<f64>,

    /// Heart rate in beats per minute
    #[arg(long)]
    heart_rate: Option<f64>,

    /// Output filename prefix
    #[arg(long, default_value = "synth")]
    prefix: String,

    /// Generate manifest.json
    #[arg(long)]
    manifest: bool,

    /// Additive Gaussian noise standard deviation (CLI override)
    #[arg(long)]
    noise_std: Option<f64>,

    /// Baseline wander amplitude (CLI override)
    #[arg(long)]
    wander: Option<f64>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct TomlConfig {
    signal: SyntheticEcgConfig,
    awgn: Option<AdditiveNoiseConfig>,
    wander: Option<BaselineWanderConfig>,
    powerline: Option<PowerlineConfig>,
}

#[derive(Debug, serde::Serialize)]
struct ManifestEntry {
    file: String,
    ground_truth: String,
    seed: u64,
    beats: usize,
}

#[derive(Debug, serde::Serialize)]
struct Manifest {
    sample_rate: f64,
    heart_rate_bpm: f64,
    duration: f64,
    files: Vec<ManifestEntry>,
}

fn load_toml_config(path: &PathBuf) -> Result<TomlConfig> {
    let content = fs::read_to_string(path).context("Failed to read config file")?;
    toml::from_str(&content).context("Failed to parse config file")
}

fn build_signal_config(toml: &TomlConfig, args: &Args) -> SyntheticEcgConfig {
    let mut config = toml.signal.clone();
    if let Some(duration) = args.duration {
        config.duration_secs = duration;
    }
    if let Some(sample_rate) = args.sample_rate {
        config.sample_rate_hz = sample_rate;
    }
    if let Some(heart_rate) = args.heart_rate {
        config.heart_rate_bpm = heart_rate;
    }
    config
}

fn validate_signal_config(config: &SyntheticEcgConfig) -> Result<()> {
    if !(config.sample_rate_hz > 0.0 && config.heart_rate_bpm > 0.0) {
        anyhow::bail!("Sample rate and heart rate must be positive");
    }
    if !(0.0..=MAX_RR_JITTER).contains(&config.rr_jitter) {
        anyhow::bail!("RR jitter must be between 0 and {}", MAX_RR_JITTER);
    }
    Ok(())
}

fn build_noise_config(toml: &TomlConfig, args: &Args, seed: u64) -> NoiseConfig {
    let mut config = NoiseConfig::default().with_seed(seed);
    config.powerline = toml.powerline.clone();

    if let Some(std_dev) = args.noise_std {
        config.additive = Some(AdditiveNoiseConfig { std_dev });
    } else {
        config.additive = toml.awgn.clone();
    }

    if let Some(amplitude) = args.wander {
        config.baseline_wander = Some(BaselineWanderConfig {
            amplitude,
            frequency_hz: 0.3,
        });
    } else {
        config.baseline_wander = toml.wander.clone();
    }

    config
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    fs::create_dir_all(&args.output_dir).context("Failed to create output directory")?;

    let toml_config = if let Some(ref config_path) = args.config {
        load_toml_config(config_path)?
    } else {
        TomlConfig::default()
    };

    let signal_config = build_signal_config(&toml_config, &args);
    validate_signal_config(&signal_config)?;
    let base_seed = args.seed.unwrap_or(0);

    let mut manifest_entries = Vec::new();
    for index in 0..args.count {
        let seed = base_seed + index as u64;
        let noise_config = build_noise_config(&toml_config, &args, seed);
        let recording = generate_noisy_ecg(&signal_config, &noise_config);

        let stem = format!("{}_{:03}", args.prefix, index);
        let filename = format!("{}.csv", stem);
        let truth_name = format!("{}_peaks.txt", stem);

        save_recording(
            &args.output_dir.join(&filename),
            &recording,
            signal_config.sample_rate_hz,
        )
        .context("Failed to write recording")?;
        save_ground_truth(&args.output_dir.join(&truth_name), &recording.r_peaks)
            .context("Failed to write ground truth")?;

        manifest_entries.push(ManifestEntry {
            file: filename,
            ground_truth: truth_name,
            seed,
            beats: recording.r_peaks.len(),
        });
        eprint!("\rGenerating: {}/{}", index + 1, args.count);
    }
    eprintln!();

    if args.manifest {
        let manifest = Manifest {
            sample_rate: signal_config.sample_rate_hz,
            heart_rate_bpm: signal_config.heart_rate_bpm,
            duration: signal_config.duration_secs,
            files: manifest_entries,
        };
        let manifest_path = args.output_dir.join("manifest.json");
        let manifest_json =
            serde_json::to_string_pretty(&manifest).context("Failed to serialize manifest")?;
        fs::write(&manifest_path, manifest_json).context("Failed to write manifest")?;
        eprintln!("Manifest written to: {}", manifest_path.display());
    }

    eprintln!(
        "Generated {} recordings in {}",
        args.count,
        args.output_dir.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(extra: &[&str]) -> Args {
        let mut argv = vec!["generate_ecg"];
        argv.extend_from_slice(extra);
        Args::parse_from(argv)
    }

    #[test]
    fn test_cli_overrides_toml() {
        let toml: TomlConfig = toml::from_str(
            "[signal]\nheart_rate_bpm = 60.0\n[awgn]\nstd_dev = 0.05\n",
        )
        .unwrap();
        let args = args(&["--heart-rate", "90", "--noise-std", "0.01"]);

        let signal = build_signal_config(&toml, &args);
        assert_eq!(signal.heart_rate_bpm, 90.0);
        assert_eq!(signal.sample_rate_hz, 360.0);

        let noise = build_noise_config(&toml, &args, 5);
        assert_eq!(noise.seed, Some(5));
        assert_eq!(noise.additive.map(|a| a.std_dev), Some(0.01));
        assert!(noise.baseline_wander.is_none());
    }

    #[test]
    fn test_signal_config_limits() {
        assert!(validate_signal_config(&SyntheticEcgConfig::default()).is_ok());

        let toml: TomlConfig = toml::from_str("[signal]\nrr_jitter = 1.5\n").unwrap();
        assert!(validate_signal_config(&build_signal_config(&toml, &args(&[]))).is_err());

        let signal = build_signal_config(&TomlConfig::default(), &args(&["--heart-rate", "0"]));
        assert!(validate_signal_config(&signal).is_err());
    }

    #[test]
    fn test_toml_sections_used_without_overrides() {
        let toml: TomlConfig = toml::from_str(
            "[wander]\namplitude = 0.2\nfrequency_hz = 0.25\n[powerline]\namplitude = 0.01\nfrequency_hz = 60.0\n",
        )
        .unwrap();
        let noise = build_noise_config(&toml, &args(&[]), 0);
        assert_eq!(noise.baseline_wander.map(|w| w.frequency_hz), Some(0.25));
        assert_eq!(noise.powerline.map(|p| p.frequency_hz), Some(60.0));
        assert!(noise.additive.is_none());
    }
}
