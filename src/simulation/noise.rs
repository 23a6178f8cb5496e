use std::f64::consts::PI;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};

use super::ecg::{SyntheticEcgConfig, SyntheticRecording, generate_clean_ecg};

#[derive(Clone, Debug, Default, serde::Deserialize)]
pub struct NoiseConfig {
    pub seed: Option<u64>,
    pub baseline_wander: Option<BaselineWanderConfig>,
    pub powerline: Option<PowerlineConfig>,
    pub additive: Option<AdditiveNoiseConfig>,
}

impl NoiseConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_baseline_wander(mut self, amplitude: f64, frequency_hz: f64) -> Self {
        self.baseline_wander = Some(BaselineWanderConfig {
            amplitude,
            frequency_hz,
        });
        self
    }

    pub fn with_powerline(mut self, amplitude: f64, frequency_hz: f64) -> Self {
        self.powerline = Some(PowerlineConfig {
            amplitude,
            frequency_hz,
        });
        self
    }

    pub fn with_awgn(mut self, std_dev: f64) -> Self {
        self.additive = Some(AdditiveNoiseConfig { std_dev });
        self
    }
}

/// Slow sinusoidal drift, e.g. from respiration
#[derive(Clone, Debug, serde::Deserialize)]
pub struct BaselineWanderConfig {
    pub amplitude: f64,
    pub frequency_hz: f64,
}

/// Mains interference
#[derive(Clone, Debug, serde::Deserialize)]
pub struct PowerlineConfig {
    pub amplitude: f64,
    pub frequency_hz: f64,
}

#[derive(Clone, Debug, serde::Deserialize)]
pub struct AdditiveNoiseConfig {
    pub std_dev: f64,
}

pub(crate) fn create_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(s) => ChaCha8Rng::seed_from_u64(s),
        None => rand::make_rng(),
    }
}

fn add_sinusoid(signal: &mut [f64], amplitude: f64, frequency_hz: f64, sample_rate: f64) {
    for (i, sample) in signal.iter_mut().enumerate() {
        let t = i as f64 / sample_rate;
        *sample += amplitude * (2.0 * PI * frequency_hz * t).sin();
    }
}

fn apply_additive_noise(signal: &mut [f64], config: &AdditiveNoiseConfig, rng: &mut ChaCha8Rng) {
    if config.std_dev <= 0.0 {
        return;
    }
    let Ok(normal) = Normal::new(0.0, config.std_dev) else {
        return;
    };
    for sample in signal.iter_mut() {
        *sample += normal.sample(rng);
    }
}

/// Add the configured impairments to `signal` in place
pub fn apply_noise(
    signal: &mut [f64],
    config: &NoiseConfig,
    sample_rate: f64,
    rng: &mut ChaCha8Rng,
) {
    if let Some(ref wander) = config.baseline_wander {
        add_sinusoid(signal, wander.amplitude, wander.frequency_hz, sample_rate);
    }
    if let Some(ref powerline) = config.powerline {
        add_sinusoid(signal, powerline.amplitude, powerline.frequency_hz, sample_rate);
    }
    if let Some(ref additive) = config.additive {
        apply_additive_noise(signal, additive, rng);
    }
}

/// Generate a synthetic ECG and impair it
///
/// The same seed reproduces both the beat timing and the noise.
pub fn generate_noisy_ecg(config: &SyntheticEcgConfig, noise: &NoiseConfig) -> SyntheticRecording {
    let mut rng = create_rng(noise.seed);
    let mut recording = generate_clean_ecg(config, &mut rng);
    apply_noise(&mut recording.samples, noise, config.sample_rate_hz, &mut rng);
    recording
}
