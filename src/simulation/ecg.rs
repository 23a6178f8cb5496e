use rand::RngExt;
use rand_chacha::ChaCha8Rng;

/// Gaussian component of a heartbeat, relative to the R peak
#[derive(Debug, Clone, Copy)]
pub struct WaveComponent {
    pub amplitude: f64,
    pub offset_secs: f64,
    pub width_secs: f64,
}

/// P, Q, R, S and T waves of a lead-II like beat with unit R amplitude
pub const BEAT_MORPHOLOGY: [WaveComponent; 5] = [
    WaveComponent {
        amplitude: 0.12,
        offset_secs: -0.2,
        width_secs: 0.025,
    },
    WaveComponent {
        amplitude: -0.12,
        offset_secs: -0.025,
        width_secs: 0.008,
    },
    WaveComponent {
        amplitude: 1.0,
        offset_secs: 0.0,
        width_secs: 0.010,
    },
    WaveComponent {
        amplitude: -0.2,
        offset_secs: 0.025,
        width_secs: 0.008,
    },
    WaveComponent {
        amplitude: 0.3,
        offset_secs: 0.3,
        width_secs: 0.04,
    },
];

/// Largest usable RR jitter; every interval stays at least 10% of nominal
pub const MAX_RR_JITTER: f64 = 0.9;

/// Waves are truncated beyond this distance from their R peak
const BEAT_EXTENT_SECS: f64 = 0.6;

#[derive(Debug, Clone, serde::Deserialize)]
#[serde(default)]
pub struct SyntheticEcgConfig {
    pub sample_rate_hz: f64,
    pub duration_secs: f64,
    pub heart_rate_bpm: f64,
    /// Relative RR variation, each interval is scaled by `1 ± rr_jitter`
    ///
    /// Clamped to `0.0..=MAX_RR_JITTER` so beats stay strictly ordered.
    pub rr_jitter: f64,
    /// R wave amplitude
    pub amplitude: f64,
    /// Time of the first R peak; no beat is placed in the last `first_beat_secs`
    pub first_beat_secs: f64,
}

impl Default for SyntheticEcgConfig {
    fn default() -> Self {
        Self {
            sample_rate_hz: 360.0,
            duration_secs: 10.0,
            heart_rate_bpm: 75.0,
            rr_jitter: 0.05,
            amplitude: 1.0,
            first_beat_secs: 0.5,
        }
    }
}

/// Synthetic samples with the true R peak locations
#[derive(Debug, Clone)]
pub struct SyntheticRecording {
    pub samples: Vec<f64>,
    pub r_peaks: Vec<usize>,
}

/// Beat times with jittered RR intervals, as sample indices
///
/// Empty for a non-positive heart rate.
pub fn beat_positions(config: &SyntheticEcgConfig, rng: &mut ChaCha8Rng) -> Vec<usize> {
    if !(config.heart_rate_bpm.is_finite() && config.heart_rate_bpm > 0.0) {
        return Vec::new();
    }
    let rr_secs = 60.0 / config.heart_rate_bpm;
    let rr_jitter = if config.rr_jitter.is_nan() {
        0.0
    } else {
        config.rr_jitter.clamp(0.0, MAX_RR_JITTER)
    };
    let last_beat = config.duration_secs - config.first_beat_secs;

    let mut beats = Vec::new();
    let mut t = config.first_beat_secs;
    while t < last_beat {
        beats.push((t * config.sample_rate_hz).round() as usize);
        let jitter = 2.0 * rng.random::<f64>() - 1.0;
        t += rr_secs * (1.0 + rr_jitter * jitter);
    }
    beats
}

/// Noise-free ECG: a sum of Gaussian waves around each beat
pub fn generate_clean_ecg(config: &SyntheticEcgConfig, rng: &mut ChaCha8Rng) -> SyntheticRecording {
    let fs = config.sample_rate_hz;
    let num_samples = (config.duration_secs * fs) as usize;
    let mut samples = vec![0.0; num_samples];
    let r_peaks = beat_positions(config, rng);
    let extent = (BEAT_EXTENT_SECS * fs).ceil() as usize;

    for &r in &r_peaks {
        let r_secs = r as f64 / fs;
        let lo = r.saturating_sub(extent);
        let hi = (r + extent + 1).min(num_samples);

        for (i, sample) in samples.iter_mut().enumerate().take(hi).skip(lo) {
            let t = i as f64 / fs - r_secs;
            if t.abs() > BEAT_EXTENT_SECS {
                continue;
            }
            for wave in &BEAT_MORPHOLOGY {
                let d = t - wave.offset_secs;
                *sample += config.amplitude
                    * wave.amplitude
                    * (-(d * d) / (2.0 * wave.width_secs * wave.width_secs)).exp();
            }
        }
    }

    SyntheticRecording { samples, r_peaks }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_r_peaks_are_local_maxima() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let ecg = generate_clean_ecg(&SyntheticEcgConfig::default(), &mut rng);

        assert_eq!(ecg.samples.len(), 3600);
        assert!(ecg.r_peaks.len() >= 11 && ecg.r_peaks.len() <= 13);
        for &r in &ecg.r_peaks {
            assert!(ecg.samples[r] > 0.9);
            assert!(ecg.samples[r] > ecg.samples[r - 1]);
            assert!(ecg.samples[r] > ecg.samples[r + 1]);
        }
    }

    #[test]
    fn test_beat_spacing_follows_heart_rate() {
        let config = SyntheticEcgConfig {
            rr_jitter: 0.0,
            heart_rate_bpm: 60.0,
            ..SyntheticEcgConfig::default()
        };
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let beats = beat_positions(&config, &mut rng);

        assert_eq!(beats.first(), Some(&180));
        for pair in beats.windows(2) {
            assert_eq!(pair[1] - pair[0], 360);
        }
    }

    #[test]
    fn test_excessive_jitter_keeps_beats_ordered() {
        let config = SyntheticEcgConfig {
            rr_jitter: 3.0,
            duration_secs: 60.0,
            ..SyntheticEcgConfig::default()
        };
        for seed in 0..10 {
            let beats = beat_positions(&config, &mut ChaCha8Rng::seed_from_u64(seed));
            assert!(!beats.is_empty());
            for pair in beats.windows(2) {
                assert!(pair[1] > pair[0], "seed {}: {:?}", seed, pair);
            }
        }
    }

    #[test]
    fn test_non_positive_heart_rate_has_no_beats() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        for heart_rate_bpm in [0.0, -60.0, f64::NAN] {
            let config = SyntheticEcgConfig {
                heart_rate_bpm,
                ..SyntheticEcgConfig::default()
            };
            assert!(beat_positions(&config, &mut rng).is_empty());
        }
    }

    #[test]
    fn test_same_seed_same_signal() {
        let config = SyntheticEcgConfig::default();
        let a = generate_clean_ecg(&config, &mut ChaCha8Rng::seed_from_u64(3));
        let b = generate_clean_ecg(&config, &mut ChaCha8Rng::seed_from_u64(3));
        assert_eq!(a.r_peaks, b.r_peaks);
        assert_eq!(a.samples, b.samples);
    }
}
