#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use ecgpeaks::simulation::{
    NoiseConfig, SyntheticEcgConfig, SyntheticRecording, generate_noisy_ecg, save_ground_truth,
    save_recording,
};

pub const SAMPLE_RATE: f64 = 360.0;

/// Synthetic recording at the default 360 Hz, 75 bpm
pub fn synthetic_ecg(duration_secs: f64, noise: &NoiseConfig) -> SyntheticRecording {
    let config = SyntheticEcgConfig {
        duration_secs,
        ..SyntheticEcgConfig::default()
    };
    generate_noisy_ecg(&config, noise)
}

/// Write a synthetic recording and its `_peaks.txt` ground truth into `dir`
pub fn write_synthetic(dir: &Path, stem: &str, recording: &SyntheticRecording) -> PathBuf {
    let path = dir.join(format!("{}.csv", stem));
    save_recording(&path, recording, SAMPLE_RATE).unwrap();
    save_ground_truth(&dir.join(format!("{}_peaks.txt", stem)), &recording.r_peaks).unwrap();
    path
}

/// Write `samples` as a three-column recording with the signal in column 2
pub fn write_samples(dir: &Path, name: &str, samples: &[f64]) -> PathBuf {
    let mut content = String::from("index,time,mlii\n");
    for (i, s) in samples.iter().enumerate() {
        content.push_str(&format!("{},{},{}\n", i, i as f64 / SAMPLE_RATE, s));
    }
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

/// Spikes of height 5.0 on a flat baseline
pub fn spike_train(len: usize, positions: &[usize]) -> Vec<f64> {
    let mut samples = vec![0.0; len];
    for &p in positions {
        samples[p] = 5.0;
    }
    samples
}
