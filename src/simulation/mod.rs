//! Synthetic ECG recordings with known R peak positions.

mod ecg;
mod export;
mod noise;

pub use ecg::{
    BEAT_MORPHOLOGY, MAX_RR_JITTER, SyntheticEcgConfig, SyntheticRecording, WaveComponent,
    beat_positions, generate_clean_ecg,
};
pub use export::{save_ground_truth, save_recording};
pub use noise::{
    AdditiveNoiseConfig, BaselineWanderConfig, NoiseConfig, PowerlineConfig, apply_noise,
    generate_noisy_ecg,
};
