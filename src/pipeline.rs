use crate::config::PipelineConfig;
use crate::signal_processing::{DynamicPeakDetector, MovingAverage, NaiveBandpass, SignalFilter};

/// Everything the pipeline derives from one sample sequence
#[derive(Debug, Clone, Default)]
pub struct PipelineOutput {
    /// Moving-average smoothed trace
    pub smoothed: Vec<f64>,
    /// Bandpass approximation the detector ran on
    pub bandpassed: Vec<f64>,
    /// Peak indices, valid against the raw sequence as well
    pub peaks: Vec<usize>,
}

/// Smoothing, bandpass and detection for a single sequence
///
/// Smoothing and the bandpass both run on the raw samples; the detector runs
/// on the bandpassed trace. All three outputs share the raw indexing.
///
/// Holds only parameters, so a single instance can be shared between workers.
#[derive(Debug, Clone)]
pub struct PeakPipeline {
    smoother: MovingAverage,
    bandpass: NaiveBandpass,
    detector: DynamicPeakDetector,
}

impl PeakPipeline {
    pub fn new(config: &PipelineConfig) -> Self {
        Self {
            smoother: MovingAverage::new(config.smoothing_window),
            bandpass: NaiveBandpass::new(config.bandpass_low_window, config.bandpass_high_window),
            detector: DynamicPeakDetector::from_config(&config.detector),
        }
    }

    pub fn smoother(&self) -> &MovingAverage {
        &self.smoother
    }

    pub fn bandpass(&self) -> &NaiveBandpass {
        &self.bandpass
    }

    pub fn detector(&self) -> &DynamicPeakDetector {
        &self.detector
    }

    pub fn process(&self, samples: &[f64]) -> PipelineOutput {
        let smoothed = self.smoother.apply(samples);
        log::trace!(
            "Smoothed {} samples with window {}",
            samples.len(),
            self.smoother.window_size()
        );

        let bandpassed = self.bandpass.apply(samples);
        log::trace!(
            "Bandpassed with windows {} (low) / {} (high)",
            self.bandpass.low_window(),
            self.bandpass.high_window()
        );

        let peaks = self.detector.detect(&bandpassed);

        PipelineOutput {
            smoothed,
            bandpassed,
            peaks,
        }
    }
}

impl Default for PeakPipeline {
    fn default() -> Self {
        Self::new(&PipelineConfig::default())
    }
}
