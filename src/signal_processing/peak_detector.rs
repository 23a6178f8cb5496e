use std::ops::Range;

use crate::config::DetectorConfig;

/// Mean and population standard deviation of a detector window
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocalStats {
    pub mean: f64,
    pub std_dev: f64,
}

/// Adaptive-threshold peak detector with refractory suppression
///
/// For every interior index `i` the detector computes the mean and standard
/// deviation of `data[i - half..=i + half]` (`half = window_size / 2`) and
/// accepts `i` when the sample clears `mean + multiplier * std_dev` and is a
/// strict local maximum against its immediate neighbours.
///
/// Indices are scanned left to right and acceptance is causal: a candidate
/// closer than `refractory_period` samples to the last accepted peak is
/// dropped, so of two peaks inside one refractory window the earlier wins.
///
/// Both statistics are normalised by `window_size` rather than by the number
/// of points in the window, and are recomputed from scratch at every index so
/// results do not depend on summation history.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DynamicPeakDetector {
    window_size: usize,
    multiplier: f64,
    refractory_period: usize,
}

impl DynamicPeakDetector {
    /// Create a new dynamic peak detector
    ///
    /// # Arguments
    /// * `window_size` - Local statistics neighbourhood width (0 = detect nothing)
    /// * `multiplier` - Threshold sensitivity in standard deviations
    /// * `refractory_period` - Minimum samples between accepted peaks (0 = no suppression)
    pub fn new(window_size: usize, multiplier: f64, refractory_period: usize) -> Self {
        Self {
            window_size,
            multiplier,
            refractory_period,
        }
    }

    pub fn from_config(config: &DetectorConfig) -> Self {
        Self::new(
            config.window_size,
            config.multiplier,
            config.refractory_period,
        )
    }

    pub fn window_size(&self) -> usize {
        self.window_size
    }

    pub fn multiplier(&self) -> f64 {
        self.multiplier
    }

    pub fn refractory_period(&self) -> usize {
        self.refractory_period
    }

    /// Indices eligible for detection in a sequence of `len` samples
    ///
    /// Empty when `window_size` is 0 or the sequence is shorter than
    /// `window_size + 1`.
    pub fn interior(&self, len: usize) -> Range<usize> {
        if self.window_size == 0 || len <= self.window_size {
            return 0..0;
        }
        let half = self.window_size / 2;
        half..len - half
    }

    /// Local statistics around `index`
    ///
    /// `index` must lie inside [`interior`](Self::interior).
    pub fn local_stats(&self, data: &[f64], index: usize) -> LocalStats {
        let half = self.window_size / 2;
        let window = &data[index - half..=index + half];
        let norm = self.window_size as f64;

        let mean = window.iter().sum::<f64>() / norm;
        let sq_sum: f64 = window.iter().map(|&x| (x - mean) * (x - mean)).sum();

        LocalStats {
            mean,
            std_dev: (sq_sum / norm).sqrt(),
        }
    }

    /// Detection threshold at `index`
    pub fn threshold(&self, data: &[f64], index: usize) -> f64 {
        let stats = self.local_stats(data, index);
        stats.mean + self.multiplier * stats.std_dev
    }

    fn is_candidate(&self, data: &[f64], i: usize) -> bool {
        // A peak needs a neighbour on both sides
        if i == 0 || i + 1 >= data.len() {
            return false;
        }
        let sample = data[i];
        sample > data[i - 1] && sample > data[i + 1] && sample > self.threshold(data, i)
    }

    /// Find all peaks in `data`
    ///
    /// Returns strictly increasing indices, each at least `refractory_period`
    /// after the previous one.
    pub fn detect(&self, data: &[f64]) -> Vec<usize> {
        let mut peaks: Vec<usize> = Vec::new();

        for i in self.interior(data.len()) {
            if !self.is_candidate(data, i) {
                continue;
            }
            if let Some(&last) = peaks.last()
                && i - last < self.refractory_period
            {
                continue;
            }
            peaks.push(i);
        }

        peaks
    }
}

impl From<&DetectorConfig> for DynamicPeakDetector {
    fn from(config: &DetectorConfig) -> Self {
        Self::from_config(config)
    }
}

/// Convenience wrapper around [`DynamicPeakDetector::detect`]
pub fn detect_peaks_dynamic(
    data: &[f64],
    window_size: usize,
    multiplier: f64,
    refractory_period: usize,
) -> Vec<usize> {
    DynamicPeakDetector::new(window_size, multiplier, refractory_period).detect(data)
}
