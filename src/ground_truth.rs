//! Reference peak annotations and detection scoring.
//!
//! A ground-truth file is a whitespace-separated list of sample indices.
//! It is only used to score detections; the pipeline never reads it.

use std::path::Path;

use serde::Serialize;

use crate::error::{EcgError, Result};

/// Load reference peak indices from a whitespace-separated file
pub fn load_ground_truth(path: &Path) -> Result<Vec<usize>> {
    let content = std::fs::read_to_string(path).map_err(|source| EcgError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_ground_truth(&content, path)
}

fn parse_ground_truth(content: &str, path: &Path) -> Result<Vec<usize>> {
    content
        .split_whitespace()
        .map(|token| {
            token
                .parse::<usize>()
                .map_err(|_| EcgError::InvalidGroundTruth {
                    path: path.to_path_buf(),
                    token: token.to_string(),
                })
        })
        .collect()
}

/// Detection scores against reference annotations
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Evaluation {
    pub true_positives: usize,
    pub false_positives: usize,
    pub false_negatives: usize,
    /// Detection tolerance in samples
    pub tolerance: usize,
}

impl Evaluation {
    /// Fraction of reference peaks that were detected
    pub fn sensitivity(&self) -> f64 {
        ratio(
            self.true_positives,
            self.true_positives + self.false_negatives,
        )
    }

    /// Fraction of detections that match a reference peak
    pub fn positive_predictive_value(&self) -> f64 {
        ratio(
            self.true_positives,
            self.true_positives + self.false_positives,
        )
    }
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 {
        return 0.0;
    }
    num as f64 / den as f64
}

/// Match detections to reference peaks within `tolerance` samples
///
/// Each detection, in order, claims the nearest unclaimed reference peak in
/// range (the earlier one on a tie). Unmatched detections are false
/// positives, unclaimed references false negatives.
pub fn evaluate_detections(detected: &[usize], truth: &[usize], tolerance: usize) -> Evaluation {
    let mut reference: Vec<usize> = truth.to_vec();
    reference.sort_unstable();
    let mut claimed = vec![false; reference.len()];
    let mut true_positives = 0;

    for &peak in detected {
        let lo = reference.partition_point(|&r| r.saturating_add(tolerance) < peak);
        let best = reference[lo..]
            .iter()
            .enumerate()
            .take_while(|&(_, &r)| r <= peak.saturating_add(tolerance))
            .filter(|&(offset, _)| !claimed[lo + offset])
            .min_by_key(|&(_, &r)| r.abs_diff(peak))
            .map(|(offset, _)| lo + offset);

        if let Some(index) = best {
            claimed[index] = true;
            true_positives += 1;
        }
    }

    Evaluation {
        true_positives,
        false_positives: detected.len() - true_positives,
        false_negatives: reference.len() - true_positives,
        tolerance,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_parse_whitespace_separated() {
        let peaks = parse_ground_truth("77  370\n662\t946\n", Path::new("gt")).unwrap();
        assert_eq!(peaks, vec![77, 370, 662, 946]);
        assert!(parse_ground_truth("", Path::new("gt")).unwrap().is_empty());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        let err = parse_ground_truth("12 x3 40", Path::new("gt")).unwrap_err();
        match err {
            EcgError::InvalidGroundTruth { token, .. } => assert_eq!(token, "x3"),
            other => panic!("unexpected error {other}"),
        }
        assert!(parse_ground_truth("-5", Path::new("gt")).is_err());
    }

    #[test]
    fn test_perfect_match_with_offset() {
        let eval = evaluate_detections(&[109, 409, 709], &[100, 400, 700], 15);
        assert_eq!(eval.true_positives, 3);
        assert_eq!(eval.false_positives, 0);
        assert_eq!(eval.false_negatives, 0);
        assert_relative_eq!(eval.sensitivity(), 1.0);
        assert_relative_eq!(eval.positive_predictive_value(), 1.0);
    }

    #[test]
    fn test_misses_and_extras() {
        let eval = evaluate_detections(&[100, 250, 705], &[100, 400, 700], 10);
        assert_eq!(eval.true_positives, 2);
        assert_eq!(eval.false_positives, 1);
        assert_eq!(eval.false_negatives, 1);
        assert_relative_eq!(eval.sensitivity(), 2.0 / 3.0);
    }

    #[test]
    fn test_reference_claimed_once() {
        // Two detections around one reference peak
        let eval = evaluate_detections(&[98, 103], &[100], 5);
        assert_eq!(eval.true_positives, 1);
        assert_eq!(eval.false_positives, 1);
        assert_eq!(eval.false_negatives, 0);
    }

    #[test]
    fn test_nearest_reference_is_claimed() {
        let eval = evaluate_detections(&[105, 112], &[100, 108], 10);
        // 105 takes 108 (distance 3), 112 has 100 out of range
        assert_eq!(eval.true_positives, 1);
        assert_eq!(eval.false_negatives, 1);
    }

    #[test]
    fn test_extreme_indices_and_tolerance() {
        let eval = evaluate_detections(&[100, 400], &[100, usize::MAX], 15);
        assert_eq!(eval.true_positives, 1);
        assert_eq!(eval.false_positives, 1);
        assert_eq!(eval.false_negatives, 1);

        let eval = evaluate_detections(&[usize::MAX - 1], &[usize::MAX], usize::MAX);
        assert_eq!(eval.true_positives, 1);
    }

    #[test]
    fn test_empty_inputs() {
        let eval = evaluate_detections(&[], &[], 10);
        assert_relative_eq!(eval.sensitivity(), 0.0);
        assert_relative_eq!(eval.positive_predictive_value(), 0.0);

        let eval = evaluate_detections(&[5], &[], 10);
        assert_eq!(eval.false_positives, 1);
    }
}
