use std::path::Path;

use crate::error::{EcgError, Result};

use super::ecg::SyntheticRecording;

/// Write samples as `index,time,mlii`, the layout the analyzer reads by default
pub fn save_recording(path: &Path, recording: &SyntheticRecording, sample_rate: f64) -> Result<()> {
    let export_err = |source: csv::Error| EcgError::Export {
        path: path.to_path_buf(),
        source,
    };

    let mut writer = csv::Writer::from_path(path).map_err(export_err)?;
    writer
        .write_record(["index", "time", "mlii"])
        .map_err(export_err)?;
    for (i, sample) in recording.samples.iter().enumerate() {
        writer
            .write_record([
                i.to_string(),
                format!("{:.6}", i as f64 / sample_rate),
                format!("{:.6}", sample),
            ])
            .map_err(export_err)?;
    }
    writer.flush().map_err(|source| EcgError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Write R peak indices, one per line
pub fn save_ground_truth(path: &Path, r_peaks: &[usize]) -> Result<()> {
    let mut content = String::new();
    for r in r_peaks {
        content.push_str(&r.to_string());
        content.push('\n');
    }
    std::fs::write(path, content).map_err(|source| EcgError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::IngestConfig;
    use crate::ground_truth::load_ground_truth;
    use crate::recording::Recording;

    #[test]
    fn test_saved_recording_loads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("synth.csv");
        let recording = SyntheticRecording {
            samples: vec![0.5, -0.25, 1.0],
            r_peaks: vec![2],
        };
        save_recording(&path, &recording, 360.0).unwrap();

        let loaded = Recording::load(&path, &IngestConfig::default()).unwrap();
        assert_eq!(loaded.samples(), &[0.5, -0.25, 1.0]);
        assert_eq!(loaded.ingest_report().dropped_rows, 0);

        let truth_path = dir.path().join("synth_peaks.txt");
        save_ground_truth(&truth_path, &recording.r_peaks).unwrap();
        assert_eq!(load_ground_truth(&truth_path).unwrap(), vec![2]);
    }
}
