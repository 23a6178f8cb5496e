use std::path::{Path, PathBuf};

use crate::config::BatchConfig;
use crate::error::{EcgError, Result};
use crate::pipeline::PipelineOutput;
use crate::recording::recording_name;

/// Where the results for the recording at `recording_path` are written
///
/// `<output_dir>/<stem><results_suffix>`, with the recording's own directory
/// standing in when no output directory is configured.
pub fn results_path(recording_path: &Path, config: &BatchConfig) -> PathBuf {
    let dir = match &config.output_dir {
        Some(dir) => dir.clone(),
        None => recording_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default(),
    };
    dir.join(format!(
        "{}{}",
        recording_name(recording_path),
        config.results_suffix
    ))
}

/// Write one row per raw sample: `index,value,is_peak`
///
/// With `filtered` set, `smoothed` and `bandpassed` columns are appended.
/// Peak indices outside the sample range are ignored.
pub fn export_peaks(
    path: &Path,
    samples: &[f64],
    peaks: &[usize],
    filtered: Option<&PipelineOutput>,
) -> Result<()> {
    let export_err = |source: csv::Error| EcgError::Export {
        path: path.to_path_buf(),
        source,
    };

    let mut is_peak = vec![false; samples.len()];
    for &p in peaks {
        if let Some(flag) = is_peak.get_mut(p) {
            *flag = true;
        }
    }

    let mut writer = csv::Writer::from_path(path).map_err(export_err)?;

    let header = if filtered.is_some() {
        writer.write_record(["index", "value", "is_peak", "smoothed", "bandpassed"])
    } else {
        writer.write_record(["index", "value", "is_peak"])
    };
    header.map_err(export_err)?;

    for (i, (&value, &peak)) in samples.iter().zip(&is_peak).enumerate() {
        let flag = if peak { "1" } else { "0" };
        let row = match filtered {
            Some(output) => writer.write_record([
                i.to_string(),
                value.to_string(),
                flag.to_string(),
                output.smoothed.get(i).map(f64::to_string).unwrap_or_default(),
                output.bandpassed.get(i).map(f64::to_string).unwrap_or_default(),
            ]),
            None => writer.write_record([i.to_string(), value.to_string(), flag.to_string()]),
        };
        row.map_err(export_err)?;
    }

    writer
        .flush()
        .map_err(|e| export_err(csv::Error::from(e)))?;
    log::debug!("Exported {} samples to {}", samples.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_results_path_next_to_recording() {
        let config = BatchConfig::default();
        assert_eq!(
            results_path(Path::new("/data/mitbih/100.csv"), &config),
            PathBuf::from("/data/mitbih/100_results.csv")
        );
    }

    #[test]
    fn test_results_path_in_output_dir() {
        let config = BatchConfig {
            output_dir: Some(PathBuf::from("/tmp/out")),
            results_suffix: "_peaks.csv".to_string(),
            ..BatchConfig::default()
        };
        assert_eq!(
            results_path(Path::new("/data/mitbih/207.csv"), &config),
            PathBuf::from("/tmp/out/207_peaks.csv")
        );
    }

    #[test]
    fn test_export_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");

        export_peaks(&path, &[0.5, 1.25, -0.75, 0.0], &[1, 99], None).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            content,
            "index,value,is_peak\n0,0.5,0\n1,1.25,1\n2,-0.75,0\n3,0,0\n"
        );
    }

    #[test]
    fn test_export_with_filtered_columns() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let output = PipelineOutput {
            smoothed: vec![1.0, 2.0],
            bandpassed: vec![-0.5, 0.5],
            peaks: vec![1],
        };

        export_peaks(&path, &[1.0, 3.0], &output.peaks, Some(&output)).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines[0], "index,value,is_peak,smoothed,bandpassed");
        assert_eq!(lines[2], "1,3,1,2,0.5");
    }

    #[test]
    fn test_unwritable_destination() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.csv");
        let err = export_peaks(&path, &[1.0], &[], None).unwrap_err();
        assert!(matches!(err, EcgError::Export { .. }));
    }
}
