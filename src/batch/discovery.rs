use std::path::{Path, PathBuf};

use crate::config::BatchConfig;
use crate::error::{EcgError, Result};
use crate::recording::recording_name;

/// One recording scheduled for processing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkItem {
    pub name: String,
    pub path: PathBuf,
}

impl WorkItem {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self {
            name: recording_name(&path),
            path,
        }
    }
}

/// List the recordings to process under `input`
///
/// A file is returned as the only item. A directory contributes its regular
/// files with the configured extension (case-insensitive), skipping any
/// whose name ends with the results suffix so earlier outputs are not
/// re-ingested. Items are sorted by path and the list is never re-scanned.
pub fn discover_recordings(input: &Path, config: &BatchConfig) -> Result<Vec<WorkItem>> {
    let io_err = |source| EcgError::Io {
        path: input.to_path_buf(),
        source,
    };

    let metadata = std::fs::metadata(input).map_err(io_err)?;
    if !metadata.is_dir() {
        return Ok(vec![WorkItem::new(input)]);
    }

    let mut paths = Vec::new();
    for entry in std::fs::read_dir(input).map_err(io_err)? {
        let entry = entry.map_err(io_err)?;
        let path = entry.path();
        if path.is_file() && is_recording(&path, config) {
            paths.push(path);
        }
    }

    if paths.is_empty() {
        return Err(EcgError::NoRecordings(input.to_path_buf()));
    }

    paths.sort();
    log::debug!("Discovered {} recordings in {}", paths.len(), input.display());
    Ok(paths.into_iter().map(WorkItem::new).collect())
}

fn is_recording(path: &Path, config: &BatchConfig) -> bool {
    let extension_matches = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(&config.extension));

    let is_output = path
        .file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.ends_with(&config.results_suffix));

    extension_matches && !is_output
}
