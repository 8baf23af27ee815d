use std::fs;
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;
use walkdir::WalkDir;

use crate::config::TimestampSource;
use crate::error::{Error, Result};
use crate::types::ImageFormat;

/// A discovered image file together with the directory it was found in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanEntry {
    pub directory: PathBuf,
    pub path: PathBuf,
}

/// Recursively discover image files under `root`, following symlinked directories
pub fn scan(root: &Path) -> Result<Vec<ScanEntry>> {
    scan_with_depth(root, None)
}

/// Like [`scan`], limited to `max_depth` levels below `root`
pub fn scan_with_depth(root: &Path, max_depth: Option<usize>) -> Result<Vec<ScanEntry>> {
    if !root.exists() {
        return Err(Error::NotFound(root.to_path_buf()));
    }

    let max_depth = max_depth.unwrap_or(usize::MAX);
    let mut entries = Vec::new();

    for entry in WalkDir::new(root).follow_links(true).max_depth(max_depth) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                log::warn!("Skipping unreadable entry under {}: {}", root.display(), e);
                continue;
            }
        };

        if !entry.file_type().is_file() || !has_image_extension(entry.path()) {
            continue;
        }

        let path = entry.path().to_path_buf();
        let directory = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| root.to_path_buf());
        entries.push(ScanEntry { directory, path });
    }

    log::debug!("Found {} images under {}", entries.len(), root.display());
    Ok(entries)
}

/// Image paths only, in scan order
pub fn list_image_files(root: &Path) -> Result<Vec<PathBuf>> {
    Ok(scan(root)?.into_iter().map(|entry| entry.path).collect())
}

/// Returns if the given path has an allow-listed image extension
pub fn has_image_extension(path: &Path) -> bool {
    ImageFormat::from_path(path).is_some()
}

/// Read the ordering timestamp of a file as unix seconds, or 0 if unavailable
pub fn read_created_at(path: &Path, source: TimestampSource) -> i64 {
    let metadata = match fs::metadata(path) {
        Ok(metadata) => metadata,
        Err(e) => {
            log::warn!("Cannot read metadata for {}: {}", path.display(), e);
            return 0;
        }
    };

    let time = match source {
        #[cfg(unix)]
        TimestampSource::Changed => {
            use std::os::unix::fs::MetadataExt;
            return metadata.ctime();
        }
        #[cfg(not(unix))]
        TimestampSource::Changed => metadata.created(),
        TimestampSource::Created => metadata.created(),
        TimestampSource::Modified => metadata.modified(),
    };

    time.ok()
        .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

// -- Tests --
