use std::fs;
use std::path::{Path, PathBuf};

use albumdo_core::{Config, TimestampSource};
use filetime::FileTime;
use image::{Rgba, RgbaImage};
use tempfile::TempDir;

/// A sandbox with a photo root, a scores root and a trash folder
pub struct Sandbox {
    pub dir: TempDir,
}

impl Sandbox {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("photos")).unwrap();
        Self { dir }
    }

    pub fn photos(&self) -> PathBuf {
        self.dir.path().join("photos")
    }

    pub fn trash(&self) -> PathBuf {
        self.dir.path().join("trash")
    }

    /// Config pointing every location into the sandbox, ordered by mtime
    pub fn config(&self) -> Config {
        Config {
            scores_dir: self.dir.path().join("scores"),
            trash_dir: Some(self.trash()),
            timestamp_source: TimestampSource::Modified,
            advance_after_rating: false,
            ..Default::default()
        }
    }
}

/// Write a small solid-colour PNG
pub fn create_png(path: &Path, width: u32, height: u32) -> PathBuf {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    RgbaImage::from_pixel(width, height, Rgba([120, 80, 40, 255]))
        .save(path)
        .unwrap();
    path.to_path_buf()
}

/// Write a PNG and pin its modification time to `unix_secs`
pub fn create_timed_png(dir: &Path, name: &str, unix_secs: i64) -> PathBuf {
    let path = create_png(&dir.join(name), 16, 16);
    filetime::set_file_mtime(&path, FileTime::from_unix_time(unix_secs, 0)).unwrap();
    path
}
