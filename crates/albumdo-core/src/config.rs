use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::types::Size;

/// Name of the trash folder created under the user's home directory
pub const TRASH_DIR_NAME: &str = "AlBumdoTrash";

/// Which filesystem timestamp orders the library
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimestampSource {
    /// Inode change time (ctime) on unix, creation time elsewhere
    Changed,

    /// File creation (birth) time
    Created,

    /// Last modification time
    Modified,
}

/// Log level for the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Configuration for a photo library session
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Root of the rating buckets (`1/`, `2/`, `3/`)
    pub scores_dir: PathBuf,

    /// Where deleted images are moved; `None` means `~/AlBumdoTrash`
    pub trash_dir: Option<PathBuf>,

    /// Pixel box of a directory cover tile
    pub tile_size: Size,

    /// Width of one thumbnail in the preview strip
    pub preview_thumb_width: u32,

    /// Maximum directory depth for scanning
    pub max_depth: Option<usize>,

    /// Timestamp used to order the library
    pub timestamp_source: TimestampSource,

    /// Move to the next image after rating the current one
    pub advance_after_rating: bool,

    /// Number of threads for tile rendering (0 = auto)
    pub threads: usize,

    /// Log level
    pub log_level: LogLevel,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            scores_dir: PathBuf::from("scores"),
            trash_dir: None,
            tile_size: Size::new(960, 540),
            preview_thumb_width: 100,
            max_depth: None,
            timestamp_source: TimestampSource::Changed,
            advance_after_rating: true,
            threads: 0, // Auto
            log_level: LogLevel::Info,
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path)
            .map_err(|e| Error::Configuration(format!("Failed to open config file: {}", e)))?;

        let config: Config = serde_json::from_reader(file)
            .map_err(|e| Error::Configuration(format!("Failed to parse config file: {}", e)))?;

        Ok(config)
    }

    /// Save configuration to a file
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let file = std::fs::File::create(path)
            .map_err(|e| Error::Configuration(format!("Failed to create config file: {}", e)))?;

        serde_json::to_writer_pretty(file, self)
            .map_err(|e| Error::Configuration(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.tile_size.width == 0 || self.tile_size.height == 0 {
            return Err(Error::Configuration(
                "Tile size must be non-zero in both dimensions".to_string(),
            ));
        }

        if self.preview_thumb_width == 0 {
            return Err(Error::Configuration(
                "Preview thumbnail width must be non-zero".to_string(),
            ));
        }

        if self.max_depth == Some(0) {
            return Err(Error::Configuration(
                "Maximum scan depth must be at least 1".to_string(),
            ));
        }

        Ok(())
    }

    /// Resolved trash directory
    pub fn trash_dir(&self) -> Result<PathBuf> {
        match &self.trash_dir {
            Some(dir) => Ok(dir.clone()),
            None => dirs::home_dir()
                .map(|home| home.join(TRASH_DIR_NAME))
                .ok_or_else(|| {
                    Error::Configuration("Could not determine home directory".to_string())
                }),
        }
    }
}
