use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::Error;

/// Image formats recognised by the scanner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ImageFormat {
    Jpeg,
    Png,
    Gif,
    Bmp,
    Tiff,
    Ico,
    Mng,
    Tga,
    Psd,
    Xcf,
    Svg,
    Icns,
}

impl ImageFormat {
    /// Determine format from file extension, case-insensitively
    pub fn from_extension(ext: &str) -> Option<Self> {
        let format = match ext.to_lowercase().as_str() {
            "jpg" | "jpeg" => Self::Jpeg,
            "png" => Self::Png,
            "gif" => Self::Gif,
            "bmp" => Self::Bmp,
            "tif" | "tiff" => Self::Tiff,
            "ico" => Self::Ico,
            "mng" => Self::Mng,
            "tga" => Self::Tga,
            "psd" => Self::Psd,
            "xcf" => Self::Xcf,
            "svg" => Self::Svg,
            "icns" => Self::Icns,
            _ => return None,
        };
        Some(format)
    }

    /// Determine format from a path's extension
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }
}

/// One discovered image. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRecord {
    /// Absolute path, unique within a library
    pub path: PathBuf,

    /// Parent directory
    pub directory: PathBuf,

    /// Unix seconds; 0 when the timestamp could not be read
    pub created_at: i64,
}

impl ImageRecord {
    pub fn new(path: impl Into<PathBuf>, created_at: i64) -> Self {
        let path = path.into();
        let directory = path.parent().map(Path::to_path_buf).unwrap_or_default();
        Self {
            path,
            directory,
            created_at,
        }
    }

    /// File name component, used for display and trash naming
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// A star rating between 1 and 3
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Rating(u8);

impl Rating {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 3;

    pub fn value(self) -> u8 {
        self.0
    }

    /// All valid ratings, lowest first
    pub fn all() -> impl Iterator<Item = Rating> {
        (Self::MIN..=Self::MAX).map(Rating)
    }

    /// Stars as shown on the rating buttons
    pub fn stars(self) -> String {
        "*".repeat(self.0 as usize)
    }
}

impl TryFrom<u8> for Rating {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Rating(value))
        } else {
            Err(Error::InvalidRating(value))
        }
    }
}

impl From<Rating> for u8 {
    fn from(rating: Rating) -> Self {
        rating.0
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Pixel dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// One quadrant of a 2x2 grid
    pub fn half(self) -> Self {
        Self::new(self.width / 2, self.height / 2)
    }
}

/// A crop rectangle in source-image coordinates, `[left, top, right, bottom)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropRect {
    pub left: u32,
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
}

impl CropRect {
    pub fn width(&self) -> u32 {
        self.right - self.left
    }

    pub fn height(&self) -> u32 {
        self.bottom - self.top
    }
}
