use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = core::result::Result<T, Error>;

/// Custom error types for the albumdo library
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error (move, copy, link, mkdir)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Image decoding or encoding error
    #[error("Image processing error: {0}")]
    Image(String),

    /// Root path or image path does not exist
    #[error("Path not found: {0}")]
    NotFound(PathBuf),

    /// The root path exists but holds no image files
    #[error("No images found under: {0}")]
    NoImages(PathBuf),

    /// A rating link or trash entry of the same name points elsewhere
    #[error("Conflict: {link} already exists and points to {target}")]
    Conflict { link: PathBuf, target: PathBuf },

    /// Ratings are 1, 2 or 3
    #[error("Invalid rating: {0} (expected 1-3)")]
    InvalidRating(u8),

    /// Cursor jump outside the library
    #[error("Index {index} out of range for library of {len} images")]
    IndexOutOfRange { index: usize, len: usize },

    /// Operation needs a loaded, non-empty library
    #[error("No library loaded")]
    EmptyLibrary,

    /// Invalid configuration error
    #[error("Invalid configuration: {0}")]
    Configuration(String),
}

impl From<image::ImageError> for Error {
    fn from(err: image::ImageError) -> Self {
        Error::Image(err.to_string())
    }
}
