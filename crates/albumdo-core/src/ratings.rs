//! Ratings persisted as symlinks inside numbered bucket directories.
//!
//! ```text
//! <scores_root>/
//!   1/  <flattened path> -> <original image path>
//!   2/  ...
//!   3/  ...
//! ```
//!
//! The flattened name is the original path with its separators removed.
//! An image is linked from at most one bucket at a time.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::library::absolute;
use crate::logging::log_fs_modification;
use crate::types::Rating;

/// Link name for `path` inside a bucket
pub fn flatten_path(path: &Path) -> String {
    path.to_string_lossy()
        .chars()
        .filter(|c| *c != '/' && *c != std::path::MAIN_SEPARATOR)
        .collect()
}

/// Filesystem-backed rating store
#[derive(Debug, Clone)]
pub struct RatingStore {
    root: PathBuf,
}

impl RatingStore {
    /// Open the store at `root`, creating the directory if needed
    pub fn open(root: impl AsRef<Path>) -> Result<Self> {
        let root = absolute(root.as_ref())?;
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    /// The scores root, browsable as a photo root of rating categories
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn bucket_dir(&self, rating: Rating) -> PathBuf {
        self.root.join(rating.to_string())
    }

    /// Rating of `path`, if any bucket links to it
    pub fn get(&self, path: &Path) -> Result<Option<Rating>> {
        let path = absolute(path)?;
        let name = flatten_path(&path);

        for rating in Rating::all() {
            let link = self.bucket_dir(rating).join(&name);
            if links_to(&link, &path)? {
                return Ok(Some(rating));
            }
        }
        Ok(None)
    }

    /// Rate `path`, replacing any previous rating
    pub fn set(&self, path: &Path, rating: Rating) -> Result<()> {
        let path = absolute(path)?;
        if !path.exists() {
            return Err(Error::NotFound(path));
        }
        let name = flatten_path(&path);

        let bucket = self.bucket_dir(rating);
        fs::create_dir_all(&bucket)?;

        // Link into the new bucket first so a failure keeps the old rating
        let link = bucket.join(&name);
        match symlink(&path, &link) {
            Ok(()) => {
                log_fs_modification("rate", &path, Some(&format!("bucket {}", rating)));
            }
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                if !links_to(&link, &path)? {
                    let target = fs::read_link(&link).unwrap_or_default();
                    return Err(Error::Conflict { link, target });
                }
                log::debug!("{} already rated {}", path.display(), rating);
            }
            Err(e) => return Err(e.into()),
        }

        for other in Rating::all().filter(|r| *r != rating) {
            self.unlink_if_targets(&self.bucket_dir(other).join(&name), &path)?;
        }
        Ok(())
    }

    /// Remove any rating of `path`, returning the rating that was removed
    pub fn clear(&self, path: &Path) -> Result<Option<Rating>> {
        let path = absolute(path)?;
        let name = flatten_path(&path);

        let mut removed = None;
        for rating in Rating::all() {
            if self.unlink_if_targets(&self.bucket_dir(rating).join(&name), &path)? {
                removed = Some(rating);
            }
        }
        Ok(removed)
    }

    /// Targets of every link in a bucket, sorted
    pub fn entries(&self, rating: Rating) -> Result<Vec<PathBuf>> {
        let bucket = self.bucket_dir(rating);
        if !bucket.exists() {
            return Ok(Vec::new());
        }

        let mut targets = Vec::new();
        for entry in fs::read_dir(&bucket)? {
            let entry = entry?;
            match fs::read_link(entry.path()) {
                Ok(target) => targets.push(target),
                Err(e) => log::warn!("Ignoring non-link {}: {}", entry.path().display(), e),
            }
        }
        targets.sort();
        Ok(targets)
    }

    fn unlink_if_targets(&self, link: &Path, path: &Path) -> Result<bool> {
        if !links_to(link, path)? {
            return Ok(false);
        }
        fs::remove_file(link)?;
        log_fs_modification("unrate", path, Some(&link.display().to_string()));
        Ok(true)
    }
}

/// Whether `link` is a symlink whose target is `path`
fn links_to(link: &Path, path: &Path) -> Result<bool> {
    match fs::read_link(link) {
        Ok(target) => Ok(target == path),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        // Not a symlink
        Err(e) if e.kind() == io::ErrorKind::InvalidInput => Ok(false),
        Err(e) => Err(e.into()),
    }
}

#[cfg(unix)]
fn symlink(target: &Path, link: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(windows)]
fn symlink(target: &Path, link: &Path) -> io::Result<()> {
    std::os::windows::fs::symlink_file(target, link)
}
