use chrono::{DateTime, Local};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::library::LibraryIndex;
use crate::logging::{log_file_error, log_fs_modification};
use crate::ratings::RatingStore;
use crate::types::Rating;

/// Separates the timestamp from the original file name
pub const TRASH_NAME_SEPARATOR: &str = "-_-";

/// An image moved to the trash
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrashEntry {
    pub original: PathBuf,
    pub trashed: PathBuf,

    /// Rating the image held before it was trashed
    pub cleared_rating: Option<Rating>,
}

/// Moves deleted images into a trash directory instead of removing them
#[derive(Debug, Clone)]
pub struct TrashManager {
    trash_dir: PathBuf,
}

impl TrashManager {
    /// Create a TrashManager, creating `trash_dir` if it is missing
    pub fn new(trash_dir: impl Into<PathBuf>) -> Result<Self> {
        let trash_dir = trash_dir.into();
        fs::create_dir_all(&trash_dir)?;
        Ok(Self { trash_dir })
    }

    pub fn trash_dir(&self) -> &Path {
        &self.trash_dir
    }

    /// Move `path` to the trash, then drop its rating and its index record.
    ///
    /// If the move fails nothing else changes. Once the file has moved, the
    /// index removal always happens; a failure to clear the rating is logged.
    pub fn trash(
        &self,
        path: &Path,
        index: &mut LibraryIndex,
        ratings: &RatingStore,
    ) -> Result<TrashEntry> {
        if !path.exists() {
            return Err(Error::NotFound(path.to_path_buf()));
        }

        let trashed = self.trash_dir.join(trash_file_name(path, Local::now()));
        if trashed.exists() {
            return Err(Error::Conflict {
                link: trashed,
                target: path.to_path_buf(),
            });
        }

        move_file(path, &trashed)?;
        log_fs_modification("trash", path, Some(&trashed.display().to_string()));

        let cleared_rating = match ratings.clear(path) {
            Ok(rating) => rating,
            Err(e) => {
                log_file_error(path, "clear rating", &e);
                None
            }
        };
        index.remove(path);

        Ok(TrashEntry {
            original: path.to_path_buf(),
            trashed,
            cleared_rating,
        })
    }
}

/// `<ISO-8601 timestamp, ':' as '.'>-_-<file name>`
pub fn trash_file_name(path: &Path, now: DateTime<Local>) -> String {
    let stamp = now
        .naive_local()
        .format("%Y-%m-%dT%H:%M:%S%.6f")
        .to_string()
        .replace(':', ".");
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    format!("{}{}{}", stamp, TRASH_NAME_SEPARATOR, name)
}

/// Rename, falling back to copy and remove when crossing filesystems
fn move_file(from: &Path, to: &Path) -> Result<()> {
    let rename_err = match fs::rename(from, to) {
        Ok(()) => return Ok(()),
        Err(e) => e,
    };
    log::debug!(
        "Rename of {} failed ({}), copying instead",
        from.display(),
        rename_err
    );

    if let Err(e) = fs::copy(from, to) {
        let _ = fs::remove_file(to);
        log_file_error(from, "copy to trash", &e);
        return Err(e.into());
    }
    if let Err(e) = fs::remove_file(from) {
        let _ = fs::remove_file(to);
        log_file_error(from, "remove after copy", &e);
        return Err(e.into());
    }
    Ok(())
}
