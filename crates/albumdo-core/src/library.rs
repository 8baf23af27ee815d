//! The ordered, cursor-addressable collection of images under a root path.

use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::discovery;
use crate::error::{Error, Result};
use crate::types::ImageRecord;

/// One thumbnail position in the preview strip
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreviewSlot {
    /// Index into the library records
    pub index: usize,

    /// Whether this slot shows the current image
    pub selected: bool,
}

/// Images sorted newest first plus the cursor of the currently displayed one
#[derive(Debug, Clone, Default)]
pub struct LibraryIndex {
    root: PathBuf,
    records: Vec<ImageRecord>,
    cursor: usize,
}

impl LibraryIndex {
    /// Scan `root` and build an index ordered by timestamp, newest first.
    /// Unreadable timestamps count as 0 and never abort the scan.
    pub fn build(root: &Path, config: &Config) -> Result<Self> {
        let root = absolute(root)?;
        let entries = discovery::scan_with_depth(&root, config.max_depth)?;

        let records = entries
            .into_iter()
            .map(|entry| {
                let created_at = discovery::read_created_at(&entry.path, config.timestamp_source);
                ImageRecord {
                    path: entry.path,
                    directory: entry.directory,
                    created_at,
                }
            })
            .collect();

        let mut index = Self::from_records(records);
        index.root = root;
        log::info!(
            "Loaded library of {} images from {}",
            index.len(),
            index.root.display()
        );
        Ok(index)
    }

    /// Order `records` newest first; ties keep their given order
    pub fn from_records(mut records: Vec<ImageRecord>) -> Self {
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Self {
            root: PathBuf::new(),
            records,
            cursor: 0,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn records(&self) -> &[ImageRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Effective cursor, clamped to 0 when a removal left it past the end
    pub fn cursor(&self) -> usize {
        if self.cursor < self.records.len() {
            self.cursor
        } else {
            0
        }
    }

    /// The currently displayed image
    pub fn current(&self) -> Option<&ImageRecord> {
        self.records.get(self.cursor())
    }

    /// Persist the clamp applied by [`cursor`](Self::cursor)
    pub fn clamp_cursor(&mut self) {
        self.cursor = self.cursor();
    }

    pub fn advance(&mut self) {
        let n = self.records.len();
        if n == 0 {
            return;
        }
        self.cursor = (self.cursor() + 1) % n;
    }

    pub fn retreat(&mut self) {
        let n = self.records.len();
        if n == 0 {
            return;
        }
        self.cursor = (self.cursor() + n - 1) % n;
    }

    pub fn jump_to(&mut self, index: usize) -> Result<()> {
        if index >= self.records.len() {
            return Err(Error::IndexOutOfRange {
                index,
                len: self.records.len(),
            });
        }
        self.cursor = index;
        Ok(())
    }

    /// Remove the record for `path` without re-sorting.
    /// The cursor is left alone; callers reconcile it afterwards.
    pub fn remove(&mut self, path: &Path) -> Option<ImageRecord> {
        let position = self.position_of(path)?;
        Some(self.records.remove(position))
    }

    pub fn position_of(&self, path: &Path) -> Option<usize> {
        self.records.iter().position(|record| record.path == path)
    }

    /// Indices of `size` neighbours centred on the cursor, wrapping around.
    /// Empty when there are fewer than two images.
    pub fn preview_window(&self, size: usize) -> Vec<PreviewSlot> {
        let n = self.records.len();
        if n < 2 {
            return Vec::new();
        }

        let cursor = self.cursor() as i64;
        let half = (size / 2) as i64;
        (0..size as i64)
            .map(|i| {
                let index = (cursor + i - half).rem_euclid(n as i64) as usize;
                PreviewSlot {
                    index,
                    selected: index == cursor as usize,
                }
            })
            .collect()
    }
}

/// Number of preview thumbnails that fit in `width` pixels, at least one
pub fn preview_slots_for_width(width: u32, thumb_width: u32) -> usize {
    (width / thumb_width.max(1)).max(1) as usize
}

pub(crate) fn absolute(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index_of(times: &[(&str, i64)]) -> LibraryIndex {
        LibraryIndex::from_records(
            times
                .iter()
                .map(|(name, t)| ImageRecord::new(format!("/photos/{}.jpg", name), *t))
                .collect(),
        )
    }

    fn names(index: &LibraryIndex) -> Vec<String> {
        index.records().iter().map(|r| r.file_name()).collect()
    }

    #[test]
    fn test_sorted_newest_first() {
        let index = index_of(&[("a", 100), ("b", 300), ("c", 200)]);
        assert_eq!(names(&index), vec!["b.jpg", "c.jpg", "a.jpg"]);
        assert_eq!(index.cursor(), 0);
        assert_eq!(index.current().unwrap().file_name(), "b.jpg");
    }

    #[test]
    fn test_ties_keep_scan_order() {
        let index = index_of(&[("x", 5), ("y", 0), ("z", 5), ("w", 0)]);
        assert_eq!(names(&index), vec!["x.jpg", "z.jpg", "y.jpg", "w.jpg"]);
        for pair in index.records().windows(2) {
            assert!(pair[0].created_at >= pair[1].created_at);
        }
    }

    #[test]
    fn test_navigation_wraps() {
        let mut index = index_of(&[("a", 3), ("b", 2), ("c", 1)]);
        index.retreat();
        assert_eq!(index.cursor(), 2);
        index.advance();
        assert_eq!(index.cursor(), 0);
        index.advance();
        index.advance();
        index.advance();
        assert_eq!(index.cursor(), 0);
    }

    #[test]
    fn test_cursor_stays_in_bounds() {
        for n in 1..6 {
            let times: Vec<(String, i64)> = (0..n).map(|i| (format!("p{}", i), i)).collect();
            let refs: Vec<(&str, i64)> = times.iter().map(|(s, t)| (s.as_str(), *t)).collect();
            let mut index = index_of(&refs);

            let moves = [true, true, false, true, false, false, false, true, true, true];
            for forward in moves {
                let before = index.cursor();
                if forward {
                    index.advance();
                    assert!(index.cursor() < n as usize);
                    index.retreat();
                } else {
                    index.retreat();
                    assert!(index.cursor() < n as usize);
                    index.advance();
                }
                assert_eq!(index.cursor(), before);
                if forward {
                    index.advance();
                } else {
                    index.retreat();
                }
            }
        }
    }

    #[test]
    fn test_single_image_navigation() {
        let mut index = index_of(&[("only", 1)]);
        index.advance();
        assert_eq!(index.cursor(), 0);
        index.retreat();
        assert_eq!(index.cursor(), 0);
    }

    #[test]
    fn test_empty_index_is_inert() {
        let mut index = LibraryIndex::default();
        index.advance();
        index.retreat();
        assert!(index.current().is_none());
        assert!(index.preview_window(10).is_empty());
        assert!(matches!(
            index.jump_to(0),
            Err(Error::IndexOutOfRange { index: 0, len: 0 })
        ));
    }

    #[test]
    fn test_jump_to() {
        let mut index = index_of(&[("a", 3), ("b", 2), ("c", 1)]);
        index.jump_to(2).unwrap();
        assert_eq!(index.current().unwrap().file_name(), "c.jpg");
        assert!(index.jump_to(3).is_err());
        assert_eq!(index.cursor(), 2);
    }

    #[test]
    fn test_remove_last_clamps_to_start() {
        let mut index = index_of(&[("a", 3), ("b", 2), ("c", 1)]);
        index.jump_to(2).unwrap();

        let removed = index.remove(Path::new("/photos/c.jpg")).unwrap();
        assert_eq!(removed.file_name(), "c.jpg");
        assert_eq!(names(&index), vec!["a.jpg", "b.jpg"]);
        assert_eq!(index.current().unwrap().file_name(), "a.jpg");

        index.clamp_cursor();
        assert_eq!(index.cursor(), 0);
        assert!(index.remove(Path::new("/photos/missing.jpg")).is_none());
    }

    #[test]
    fn test_preview_window_two_images() {
        let mut index = index_of(&[("a", 2), ("b", 1)]);
        let window = index.preview_window(10);
        let indices: Vec<usize> = window.iter().map(|s| s.index).collect();
        assert_eq!(indices, vec![1, 0, 1, 0, 1, 0, 1, 0, 1, 0]);
        assert_eq!(window.iter().filter(|s| s.selected).count(), 5);

        index.advance();
        let window = index.preview_window(10);
        assert!(window.iter().all(|s| s.index < 2));
        assert!(window[5].selected);
        assert_eq!(window[5].index, 1);
    }

    #[test]
    fn test_preview_window_centred_on_cursor() {
        let index = index_of(&[("a", 5), ("b", 4), ("c", 3), ("d", 2), ("e", 1)]);
        let indices: Vec<usize> = index.preview_window(3).iter().map(|s| s.index).collect();
        assert_eq!(indices, vec![4, 0, 1]);
    }

    #[test]
    fn test_preview_window_single_image() {
        let index = index_of(&[("a", 1)]);
        assert!(index.preview_window(10).is_empty());
    }

    #[test]
    fn test_preview_slots_for_width() {
        assert_eq!(preview_slots_for_width(1920, 100), 19);
        assert_eq!(preview_slots_for_width(50, 100), 1);
        assert_eq!(preview_slots_for_width(500, 0), 500);
    }
}
