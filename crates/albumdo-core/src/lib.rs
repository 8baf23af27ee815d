//! Core functionality for browsing, rating and trashing local photos.
//!
//! This library provides the foundational components of the photo library:
//! - Image discovery and timestamp ordering
//! - A cursor over the library for the image currently on screen
//! - Ratings persisted as symlinks in numbered bucket directories
//! - Non-destructive deletion into a trash folder
//! - Collage cover tiles for directory views

// -- External Dependencies --

use crossbeam::channel::{unbounded, Receiver, Sender};
use log::{debug, info};
use std::path::{Path, PathBuf};

// -- Internal Modules --
mod error;

// -- Public Re-exports --
pub use catalog::{DirectoryCatalog, DirectoryTile};
pub use collage::{CollageTile, CoverKind};
pub use config::*;
pub use error::{Error, Result};
pub use library::{LibraryIndex, PreviewSlot};
pub use ratings::RatingStore;
pub use trash::{TrashEntry, TrashManager};
pub use types::*;

// -- Public Modules --
pub mod catalog;
pub mod collage;
pub mod config;
pub mod discovery;
pub mod library;
pub mod logging;
pub mod ratings;
pub mod trash;
pub mod types;

/// Notifications for the presentation layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LibraryEvent {
    /// A library was loaded or an image was deleted
    LibraryChanged { len: usize },

    /// The current image changed
    CursorChanged { index: usize },

    /// An image was rated or its rating cleared
    RatingChanged {
        path: PathBuf,
        rating: Option<Rating>,
    },
}

/// Main entry point for a browsing session
pub struct PhotoLibrary {
    config: Config,
    index: LibraryIndex,
    ratings: RatingStore,
    trash: TrashManager,
    catalog: DirectoryCatalog,
    subscribers: Vec<Sender<LibraryEvent>>,
}

impl PhotoLibrary {
    /// Open the rating store and trash folder named by `config`
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        let ratings = RatingStore::open(&config.scores_dir)?;
        let trash = TrashManager::new(config.trash_dir()?)?;
        let catalog = DirectoryCatalog::new(config.threads);

        Ok(Self {
            config,
            index: LibraryIndex::default(),
            ratings,
            trash,
            catalog,
            subscribers: Vec::new(),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Root path of the loaded library; empty until one is loaded
    pub fn library_root(&self) -> &Path {
        self.index.root()
    }

    pub fn index(&self) -> &LibraryIndex {
        &self.index
    }

    pub fn ratings(&self) -> &RatingStore {
        &self.ratings
    }

    pub fn trash(&self) -> &TrashManager {
        &self.trash
    }

    /// Receive every event emitted from now on
    pub fn subscribe(&mut self) -> Receiver<LibraryEvent> {
        let (tx, rx) = unbounded();
        self.subscribers.push(tx);
        rx
    }

    fn emit(&mut self, event: LibraryEvent) {
        debug!("Event: {:?}", event);
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }

    /// Replace the session library with the images under `path`.
    /// A missing path and a path without images are reported distinctly;
    /// on either error the previous library stays loaded.
    pub fn load_library(&mut self, path: &Path) -> Result<usize> {
        let index = LibraryIndex::build(path, &self.config)?;
        if index.is_empty() {
            return Err(Error::NoImages(path.to_path_buf()));
        }

        self.index = index;
        let len = self.index.len();
        info!("Library loaded: {} images", len);
        self.emit(LibraryEvent::LibraryChanged { len });
        Ok(len)
    }

    pub fn current_image(&self) -> Option<&ImageRecord> {
        self.index.current()
    }

    pub fn next_image(&mut self) -> Option<&ImageRecord> {
        self.index.advance();
        self.emit_cursor();
        self.index.current()
    }

    pub fn previous_image(&mut self) -> Option<&ImageRecord> {
        self.index.retreat();
        self.emit_cursor();
        self.index.current()
    }

    pub fn jump_to_image(&mut self, index: usize) -> Result<&ImageRecord> {
        self.index.jump_to(index)?;
        self.emit_cursor();
        self.index.current().ok_or(Error::EmptyLibrary)
    }

    fn emit_cursor(&mut self) {
        if !self.index.is_empty() {
            let index = self.index.cursor();
            self.emit(LibraryEvent::CursorChanged { index });
        }
    }

    /// Rate `path` 1-3, replacing any earlier rating. When the rated image is
    /// the current one and `advance_after_rating` is set, moves to the next.
    pub fn rate(&mut self, path: &Path, value: u8) -> Result<Rating> {
        let rating = Rating::try_from(value)?;
        self.ratings.set(path, rating)?;
        self.emit(LibraryEvent::RatingChanged {
            path: path.to_path_buf(),
            rating: Some(rating),
        });

        let is_current = self.index.current().map(|r| r.path.as_path()) == Some(path);
        if self.config.advance_after_rating && is_current {
            self.next_image();
        }
        Ok(rating)
    }

    pub fn clear_rating(&mut self, path: &Path) -> Result<Option<Rating>> {
        let removed = self.ratings.clear(path)?;
        if removed.is_some() {
            self.emit(LibraryEvent::RatingChanged {
                path: path.to_path_buf(),
                rating: None,
            });
        }
        Ok(removed)
    }

    pub fn current_rating(&self, path: &Path) -> Result<Option<Rating>> {
        self.ratings.get(path)
    }

    /// Move the current image to the trash and show the one after it
    pub fn delete_current(&mut self) -> Result<TrashEntry> {
        let path = self
            .index
            .current()
            .map(|record| record.path.clone())
            .ok_or(Error::EmptyLibrary)?;

        let entry = self.trash.trash(&path, &mut self.index, &self.ratings)?;
        self.index.clamp_cursor();

        if entry.cleared_rating.is_some() {
            self.emit(LibraryEvent::RatingChanged { path, rating: None });
        }
        self.emit(LibraryEvent::LibraryChanged {
            len: self.index.len(),
        });
        self.emit_cursor();
        Ok(entry)
    }

    /// The "Directories" view of `path`
    pub fn list_directory_tiles(&self, path: &Path) -> Result<Vec<DirectoryTile>> {
        self.catalog.build_tiles(path, self.config.tile_size)
    }

    /// The "Ratings" view, one tile per rating bucket
    pub fn list_rating_tiles(&self) -> Result<Vec<DirectoryTile>> {
        self.catalog
            .rating_tiles(&self.ratings, self.config.tile_size)
    }

    /// Preview strip for a window `width` pixels wide
    pub fn preview(&self, width: u32) -> Vec<PreviewSlot> {
        let slots = library::preview_slots_for_width(width, self.config.preview_thumb_width);
        self.index.preview_window(slots)
    }
}
