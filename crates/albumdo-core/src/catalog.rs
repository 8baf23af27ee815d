use rayon::prelude::*;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::collage::{self, CollageTile};
use crate::discovery;
use crate::error::Result;
use crate::ratings::RatingStore;
use crate::types::Size;

/// One directory in the tile view
#[derive(Debug, Clone)]
pub struct DirectoryTile {
    pub directory: PathBuf,
    pub image_count: usize,
    pub cover: CollageTile,
}

impl DirectoryTile {
    /// Last two path components and the image count, e.g. `photos/trip/\n12`
    pub fn label(&self) -> String {
        let components: Vec<String> = self
            .directory
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();
        let start = components.len().saturating_sub(2);
        format!("{}/\n{}", components[start..].join("/"), self.image_count)
    }
}

/// Builds directory tiles with their covers
#[derive(Debug, Clone, Default)]
pub struct DirectoryCatalog {
    threads: usize,
}

impl DirectoryCatalog {
    /// `threads` sizes the rendering pool; 0 uses rayon's default
    pub fn new(threads: usize) -> Self {
        Self { threads }
    }

    /// A tile for `root` covering every image beneath it, followed by one
    /// tile per subdirectory that directly holds images, sorted by path.
    pub fn build_tiles(&self, root: &Path, boxed: Size) -> Result<Vec<DirectoryTile>> {
        let entries = discovery::scan(root)?;
        let all_images: Vec<PathBuf> = entries.iter().map(|e| e.path.clone()).collect();

        let mut groups: BTreeMap<PathBuf, Vec<PathBuf>> = BTreeMap::new();
        for entry in entries {
            groups.entry(entry.directory).or_default().push(entry.path);
        }
        // The root tile already shows the root's own images
        groups.remove(root);
        log::debug!(
            "Rendering {} directory tiles under {}",
            groups.len() + 1,
            root.display()
        );

        let groups: Vec<(PathBuf, Vec<PathBuf>)> =
            std::iter::once((root.to_path_buf(), all_images))
                .chain(groups)
                .collect();
        let render = || {
            groups
                .par_iter()
                .map(|(directory, images)| DirectoryTile {
                    directory: directory.clone(),
                    image_count: images.len(),
                    cover: cover_for(directory, images, boxed),
                })
                .collect::<Vec<DirectoryTile>>()
        };

        if self.threads == 0 {
            return Ok(render());
        }
        match rayon::ThreadPoolBuilder::new()
            .num_threads(self.threads)
            .build()
        {
            Ok(pool) => Ok(pool.install(render)),
            Err(e) => {
                log::warn!("Falling back to the global thread pool: {}", e);
                Ok(render())
            }
        }
    }

    /// The "Ratings" view: the scores root browsed as a photo root,
    /// one tile per rating bucket
    pub fn rating_tiles(&self, store: &RatingStore, boxed: Size) -> Result<Vec<DirectoryTile>> {
        self.build_tiles(store.root(), boxed)
    }
}

/// Grid collage when `directory` has subdirectories, otherwise its first image
fn cover_for(directory: &Path, images: &[PathBuf], boxed: Size) -> CollageTile {
    if has_subdirectories(directory) {
        collage::compose_random(images, boxed)
    } else {
        match images.first() {
            Some(first) => collage::single_cover(first, boxed),
            None => CollageTile::empty(boxed),
        }
    }
}

fn has_subdirectories(directory: &Path) -> bool {
    match fs::read_dir(directory) {
        Ok(entries) => entries
            .filter_map(|entry| entry.ok())
            .any(|entry| entry.path().is_dir()),
        Err(e) => {
            log::warn!("Cannot list {}: {}", directory.display(), e);
            false
        }
    }
}
