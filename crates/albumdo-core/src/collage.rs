//! Cover tiles for directories: a 2x2 collage of sampled images or a
//! single centre-cropped image.

use image::{imageops, DynamicImage, GenericImageView, RgbaImage};
use rand::Rng;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::types::{CropRect, Size};

/// Maximum number of images in a collage
pub const COLLAGE_SLOTS: usize = 4;

/// What a cover tile shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoverKind {
    /// Up to four cropped samples in a 2x2 grid
    Grid,
    /// One centre-cropped image
    Single,
    /// Nothing to show
    Empty,
}

/// A synthesized cover image, always exactly the requested size
#[derive(Debug, Clone)]
pub struct CollageTile {
    pub kind: CoverKind,
    pub image: RgbaImage,
}

impl CollageTile {
    pub fn empty(target: Size) -> Self {
        Self {
            kind: CoverKind::Empty,
            image: RgbaImage::new(target.width, target.height),
        }
    }

    pub fn size(&self) -> Size {
        Size::new(self.image.width(), self.image.height())
    }
}

/// Crop region of an `image` that fits `boxed`, centred and kept inside the image
pub fn crop_region(image: Size, boxed: Size) -> CropRect {
    let (big_w, big_h) = (image.width as u64, image.height as u64);
    let (w, h) = (boxed.width as u64, boxed.height as u64);

    let (crop_w, crop_h) = if big_w < w && big_h < h {
        (big_w, big_h)
    } else if big_w > w && big_h > h {
        // Aspect from the source, width from the box
        (w, if big_w == 0 { 0 } else { w * big_h / big_w })
    } else if h > w {
        (big_w, h)
    } else {
        (w, big_h)
    };

    let crop_w = crop_w.min(big_w);
    let crop_h = crop_h.min(big_h);
    let left = (w.abs_diff(crop_w) / 2).min(big_w - crop_w);
    let top = (h.abs_diff(crop_h) / 2).min(big_h - crop_h);

    CropRect {
        left: left as u32,
        top: top as u32,
        right: (left + crop_w) as u32,
        bottom: (top + crop_h) as u32,
    }
}

/// Composite up to four randomly sampled images into a `target`-sized 2x2 grid.
/// Unreadable samples are skipped and leave their quadrant blank.
pub fn compose<R: Rng + ?Sized>(paths: &[PathBuf], target: Size, rng: &mut R) -> CollageTile {
    if paths.is_empty() {
        return CollageTile::empty(target);
    }

    let quadrant = target.half();
    let origins = [
        (0, 0),
        (0, quadrant.height),
        (quadrant.width, 0),
        (quadrant.width, quadrant.height),
    ];

    let amount = paths.len().min(COLLAGE_SLOTS);
    let mut canvas = RgbaImage::new(target.width, target.height);

    for (sample, (x, y)) in rand::seq::index::sample(rng, paths.len(), amount)
        .into_iter()
        .zip(origins)
    {
        let path = &paths[sample];
        match load_cropped(path, quadrant) {
            Ok(piece) => imageops::overlay(&mut canvas, &piece, x as i64, y as i64),
            Err(e) => log::warn!("Skipping collage sample {}: {}", path.display(), e),
        }
    }

    CollageTile {
        kind: CoverKind::Grid,
        image: canvas,
    }
}

/// [`compose`] with the thread-local RNG
pub fn compose_random(paths: &[PathBuf], target: Size) -> CollageTile {
    compose(paths, target, &mut rand::rng())
}

/// One centre-cropped image centred on a `target`-sized canvas
pub fn single_cover(path: &Path, target: Size) -> CollageTile {
    match load_cropped(path, target) {
        Ok(piece) => {
            let mut canvas = RgbaImage::new(target.width, target.height);
            let x = (target.width - piece.width()) / 2;
            let y = (target.height - piece.height()) / 2;
            imageops::overlay(&mut canvas, &piece, x as i64, y as i64);
            CollageTile {
                kind: CoverKind::Single,
                image: canvas,
            }
        }
        Err(e) => {
            log::warn!("Cannot build cover from {}: {}", path.display(), e);
            CollageTile::empty(target)
        }
    }
}

/// Decode, crop to the box and centre-trim so the piece never exceeds it
fn load_cropped(path: &Path, boxed: Size) -> Result<RgbaImage> {
    let img = image::open(path)?;
    Ok(crop_to_box(&img, boxed))
}

fn crop_to_box(img: &DynamicImage, boxed: Size) -> RgbaImage {
    let (width, height) = img.dimensions();
    let rect = crop_region(Size::new(width, height), boxed);
    let cropped = img.crop_imm(rect.left, rect.top, rect.width(), rect.height());

    let trim_w = cropped.width().min(boxed.width);
    let trim_h = cropped.height().min(boxed.height);
    cropped
        .crop_imm(
            (cropped.width() - trim_w) / 2,
            (cropped.height() - trim_h) / 2,
            trim_w,
            trim_h,
        )
        .to_rgba8()
}
