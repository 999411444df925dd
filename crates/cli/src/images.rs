//! Rendered page images from a directory.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use image::RgbImage;

/// Load a directory of rendered pages as RGB rasters, one per page.
///
/// Only `.png`, `.jpg` and `.jpeg` files count; they are taken in file
/// name order, so `page-01.png`, `page-02.png`, ... line up with the
/// document's page order.
pub fn load_page_images(dir: &Path) -> Result<Vec<RgbImage>> {
    let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)
        .with_context(|| format!("reading image directory {}", dir.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            path.extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| {
                    ext.eq_ignore_ascii_case("png")
                        || ext.eq_ignore_ascii_case("jpg")
                        || ext.eq_ignore_ascii_case("jpeg")
                })
        })
        .collect();
    paths.sort();

    let mut images = Vec::with_capacity(paths.len());
    for path in &paths {
        let image = image::open(path)
            .with_context(|| format!("opening page image {}", path.display()))?;
        images.push(image.to_rgb8());
    }
    tracing::debug!(count = images.len(), dir = %dir.display(), "loaded page images");
    Ok(images)
}
