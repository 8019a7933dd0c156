// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Image file loading.
//!
//! Decodes an image file into RGBA pixels suitable for an egui texture. The
//! pixel data is used as-is; only the natural dimensions feed the
//! annotation model.

use anyhow::{Context, Result};
use std::path::Path;

/// Decoded image ready for display.
pub struct LoadedImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

/// Load and decode an image file.
pub fn load_image(path: &Path) -> Result<LoadedImage> {
    let img = image::open(path)
        .with_context(|| format!("Failed to decode {}", path.display()))?
        .to_rgba8();
    let (width, height) = img.dimensions();

    log::debug!("Decoded {} ({}x{})", path.display(), width, height);

    Ok(LoadedImage {
        width,
        height,
        pixels: img.into_raw(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_png_dimensions() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("a.png");
        image::RgbaImage::new(200, 100).save(&path).unwrap();

        let loaded = load_image(&path).unwrap();
        assert_eq!((loaded.width, loaded.height), (200, 100));
        assert_eq!(loaded.pixels.len(), 200 * 100 * 4);
    }

    #[test]
    fn test_broken_file_is_an_error() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("broken.png");
        std::fs::write(&path, b"definitely not a png").unwrap();
        assert!(load_image(&path).is_err());
    }
}
