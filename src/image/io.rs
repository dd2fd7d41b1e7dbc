//! I/O helpers for card photographs and JSON reports.
//!
//! - `load_grayscale_image`: read a PNG/JPEG/etc. into an owned 8-bit gray buffer.
//! - `save_grayscale_f32`: write a float image (0–255 scale) as 8-bit PNG.
//! - `write_json_file`: pretty-print a serializable value to disk.
use super::{ImageF32, ImageU8, ImageView};
use crate::error::{DetectorError, Result};
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Owned 8-bit grayscale buffer with borrowed view conversion.
#[derive(Clone, Debug)]
pub struct GrayImageU8 {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl GrayImageU8 {
    pub fn new(width: usize, height: usize, data: Vec<u8>) -> Self {
        assert_eq!(data.len(), width * height, "gray buffer size mismatch");
        Self {
            width,
            height,
            data,
        }
    }

    /// Borrow as a read-only `ImageU8` view
    pub fn as_view(&self) -> ImageU8<'_> {
        ImageU8::gray(self.width, self.height, &self.data)
    }
}

/// Load an image from disk and convert to 8-bit grayscale.
pub fn load_grayscale_image(path: &Path) -> Result<GrayImageU8> {
    let img = image::open(path)
        .map_err(|source| DetectorError::ImageOpen {
            path: path.to_path_buf(),
            source,
        })?
        .into_luma8();
    let width = img.width() as usize;
    let height = img.height() as usize;
    if width == 0 || height == 0 {
        return Err(DetectorError::EmptyImage {
            path: path.to_path_buf(),
        });
    }
    Ok(GrayImageU8::new(width, height, img.into_raw()))
}

/// Save a float image in grey-level units, clamped to `[0, 255]`.
pub fn save_grayscale_f32(img: &ImageF32, path: &Path) -> Result<()> {
    ensure_parent_dir(path)?;
    let mut out = image::GrayImage::new(img.w as u32, img.h as u32);
    for y in 0..img.h {
        for (x, &px) in img.row(y).iter().enumerate() {
            out.put_pixel(x as u32, y as u32, image::Luma([px.round().clamp(0.0, 255.0) as u8]));
        }
    }
    out.save(path).map_err(|source| DetectorError::ImageSave {
        path: path.to_path_buf(),
        source,
    })
}

/// Serialize a value as pretty JSON to `path`, creating parent directories.
pub fn write_json_file<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    ensure_parent_dir(path)?;
    let json = serde_json::to_string_pretty(value).map_err(|source| DetectorError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    fs::write(path, json).map_err(|source| DetectorError::Write {
        path: path.to_path_buf(),
        source,
    })
}

fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|source| DetectorError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
        }
    }
    Ok(())
}
