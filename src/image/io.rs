//! I/O helpers for grayscale matrices, picture files and JSON.
//!
//! - `read_matrix` / `write_matrix`: the plain-text `rows cols` matrix format.
//! - `format_matrix`: serialize an image into that format in memory.
//! - `load_grayscale_image`: read a PNG/JPEG into an integer matrix.
//! - `save_grayscale_png`: write a matrix to a grayscale PNG, clamping values.
//! - `write_json_file`: pretty-print a serializable value to disk.
use super::{ImageI32, ImageView};
use crate::error::{Result, SobelError};
use crate::source::PixelSource;
use image::{GrayImage, Luma};
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Parse a text matrix held in memory.
pub fn parse_matrix(text: &str) -> Result<ImageI32> {
    PixelSource::new(text)?.read_all()
}

/// Read and parse a text matrix from disk.
pub fn read_matrix(path: &Path) -> Result<ImageI32> {
    let text = fs::read_to_string(path).map_err(|e| SobelError::io(path, e))?;
    parse_matrix(&text)
}

/// Serialize an image: header line, then one line per row with single spaces.
pub fn format_matrix(image: &ImageI32) -> String {
    let mut out = String::with_capacity(image.w * image.h * 4 + 16);
    out.push_str(&format!("{} {}\n", image.h, image.w));
    for row in image.rows() {
        for (x, v) in row.iter().enumerate() {
            if x > 0 {
                out.push(' ');
            }
            out.push_str(&v.to_string());
        }
        out.push('\n');
    }
    out
}

/// Write an image in the text matrix format, creating parent directories.
pub fn write_matrix(image: &ImageI32, path: &Path) -> Result<()> {
    ensure_parent_dir(path)?;
    fs::write(path, format_matrix(image)).map_err(|e| SobelError::io(path, e))
}

/// Load a picture from disk, convert to 8-bit grayscale and widen to a matrix.
pub fn load_grayscale_image(path: &Path) -> Result<ImageI32> {
    let img = image::open(path)
        .map_err(|e| SobelError::Image {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?
        .into_luma8();
    let w = img.width() as usize;
    let h = img.height() as usize;
    ImageI32::from_gray(w, h, img.as_raw()).ok_or_else(|| SobelError::Image {
        path: path.to_path_buf(),
        reason: format!("decoded buffer does not hold {w}x{h} pixels"),
    })
}

/// Save a matrix to a grayscale PNG, clamping values in [0, 255].
pub fn save_grayscale_png(image: &ImageI32, path: &Path) -> Result<()> {
    ensure_parent_dir(path)?;
    let mut out = GrayImage::new(image.w as u32, image.h as u32);
    for (y, row) in image.rows().enumerate() {
        for (x, &px) in row.iter().enumerate() {
            let v = px.clamp(0, 255) as u8;
            out.put_pixel(x as u32, y as u32, Luma([v]));
        }
    }
    out.save(path).map_err(|e| SobelError::Image {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

/// Serialize a value as pretty JSON to `path`, creating parent directories.
pub fn write_json_file<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    ensure_parent_dir(path)?;
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| SobelError::Job(format!("Failed to serialize JSON for {}: {e}", path.display())))?;
    fs::write(path, json).map_err(|e| SobelError::io(path, e))
}

fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| SobelError::io(parent, e))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_matches_input_layout() {
        let image = ImageI32::from_vec(3, 2, vec![0, 12, 255, 7, 8, 9]).unwrap();
        assert_eq!(format_matrix(&image), "2 3\n0 12 255\n7 8 9\n");
    }

    #[test]
    fn text_round_trip_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/out.txt");
        let image = ImageI32::from_vec(2, 2, vec![1, 2, 3, 4]).unwrap();
        write_matrix(&image, &path).unwrap();
        assert_eq!(read_matrix(&path).unwrap(), image);
    }

    #[test]
    fn png_round_trip_clamps() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("edges.png");
        let image = ImageI32::from_vec(2, 1, vec![-4, 300]).unwrap();
        save_grayscale_png(&image, &path).unwrap();
        let back = load_grayscale_image(&path).unwrap();
        assert_eq!(back.data, vec![0, 255]);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = read_matrix(Path::new("/definitely/not/here.txt")).unwrap_err();
        assert!(matches!(err, SobelError::Io { .. }));
    }
}
