//! Fixture helpers for building small datasets on disk in tests.

use image::{ImageFormat, Rgb, RgbImage};
use std::fs;
use std::path::Path;

fn ensure_parent(path: &Path) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
}

fn write_image(path: &Path, format: ImageFormat) {
    ensure_parent(path);
    RgbImage::from_pixel(8, 8, Rgb([30, 120, 200]))
        .save_with_format(path, format)
        .unwrap();
}

pub fn write_png(path: &Path) {
    write_image(path, ImageFormat::Png);
}

pub fn write_jpeg(path: &Path) {
    write_image(path, ImageFormat::Jpeg);
}

/// Bytes that no image decoder accepts
pub fn write_corrupt(path: &Path) {
    ensure_parent(path);
    fs::write(path, b"\x00\x01corrupted image bytes\xff").unwrap();
}

pub fn write_text(path: &Path, contents: &str) {
    ensure_parent(path);
    fs::write(path, contents).unwrap();
}
