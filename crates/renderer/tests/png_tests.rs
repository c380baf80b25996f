//! Tests for PNG encoding of rendered figures.

use image::{Rgba, RgbaImage};
use renderer::png::{create_png, create_png_auto, encode_png, write_png};
use test_utils::{create_test_rgba_pixels, temp_test_dir};

const SIGNATURE: [u8; 8] = [137, 80, 78, 71, 13, 10, 26, 10];

// ============================================================================
// Helper functions
// ============================================================================

/// Color type byte from the IHDR chunk.
fn color_type(png: &[u8]) -> u8 {
    // signature (8) + length (4) + "IHDR" (4) + width (4) + height (4) + depth (1)
    png[25]
}

// ============================================================================
// Format selection
// ============================================================================

#[test]
fn test_few_colors_use_indexed_png() {
    let pixels = create_test_rgba_pixels(64, 32);
    let png = create_png_auto(&pixels, 64, 32).unwrap();
    assert_eq!(&png[0..8], &SIGNATURE);
    assert_eq!(color_type(&png), 3);
}

#[test]
fn test_many_colors_fall_back_to_rgba() {
    let mut pixels = Vec::with_capacity(300 * 4);
    for i in 0..300u32 {
        pixels.extend_from_slice(&[(i % 256) as u8, (i / 256) as u8, 40, 255]);
    }
    let png = create_png_auto(&pixels, 300, 1).unwrap();
    assert_eq!(color_type(&png), 6);
}

#[test]
fn test_indexed_is_smaller_for_flat_figures() {
    let pixels = create_test_rgba_pixels(256, 256);
    let indexed = create_png_auto(&pixels, 256, 256).unwrap();
    let rgba = create_png(&pixels, 256, 256).unwrap();
    assert!(indexed.len() < rgba.len());
}

// ============================================================================
// Image round trip
// ============================================================================

#[test]
fn test_encoded_png_decodes_to_same_pixels() {
    let mut img = RgbaImage::from_pixel(20, 10, Rgba([250, 250, 250, 255]));
    img.put_pixel(3, 4, Rgba([255, 0, 0, 255]));
    img.put_pixel(19, 9, Rgba([0, 0, 0, 0]));

    let bytes = encode_png(&img).unwrap();
    let decoded = image::load_from_memory(&bytes).unwrap().to_rgba8();

    assert_eq!(decoded.dimensions(), (20, 10));
    assert_eq!(decoded.get_pixel(3, 4), &Rgba([255, 0, 0, 255]));
    assert_eq!(decoded.get_pixel(19, 9)[3], 0);
    assert_eq!(decoded.get_pixel(0, 0), &Rgba([250, 250, 250, 255]));
}

#[test]
fn test_write_png_creates_file() {
    let dir = temp_test_dir();
    let path = dir.path().join("img_000.png");
    let img = RgbaImage::from_pixel(8, 8, Rgba([0, 128, 255, 255]));

    write_png(&path, &img).unwrap();

    let bytes = std::fs::read(&path).unwrap();
    assert_eq!(&bytes[0..8], &SIGNATURE);
}

#[test]
fn test_empty_image_is_rejected() {
    let img = RgbaImage::new(0, 0);
    assert!(encode_png(&img).is_err());
}
