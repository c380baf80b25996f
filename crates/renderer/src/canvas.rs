//! Pixel compositing helpers.

use image::{Rgba, RgbaImage};

/// Composite `color` over the pixel at (`x`, `y`) with the "over" operator.
pub fn blend_pixel(img: &mut RgbaImage, x: u32, y: u32, color: Rgba<u8>) {
    if color[3] == 0 {
        return;
    }
    let dst = img.get_pixel_mut(x, y);
    if color[3] == 255 {
        *dst = color;
        return;
    }

    let sa = color[3] as f32 / 255.0;
    let da = dst[3] as f32 / 255.0;
    let out_a = sa + da * (1.0 - sa);
    for c in 0..3 {
        let v = (color[c] as f32 * sa + dst[c] as f32 * da * (1.0 - sa)) / out_a;
        dst[c] = v.round().clamp(0.0, 255.0) as u8;
    }
    dst[3] = (out_a * 255.0).round() as u8;
}

/// Composite `top` onto `bottom` with its top-left corner at (`x`, `y`).
/// Parts of `top` falling outside `bottom` are dropped.
pub fn composite(bottom: &mut RgbaImage, top: &RgbaImage, x: i64, y: i64) {
    let (bw, bh) = (bottom.width() as i64, bottom.height() as i64);
    for (tx, ty, pixel) in top.enumerate_pixels() {
        let bx = x + tx as i64;
        let by = y + ty as i64;
        if bx >= 0 && by >= 0 && bx < bw && by < bh {
            blend_pixel(bottom, bx as u32, by as u32, *pixel);
        }
    }
}
