//! Text drawing for figure titles, labels and colorbar ticks.
//!
//! DejaVu Sans is built in. A configured font file replaces it, and a font
//! that cannot be read is an error rather than a figure without labels.

use image::{Rgba, RgbaImage};
use imageproc::drawing::draw_text_mut;
use rusttype::{point, Font, Scale};
use std::path::Path;
use tracing::debug;

use crate::canvas::blend_pixel;
use crate::error::{RenderError, RenderResult};

/// Embedded font data - DejaVu Sans
const FONT_DATA: &[u8] = include_bytes!("../assets/DejaVuSans.ttf");

/// Draws text with an optional font.
#[derive(Clone)]
pub struct TextRenderer {
    font: Option<Font<'static>>,
}

impl std::fmt::Debug for TextRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextRenderer")
            .field("has_font", &self.font.is_some())
            .finish()
    }
}

impl TextRenderer {
    /// Load the font at `path`, or the built-in one when no path is given.
    pub fn load(path: Option<&Path>) -> RenderResult<Self> {
        let Some(path) = path else {
            return Self::embedded();
        };

        let font_error = |message: String| RenderError::Font {
            path: path.display().to_string(),
            message,
        };
        let bytes = std::fs::read(path).map_err(|e| font_error(e.to_string()))?;
        let font = Font::try_from_vec(bytes)
            .ok_or_else(|| font_error("not a TrueType font".to_string()))?;
        debug!(font = %path.display(), "Loaded font");
        Ok(Self { font: Some(font) })
    }

    /// Renderer using the built-in DejaVu Sans.
    pub fn embedded() -> RenderResult<Self> {
        let font = Font::try_from_bytes(FONT_DATA).ok_or_else(|| RenderError::Font {
            path: "<embedded>".to_string(),
            message: "not a TrueType font".to_string(),
        })?;
        Ok(Self { font: Some(font) })
    }

    /// Renderer that draws no text. Used for pixel-exact tests.
    pub fn without_font() -> Self {
        Self { font: None }
    }

    pub fn has_font(&self) -> bool {
        self.font.is_some()
    }

    /// Width in pixels of `text` at `size`. Estimated when no font is loaded.
    pub fn text_width(&self, text: &str, size: f32) -> i32 {
        match &self.font {
            Some(font) => {
                let scale = Scale::uniform(size);
                font.layout(text, scale, point(0.0, 0.0))
                    .filter_map(|g| g.pixel_bounding_box().map(|bb| bb.max.x))
                    .max()
                    .unwrap_or(0)
            }
            None => (text.chars().count() as f32 * size * 0.6) as i32,
        }
    }

    /// Draw `text` with its top-left corner at (`x`, `y`).
    pub fn draw(&self, img: &mut RgbaImage, text: &str, x: i32, y: i32, size: f32, color: Rgba<u8>) {
        if let Some(font) = &self.font {
            draw_text_mut(img, color, x, y, Scale::uniform(size), font, text);
        }
    }

    /// Draw `text` horizontally centered on `center_x`.
    pub fn draw_centered(
        &self,
        img: &mut RgbaImage,
        text: &str,
        center_x: i32,
        y: i32,
        size: f32,
        color: Rgba<u8>,
    ) {
        let x = center_x - self.text_width(text, size) / 2;
        self.draw(img, text, x, y, size, color);
    }

    /// Draw `text` over a semi-transparent white box for readability on the map.
    pub fn draw_label(&self, img: &mut RgbaImage, text: &str, x: i32, y: i32, size: f32) {
        if self.font.is_none() {
            return;
        }
        let bg = Rgba([255, 255, 255, 200]);
        let padding = 1;
        let w = self.text_width(text, size);
        let h = size as i32;

        for dy in -padding..(h + padding) {
            for dx in -padding..(w + padding) {
                let px = x + dx;
                let py = y + dy;
                if px >= 0 && px < img.width() as i32 && py >= 0 && py < img.height() as i32 {
                    blend_pixel(img, px as u32, py as u32, bg);
                }
            }
        }
        self.draw(img, text, x, y, size, Rgba([0, 0, 0, 255]));
    }
}

/// Format a tick value: integers without decimals, otherwise one decimal place.
pub fn format_tick(value: f64) -> String {
    let rounded = (value * 10.0).round() / 10.0;
    if (rounded - rounded.round()).abs() < 1e-9 {
        format!("{:.0}", rounded)
    } else {
        format!("{:.1}", rounded)
    }
}
