//! Multi-panel radar figures.
//!
//! A figure has a title band on top and a grid of panels below, one panel
//! per requested field. Each panel holds:
//! - the field name as its title
//! - the map: land fill, overlays, PPI, landmarks and the radar site
//! - a colorbar on the right, labelled with the field's units

use image::{Rgba, RgbaImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_hollow_rect_mut, draw_line_segment_mut};
use imageproc::rect::Rect;
use radar_common::{Landmark, MapExtent, RadarField, RadarVolume, Span};
use tracing::debug;

use crate::basemap::{draw_overlay, fill_background, OverlayLayer, LAND_COLOR};
use crate::canvas::composite;
use crate::colormap::{Color, Colormap};
use crate::error::{RenderError, RenderResult};
use crate::ppi::render_ppi;
use crate::text::{format_tick, TextRenderer};
use crate::viewport::MapViewport;

/// Default panel size: 5 x 4 inches at 100 dpi.
pub const PANEL_WIDTH: u32 = 500;
pub const PANEL_HEIGHT: u32 = 400;

const FIGURE_TITLE_HEIGHT: u32 = 36;
const PANEL_TITLE_HEIGHT: u32 = 24;
const COLORBAR_WIDTH: u32 = 84;
const MAP_MARGIN: u32 = 6;
const COLORBAR_BAR_WIDTH: u32 = 14;
const COLORBAR_TICKS: u32 = 5;

const FIGURE_TITLE_SIZE: f32 = 20.0;
const PANEL_TITLE_SIZE: f32 = 15.0;
const LABEL_SIZE: f32 = 12.0;
const TICK_SIZE: f32 = 11.0;

/// Pixel offset of point labels from their marker.
pub const LABEL_OFFSET: i32 = 4;
const MARKER_RADIUS: i32 = 3;

const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// Panel grid: two columns, or one when there is a single panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FigureLayout {
    pub rows: u32,
    pub cols: u32,
}

impl FigureLayout {
    pub fn for_panels(count: usize) -> RenderResult<Self> {
        if count == 0 {
            return Err(RenderError::InvalidFigure("no fields requested".to_string()));
        }
        let cols = if count == 1 { 1 } else { 2 };
        let rows = (count + cols - 1) / cols;
        Ok(Self {
            rows: rows as u32,
            cols: cols as u32,
        })
    }

    /// (row, col) of the `index`th panel, filled row by row.
    pub fn cell(&self, index: usize) -> (u32, u32) {
        let cols = self.cols as usize;
        ((index / cols) as u32, (index % cols) as u32)
    }
}

/// What to draw in one panel.
#[derive(Debug, Clone)]
pub struct PanelSpec {
    pub field: RadarField,
    pub sweep: usize,
    pub span: Span,
    pub colormap: Colormap,
}

impl PanelSpec {
    /// Panel on the field's fixed sweep with its default ramp.
    pub fn new(field: RadarField, span: Span) -> Self {
        Self {
            field,
            sweep: field.spec().sweep,
            span,
            colormap: Colormap::default_for(field),
        }
    }

    pub fn with_sweep(mut self, sweep: usize) -> Self {
        self.sweep = sweep;
        self
    }

    pub fn with_colormap(mut self, colormap: Colormap) -> Self {
        self.colormap = colormap;
        self
    }
}

/// Figure geometry and colors.
#[derive(Debug, Clone)]
pub struct FigureOptions {
    pub panel_width: u32,
    pub panel_height: u32,
    pub land_color: Color,
}

impl Default for FigureOptions {
    fn default() -> Self {
        Self {
            panel_width: PANEL_WIDTH,
            panel_height: PANEL_HEIGHT,
            land_color: LAND_COLOR,
        }
    }
}

/// Everything one figure is drawn from.
#[derive(Debug, Clone)]
pub struct FigureRequest<'a> {
    pub volume: &'a RadarVolume,
    /// Figure title, e.g. `KIWX 20161022_T185819 UTC`
    pub title: String,
    /// Label drawn next to the radar site marker.
    pub site_label: String,
    pub extent: MapExtent,
    pub panels: &'a [PanelSpec],
    pub landmarks: &'a [Landmark],
}

/// Draws figures with a fixed font, overlays and panel size.
#[derive(Debug, Clone)]
pub struct FigureRenderer {
    options: FigureOptions,
    text: TextRenderer,
    overlays: Vec<OverlayLayer>,
}

impl FigureRenderer {
    pub fn new(options: FigureOptions, text: TextRenderer) -> Self {
        Self {
            options,
            text,
            overlays: Vec::new(),
        }
    }

    pub fn with_overlays(mut self, overlays: Vec<OverlayLayer>) -> Self {
        self.overlays = overlays;
        self
    }

    pub fn options(&self) -> &FigureOptions {
        &self.options
    }

    /// Pixel size of a figure with `layout`.
    pub fn figure_size(&self, layout: FigureLayout) -> (u32, u32) {
        (
            layout.cols * self.options.panel_width,
            FIGURE_TITLE_HEIGHT + layout.rows * self.options.panel_height,
        )
    }

    /// Render the whole figure.
    pub fn render(&self, request: &FigureRequest<'_>) -> RenderResult<RgbaImage> {
        let layout = FigureLayout::for_panels(request.panels.len())?;
        let (width, height) = self.figure_size(layout);

        debug!(
            title = %request.title,
            panels = request.panels.len(),
            rows = layout.rows,
            cols = layout.cols,
            width,
            height,
            "Rendering figure"
        );

        let mut figure = RgbaImage::from_pixel(width, height, WHITE);
        self.text.draw_centered(
            &mut figure,
            &request.title,
            (width / 2) as i32,
            8,
            FIGURE_TITLE_SIZE,
            BLACK,
        );

        for (index, panel) in request.panels.iter().enumerate() {
            let image = self.render_panel(request, panel)?;
            let (x, y) = self.panel_origin(layout, index);
            composite(&mut figure, &image, x as i64, y as i64);
        }

        Ok(figure)
    }

    /// Top-left corner of panel `index` within the figure.
    pub fn panel_origin(&self, layout: FigureLayout, index: usize) -> (u32, u32) {
        let (row, col) = layout.cell(index);
        (
            col * self.options.panel_width,
            FIGURE_TITLE_HEIGHT + row * self.options.panel_height,
        )
    }

    /// Viewport of the map inside a panel, and its top-left offset in the panel.
    pub fn map_area(&self, extent: &MapExtent) -> RenderResult<(MapViewport, (u32, u32))> {
        let pw = self.options.panel_width;
        let ph = self.options.panel_height;
        let map_w = pw.saturating_sub(COLORBAR_WIDTH + MAP_MARGIN);
        let map_h = ph.saturating_sub(PANEL_TITLE_HEIGHT + MAP_MARGIN);
        if map_w == 0 || map_h == 0 {
            return Err(RenderError::InvalidFigure(format!(
                "panel {}x{} leaves no room for the map",
                pw, ph
            )));
        }
        Ok((
            MapViewport::new(extent, map_w, map_h),
            (MAP_MARGIN, PANEL_TITLE_HEIGHT),
        ))
    }

    /// Render one panel on its own white canvas.
    pub fn render_panel(
        &self,
        request: &FigureRequest<'_>,
        panel: &PanelSpec,
    ) -> RenderResult<RgbaImage> {
        let (viewport, (map_x, map_y)) = self.map_area(&request.extent)?;
        let view = request.volume.sweep(panel.field, panel.sweep)?;

        let mut image =
            RgbaImage::from_pixel(self.options.panel_width, self.options.panel_height, WHITE);
        self.text.draw_centered(
            &mut image,
            panel.field.name(),
            (map_x + viewport.width() / 2) as i32,
            4,
            PANEL_TITLE_SIZE,
            BLACK,
        );

        let mut map = RgbaImage::new(viewport.width(), viewport.height());
        fill_background(&mut map, &viewport, self.options.land_color);
        for layer in &self.overlays {
            draw_overlay(&mut map, layer, &viewport);
        }

        let site = (request.volume.latitude, request.volume.longitude);
        let ppi = render_ppi(view, site, &viewport, panel.span, &panel.colormap)?;
        composite(&mut map, &ppi, 0, 0);

        for landmark in request.landmarks {
            self.draw_point(&mut map, &viewport, landmark.lat, landmark.lon, &landmark.name);
        }
        self.draw_point(&mut map, &viewport, site.0, site.1, &request.site_label);

        let (mx, my, mw, mh) = viewport.map_rect();
        if mw >= 1.0 && mh >= 1.0 {
            draw_hollow_rect_mut(
                &mut map,
                Rect::at(mx as i32, my as i32).of_size(mw as u32, mh as u32),
                BLACK,
            );
        }

        composite(&mut image, &map, map_x as i64, map_y as i64);
        self.draw_colorbar(&mut image, panel);

        Ok(image)
    }

    fn draw_point(&self, map: &mut RgbaImage, viewport: &MapViewport, lat: f64, lon: f64, label: &str) {
        let (px, py) = viewport.to_pixel(lat, lon);
        if !viewport.contains_pixel(px, py) {
            return;
        }
        let (x, y) = (px.round() as i32, py.round() as i32);
        draw_filled_circle_mut(map, (x, y), MARKER_RADIUS, BLACK);
        // text is anchored at its top-left, so lift it above the marker
        self.text.draw_label(
            map,
            label,
            x + LABEL_OFFSET,
            y - LABEL_OFFSET - LABEL_SIZE as i32,
            LABEL_SIZE,
        );
    }

    fn draw_colorbar(&self, image: &mut RgbaImage, panel: &PanelSpec) {
        let x = self.options.panel_width - COLORBAR_WIDTH + 8;
        let top = PANEL_TITLE_HEIGHT + 10;
        let bottom = self.options.panel_height - MAP_MARGIN - 10;
        if bottom <= top + 1 {
            return;
        }
        let span_px = (bottom - top) as f32;

        for y in top..=bottom {
            let t = (bottom - y) as f32 / span_px;
            let color = panel.colormap.sample(t).to_rgba();
            for dx in 0..COLORBAR_BAR_WIDTH {
                image.put_pixel(x + dx, y, color);
            }
        }
        draw_hollow_rect_mut(
            image,
            Rect::at(x as i32, top as i32).of_size(COLORBAR_BAR_WIDTH, bottom - top + 1),
            BLACK,
        );

        let bar_right = (x + COLORBAR_BAR_WIDTH) as f32;
        for k in 0..COLORBAR_TICKS {
            let frac = k as f64 / (COLORBAR_TICKS - 1) as f64;
            let value = panel.span.min + frac * panel.span.width();
            let y = bottom as f32 - frac as f32 * span_px;
            draw_line_segment_mut(image, (bar_right, y), (bar_right + 3.0, y), BLACK);
            self.text.draw(
                image,
                &format_tick(value),
                bar_right as i32 + 5,
                y as i32 - (TICK_SIZE / 2.0) as i32,
                TICK_SIZE,
                BLACK,
            );
        }

        self.text.draw(
            image,
            panel.field.spec().units,
            x as i32 - 4,
            8,
            TICK_SIZE,
            BLACK,
        );
    }
}
