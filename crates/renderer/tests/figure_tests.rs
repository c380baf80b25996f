//! Tests for multi-panel figure rendering.

use image::Rgba;
use radar_common::{ExtentRequest, Landmark, MapExtent, RadarError, RadarField, Span};
use renderer::{
    Color, Colormap, FigureLayout, FigureOptions, FigureRenderer, FigureRequest, OverlayLayer,
    PanelSpec, RenderError, TextRenderer, LAND_COLOR, PANEL_HEIGHT, PANEL_WIDTH,
};
use test_utils::{create_test_volume, create_uniform_volume, kiwx, FORT_WAYNE};

// ============================================================================
// Helper functions
// ============================================================================

fn renderer() -> FigureRenderer {
    FigureRenderer::new(FigureOptions::default(), TextRenderer::without_font())
}

fn kiwx_extent() -> MapExtent {
    ExtentRequest::default().resolve(kiwx::LAT, kiwx::LON)
}

/// Figure pixel over a geographic point in panel `index`.
fn figure_pixel(
    renderer: &FigureRenderer,
    panels: usize,
    index: usize,
    lat: f64,
    lon: f64,
) -> (u32, u32) {
    let layout = FigureLayout::for_panels(panels).unwrap();
    let (panel_x, panel_y) = renderer.panel_origin(layout, index);
    let (viewport, (map_x, map_y)) = renderer.map_area(&kiwx_extent()).unwrap();
    let (px, py) = viewport.to_pixel(lat, lon);
    (
        panel_x + map_x + px as u32,
        panel_y + map_y + py as u32,
    )
}

// ============================================================================
// Layout
// ============================================================================

#[test]
fn test_layout_matches_field_count() {
    let expected = [(1, (1, 1)), (2, (1, 2)), (3, (2, 2)), (6, (3, 2))];
    for (count, (rows, cols)) in expected {
        let layout = FigureLayout::for_panels(count).unwrap();
        assert_eq!((layout.rows, layout.cols), (rows, cols), "{} fields", count);
    }
}

#[test]
fn test_default_panel_size() {
    let options = FigureOptions::default();
    assert_eq!((options.panel_width, options.panel_height), (PANEL_WIDTH, PANEL_HEIGHT));
    assert_eq!((PANEL_WIDTH, PANEL_HEIGHT), (500, 400));
}

#[test]
fn test_figure_size_follows_layout() {
    let volume = create_test_volume();
    let panels: Vec<PanelSpec> = [
        RadarField::Reflectivity,
        RadarField::Velocity,
        RadarField::SpectrumWidth,
    ]
    .into_iter()
    .map(|f| PanelSpec::new(f, f.spec().default_range))
    .collect();

    let request = FigureRequest {
        volume: &volume,
        title: "KIWX 20161022_T185819 UTC".to_string(),
        site_label: "KIWX".to_string(),
        extent: kiwx_extent(),
        panels: &panels,
        landmarks: &[],
    };

    let r = renderer();
    let img = r.render(&request).unwrap();
    let (w, h) = r.figure_size(FigureLayout::for_panels(3).unwrap());
    assert_eq!(img.dimensions(), (w, h));
    assert_eq!(w, 1000);

    // the fourth cell of the 2x2 grid stays empty
    let empty = img.get_pixel(w * 3 / 4, h - 100);
    assert_eq!(empty, &Rgba([255, 255, 255, 255]));
}

// ============================================================================
// Panel content
// ============================================================================

#[test]
fn test_ppi_is_drawn_near_the_radar() {
    let volume = create_uniform_volume(RadarField::Reflectivity, 30.0);
    let span = Span::new(0.0, 64.0);
    let panels = [PanelSpec::new(RadarField::Reflectivity, span)];
    let request = FigureRequest {
        volume: &volume,
        title: String::new(),
        site_label: kiwx::SITE.to_string(),
        extent: kiwx_extent(),
        panels: &panels,
        landmarks: &[],
    };

    let r = renderer();
    let img = r.render(&request).unwrap();

    // about 50 km east of the site, well inside the 120 km of gates
    let (x, y) = figure_pixel(&r, 1, 0, kiwx::LAT, kiwx::LON + 0.6);
    let expected = Colormap::default_for(RadarField::Reflectivity)
        .color_for(30.0, span)
        .to_rgba();
    assert_eq!(img.get_pixel(x, y), &expected);
}

#[test]
fn test_land_shows_beyond_the_last_gate() {
    let volume = create_uniform_volume(RadarField::Reflectivity, 30.0);
    let extent = kiwx_extent();
    let panels = [PanelSpec::new(RadarField::Reflectivity, Span::new(0.0, 64.0))];
    let request = FigureRequest {
        volume: &volume,
        title: String::new(),
        site_label: kiwx::SITE.to_string(),
        extent,
        panels: &panels,
        landmarks: &[],
    };

    let r = renderer();
    let img = r.render(&request).unwrap();

    let (x, y) = figure_pixel(&r, 1, 0, extent.min_lat + 0.1, extent.min_lon + 0.1);
    assert_eq!(img.get_pixel(x, y), &LAND_COLOR.to_rgba());
}

#[test]
fn test_colormap_override_changes_pixels() {
    let volume = create_uniform_volume(RadarField::Reflectivity, 64.0);
    let span = Span::new(0.0, 64.0);
    let panels = [PanelSpec::new(RadarField::Reflectivity, span)
        .with_colormap(Colormap::named("grayscale").unwrap())];
    let request = FigureRequest {
        volume: &volume,
        title: String::new(),
        site_label: kiwx::SITE.to_string(),
        extent: kiwx_extent(),
        panels: &panels,
        landmarks: &[],
    };

    let r = renderer();
    let img = r.render(&request).unwrap();
    let (x, y) = figure_pixel(&r, 1, 0, kiwx::LAT + 0.5, kiwx::LON);
    assert_eq!(img.get_pixel(x, y), &Rgba([255, 255, 255, 255]));
}

#[test]
fn test_landmarks_get_markers() {
    let volume = create_uniform_volume(RadarField::Reflectivity, f32::NAN);
    let panels = [PanelSpec::new(RadarField::Reflectivity, Span::new(0.0, 64.0))];
    let (name, lat, lon) = FORT_WAYNE;
    let landmarks = [Landmark::new(name, lat, lon)];
    let request = FigureRequest {
        volume: &volume,
        title: String::new(),
        site_label: kiwx::SITE.to_string(),
        extent: kiwx_extent(),
        panels: &panels,
        landmarks: &landmarks,
    };

    let r = renderer();
    let img = r.render(&request).unwrap();

    let (x, y) = figure_pixel(&r, 1, 0, lat, lon);
    assert_eq!(img.get_pixel(x, y), &Rgba([0, 0, 0, 255]));
    let (x, y) = figure_pixel(&r, 1, 0, kiwx::LAT, kiwx::LON);
    assert_eq!(img.get_pixel(x, y), &Rgba([0, 0, 0, 255]));
}

#[test]
fn test_overlays_are_drawn() {
    let volume = create_uniform_volume(RadarField::Reflectivity, f32::NAN);
    let panels = [PanelSpec::new(RadarField::Reflectivity, Span::new(0.0, 64.0))];
    // a meridian-like border well away from the site
    let geojson = r#"{"type": "LineString", "coordinates": [[-84.5, 40.0], [-84.5, 43.0]]}"#;
    let red = Color::new(255, 0, 0, 255);
    let layer = OverlayLayer::from_geojson("border", geojson, red, 3).unwrap();

    let request = FigureRequest {
        volume: &volume,
        title: String::new(),
        site_label: kiwx::SITE.to_string(),
        extent: kiwx_extent(),
        panels: &panels,
        landmarks: &[],
    };

    let r = renderer().with_overlays(vec![layer]);
    let img = r.render(&request).unwrap();
    let (x, y) = figure_pixel(&r, 1, 0, 41.5, -84.5);
    assert_eq!(img.get_pixel(x, y), &red.to_rgba());
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_missing_moment_is_reported() {
    let volume = create_uniform_volume(RadarField::Reflectivity, 30.0);
    let panels = [PanelSpec::new(RadarField::Velocity, Span::new(-20.0, 20.0))];
    let request = FigureRequest {
        volume: &volume,
        title: String::new(),
        site_label: kiwx::SITE.to_string(),
        extent: kiwx_extent(),
        panels: &panels,
        landmarks: &[],
    };

    let err = renderer().render(&request).unwrap_err();
    assert!(matches!(
        err,
        RenderError::Radar(RadarError::MissingMoment { .. })
    ));
}

#[test]
fn test_sweep_override_out_of_range() {
    let volume = create_uniform_volume(RadarField::Reflectivity, 30.0);
    let panels =
        [PanelSpec::new(RadarField::Reflectivity, Span::new(0.0, 64.0)).with_sweep(9)];
    let request = FigureRequest {
        volume: &volume,
        title: String::new(),
        site_label: kiwx::SITE.to_string(),
        extent: kiwx_extent(),
        panels: &panels,
        landmarks: &[],
    };

    let err = renderer().render(&request).unwrap_err();
    assert!(matches!(
        err,
        RenderError::Radar(RadarError::SweepOutOfRange { sweep: 9, .. })
    ));
}

#[test]
fn test_tiny_panel_is_invalid() {
    let volume = create_uniform_volume(RadarField::Reflectivity, 30.0);
    let panels = [PanelSpec::new(RadarField::Reflectivity, Span::new(0.0, 64.0))];
    let request = FigureRequest {
        volume: &volume,
        title: String::new(),
        site_label: kiwx::SITE.to_string(),
        extent: kiwx_extent(),
        panels: &panels,
        landmarks: &[],
    };
    let options = FigureOptions {
        panel_width: 40,
        panel_height: 30,
        ..FigureOptions::default()
    };

    let err = FigureRenderer::new(options, TextRenderer::without_font())
        .render(&request)
        .unwrap_err();
    assert!(matches!(err, RenderError::InvalidFigure(_)));
}
