//! Raster rendering of radar figures.
//!
//! - [`colormap`]: color ramps per radar moment
//! - [`viewport`]: pixel <-> lat/lon mapping for a map panel
//! - [`ppi`]: plan position indicator raster of one sweep
//! - [`basemap`]: land fill and GeoJSON overlays
//! - [`figure`]: multi-panel layout, colorbars, labels and titles
//! - [`png`]: PNG encoding

pub mod basemap;
pub mod canvas;
pub mod colormap;
pub mod error;
pub mod figure;
pub mod png;
pub mod ppi;
pub mod text;
pub mod viewport;

pub use basemap::{OverlayLayer, OverlaySpec, LAND_COLOR};
pub use colormap::{Color, Colormap};
pub use error::{RenderError, RenderResult};
pub use figure::{
    FigureLayout, FigureOptions, FigureRenderer, FigureRequest, PanelSpec, PANEL_HEIGHT, PANEL_WIDTH,
};
pub use png::{encode_png, write_png};
pub use text::TextRenderer;
pub use viewport::MapViewport;
