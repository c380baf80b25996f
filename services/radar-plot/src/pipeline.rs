//! The plot pipeline: resolve inputs, then read, render and emit each file.
//!
//! Files are processed one at a time in input order. The first failure
//! aborts the run.

use std::path::{Path, PathBuf};

use radar_common::{site_id, Chooser, LandmarkTable, ScanTime, VolumeReader};
use renderer::{FigureRenderer, FigureRequest, PanelSpec};
use tracing::{debug, info, warn};

use crate::emitter::FrameSink;
use crate::error::PlotResult;
use crate::input::{resolve_inputs, FileSpec};
use crate::request::PlotRequest;

/// Result of a pipeline run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlotSummary {
    /// Number of files plotted
    pub processed: usize,
    /// Files written by the sink, in input order
    pub frames: Vec<PathBuf>,
}

pub struct PlotPipeline<'a> {
    reader: &'a dyn VolumeReader,
    chooser: &'a dyn Chooser,
    renderer: FigureRenderer,
    landmarks: LandmarkTable,
}

impl<'a> PlotPipeline<'a> {
    /// Pipeline with the built-in landmark table.
    pub fn new(
        reader: &'a dyn VolumeReader,
        chooser: &'a dyn Chooser,
        renderer: FigureRenderer,
    ) -> Self {
        Self {
            reader,
            chooser,
            renderer,
            landmarks: LandmarkTable::builtin(),
        }
    }

    pub fn with_landmarks(mut self, landmarks: LandmarkTable) -> Self {
        self.landmarks = landmarks;
        self
    }

    /// Plot every input file and hand each figure to `sink`.
    pub fn run(
        &self,
        files: &FileSpec,
        request: &PlotRequest,
        sink: &mut dyn FrameSink,
    ) -> PlotResult<PlotSummary> {
        let panels = request.panels()?;
        let paths = resolve_inputs(files, self.chooser)?;
        if paths.is_empty() {
            warn!("No input files, nothing to do");
            return Ok(PlotSummary::default());
        }

        info!(
            files = paths.len(),
            fields = ?request.fields.iter().map(|f| f.name()).collect::<Vec<_>>(),
            "Plotting radar files"
        );

        let mut summary = PlotSummary::default();
        for (index, path) in paths.iter().enumerate() {
            if let Some(frame) = self.plot_file(index, path, &panels, request, sink)? {
                summary.frames.push(frame);
            }
            summary.processed += 1;
        }

        info!(processed = summary.processed, "Finished plotting");
        Ok(summary)
    }

    /// Read, render and emit one file.
    pub fn plot_file(
        &self,
        index: usize,
        path: &Path,
        panels: &[PanelSpec],
        request: &PlotRequest,
        sink: &mut dyn FrameSink,
    ) -> PlotResult<Option<PathBuf>> {
        debug!(index, file = %path.display(), "Reading volume");
        let volume = self.reader.read(path)?;
        volume.validate()?;

        let scan = ScanTime::from_units(&volume.time_units)?;
        let site = site_id(path);
        let scan_id = scan.scan_id();
        let extent = request.extent.resolve(volume.latitude, volume.longitude);

        let figure_request = FigureRequest {
            volume: &volume,
            title: format!("{} {} UTC", site, scan_id),
            site_label: site.clone(),
            extent,
            panels,
            landmarks: self.landmarks.for_site(&site),
        };
        let figure = self.renderer.render(&figure_request)?;

        sink.emit(index, &format!("{}_{}", site, scan_id), &figure)
    }
}
