//! Turning mounted charts into SVG/PNG files.

pub mod document;
pub mod download;
pub mod naming;
pub mod panel;
pub mod pipeline;
pub mod raster;
pub mod svg;

pub use document::{build_export_document, ExportDocument, ExportLabels};
pub use download::{download_bytes, BrowserDownloads, DownloadSink};
pub use naming::{batch_export_filename, single_export_filename, slug};
pub use panel::ExportPanel;
pub use pipeline::{export_chart, ExportArtifact, ExportFormat};
pub use raster::{serialize_to_raster, RasterOptions};
pub use svg::serialize_to_vector;
