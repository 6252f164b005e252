//! One-shot export of a mounted chart.

use time::OffsetDateTime;

use crate::core::error::{ChartError, ChartResult};
use crate::radar::render::RenderedChart;
use crate::radar::scene::default_stylesheet;

use super::document::{build_export_document, ExportDocument, ExportLabels};
use super::naming::single_export_filename;
use super::raster::{serialize_to_raster, RasterOptions, PNG_MIME};
use super::svg::{serialize_to_vector, SVG_MIME};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Png,
    Svg,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Png => "png",
            ExportFormat::Svg => "svg",
        }
    }

    pub fn mime(self) -> &'static str {
        match self {
            ExportFormat::Png => PNG_MIME,
            ExportFormat::Svg => SVG_MIME,
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "png" => Some(ExportFormat::Png),
            "svg" => Some(ExportFormat::Svg),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub filename: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

/// Export document for whatever `chart` currently shows, including any
/// toggled-off series.
pub fn document_for(chart: &RenderedChart, labels: &ExportLabels) -> ChartResult<ExportDocument> {
    let scene = chart.scene_snapshot().ok_or_else(|| {
        ChartError::render(format!("no chart for `{}` to export", chart.person_label()))
    })?;
    Ok(build_export_document(
        &scene,
        chart.person_label(),
        labels,
        &default_stylesheet(),
    ))
}

pub async fn encode(doc: &ExportDocument, format: ExportFormat) -> ChartResult<Vec<u8>> {
    match format {
        ExportFormat::Svg => Ok(serialize_to_vector(doc)),
        ExportFormat::Png => serialize_to_raster(doc, RasterOptions::default()).await,
    }
}

/// Serializes the mounted chart into a named, typed file.
pub async fn export_chart(
    chart: &RenderedChart,
    person: &str,
    format: ExportFormat,
    labels: &ExportLabels,
    now: OffsetDateTime,
) -> ChartResult<ExportArtifact> {
    let doc = document_for(chart, labels)?;
    let bytes = encode(&doc, format).await?;
    let filename = single_export_filename(person, format.extension(), now);
    tracing::info!(filename = %filename, bytes = bytes.len(), "chart exported");
    Ok(ExportArtifact {
        filename,
        mime: format.mime().to_string(),
        bytes,
    })
}
