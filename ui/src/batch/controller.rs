//! Sequential chart-and-export over every person in the uploaded sheet.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use api::{GifExportRequest, PersonScoreRecord, ScoreSource};

use crate::core::config::ChartConfig;
use crate::core::error::{ChartError, ChartResult};
use crate::core::timing::sleep;
use crate::export::document::ExportLabels;
use crate::export::naming::{batch_export_filename, local_now};
use crate::export::pipeline::{document_for, ExportArtifact};
use crate::export::raster::{serialize_to_raster, RasterOptions, PNG_MIME};
use crate::export::svg::to_svg_string;
use crate::export::DownloadSink;
use crate::radar::fonts::{platform_measure, TextMeasure};
use crate::radar::render::{render, ChartContainer};
use crate::radar::series::person_series;

/// Off-screen container size for batch renders.
pub const OFFSCREEN_WIDTH: f64 = 1000.0;
pub const OFFSCREEN_HEIGHT: f64 = 800.0;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchTarget {
    /// Render PNGs locally and download them.
    Png,
    /// Send each SVG to the backend, which writes GIFs under `export_path`.
    ServerGif { export_path: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct BatchOptions {
    pub between_items: Duration,
    pub between_downloads: Duration,
    pub target: BatchTarget,
    pub config: ChartConfig,
    /// Name of the reference series.
    pub team_label: String,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            between_items: Duration::from_millis(100),
            between_downloads: Duration::from_millis(200),
            target: BatchTarget::Png,
            config: ChartConfig::batch(),
            team_label: "Team average".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchProgress {
    /// 1-based index of the person just processed.
    pub current: usize,
    pub total: usize,
    pub person: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BatchFailure {
    pub name: String,
    pub error: ChartError,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct BatchSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: Vec<BatchFailure>,
}

/// Work owned by one in-flight run.
#[derive(Debug, Default)]
pub struct BatchJob {
    pub queue: Vec<PersonScoreRecord>,
    pub completed: Vec<(String, Option<ExportArtifact>)>,
    pub failed: Vec<BatchFailure>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum BatchStatus {
    #[default]
    Idle,
    Running,
    Completed(BatchSummary),
}

/// Cloneable handle; every clone guards the same run.
#[derive(Debug, Clone, Default)]
pub struct BatchController {
    status: Rc<RefCell<BatchStatus>>,
    options: BatchOptions,
}

impl PartialEq for BatchController {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.status, &other.status)
    }
}

impl BatchController {
    pub fn new(options: BatchOptions) -> Self {
        Self {
            status: Rc::new(RefCell::new(BatchStatus::Idle)),
            options,
        }
    }

    pub fn options(&self) -> &BatchOptions {
        &self.options
    }

    pub fn status(&self) -> BatchStatus {
        self.status.borrow().clone()
    }

    pub fn is_running(&self) -> bool {
        matches!(*self.status.borrow(), BatchStatus::Running)
    }

    fn try_start(&self) -> bool {
        let mut status = self.status.borrow_mut();
        if matches!(*status, BatchStatus::Running) {
            return false;
        }
        *status = BatchStatus::Running;
        true
    }

    /// Exports every person the backend knows about.
    ///
    /// Returns `Ok(None)` without doing anything when a run is already in
    /// progress. A failed person list aborts the whole batch; per-person
    /// failures are recorded in the summary.
    pub async fn run<S, D>(
        &self,
        source: &S,
        sink: &mut D,
        mut progress: impl FnMut(BatchProgress),
    ) -> ChartResult<Option<BatchSummary>>
    where
        S: ScoreSource,
        D: DownloadSink,
    {
        if !self.try_start() {
            tracing::warn!("batch export already running; ignoring start request");
            return Ok(None);
        }

        let persons = match source.all_persons().await {
            Ok(persons) => persons,
            Err(err) => {
                *self.status.borrow_mut() = BatchStatus::Idle;
                let err = ChartError::from(err);
                tracing::error!(error = %err, "batch export aborted: person list unavailable");
                return Err(err);
            }
        };

        let mut job = BatchJob {
            queue: persons,
            ..BatchJob::default()
        };
        let total = job.queue.len();
        tracing::info!(total, "batch export started");

        let measure = platform_measure();
        for (index, record) in std::mem::take(&mut job.queue).into_iter().enumerate() {
            let name = record.person_name.clone();
            match self.export_one(source, &record, measure.as_ref()).await {
                Ok(artifact) => job.completed.push((name.clone(), artifact)),
                Err(error) => {
                    tracing::error!(person = %name, error = %error, "batch item failed");
                    job.failed.push(BatchFailure {
                        name: name.clone(),
                        error,
                    });
                }
            }

            let current = index + 1;
            tracing::info!(current, total, person = %name, "batch progress");
            progress(BatchProgress {
                current,
                total,
                person: name,
            });
            sleep(self.options.between_items).await;
        }

        let mut succeeded = job.completed.len();
        let mut first = true;
        for (name, artifact) in &job.completed {
            let Some(artifact) = artifact else {
                continue;
            };
            if !first {
                sleep(self.options.between_downloads).await;
            }
            first = false;
            if let Err(error) = sink.deliver(artifact).await {
                tracing::error!(person = %name, error = %error, "batch download failed");
                succeeded -= 1;
                job.failed.push(BatchFailure {
                    name: name.clone(),
                    error,
                });
            }
        }

        let summary = BatchSummary {
            total,
            succeeded,
            failed: job.failed,
        };
        tracing::info!(
            total,
            succeeded = summary.succeeded,
            failed = summary.failed.len(),
            "batch export finished"
        );
        *self.status.borrow_mut() = BatchStatus::Completed(summary.clone());
        Ok(Some(summary))
    }

    /// Renders one person in a private container. PNG targets yield the
    /// artifact to download later; GIF targets are finished server-side.
    async fn export_one<S: ScoreSource>(
        &self,
        source: &S,
        record: &PersonScoreRecord,
        measure: &dyn TextMeasure,
    ) -> ChartResult<Option<ExportArtifact>> {
        let container = ChartContainer::offscreen(OFFSCREEN_WIDTH, OFFSCREEN_HEIGHT);
        let series = person_series(&record.scores, &record.person_name, &self.options.team_label);
        let chart = render(
            &container,
            &series,
            &record.person_name,
            &self.options.config,
            measure,
        )?;

        let now = local_now();
        let labels = ExportLabels::localized(&record.person_name, now);
        let document = match chart.settled().await {
            Ok(()) => document_for(&chart, &labels),
            Err(err) => Err(err),
        };
        chart.destroy();
        let document = document?;

        match &self.options.target {
            BatchTarget::Png => {
                let bytes = serialize_to_raster(&document, RasterOptions::default()).await?;
                Ok(Some(ExportArtifact {
                    filename: batch_export_filename(&record.person_name, now),
                    mime: PNG_MIME.to_string(),
                    bytes,
                }))
            }
            BatchTarget::ServerGif { export_path } => {
                let request = GifExportRequest {
                    svg_data: to_svg_string(&document),
                    person_name: record.person_name.clone(),
                    export_path: export_path.clone(),
                };
                source.export_gif(&request).await?;
                Ok(None)
            }
        }
    }
}
