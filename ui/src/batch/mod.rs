//! Batch export of every person's chart.

pub mod controller;
pub mod panel;

pub use controller::{
    BatchController, BatchFailure, BatchJob, BatchOptions, BatchProgress, BatchStatus, BatchSummary,
    BatchTarget,
};
pub use panel::BatchExportPanel;
