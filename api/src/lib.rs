//! Client side of the feedback backend: response shapes, upload validation and
//! a thin HTTP client. The backend itself (spreadsheet parsing, score
//! aggregation, GIF rendering) lives elsewhere.

pub mod client;
pub mod contract;
pub mod error;
pub mod upload;

pub use client::{ApiClient, ScoreSource};
pub use contract::{
    GifExportRequest, PersonScoreRecord, ScoreMap, ScorePayload, StructuredScores,
};
pub use error::{ApiError, ApiResult};
pub use upload::{format_file_size, UploadFile, MAX_UPLOAD_BYTES};
