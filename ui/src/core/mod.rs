//! Building blocks shared by the chart, export and batch layers.

pub mod config;
pub mod error;
pub mod format;
pub mod settings;
pub mod timing;

pub use config::{ChartConfig, Margin, Palette};
pub use error::{ChartError, ChartResult};
pub use settings::AppSettings;
