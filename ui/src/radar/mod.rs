//! Radar chart engine: pure geometry, a typed scene graph and the Dioxus
//! view that draws it.

pub mod curve;
pub mod fonts;
pub mod geometry;
pub mod render;
pub mod scene;
pub mod series;
pub mod slot;
pub mod view;
pub mod wrap;

pub use fonts::{platform_measure, FontSpec, FontWeight, HeuristicMeasure, TextMeasure};
pub use geometry::{AxisGeometry, GridLevel, Point, RadarGeometry, SeriesGeometry, Vertex};
pub use render::{render, ChartContainer, Legend, LegendEntry, RenderedChart, Tooltip};
pub use scene::{default_stylesheet, Node, NodeClass, Scene, SeriesMeta, Shape, Style, Stylesheet};
pub use series::{person_series, score_rows, CompetencyScore, ScoreRow, Series};
pub use slot::ChartSlot;
pub use view::RadarChartView;
pub use wrap::{wrap_label, WrappedLine};
