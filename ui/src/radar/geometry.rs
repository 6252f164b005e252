//! Pure radar layout: grid rings, axis spokes, label anchors and series
//! polygons. Coordinates are relative to the chart center; the renderer
//! translates them into the margin box.

use std::f64::consts::{FRAC_PI_2, PI};

use crate::core::config::ChartConfig;
use crate::core::error::{ChartError, ChartResult};
use crate::core::format::format_score;

use super::curve;
use super::series::Series;

/// Labels closer to the horizontal or vertical get pushed out a bit more.
const SIDE_THRESHOLD: f64 = 0.7;
const SIDE_PUSH: f64 = 1.1;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn polar(radius: f64, angle: f64) -> Self {
        Self::new(radius * angle.cos(), radius * angle.sin())
    }

    pub fn distance(&self) -> f64 {
        self.x.hypot(self.y)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GridLevel {
    /// 1-based ring index; `levels` is the outermost ring.
    pub level: u32,
    pub radius: f64,
    pub value: f64,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AxisGeometry {
    pub index: usize,
    pub name: String,
    pub angle: f64,
    pub end: Point,
    pub label_anchor: Point,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Vertex {
    pub axis: String,
    /// Value after clamping into `[0, max_value]`.
    pub value: f64,
    pub point: Point,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SeriesGeometry {
    pub index: usize,
    pub name: String,
    pub vertices: Vec<Vertex>,
    pub path: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RadarGeometry {
    pub radius: f64,
    /// Largest ring first, matching draw order.
    pub levels: Vec<GridLevel>,
    pub axes: Vec<AxisGeometry>,
    pub series: Vec<SeriesGeometry>,
}

/// `i * 2π / total - π/2`: axis 0 points straight up, the rest follow
/// clockwise.
pub fn axis_angle(index: usize, total: usize) -> f64 {
    index as f64 * 2.0 * PI / total as f64 - FRAC_PI_2
}

/// NaN counts as zero; everything else is pinned into the scale.
pub fn clamp_score(value: f64, max_value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, max_value)
    }
}

fn label_anchor(radius: f64, label_factor: f64, angle: f64) -> Point {
    let (sin, cos) = angle.sin_cos();
    let reach = radius * label_factor;
    let mut x = reach * cos;
    let mut y = reach * sin;
    if cos.abs() > SIDE_THRESHOLD {
        x *= SIDE_PUSH;
    }
    if sin.abs() > SIDE_THRESHOLD {
        y *= SIDE_PUSH;
    }
    Point::new(x, y)
}

impl RadarGeometry {
    pub fn compute(series: &[Series], config: &ChartConfig) -> ChartResult<Self> {
        config.validate()?;

        let Some(reference) = series.first() else {
            return Err(ChartError::config("at least one series is required"));
        };
        let total = reference.len();
        if total < 3 {
            return Err(ChartError::config(format!(
                "a radar chart needs at least 3 axes (got {total})"
            )));
        }
        for other in &series[1..] {
            if !other.axis_names().eq(reference.axis_names()) {
                return Err(ChartError::config(format!(
                    "series `{}` does not share the axes of `{}`",
                    other.name, reference.name
                )));
            }
        }

        let radius = config.radius();
        let levels = (1..=config.levels)
            .rev()
            .map(|level| {
                let fraction = f64::from(level) / f64::from(config.levels);
                let value = config.max_value * fraction;
                GridLevel {
                    level,
                    radius: radius * fraction,
                    value,
                    label: format_score(value),
                }
            })
            .collect();

        let axes = reference
            .axes
            .iter()
            .enumerate()
            .map(|(index, score)| {
                let angle = axis_angle(index, total);
                AxisGeometry {
                    index,
                    name: score.axis.clone(),
                    angle,
                    end: Point::polar(radius, angle),
                    label_anchor: label_anchor(radius, config.label_factor, angle),
                }
            })
            .collect();

        let series = series
            .iter()
            .enumerate()
            .map(|(index, s)| {
                let vertices: Vec<Vertex> = s
                    .axes
                    .iter()
                    .enumerate()
                    .map(|(i, score)| {
                        let value = clamp_score(score.value, config.max_value);
                        Vertex {
                            axis: score.axis.clone(),
                            value,
                            point: Point::polar(
                                radius * value / config.max_value,
                                axis_angle(i, total),
                            ),
                        }
                    })
                    .collect();
                let points: Vec<Point> = vertices.iter().map(|v| v.point).collect();
                let path = if config.round_strokes {
                    curve::cardinal_closed(&points)
                } else {
                    curve::linear_closed(&points)
                };
                SeriesGeometry {
                    index,
                    name: s.name.clone(),
                    vertices,
                    path,
                }
            })
            .collect();

        tracing::debug!(axes = total, radius, "radar geometry computed");

        Ok(Self {
            radius,
            levels,
            axes,
            series,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::radar::series::CompetencyScore;
    use approx::assert_relative_eq;

    fn series(name: &str, values: &[f64]) -> Series {
        Series::new(
            name,
            values
                .iter()
                .enumerate()
                .map(|(i, v)| CompetencyScore::new(format!("Axis {i}"), *v))
                .collect(),
        )
    }

    fn config() -> ChartConfig {
        ChartConfig::interactive(400.0)
    }

    #[test]
    fn first_axis_points_up() {
        let geometry = RadarGeometry::compute(&[series("a", &[1.0, 2.0, 3.0, 4.0])], &config())
            .expect("geometry");
        let first = &geometry.axes[0];
        assert_relative_eq!(first.end.x, 0.0, epsilon = 1e-9);
        assert_relative_eq!(first.end.y, -200.0, epsilon = 1e-9);
        // Second of four axes points right.
        assert_relative_eq!(geometry.axes[1].end.x, 200.0, epsilon = 1e-9);
    }

    #[test]
    fn levels_are_emitted_largest_first() {
        let geometry =
            RadarGeometry::compute(&[series("a", &[1.0, 2.0, 3.0])], &config()).expect("geometry");
        let radii: Vec<f64> = geometry.levels.iter().map(|l| l.radius).collect();
        assert_eq!(radii.len(), 5);
        assert!(radii.windows(2).all(|w| w[0] > w[1]));
        assert_eq!(geometry.levels[0].label, "5.0");
        assert_eq!(geometry.levels[4].label, "1.0");
    }

    #[test]
    fn values_are_clamped() {
        let geometry =
            RadarGeometry::compute(&[series("a", &[-2.0, 9.0, f64::NAN])], &config()).expect("geometry");
        let values: Vec<f64> = geometry.series[0].vertices.iter().map(|v| v.value).collect();
        assert_eq!(values, vec![0.0, 5.0, 0.0]);
        assert_relative_eq!(geometry.series[0].vertices[1].point.distance(), 200.0, epsilon = 1e-9);
    }

    #[test]
    fn top_label_gets_pushed_vertically() {
        let geometry =
            RadarGeometry::compute(&[series("a", &[1.0, 1.0, 1.0, 1.0])], &config()).expect("geometry");
        let top = geometry.axes[0].label_anchor;
        assert_relative_eq!(top.y, -200.0 * 1.3 * 1.1, epsilon = 1e-9);
        let right = geometry.axes[1].label_anchor;
        assert_relative_eq!(right.x, 200.0 * 1.3 * 1.1, epsilon = 1e-9);
    }

    #[test]
    fn two_axes_are_rejected() {
        let err = RadarGeometry::compute(&[series("a", &[1.0, 2.0])], &config()).unwrap_err();
        assert!(matches!(err, ChartError::Config(_)));
    }

    #[test]
    fn mismatched_axes_are_rejected() {
        let mut other = series("b", &[1.0, 2.0, 3.0]);
        other.axes.swap(0, 1);
        let err = RadarGeometry::compute(&[series("a", &[1.0, 2.0, 3.0]), other], &config())
            .unwrap_err();
        assert!(matches!(err, ChartError::Config(_)));
    }

    #[test]
    fn empty_series_list_is_rejected() {
        assert!(RadarGeometry::compute(&[], &config()).is_err());
    }

    #[test]
    fn round_strokes_switch_to_curves() {
        let config = ChartConfig {
            round_strokes: true,
            ..config()
        };
        let geometry =
            RadarGeometry::compute(&[series("a", &[1.0, 2.0, 3.0])], &config).expect("geometry");
        assert!(geometry.series[0].path.contains('C'));
        assert!(!geometry.series[0].path.contains('L'));
    }
}
