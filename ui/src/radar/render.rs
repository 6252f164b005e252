//! Mounts radar scenes into containers and drives their interactions.

use std::cell::RefCell;
use std::rc::Rc;

use crate::core::config::ChartConfig;
use crate::core::error::{ChartError, ChartResult};
use crate::core::format::format_score;

use super::fonts::{FontSpec, TextMeasure};
use super::geometry::{Point, RadarGeometry};
use super::scene::{Node, NodeClass, Scene, SeriesMeta, Shape, Style, TextLine};
use super::series::Series;
use super::wrap::wrap_label;

const GRID_COLOR: &str = "#CDCDCD";
const GRID_FILL_OPACITY: f64 = 0.1;
const LEVEL_LABEL_COLOR: &str = "#737373";
const LEVEL_LABEL_SIZE: f64 = 10.0;
const LEVEL_LABEL_X: f64 = 4.0;
const LEVEL_LABEL_DY_EM: f64 = 0.4;
const SPOKE_COLOR: &str = "white";
const SPOKE_WIDTH: f64 = 2.0;
const AXIS_LABEL_COLOR: &str = "#2c3e50";
const MARKER_FILL_OPACITY: f64 = 0.8;

const AREA_DIMMED: f64 = 0.1;
const AREA_FOCUSED: f64 = 0.7;
const SERIES_HIDDEN: f64 = 0.2;
const LEGEND_HIDDEN: f64 = 0.5;

const TOOLTIP_OFFSET_X: f64 = 10.0;
const TOOLTIP_OFFSET_Y: f64 = -28.0;
const TOOLTIP_OPACITY: f64 = 0.9;

/// Floating value box shown while hovering a marker.
#[derive(Debug, Clone, PartialEq)]
pub struct Tooltip {
    owner: u64,
    pub visible: bool,
    pub x: f64,
    pub y: f64,
    pub opacity: f64,
    pub lines: Vec<String>,
}

impl Tooltip {
    fn hidden(owner: u64) -> Self {
        Self {
            owner,
            visible: false,
            x: 0.0,
            y: 0.0,
            opacity: 0.0,
            lines: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LegendEntry {
    pub name: String,
    pub color: String,
    pub active: bool,
}

impl LegendEntry {
    pub fn opacity(&self) -> f64 {
        if self.active {
            1.0
        } else {
            LEGEND_HIDDEN
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Legend {
    owner: u64,
    pub entries: Vec<LegendEntry>,
}

#[derive(Debug)]
struct Mounted {
    owner: u64,
    scene: Scene,
}

#[derive(Debug, Default)]
struct ContainerState {
    next_owner: u64,
    mounted: Option<Mounted>,
    legend: Option<Legend>,
    tooltips: Vec<Tooltip>,
}

/// Host for at most one chart scene plus its legend and tooltip overlays.
///
/// Cloning shares the same container.
#[derive(Debug, Clone)]
pub struct ChartContainer {
    state: Rc<RefCell<ContainerState>>,
    size: Option<(f64, f64)>,
}

impl PartialEq for ChartContainer {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.state, &other.state)
    }
}

impl Default for ChartContainer {
    fn default() -> Self {
        Self::new()
    }
}

impl ChartContainer {
    pub fn new() -> Self {
        Self {
            state: Rc::new(RefCell::new(ContainerState::default())),
            size: None,
        }
    }

    /// Fixed-size container that is never shown on screen.
    pub fn offscreen(width: f64, height: f64) -> Self {
        Self {
            size: Some((width, height)),
            ..Self::new()
        }
    }

    pub fn size(&self) -> Option<(f64, f64)> {
        self.size
    }

    pub fn scene(&self) -> Option<Scene> {
        self.state.borrow().mounted.as_ref().map(|m| m.scene.clone())
    }

    pub fn legend(&self) -> Option<Legend> {
        self.state.borrow().legend.clone()
    }

    pub fn tooltips(&self) -> Vec<Tooltip> {
        self.state.borrow().tooltips.clone()
    }

    pub fn tooltip_count(&self) -> usize {
        self.state.borrow().tooltips.len()
    }

    /// Nothing mounted and no overlays left behind.
    pub fn is_empty(&self) -> bool {
        let state = self.state.borrow();
        state.mounted.is_none() && state.legend.is_none() && state.tooltips.is_empty()
    }
}

struct ChartData {
    label: String,
    config: ChartConfig,
    geometry: RadarGeometry,
    series: Vec<SeriesMeta>,
}

/// Handle to a chart mounted by [`render`].
///
/// Interactions on a destroyed (or replaced) chart are no-ops.
#[derive(Clone)]
pub struct RenderedChart {
    container: ChartContainer,
    owner: u64,
    data: Rc<ChartData>,
}

impl PartialEq for RenderedChart {
    fn eq(&self, other: &Self) -> bool {
        self.container == other.container && self.owner == other.owner
    }
}

impl std::fmt::Debug for RenderedChart {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderedChart")
            .field("owner", &self.owner)
            .field("label", &self.data.label)
            .finish()
    }
}

/// Lays out `series` and mounts the resulting scene in `container`,
/// replacing whatever chart and legend it held. A fresh tooltip overlay is
/// appended on every call.
pub fn render(
    container: &ChartContainer,
    series: &[Series],
    person_label: &str,
    config: &ChartConfig,
    measure: &dyn TextMeasure,
) -> ChartResult<RenderedChart> {
    let geometry = RadarGeometry::compute(series, config)?;
    let metas: Vec<SeriesMeta> = series
        .iter()
        .enumerate()
        .map(|(i, s)| SeriesMeta {
            name: s.name.clone(),
            color: config.palette.color_for(i).to_string(),
        })
        .collect();

    let scene = build_scene(&geometry, &metas, person_label, config, measure);

    let owner = {
        let mut state = container.state.borrow_mut();
        state.next_owner += 1;
        let owner = state.next_owner;
        state.mounted = Some(Mounted { owner, scene });
        state.legend = Some(Legend {
            owner,
            entries: metas
                .iter()
                .map(|meta| LegendEntry {
                    name: meta.name.clone(),
                    color: meta.color.clone(),
                    active: true,
                })
                .collect(),
        });
        state.tooltips.push(Tooltip::hidden(owner));
        owner
    };

    tracing::debug!(owner, series = metas.len(), label = person_label, "radar chart mounted");

    Ok(RenderedChart {
        container: container.clone(),
        owner,
        data: Rc::new(ChartData {
            label: person_label.to_string(),
            config: config.clone(),
            geometry,
            series: metas,
        }),
    })
}

fn build_scene(
    geometry: &RadarGeometry,
    series: &[SeriesMeta],
    label: &str,
    config: &ChartConfig,
    measure: &dyn TextMeasure,
) -> Scene {
    let mut root = Node::new(
        NodeClass::Root,
        Shape::Group {
            translate: Some((
                config.margin.left + config.width / 2.0,
                config.margin.top + config.height / 2.0,
            )),
        },
    )
    .with_id("radar-root");

    let mut grid = Node::group(NodeClass::Grid).with_id("radar-grid");
    for level in &geometry.levels {
        grid.push(
            Node::new(
                NodeClass::GridCircle,
                Shape::Circle {
                    cx: 0.0,
                    cy: 0.0,
                    r: level.radius,
                },
            )
            .with_id(format!("radar-grid-circle-{}", level.level))
            .with_style(Style {
                fill: Some(GRID_COLOR.into()),
                stroke: Some(GRID_COLOR.into()),
                fill_opacity: Some(GRID_FILL_OPACITY),
                ..Style::default()
            }),
        );
    }
    for level in &geometry.levels {
        grid.push(
            Node::new(
                NodeClass::LevelLabel,
                Shape::Text {
                    x: LEVEL_LABEL_X,
                    y: -level.radius,
                    lines: vec![TextLine {
                        text: level.label.clone(),
                        dy_em: LEVEL_LABEL_DY_EM,
                    }],
                },
            )
            .with_id(format!("radar-level-label-{}", level.level))
            .with_style(Style {
                fill: Some(LEVEL_LABEL_COLOR.into()),
                font_size: Some(LEVEL_LABEL_SIZE),
                ..Style::default()
            }),
        );
    }
    root.push(grid);

    let mut axes = Node::group(NodeClass::Axes).with_id("radar-axes");
    for axis in &geometry.axes {
        axes.push(
            Node::new(
                NodeClass::AxisSpoke,
                Shape::Line {
                    x1: 0.0,
                    y1: 0.0,
                    x2: axis.end.x,
                    y2: axis.end.y,
                },
            )
            .with_id(format!("radar-axis-line-{}", axis.index))
            .with_style(Style {
                stroke: Some(SPOKE_COLOR.into()),
                stroke_width: Some(SPOKE_WIDTH),
                ..Style::default()
            }),
        );
    }
    let font = FontSpec::axis_label();
    for axis in &geometry.axes {
        let lines = wrap_label(&axis.name, config.wrap_width, font, measure)
            .into_iter()
            .map(|line| TextLine {
                text: line.text,
                dy_em: line.dy_em,
            })
            .collect();
        axes.push(
            Node::new(
                NodeClass::AxisLabel,
                Shape::Text {
                    x: axis.label_anchor.x,
                    y: axis.label_anchor.y,
                    lines,
                },
            )
            .with_id(format!("radar-axis-label-{}", axis.index))
            .with_style(Style {
                fill: Some(AXIS_LABEL_COLOR.into()),
                font_size: Some(font.size_px),
                font_weight: Some(font.weight.css_value().into()),
                text_anchor: Some("middle".into()),
                ..Style::default()
            }),
        );
    }
    root.push(axes);

    for (shape, meta) in geometry.series.iter().zip(series) {
        let index = shape.index;
        let mut wrapper = Node::group(NodeClass::SeriesWrapper)
            .with_id(format!("radar-series-{index}"))
            .with_series(index);
        wrapper.push(
            Node::new(NodeClass::Area, Shape::Path { d: shape.path.clone() })
                .with_id(format!("radar-area-{index}"))
                .with_series(index)
                .with_style(Style {
                    fill: Some(meta.color.clone()),
                    fill_opacity: Some(config.opacity_area),
                    ..Style::default()
                }),
        );
        wrapper.push(
            Node::new(NodeClass::Outline, Shape::Path { d: shape.path.clone() })
                .with_id(format!("radar-stroke-{index}"))
                .with_series(index)
                .with_style(Style {
                    fill: Some("none".into()),
                    stroke: Some(meta.color.clone()),
                    stroke_width: Some(config.stroke_width),
                    ..Style::default()
                }),
        );
        for (axis_index, vertex) in shape.vertices.iter().enumerate() {
            wrapper.push(
                Node::new(
                    NodeClass::Marker,
                    Shape::Circle {
                        cx: vertex.point.x,
                        cy: vertex.point.y,
                        r: config.dot_radius,
                    },
                )
                .with_id(format!("radar-marker-{index}-{axis_index}"))
                .with_series(index)
                .with_axis(axis_index)
                .with_style(Style {
                    fill: Some(meta.color.clone()),
                    fill_opacity: Some(MARKER_FILL_OPACITY),
                    ..Style::default()
                }),
            );
        }
        root.push(wrapper);
    }

    Scene {
        label: label.to_string(),
        width: config.outer_width(),
        height: config.outer_height(),
        root,
        series: series.to_vec(),
    }
}

impl RenderedChart {
    pub fn container(&self) -> &ChartContainer {
        &self.container
    }

    pub fn person_label(&self) -> &str {
        &self.data.label
    }

    pub fn config(&self) -> &ChartConfig {
        &self.data.config
    }

    pub fn geometry(&self) -> &RadarGeometry {
        &self.data.geometry
    }

    pub fn series(&self) -> &[SeriesMeta] {
        &self.data.series
    }

    /// Still the chart shown by its container.
    pub fn is_mounted(&self) -> bool {
        self.container
            .state
            .borrow()
            .mounted
            .as_ref()
            .is_some_and(|m| m.owner == self.owner)
    }

    /// Copy of the mounted scene, `None` once destroyed or replaced.
    pub fn scene_snapshot(&self) -> Option<Scene> {
        let state = self.container.state.borrow();
        state
            .mounted
            .as_ref()
            .filter(|m| m.owner == self.owner)
            .map(|m| m.scene.clone())
    }

    pub fn legend(&self) -> Option<Legend> {
        self.container
            .state
            .borrow()
            .legend
            .clone()
            .filter(|legend| legend.owner == self.owner)
    }

    pub fn tooltip(&self) -> Option<Tooltip> {
        self.container
            .state
            .borrow()
            .tooltips
            .iter()
            .rev()
            .find(|t| t.owner == self.owner)
            .cloned()
    }

    fn with_scene(&self, edit: impl FnOnce(&mut Node)) {
        let mut state = self.container.state.borrow_mut();
        if let Some(mounted) = state.mounted.as_mut().filter(|m| m.owner == self.owner) {
            edit(&mut mounted.scene.root);
        }
    }

    fn with_tooltip(&self, edit: impl FnOnce(&mut Tooltip)) {
        let mut state = self.container.state.borrow_mut();
        if let Some(tooltip) = state.tooltips.iter_mut().rev().find(|t| t.owner == self.owner) {
            edit(tooltip);
        }
    }

    /// Dims every area and highlights `series`.
    pub fn hover_area(&self, series: usize) {
        self.with_scene(|root| {
            root.walk_mut(&mut |node| {
                if node.class == NodeClass::Area {
                    node.style.fill_opacity = Some(if node.series == Some(series) {
                        AREA_FOCUSED
                    } else {
                        AREA_DIMMED
                    });
                }
            });
        });
    }

    pub fn leave_area(&self) {
        let resting = self.data.config.opacity_area;
        self.with_scene(|root| {
            root.walk_mut(&mut |node| {
                if node.class == NodeClass::Area {
                    node.style.fill_opacity = Some(resting);
                }
            });
        });
    }

    /// Shows the tooltip for one marker next to `cursor`.
    pub fn hover_marker(&self, series: usize, axis: usize, cursor: Point) {
        if !self.is_mounted() {
            return;
        }
        let Some(vertex) = self
            .data
            .geometry
            .series
            .get(series)
            .and_then(|s| s.vertices.get(axis))
        else {
            return;
        };
        let name = self.data.series[series].name.clone();
        let detail = format!("{}: {}", vertex.axis, format_score(vertex.value));
        self.with_tooltip(|tooltip| {
            tooltip.visible = true;
            tooltip.x = cursor.x + TOOLTIP_OFFSET_X;
            tooltip.y = cursor.y + TOOLTIP_OFFSET_Y;
            tooltip.opacity = TOOLTIP_OPACITY;
            tooltip.lines = vec![name, detail];
        });
    }

    pub fn leave_marker(&self) {
        self.with_tooltip(|tooltip| {
            tooltip.visible = false;
            tooltip.opacity = 0.0;
        });
    }

    /// Flips a series between shown and faded. Returns the new state.
    pub fn toggle_series(&self, series: usize) -> bool {
        let mut state = self.container.state.borrow_mut();
        let Some(entry) = state
            .legend
            .as_mut()
            .filter(|legend| legend.owner == self.owner)
            .and_then(|legend| legend.entries.get_mut(series))
        else {
            return false;
        };
        entry.active = !entry.active;
        let active = entry.active;

        let opacity = if active { 1.0 } else { SERIES_HIDDEN };
        if let Some(mounted) = state.mounted.as_mut().filter(|m| m.owner == self.owner) {
            mounted.scene.root.walk_mut(&mut |node| {
                let styled = matches!(
                    node.class,
                    NodeClass::Area | NodeClass::Outline | NodeClass::Marker
                );
                if styled && node.series == Some(series) {
                    node.style.opacity = Some(opacity);
                }
            });
        }
        active
    }

    /// Resolves once the container shows this chart with every series
    /// wrapper in place.
    pub async fn settled(&self) -> ChartResult<()> {
        let state = self.container.state.borrow();
        let Some(mounted) = state.mounted.as_ref().filter(|m| m.owner == self.owner) else {
            return Err(ChartError::render(format!(
                "chart for `{}` is not mounted",
                self.data.label
            )));
        };
        let wrappers = mounted.scene.root.count(NodeClass::SeriesWrapper);
        let expected = self.data.series.len();
        if wrappers != expected {
            return Err(ChartError::render(format!(
                "expected {expected} series in the scene, found {wrappers}"
            )));
        }
        Ok(())
    }

    /// Removes this chart's scene and legend plus every tooltip overlay in
    /// the container. Safe to call more than once.
    pub fn destroy(&self) {
        let mut state = self.container.state.borrow_mut();
        if state.mounted.as_ref().is_some_and(|m| m.owner == self.owner) {
            state.mounted = None;
        }
        if state.legend.as_ref().is_some_and(|l| l.owner == self.owner) {
            state.legend = None;
        }
        if !state.tooltips.is_empty() {
            tracing::debug!(removed = state.tooltips.len(), "tooltips removed");
            state.tooltips.clear();
        }
    }
}
