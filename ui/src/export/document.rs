//! Self-contained export documents built from a mounted scene.
//!
//! The copy carries every presentation value as a literal attribute so the
//! result renders the same outside the page (file viewers, the raster
//! backend, the GIF service).

use time::OffsetDateTime;

use crate::radar::fonts::{FontSpec, FontWeight, HeuristicMeasure, TextMeasure, DEFAULT_FONT_FAMILY};
use crate::radar::scene::{Node, NodeClass, Scene, SeriesMeta, Shape, Style, Stylesheet, TextLine};

pub const PADDING: f64 = 40.0;
pub const TITLE_BLOCK: f64 = 84.0;
pub const LEGEND_BLOCK: f64 = 56.0;

const TITLE_SIZE: f64 = 24.0;
const SUBTITLE_SIZE: f64 = 14.0;
const TITLE_COLOR: &str = "#2c3e50";
const SUBTITLE_COLOR: &str = "#737373";
const LEGEND_SWATCH: f64 = 14.0;
const LEGEND_SWATCH_GAP: f64 = 8.0;
const LEGEND_ENTRY_GAP: f64 = 32.0;
const LEGEND_TEXT_SIZE: f64 = 14.0;

/// Localized strings placed in the title block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportLabels {
    pub title: String,
    pub generated: String,
}

impl ExportLabels {
    pub fn new(title: impl Into<String>, generated: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            generated: generated.into(),
        }
    }

    /// Title and generated-on line in the active UI language.
    pub fn localized(person: &str, now: OffsetDateTime) -> Self {
        crate::i18n::init();
        let date = super::naming::date_stamp(now);
        Self {
            title: crate::t!("export-title", name = person),
            generated: crate::t!("export-generated", date = date),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExportDocument {
    pub width: f64,
    pub height: f64,
    pub title: String,
    pub root: Node,
}

impl ExportDocument {
    pub fn count(&self, class: NodeClass) -> usize {
        self.root.count(class)
    }
}

/// Values a renderer would fall back to when neither the node nor the
/// stylesheet sets them.
fn fallback_style(node: &Node, series: &[SeriesMeta]) -> Style {
    let series_color = node
        .series
        .and_then(|i| series.get(i))
        .map(|meta| meta.color.clone());

    match (node.class, &node.shape) {
        (NodeClass::Area, _) => Style {
            fill: series_color,
            ..Style::default()
        },
        (NodeClass::Outline, _) => Style {
            fill: Some("none".into()),
            stroke: series_color,
            ..Style::default()
        },
        (NodeClass::Marker, _) => Style {
            fill: series_color,
            ..Style::default()
        },
        (NodeClass::GridCircle, _) => Style {
            fill: Some("#CDCDCD".into()),
            stroke: Some("#CDCDCD".into()),
            fill_opacity: Some(0.1),
            ..Style::default()
        },
        (NodeClass::AxisSpoke, _) => Style {
            stroke: Some("white".into()),
            fill: Some("none".into()),
            ..Style::default()
        },
        (_, Shape::Text { .. }) => Style {
            font_family: Some(DEFAULT_FONT_FAMILY.into()),
            font_size: Some(12.0),
            fill: Some("#333".into()),
            text_anchor: Some("middle".into()),
            ..Style::default()
        },
        (_, Shape::Path { .. }) => Style {
            fill: Some("none".into()),
            stroke: Some("#333".into()),
            stroke_width: Some(1.0),
            ..Style::default()
        },
        _ => Style::default(),
    }
}

fn inline_styles(root: &mut Node, stylesheet: &Stylesheet, series: &[SeriesMeta]) {
    root.walk_mut(&mut |node| {
        let computed = stylesheet.computed(node);
        node.style = computed.over(&fallback_style(node, series));
    });
}

fn text_node(class: NodeClass, x: f64, y: f64, text: &str, style: Style) -> Node {
    Node::new(
        class,
        Shape::Text {
            x,
            y,
            lines: vec![TextLine {
                text: text.to_string(),
                dy_em: 0.0,
            }],
        },
    )
    .with_style(style)
}

fn legend_font() -> FontSpec {
    FontSpec::new(LEGEND_TEXT_SIZE, FontWeight::Regular)
}

fn legend_entry_width(meta: &SeriesMeta, measure: &dyn TextMeasure) -> f64 {
    LEGEND_SWATCH + LEGEND_SWATCH_GAP + measure.text_width(&meta.name, legend_font())
}

fn legend_row_width(series: &[SeriesMeta], measure: &dyn TextMeasure) -> f64 {
    let entries: f64 = series.iter().map(|m| legend_entry_width(m, measure)).sum();
    entries + LEGEND_ENTRY_GAP * series.len().saturating_sub(1) as f64
}

/// Deep-copies `scene` into a printable document: white background, title
/// block above, legend row below, every style inlined.
pub fn build_export_document(
    scene: &Scene,
    person_label: &str,
    labels: &ExportLabels,
    stylesheet: &Stylesheet,
) -> ExportDocument {
    let measure = HeuristicMeasure;
    let legend_width = legend_row_width(&scene.series, &measure);
    let content_width = scene.width.max(legend_width);
    let width = content_width + 2.0 * PADDING;
    let height = scene.height + 2.0 * PADDING + TITLE_BLOCK + LEGEND_BLOCK;
    let center_x = width / 2.0;

    let mut document = Node::group(NodeClass::Document).with_id("export-document");

    document.push(
        Node::new(
            NodeClass::Background,
            Shape::Rect {
                x: 0.0,
                y: 0.0,
                width,
                height,
            },
        )
        .with_id("export-background")
        .with_style(Style {
            fill: Some("white".into()),
            ..Style::default()
        }),
    );

    document.push(
        text_node(
            NodeClass::Title,
            center_x,
            PADDING + 28.0,
            &labels.title,
            Style {
                fill: Some(TITLE_COLOR.into()),
                font_family: Some(DEFAULT_FONT_FAMILY.into()),
                font_size: Some(TITLE_SIZE),
                font_weight: Some(FontWeight::Bold.css_value().into()),
                text_anchor: Some("middle".into()),
                ..Style::default()
            },
        )
        .with_id("export-title"),
    );
    document.push(
        text_node(
            NodeClass::Subtitle,
            center_x,
            PADDING + 58.0,
            &labels.generated,
            Style {
                fill: Some(SUBTITLE_COLOR.into()),
                font_family: Some(DEFAULT_FONT_FAMILY.into()),
                font_size: Some(SUBTITLE_SIZE),
                text_anchor: Some("middle".into()),
                ..Style::default()
            },
        )
        .with_id("export-subtitle"),
    );

    let mut chart_root = scene.root.clone();
    inline_styles(&mut chart_root, stylesheet, &scene.series);
    let mut chart = Node::new(
        NodeClass::Document,
        Shape::Group {
            translate: Some((PADDING + (content_width - scene.width) / 2.0, PADDING + TITLE_BLOCK)),
        },
    )
    .with_id("export-chart");
    chart.push(chart_root);
    document.push(chart);

    let legend_y = PADDING + TITLE_BLOCK + scene.height + (LEGEND_BLOCK - LEGEND_SWATCH) / 2.0;
    let mut legend = Node::group(NodeClass::Legend).with_id("export-legend");
    let mut x = PADDING + (content_width - legend_width) / 2.0;
    for (index, meta) in scene.series.iter().enumerate() {
        legend.push(
            Node::new(
                NodeClass::LegendSwatch,
                Shape::Rect {
                    x,
                    y: legend_y,
                    width: LEGEND_SWATCH,
                    height: LEGEND_SWATCH,
                },
            )
            .with_id(format!("export-legend-swatch-{index}"))
            .with_series(index)
            .with_style(Style {
                fill: Some(meta.color.clone()),
                ..Style::default()
            }),
        );
        let label = text_node(
            NodeClass::LegendLabel,
            x + LEGEND_SWATCH + LEGEND_SWATCH_GAP,
            legend_y + LEGEND_SWATCH / 2.0,
            &meta.name,
            Style {
                text_anchor: Some("start".into()),
                ..Style::default()
            },
        )
        .with_id(format!("export-legend-label-{index}"))
        .with_series(index);
        legend.push(label);
        x += legend_entry_width(meta, &measure) + LEGEND_ENTRY_GAP;
    }
    inline_styles(&mut legend, stylesheet, &scene.series);
    // Labels sit on the swatch's vertical center.
    legend.walk_mut(&mut |node| {
        if let Shape::Text { lines, .. } = &mut node.shape {
            for line in lines {
                line.dy_em = 0.35;
            }
        }
    });
    document.push(legend);

    tracing::debug!(width, height, person = person_label, "export document built");

    ExportDocument {
        width,
        height,
        title: labels.title.clone(),
        root: document,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::ChartConfig;
    use crate::radar::render::{render, ChartContainer};
    use crate::radar::scene::default_stylesheet;
    use crate::radar::series::{CompetencyScore, Series};

    fn scene() -> Scene {
        let axes = |base: f64| {
            (0..5)
                .map(|i| CompetencyScore::new(format!("Skill {i}"), base + i as f64 * 0.3))
                .collect::<Vec<_>>()
        };
        let container = ChartContainer::new();
        let chart = render(
            &container,
            &[Series::new("Team average", axes(2.0)), Series::new("Robin", axes(3.0))],
            "Robin",
            &ChartConfig::batch(),
            &HeuristicMeasure,
        )
        .expect("render");
        chart.scene_snapshot().expect("scene")
    }

    fn labels() -> ExportLabels {
        ExportLabels::new("Feedback analysis for Robin", "Generated on 2024-03-01")
    }

    #[test]
    fn canvas_grows_by_padding_title_and_legend() {
        let scene = scene();
        let doc = build_export_document(&scene, "Robin", &labels(), &default_stylesheet());
        assert_eq!(doc.width, scene.width + 80.0);
        assert_eq!(doc.height, scene.height + 80.0 + 84.0 + 56.0);
    }

    #[test]
    fn background_comes_first() {
        let doc = build_export_document(&scene(), "Robin", &labels(), &default_stylesheet());
        let first = &doc.root.children[0];
        assert_eq!(first.class, NodeClass::Background);
        assert_eq!(first.style.fill.as_deref(), Some("white"));
    }

    #[test]
    fn every_chart_node_keeps_its_id_and_gets_inline_styles() {
        let scene = scene();
        let doc = build_export_document(&scene, "Robin", &labels(), &default_stylesheet());
        for id in scene.root.ids() {
            assert!(doc.root.find_by_id(id).is_some(), "missing {id}");
        }
        let label = doc.root.find_by_id("radar-axis-label-0").expect("label");
        assert_eq!(label.style.font_family.as_deref(), Some(DEFAULT_FONT_FAMILY));
        let area = doc.root.find_by_id("radar-area-1").expect("area");
        assert_eq!(area.style.fill.as_deref(), Some("#27ae60"));
    }

    #[test]
    fn missing_styles_use_fallbacks() {
        let mut scene = scene();
        scene.root.walk_mut(&mut |node| node.style = Style::default());
        let doc = build_export_document(&scene, "Robin", &labels(), &Stylesheet::empty());

        let outline = doc.root.find_by_id("radar-stroke-0").expect("outline");
        assert_eq!(outline.style.stroke.as_deref(), Some("#3498db"));
        assert_eq!(outline.style.fill.as_deref(), Some("none"));

        let grid = doc.root.find_by_id("radar-grid-circle-1").expect("grid");
        assert_eq!(grid.style.fill_opacity, Some(0.1));

        let spoke = doc.root.find_by_id("radar-axis-line-0").expect("spoke");
        assert_eq!(spoke.style.stroke.as_deref(), Some("white"));

        let text = doc.root.find_by_id("radar-level-label-1").expect("text");
        assert_eq!(text.style.font_size, Some(12.0));
        assert_eq!(text.style.fill.as_deref(), Some("#333"));
        assert_eq!(text.style.text_anchor.as_deref(), Some("middle"));
    }

    #[test]
    fn legend_lists_every_series() {
        let doc = build_export_document(&scene(), "Robin", &labels(), &default_stylesheet());
        assert_eq!(doc.count(NodeClass::LegendSwatch), 2);
        assert_eq!(doc.count(NodeClass::LegendLabel), 2);
    }

    #[test]
    fn wide_legend_widens_the_canvas() {
        let mut scene = scene();
        scene.series[1].name = "A remarkably long participant name ".repeat(6);
        let doc = build_export_document(&scene, "Robin", &labels(), &default_stylesheet());
        assert!(doc.width > scene.width + 2.0 * PADDING);
    }
}
