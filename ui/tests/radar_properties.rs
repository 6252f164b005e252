#![cfg(not(target_arch = "wasm32"))]

use proptest::prelude::*;

use ui::core::{ChartConfig, ChartError};
use ui::export::{build_export_document, slug, ExportLabels};
use ui::export::svg::to_svg_string;
use ui::radar::fonts::{FontSpec, TextMeasure};
use ui::radar::wrap::wrap_words;
use ui::radar::{
    default_stylesheet, render, ChartContainer, CompetencyScore, HeuristicMeasure, NodeClass, Point,
    RadarGeometry, Series,
};

const AXIS_NAMES: [&str; 10] = [
    "Ownership",
    "Communication",
    "Craft",
    "Teamwork",
    "Growth",
    "Listening",
    "Planning",
    "Vision",
    "Feedback",
    "Focus",
];

fn build_series(values: &[Vec<f64>]) -> Vec<Series> {
    values
        .iter()
        .enumerate()
        .map(|(s, row)| {
            let axes = row
                .iter()
                .enumerate()
                .map(|(i, v)| CompetencyScore::new(AXIS_NAMES[i], *v))
                .collect();
            Series::new(format!("Series {s}"), axes)
        })
        .collect()
}

fn score() -> impl Strategy<Value = f64> {
    prop_oneof![
        8 => -2.0f64..8.0,
        1 => Just(f64::NAN),
        1 => Just(f64::INFINITY),
    ]
}

/// `series` rows of `axes` scores each.
fn score_grid() -> impl Strategy<Value = Vec<Vec<f64>>> {
    (3usize..=10, 1usize..=3).prop_flat_map(|(axes, series)| {
        prop::collection::vec(prop::collection::vec(score(), axes), series)
    })
}

proptest! {
    #[test]
    fn scene_element_counts_match_input(grid in score_grid(), levels in 1u32..=6) {
        let axes = grid[0].len();
        let series = build_series(&grid);
        let config = ChartConfig { levels, ..ChartConfig::interactive(400.0) };
        let container = ChartContainer::new();

        let chart = render(&container, &series, "Someone", &config, &HeuristicMeasure).expect("render");
        let scene = chart.scene_snapshot().expect("mounted");

        prop_assert_eq!(scene.root.count(NodeClass::GridCircle), levels as usize);
        prop_assert_eq!(scene.root.count(NodeClass::LevelLabel), levels as usize);
        prop_assert_eq!(scene.root.count(NodeClass::AxisSpoke), axes);
        prop_assert_eq!(scene.root.count(NodeClass::AxisLabel), axes);
        prop_assert_eq!(scene.root.count(NodeClass::Area), grid.len());
        prop_assert_eq!(scene.root.count(NodeClass::Marker), axes * grid.len());

        let ids = scene.root.ids();
        let mut unique = ids.clone();
        unique.sort_unstable();
        unique.dedup();
        prop_assert_eq!(unique.len(), ids.len());
    }

    #[test]
    fn vertices_stay_inside_the_outer_ring(grid in score_grid()) {
        let config = ChartConfig::interactive(500.0);
        let geometry = RadarGeometry::compute(&build_series(&grid), &config).expect("geometry");

        for series in &geometry.series {
            for vertex in &series.vertices {
                prop_assert!(vertex.value >= 0.0 && vertex.value <= config.max_value);
                prop_assert!(vertex.point.distance() <= geometry.radius + 1e-9);
            }
        }
    }

    #[test]
    fn export_keeps_every_chart_element(grid in score_grid()) {
        let axes = grid[0].len();
        let container = ChartContainer::offscreen(1000.0, 800.0);
        let chart = render(
            &container,
            &build_series(&grid),
            "Someone",
            &ChartConfig::interactive(300.0),
            &HeuristicMeasure,
        )
        .expect("render");
        let scene = chart.scene_snapshot().expect("mounted");
        let labels = ExportLabels::new("Feedback analysis for Someone", "Generated on 2024-06-01");
        let doc = build_export_document(&scene, "Someone", &labels, &default_stylesheet());
        let svg = to_svg_string(&doc);

        prop_assert_eq!(svg.matches(r#"id="radar-marker-"#).count(), axes * grid.len());
        prop_assert_eq!(svg.matches(r#"id="radar-area-"#).count(), grid.len());
        prop_assert_eq!(svg.matches(r#"id="radar-axis-line-"#).count(), axes);
        prop_assert_eq!(doc.count(NodeClass::LegendSwatch), grid.len());
    }

    #[test]
    fn slugs_are_plain_snake_case(name in "\\PC{0,40}") {
        let out = slug(&name);
        prop_assert!(out.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_'));
        prop_assert!(!out.starts_with('_') && !out.ends_with('_'));
        prop_assert!(!out.contains("__"));
    }

    #[test]
    fn wrapped_lines_fit_unless_single_word(
        words in prop::collection::vec("[A-Za-z]{1,14}", 1..8),
        max_width in 20.0f64..160.0,
    ) {
        let text = words.join(" ");
        let font = FontSpec::axis_label();
        let lines = wrap_words(&text, max_width, font, &HeuristicMeasure);

        for line in &lines {
            let fits = HeuristicMeasure.text_width(line, font) <= max_width;
            prop_assert!(fits || !line.contains(' '), "line `{}` overflows", line);
        }
        let rejoined: Vec<&str> = lines.iter().flat_map(|l| l.split(' ')).collect();
        prop_assert_eq!(rejoined, words.iter().map(String::as_str).collect::<Vec<_>>());
    }
}

#[test]
fn export_markup_parses_as_svg() {
    let grid = vec![vec![3.0, 2.5, 4.0, 1.0, 3.5], vec![2.0, 3.0, 3.0, 2.0, 4.5]];
    let container = ChartContainer::offscreen(1000.0, 800.0);
    let chart = render(
        &container,
        &build_series(&grid),
        "Ada & <Grace>",
        &ChartConfig::batch(),
        &HeuristicMeasure,
    )
    .expect("render");
    let scene = chart.scene_snapshot().expect("mounted");
    let labels = ExportLabels::new("Feedback analysis for Ada & <Grace>", "Generated on 2024-06-01");
    let doc = build_export_document(&scene, "Ada & <Grace>", &labels, &default_stylesheet());

    let tree = usvg::Tree::from_str(&to_svg_string(&doc), &usvg::Options::default()).expect("valid svg");
    approx::assert_relative_eq!(f64::from(tree.size().width()), doc.width, epsilon = 0.5);
    approx::assert_relative_eq!(f64::from(tree.size().height()), doc.height, epsilon = 0.5);
}

#[test]
fn destroy_is_idempotent_and_clears_overlays() {
    let grid = vec![vec![3.0, 2.5, 4.0], vec![2.0, 3.0, 3.0]];
    let container = ChartContainer::new();
    let chart = render(
        &container,
        &build_series(&grid),
        "Kim",
        &ChartConfig::interactive(300.0),
        &HeuristicMeasure,
    )
    .expect("render");

    chart.hover_marker(1, 2, Point::new(40.0, 60.0));
    assert_eq!(container.tooltip_count(), 1);

    chart.destroy();
    assert!(container.is_empty());
    assert_eq!(container.tooltip_count(), 0);

    chart.destroy();
    assert!(container.is_empty());
    assert!(!chart.is_mounted());
}

#[test]
fn too_few_axes_are_rejected_before_drawing() {
    let container = ChartContainer::new();
    let err = render(
        &container,
        &build_series(&[vec![1.0, 2.0]]),
        "Kim",
        &ChartConfig::interactive(300.0),
        &HeuristicMeasure,
    )
    .unwrap_err();
    assert!(matches!(err, ChartError::Config(_)));
    assert!(container.is_empty());
}
