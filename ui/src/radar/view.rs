use dioxus::prelude::*;

use super::geometry::Point;
use super::render::RenderedChart;
use super::scene::{Node, NodeClass, Shape};
use crate::radar::curve::num;

/// Draws a mounted chart as inline SVG plus its HTML legend and tooltip
/// overlays, forwarding pointer events to the chart handle.
#[component]
pub fn RadarChartView(chart: RenderedChart) -> Element {
    // Bumped by every interaction so the snapshot below is re-read.
    let revision = use_signal(|| 0u64);
    let _ = revision();

    let Some(scene) = chart.scene_snapshot() else {
        return rsx! {
            div { class: "radar-chart-container radar-chart-container--empty" }
        };
    };
    let legend = chart.legend().map(|l| l.entries).unwrap_or_default();
    let tooltips = chart.container().tooltips();
    let width = num(scene.width);
    let height = num(scene.height);

    rsx! {
        div { class: "radar-chart-container",
            svg {
                class: "radar-chart-svg",
                "xmlns": "http://www.w3.org/2000/svg",
                "width": "{width}",
                "height": "{height}",
                "viewBox": "0 0 {width} {height}",
                "role": "img",
                "aria-label": "{scene.label}",
                {node_view(&scene.root, &chart, revision)}
            }

            div { class: "radar-legend",
                for (index, entry) in legend.into_iter().enumerate() {
                    div {
                        key: "{index}",
                        class: "legend-item",
                        style: "opacity:{entry.opacity()};",
                        onclick: {
                            let chart = chart.clone();
                            let mut revision = revision;
                            move |_| {
                                chart.toggle_series(index);
                                revision += 1;
                            }
                        },
                        span {
                            class: "legend-swatch",
                            style: "background-color:{entry.color};",
                        }
                        span { class: "legend-label", "{entry.name}" }
                    }
                }
            }

            for (index, tooltip) in tooltips.into_iter().enumerate() {
                div {
                    key: "tooltip-{index}",
                    class: "radar-tooltip",
                    style: "left:{tooltip.x}px;top:{tooltip.y}px;opacity:{tooltip.opacity};display:{display(tooltip.visible)};",
                    for line in tooltip.lines.iter() {
                        div { class: "radar-tooltip__line", "{line}" }
                    }
                }
            }
        }
    }
}

fn display(visible: bool) -> &'static str {
    if visible {
        "block"
    } else {
        "none"
    }
}

fn node_view(node: &Node, chart: &RenderedChart, revision: Signal<u64>) -> Element {
    let id = node.id.clone();
    let class = node.class.css_class();
    let style = node.style.css();
    let children = node.children.iter().map(|child| node_view(child, chart, revision));

    match &node.shape {
        Shape::Group { translate } => {
            let transform = translate.map(|(x, y)| format!("translate({},{})", num(x), num(y)));
            rsx! {
                g { id, class, "transform": transform, {children} }
            }
        }
        Shape::Circle { cx, cy, r } => {
            if let (NodeClass::Marker, Some(series), Some(axis)) = (node.class, node.series, node.axis) {
                let enter_chart = chart.clone();
                let leave_chart = chart.clone();
                let mut enter_revision = revision;
                let mut leave_revision = revision;
                rsx! {
                    circle {
                        id,
                        class,
                        style,
                        "cx": num(*cx),
                        "cy": num(*cy),
                        "r": num(*r),
                        onmouseenter: move |evt: MouseEvent| {
                            let at = evt.client_coordinates();
                            enter_chart.hover_marker(series, axis, Point::new(at.x, at.y));
                            enter_revision += 1;
                        },
                        onmouseleave: move |_| {
                            leave_chart.leave_marker();
                            leave_revision += 1;
                        },
                    }
                }
            } else {
                rsx! {
                    circle { id, class, style, "cx": num(*cx), "cy": num(*cy), "r": num(*r) }
                }
            }
        }
        Shape::Line { x1, y1, x2, y2 } => rsx! {
            line {
                id,
                class,
                style,
                "x1": num(*x1),
                "y1": num(*y1),
                "x2": num(*x2),
                "y2": num(*y2),
            }
        },
        Shape::Path { d } => {
            if let (NodeClass::Area, Some(series)) = (node.class, node.series) {
                let enter_chart = chart.clone();
                let leave_chart = chart.clone();
                let mut enter_revision = revision;
                let mut leave_revision = revision;
                rsx! {
                    path {
                        id,
                        class,
                        style,
                        "d": "{d}",
                        onmouseenter: move |_| {
                            enter_chart.hover_area(series);
                            enter_revision += 1;
                        },
                        onmouseleave: move |_| {
                            leave_chart.leave_area();
                            leave_revision += 1;
                        },
                    }
                }
            } else {
                rsx! {
                    path { id, class, style, "d": "{d}" }
                }
            }
        }
        Shape::Rect {
            x,
            y,
            width,
            height,
        } => rsx! {
            rect {
                id,
                class,
                style,
                "x": num(*x),
                "y": num(*y),
                "width": num(*width),
                "height": num(*height),
            }
        },
        Shape::Text { x, y, lines } => {
            let x = num(*x);
            rsx! {
                text { id, class, style, "x": "{x}", "y": num(*y),
                    for line in lines.iter() {
                        tspan { "x": "{x}", "dy": "{line.dy_em}em", "{line.text}" }
                    }
                }
            }
        }
    }
}
