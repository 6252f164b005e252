use dioxus::prelude::*;

use api::UploadFile;

use std::time::Duration;

use crate::core::config::ChartConfig;
use crate::core::error::{ChartError, ChartResult};
use crate::core::format::format_score;
use crate::core::settings::AppSettings;
use crate::core::timing::Debounce;
use crate::export::ExportPanel;
use crate::radar::fonts::platform_measure;
use crate::radar::render::RenderedChart;
use crate::radar::series::{person_series, score_rows, ScoreRow, Series};
use crate::radar::slot::ChartSlot;
use crate::radar::view::RadarChartView;
use crate::t;

const CHART_HOST_ID: &str = "radar-chart-host";
const RESIZE_DEBOUNCE: Duration = Duration::from_millis(250);

#[derive(Clone, Debug, PartialEq)]
enum Status {
    Idle,
    Busy(String),
    Info(String),
    Error(String),
}

/// Width of the chart host and height of the viewport, in CSS pixels.
#[cfg(target_arch = "wasm32")]
fn chart_host_size() -> (f64, f64) {
    let Some(window) = web_sys::window() else {
        return (900.0, 800.0);
    };
    let viewport_height = window
        .inner_height()
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(800.0);
    let host_width = window
        .document()
        .and_then(|d| d.get_element_by_id(CHART_HOST_ID))
        .map(|el| f64::from(el.client_width()))
        .filter(|w| *w > 0.0)
        .or_else(|| window.inner_width().ok().and_then(|v| v.as_f64()))
        .unwrap_or(900.0);
    (host_width, viewport_height)
}

#[cfg(not(target_arch = "wasm32"))]
fn chart_host_size() -> (f64, f64) {
    (900.0, 800.0)
}

/// Series and person of the chart on screen, kept for re-layout on resize.
#[derive(Clone, Debug, PartialEq)]
struct Drawn {
    person: String,
    series: Vec<Series>,
}

fn draw(
    slot: &ChartSlot,
    ticket: u64,
    drawn: &Drawn,
    host_width: f64,
) -> ChartResult<Option<RenderedChart>> {
    let (_, viewport_height) = chart_host_size();
    let config = ChartConfig::interactive(ChartConfig::interactive_size(host_width, viewport_height));
    let measure = platform_measure();
    slot.show(ticket, &drawn.series, &drawn.person, &config, measure.as_ref())
}

#[component]
pub fn Dashboard() -> Element {
    let settings = try_use_context::<AppSettings>().unwrap_or_else(AppSettings::detect);

    let mut persons = use_signal(Vec::<String>::new);
    let mut selected = use_signal(String::new);
    let mut status = use_signal(|| Status::Idle);
    let mut chart = use_signal(|| None::<RenderedChart>);
    let mut drawn = use_signal(|| None::<Drawn>);
    let mut fallback = use_signal(|| None::<Vec<ScoreRow>>);
    let mut host_width = use_signal(|| chart_host_size().0);
    // The dashboard owns exactly one on-screen chart.
    let slot = use_hook(ChartSlot::new);
    let resize = use_hook(Debounce::new);

    // Persons already known to the backend from an earlier upload.
    {
        let settings = settings.clone();
        use_future(move || {
            let client = settings.api_client();
            async move {
                match client.available_persons().await {
                    Ok(list) => {
                        tracing::debug!(count = list.len(), "available persons loaded");
                        persons.set(list);
                    }
                    Err(err) => tracing::warn!(error = %err, "no persons available yet"),
                }
            }
        });
    }

    let on_upload = {
        let settings = settings.clone();
        move |evt: FormEvent| {
            let client = settings.api_client();
            async move {
                let Some(engine) = evt.files() else {
                    return;
                };
                let Some(name) = engine.files().into_iter().next() else {
                    return;
                };
                let Some(bytes) = engine.read_file(&name).await else {
                    status.set(Status::Error(t!("upload-read-failed")));
                    return;
                };
                let file = UploadFile::new(name, bytes);
                if let Err(err) = file.validate() {
                    status.set(Status::Error(ChartError::from(err).to_string()));
                    return;
                }
                status.set(Status::Busy(t!("upload-working")));
                match client.upload(&file).await {
                    Ok(list) => {
                        tracing::info!(file = %file.name, persons = list.len(), "spreadsheet uploaded");
                        status.set(Status::Info(t!("upload-done", count = (list.len() as i64))));
                        persons.set(list);
                        selected.set(String::new());
                    }
                    Err(err) => {
                        let err = ChartError::from(err);
                        tracing::error!(error = %err, "upload failed");
                        status.set(Status::Error(t!("upload-failed", error = err.to_string())));
                    }
                }
            }
        }
    };

    let on_select = {
        let settings = settings.clone();
        let slot = slot.clone();
        move |evt: FormEvent| {
            let person = evt.value();
            selected.set(person.clone());
            let client = settings.api_client();
            let slot = slot.clone();
            // Any fetch still in flight for an earlier pick goes stale here.
            let ticket = slot.begin();
            async move {
                fallback.set(None);
                if person.is_empty() {
                    slot.clear();
                    chart.set(None);
                    drawn.set(None);
                    status.set(Status::Idle);
                    return;
                }

                status.set(Status::Busy(t!("chart-loading", name = person.clone())));
                let payload = match client.scores(&person).await {
                    Ok(payload) => payload,
                    Err(err) => {
                        if !slot.is_latest(ticket) {
                            return;
                        }
                        let err = ChartError::from(err);
                        tracing::error!(person = %person, error = %err, "score fetch failed");
                        status.set(Status::Error(t!("chart-error", error = err.to_string())));
                        return;
                    }
                };
                if !slot.is_latest(ticket) {
                    tracing::debug!(person = %person, "scores arrived for an older selection");
                    return;
                }

                let next = Drawn {
                    series: person_series(&payload, &person, &t!("series-team-average")),
                    person: person.clone(),
                };
                match draw(&slot, ticket, &next, *host_width.peek()) {
                    Ok(Some(rendered)) => {
                        status.set(Status::Idle);
                        chart.set(Some(rendered));
                        drawn.set(Some(next));
                    }
                    Ok(None) => {}
                    Err(err) => {
                        tracing::error!(person = %person, error = %err, "chart render failed");
                        chart.set(None);
                        drawn.set(None);
                        fallback.set(Some(score_rows(&payload, ChartConfig::interactive(0.0).max_value)));
                        status.set(Status::Error(t!("chart-error", error = err.to_string())));
                    }
                }
            }
        }
    };

    let on_resize = {
        let slot = slot.clone();
        move |evt: Event<ResizeData>| {
            let Ok(size) = evt.get_content_box_size() else {
                return;
            };
            let width = size.width;
            if width <= 0.0 || (width - *host_width.peek()).abs() < 1.0 {
                return;
            }
            host_width.set(width);
            let slot = slot.clone();
            let resize = resize.clone();
            spawn(async move {
                if !resize.settle(RESIZE_DEBOUNCE).await {
                    return;
                }
                let Some(current) = drawn.peek().clone() else {
                    return;
                };
                let width = *host_width.peek();
                let size = ChartConfig::interactive_size(width, chart_host_size().1);
                if slot.current().is_some_and(|c| c.config().width == size) {
                    return;
                }
                tracing::debug!(size, "re-laying out chart after resize");
                let ticket = slot.begin();
                match draw(&slot, ticket, &current, width) {
                    Ok(Some(rendered)) => chart.set(Some(rendered)),
                    Ok(None) => {}
                    Err(err) => tracing::warn!(error = %err, "re-layout after resize failed"),
                }
            });
        }
    };

    let status_line = match status() {
        Status::Idle => None,
        Status::Busy(msg) => Some(("status status--busy", msg)),
        Status::Info(msg) => Some(("status status--info", msg)),
        Status::Error(msg) => Some(("status status--error", msg)),
    };
    let max_label = format_score(ChartConfig::interactive(0.0).max_value);

    rsx! {
        section { class: "page page-dashboard",
            h1 { {t!("dashboard-title")} }
            p { class: "page-dashboard__intro", {t!("dashboard-intro")} }

            div { class: "card upload-panel",
                label { r#for: "sheet-upload", {t!("upload-label")} }
                input {
                    id: "sheet-upload",
                    class: "input",
                    r#type: "file",
                    accept: ".xlsx,.xls,.csv",
                    onchange: on_upload,
                }
                p { class: "card__hint", {t!("upload-hint")} }
            }

            div { class: "card person-picker",
                label { r#for: "person-select", {t!("person-select-label")} }
                select {
                    id: "person-select",
                    class: "input",
                    value: "{selected()}",
                    disabled: persons().is_empty(),
                    onchange: on_select,
                    option { value: "", {t!("person-select-placeholder")} }
                    for name in persons() {
                        option { key: "{name}", value: "{name}", "{name}" }
                    }
                }
            }

            if let Some((class_name, message)) = status_line {
                p { class: "{class_name}", "{message}" }
            }

            div { id: CHART_HOST_ID, class: "dashboard__chart", onresize: on_resize,
                if let Some(rendered) = chart() {
                    RadarChartView { chart: rendered }
                } else if let Some(rows) = fallback() {
                    div { class: "score-list",
                        h4 { {t!("chart-fallback-heading", name = selected())} }
                        for row in rows {
                            div { key: "{row.axis}", class: "score-list__row",
                                div { class: "score-list__label",
                                    strong { "{row.axis}" }
                                    span { "{format_score(row.value)}/{max_label}" }
                                }
                                div { class: "score-list__track",
                                    div { class: "score-list__bar", style: "width:{row.percent}%;" }
                                }
                                if let Some(team) = row.team {
                                    span { class: "score-list__team",
                                        {t!("chart-fallback-team", value = format_score(team))}
                                    }
                                }
                            }
                        }
                    }
                } else {
                    p { class: "card__hint", {t!("chart-empty")} }
                }
            }

            ExportPanel { chart: chart(), person: drawn().map(|d| d.person).unwrap_or_default() }
        }
    }
}
