use dioxus::prelude::*;

use crate::radar::render::RenderedChart;
use crate::t;

use super::document::ExportLabels;
use super::download::download_bytes;
use super::naming::local_now;
use super::pipeline::{export_chart, ExportFormat};

#[derive(Clone, Debug, PartialEq)]
enum ExportStatus {
    Idle,
    Working,
    Done(String),
    Error(String),
}

/// Format picker plus export button for the chart on screen.
#[component]
pub fn ExportPanel(chart: Option<RenderedChart>, person: String) -> Element {
    let mut format = use_signal(ExportFormat::default);
    let status = use_signal(|| ExportStatus::Idle);
    let busy = use_signal(|| false);

    let feedback = match &status() {
        ExportStatus::Idle => None,
        ExportStatus::Working => Some(("export-status export-status--processing", t!("export-working"))),
        ExportStatus::Done(message) => Some(("export-status export-status--success", format!("✅ {message}"))),
        ExportStatus::Error(err) => Some(("export-status export-status--error", format!("⚠️ {err}"))),
    };

    let export_handler = {
        let chart = chart.clone();
        let person = person.clone();
        let mut status_signal = status;
        let mut busy_signal = busy;
        move |_| {
            if busy_signal() {
                return;
            }
            let Some(chart) = chart.clone() else {
                status_signal.set(ExportStatus::Error(t!("export-no-chart")));
                return;
            };
            busy_signal.set(true);
            status_signal.set(ExportStatus::Working);
            let person = person.clone();
            let format = format();
            spawn(async move {
                let now = local_now();
                let labels = ExportLabels::localized(&person, now);
                let outcome = match export_chart(&chart, &person, format, &labels, now).await {
                    Ok(artifact) => {
                        download_bytes(&artifact.filename, &artifact.mime, &artifact.bytes).await
                    }
                    Err(err) => Err(err),
                };
                match outcome {
                    Ok(Some(path)) => status_signal.set(ExportStatus::Done(t!("export-done-saved", path = path))),
                    Ok(None) => status_signal.set(ExportStatus::Done(t!("export-done-download"))),
                    Err(err) => {
                        tracing::error!(error = %err, "chart export failed");
                        status_signal.set(ExportStatus::Error(t!("export-error", error = err.to_string())));
                    }
                }
                busy_signal.set(false);
            });
        }
    };

    let selected = format().extension();

    rsx! {
        section { class: "card export-panel",
            h3 { {t!("export-heading")} }
            div { class: "export-panel__controls",
                label { r#for: "export-format", {t!("export-format-label")} }
                select {
                    id: "export-format",
                    value: "{selected}",
                    disabled: busy(),
                    onchange: move |evt| {
                        if let Some(parsed) = ExportFormat::parse(&evt.value()) {
                            format.set(parsed);
                        }
                    },
                    option { value: "png", {t!("export-format-png")} }
                    option { value: "svg", {t!("export-format-svg")} }
                }
                button {
                    r#type: "button",
                    class: "button button--primary",
                    disabled: busy() || chart.is_none(),
                    onclick: export_handler,
                    {t!("export-button")}
                }
            }
            if let Some((class_name, message)) = feedback {
                p { class: "{class_name}", "{message}" }
            }
        }
    }
}
