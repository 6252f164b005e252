use std::cell::RefCell;
use std::rc::Rc;

use dioxus::prelude::*;

use crate::core::format::progress_percent;
use crate::core::settings::AppSettings;
use crate::export::BrowserDownloads;
use crate::t;

use super::controller::{BatchController, BatchOptions, BatchProgress, BatchSummary, BatchTarget};

#[derive(Clone, Debug, PartialEq)]
enum BatchView {
    Idle,
    Running(BatchProgress),
    Finished(BatchSummary),
    Failed(String),
}

/// Starts a batch export for every person and reports progress.
#[component]
pub fn BatchExportPanel(settings: AppSettings) -> Element {
    let mut server_gif = use_signal(|| false);
    let mut export_path = use_signal(String::new);
    let view = use_signal(|| BatchView::Idle);
    // One controller per mounted panel.
    let controller = use_hook(|| Rc::new(RefCell::new(None::<BatchController>)));

    let running = matches!(view(), BatchView::Running(_));

    let start = {
        let settings = settings.clone();
        let controller = controller.clone();
        let mut view_signal = view;
        move |_| {
            if running {
                return;
            }
            let target = if server_gif() {
                BatchTarget::ServerGif {
                    export_path: export_path().trim().to_string(),
                }
            } else {
                BatchTarget::Png
            };
            let options = BatchOptions {
                target,
                team_label: t!("series-team-average"),
                ..BatchOptions::default()
            };
            let batch = {
                let mut slot = controller.borrow_mut();
                match slot.as_ref() {
                    Some(existing) if existing.is_running() => return,
                    _ => {}
                }
                let batch = BatchController::new(options);
                *slot = Some(batch.clone());
                batch
            };
            let client = settings.api_client();
            view_signal.set(BatchView::Running(BatchProgress {
                current: 0,
                total: 0,
                person: String::new(),
            }));
            spawn(async move {
                let mut downloads = BrowserDownloads;
                let outcome = batch
                    .run(&client, &mut downloads, |step| {
                        view_signal.set(BatchView::Running(step));
                    })
                    .await;
                match outcome {
                    Ok(Some(summary)) => view_signal.set(BatchView::Finished(summary)),
                    Ok(None) => {}
                    Err(err) => view_signal.set(BatchView::Failed(err.to_string())),
                }
            });
        }
    };

    rsx! {
        section { class: "card batch-panel",
            h3 { {t!("batch-heading")} }
            p { class: "card__hint", {t!("batch-intro")} }

            div { class: "batch-panel__target",
                label {
                    input {
                        r#type: "checkbox",
                        checked: server_gif(),
                        disabled: running,
                        onchange: move |evt| server_gif.set(evt.checked()),
                    }
                    " "
                    {t!("batch-target-gif")}
                }
                if server_gif() {
                    input {
                        r#type: "text",
                        class: "input",
                        placeholder: t!("batch-export-path-placeholder"),
                        value: "{export_path}",
                        disabled: running,
                        oninput: move |evt| export_path.set(evt.value()),
                    }
                }
            }

            button {
                r#type: "button",
                class: "button button--primary",
                disabled: running,
                onclick: start,
                if running {
                    {t!("batch-running")}
                } else {
                    {t!("batch-start")}
                }
            }

            match view() {
                BatchView::Idle => rsx! {},
                BatchView::Running(step) => {
                    let percent = progress_percent(step.current, step.total);
                    let current = step.current as i64;
                    let total = step.total as i64;
                    rsx! {
                        div { class: "progress",
                            div { class: "progress__bar", style: "width:{percent}%;" }
                        }
                        p { class: "batch-panel__status",
                            {t!("batch-progress", current = current, total = total, name = step.person.clone())}
                        }
                    }
                }
                BatchView::Finished(summary) => {
                    let succeeded = summary.succeeded as i64;
                    let total = summary.total as i64;
                    rsx! {
                        p { class: "export-status export-status--success",
                            {t!("batch-done", succeeded = succeeded, total = total)}
                        }
                        if !summary.failed.is_empty() {
                            ul { class: "batch-panel__failures",
                                for failure in summary.failed.iter() {
                                    li { key: "{failure.name}", "{failure.name}: {failure.error}" }
                                }
                            }
                        }
                    }
                }
                BatchView::Failed(message) => rsx! {
                    p { class: "export-status export-status--error",
                        {t!("batch-failed", error = message)}
                    }
                },
            }
        }
    }
}
