use dioxus::prelude::*;

use crate::batch::BatchExportPanel;
use crate::core::settings::AppSettings;
use crate::t;

#[component]
pub fn Batch() -> Element {
    let settings = try_use_context::<AppSettings>().unwrap_or_else(AppSettings::detect);

    rsx! {
        section { class: "page page-batch",
            h1 { {t!("batch-page-title")} }
            BatchExportPanel { settings }
        }
    }
}
