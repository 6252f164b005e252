//! Delivering exported bytes to the user.

use crate::core::error::{ChartError, ChartResult};

use super::pipeline::ExportArtifact;

/// Hands a file to the user: a browser download on the web, a file under
/// the app data directory on desktop. Returns the saved path when there is
/// one.
pub async fn download_bytes(filename: &str, mime: &str, bytes: &[u8]) -> ChartResult<Option<String>> {
    #[cfg(target_arch = "wasm32")]
    {
        use wasm_bindgen::JsCast;
        use web_sys::{Blob, BlobPropertyBag, HtmlAnchorElement, Url};

        let fail = |what: &str| ChartError::render(what.to_string());

        let array = js_sys::Uint8Array::from(bytes);
        let parts = js_sys::Array::new();
        parts.push(&array.buffer());

        let mut opts = BlobPropertyBag::new();
        opts.type_(mime);
        let blob = Blob::new_with_u8_array_sequence_and_options(&parts, &opts)
            .map_err(|_| fail("Failed to create blob"))?;
        let url = Url::create_object_url_with_blob(&blob).map_err(|_| fail("Unable to create download"))?;

        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| fail("Document unavailable"))?;
        let anchor: HtmlAnchorElement = document
            .create_element("a")
            .map_err(|_| fail("Unable to create anchor"))?
            .dyn_into()
            .map_err(|_| fail("Anchor cast failed"))?;
        anchor.set_href(&url);
        anchor.set_download(filename);
        anchor.style().set_property("display", "none").ok();

        document
            .body()
            .ok_or_else(|| fail("Missing body"))?
            .append_child(&anchor)
            .ok();
        anchor.click();
        anchor.remove();
        Url::revoke_object_url(&url).ok();

        tracing::info!(filename, bytes = bytes.len(), "download started");
        Ok(None)
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        use std::fs;

        let _ = mime;
        let dir = desktop_export_dir()?;
        fs::create_dir_all(&dir).map_err(|err| ChartError::render(err.to_string()))?;
        let path = dir.join(filename);
        fs::write(&path, bytes).map_err(|err| ChartError::render(err.to_string()))?;
        let path = path.to_string_lossy().to_string();
        tracing::info!(path = %path, bytes = bytes.len(), "export saved");
        Ok(Some(path))
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub fn desktop_export_dir() -> ChartResult<std::path::PathBuf> {
    let dirs = directories::ProjectDirs::from("com", "FeedbackRadar", "FeedbackRadar")
        .ok_or_else(|| ChartError::render("Unable to determine export directory"))?;
    Ok(dirs.data_dir().join("exports"))
}

/// Where finished artifacts go. The batch controller only talks to this.
#[allow(async_fn_in_trait)]
pub trait DownloadSink {
    async fn deliver(&mut self, artifact: &ExportArtifact) -> ChartResult<Option<String>>;
}

/// The platform download path of [`download_bytes`].
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserDownloads;

impl DownloadSink for BrowserDownloads {
    async fn deliver(&mut self, artifact: &ExportArtifact) -> ChartResult<Option<String>> {
        download_bytes(&artifact.filename, &artifact.mime, &artifact.bytes).await
    }
}
