//! PNG rendering of export documents.
//!
//! Web builds decode the SVG through an `<img>` and paint it onto an
//! offscreen canvas. Desktop builds rasterize with resvg into a tiny-skia
//! pixmap and encode with `png`.

use crate::core::error::{ChartError, ChartResult};

use super::document::ExportDocument;
use super::svg::to_svg_string;

pub const PNG_MIME: &str = "image/png";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RasterOptions {
    /// Supersampling factor applied to both axes.
    pub scale: f32,
    /// Encoder quality hint in `[0, 1]`.
    pub quality: f32,
}

impl Default for RasterOptions {
    fn default() -> Self {
        Self {
            scale: 2.0,
            quality: 0.95,
        }
    }
}

impl RasterOptions {
    pub fn pixel_size(&self, doc: &ExportDocument) -> (u32, u32) {
        let scale = f64::from(self.scale);
        (
            (doc.width * scale).ceil().max(1.0) as u32,
            (doc.height * scale).ceil().max(1.0) as u32,
        )
    }
}

/// Renders `doc` onto an opaque white canvas and returns PNG bytes.
///
/// Decode or parse failures are reported as [`ChartError::Render`] and
/// never retried.
pub async fn serialize_to_raster(doc: &ExportDocument, options: RasterOptions) -> ChartResult<Vec<u8>> {
    let markup = to_svg_string(doc);
    let (width, height) = options.pixel_size(doc);

    #[cfg(target_arch = "wasm32")]
    {
        rasterize_web(&markup, width, height, options).await
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        rasterize_native(&markup, width, height, options)
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn system_fonts() -> std::sync::Arc<usvg::fontdb::Database> {
    use std::sync::Arc;

    use once_cell::sync::Lazy;

    static FONTS: Lazy<Arc<usvg::fontdb::Database>> = Lazy::new(|| {
        let mut db = usvg::fontdb::Database::new();
        db.load_system_fonts();
        db.set_sans_serif_family("Arial");
        tracing::debug!(faces = db.len(), "system fonts loaded for export");
        Arc::new(db)
    });

    FONTS.clone()
}

#[cfg(not(target_arch = "wasm32"))]
fn rasterize_native(markup: &str, width: u32, height: u32, options: RasterOptions) -> ChartResult<Vec<u8>> {
    let mut parse_options = usvg::Options::default();
    parse_options.fontdb = system_fonts();
    let tree = usvg::Tree::from_str(markup, &parse_options)
        .map_err(|err| ChartError::render(format!("SVG parse failed: {err}")))?;

    let mut pixmap = tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| ChartError::render(format!("cannot allocate {width}x{height} canvas")))?;
    pixmap.fill(tiny_skia::Color::WHITE);
    resvg::render(
        &tree,
        tiny_skia::Transform::from_scale(options.scale, options.scale),
        &mut pixmap.as_mut(),
    );

    // Opaque background: premultiplied and straight RGBA coincide.
    let mut buffer = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut buffer, width, height);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        encoder.set_compression(if options.quality >= 0.9 {
            png::Compression::Best
        } else {
            png::Compression::Default
        });
        encoder
            .write_header()
            .map_err(|err| ChartError::render(err.to_string()))?
            .write_image_data(pixmap.data())
            .map_err(|err| ChartError::render(err.to_string()))?;
    }
    Ok(buffer)
}

#[cfg(target_arch = "wasm32")]
async fn rasterize_web(markup: &str, width: u32, height: u32, options: RasterOptions) -> ChartResult<Vec<u8>> {
    use base64::Engine;
    use wasm_bindgen::{JsCast, JsValue};
    use wasm_bindgen_futures::JsFuture;
    use web_sys::{Blob, BlobPropertyBag, CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement, Url};

    let fail = |what: &str| ChartError::render(what.to_string());

    let mut opts = BlobPropertyBag::new();
    opts.type_("image/svg+xml;charset=utf-8");
    let parts = js_sys::Array::new();
    parts.push(&JsValue::from_str(markup));
    let blob = Blob::new_with_str_sequence_and_options(&parts, &opts)
        .map_err(|_| fail("Unable to build SVG blob"))?;
    let url = Url::create_object_url_with_blob(&blob).map_err(|_| fail("Unable to create SVG URL"))?;

    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| fail("Document unavailable"))?;

    let canvas: HtmlCanvasElement = document
        .create_element("canvas")
        .map_err(|_| fail("Unable to create canvas"))?
        .dyn_into()
        .map_err(|_| fail("Canvas cast failed"))?;
    canvas.set_width(width);
    canvas.set_height(height);

    let context: CanvasRenderingContext2d = canvas
        .get_context("2d")
        .map_err(|_| fail("Canvas context unavailable"))?
        .ok_or_else(|| fail("Canvas context missing"))?
        .dyn_into()
        .map_err(|_| fail("Context cast failed"))?;

    #[allow(deprecated)]
    context.set_fill_style(&JsValue::from_str("white"));
    context.fill_rect(0.0, 0.0, f64::from(width), f64::from(height));
    context
        .scale(f64::from(options.scale), f64::from(options.scale))
        .map_err(|_| fail("Unable to scale canvas"))?;

    let image = HtmlImageElement::new().map_err(|_| fail("Unable to create image"))?;
    let decode = image.decode();
    image.set_src(&url);
    let decoded = JsFuture::from(decode).await;
    Url::revoke_object_url(&url).ok();
    decoded.map_err(|_| fail("Image decode failed"))?;

    context
        .draw_image_with_html_image_element(&image, 0.0, 0.0)
        .map_err(|_| fail("Unable to draw image"))?;

    let data_url = canvas
        .to_data_url_with_type_and_encoder_options(PNG_MIME, &JsValue::from_f64(f64::from(options.quality)))
        .map_err(|_| fail("Unable to serialise canvas"))?;
    let payload = data_url.split(',').nth(1).ok_or_else(|| fail("Malformed data URL"))?;
    base64::engine::general_purpose::STANDARD
        .decode(payload)
        .map_err(|_| fail("PNG decode failed"))
}
