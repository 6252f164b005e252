//! Text measurement for label wrapping and export layout.
//!
//! Layout code only needs advance widths. Native builds and tests use a
//! deterministic per-glyph table tuned on Arial/Helvetica; web builds ask the
//! browser through a 2D canvas context so wrapping matches what gets drawn.

use std::fmt;

pub const DEFAULT_FONT_FAMILY: &str = "Arial, sans-serif";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FontWeight {
    Regular,
    Medium,
    Bold,
}

impl FontWeight {
    pub fn css_value(self) -> &'static str {
        match self {
            FontWeight::Regular => "400",
            FontWeight::Medium => "500",
            FontWeight::Bold => "bold",
        }
    }
}

impl fmt::Display for FontWeight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.css_value())
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FontSpec {
    pub size_px: f64,
    pub weight: FontWeight,
}

impl FontSpec {
    pub const fn new(size_px: f64, weight: FontWeight) -> Self {
        Self { size_px, weight }
    }

    /// Axis labels: 12px, weight 500.
    pub const fn axis_label() -> Self {
        Self::new(12.0, FontWeight::Medium)
    }

    /// CSS `font` shorthand, as understood by canvas contexts.
    pub fn css_font(&self) -> String {
        format!(
            "{} {}px {}",
            self.weight.css_value(),
            self.size_px,
            DEFAULT_FONT_FAMILY
        )
    }
}

pub trait TextMeasure {
    /// Rendered advance width of `text` in px.
    fn text_width(&self, text: &str, font: FontSpec) -> f64;
}

/// Table-driven widths in em units. Close enough to Arial for wrapping
/// decisions and fully deterministic.
#[derive(Clone, Copy, Debug, Default)]
pub struct HeuristicMeasure;

fn glyph_advance(ch: char) -> f64 {
    match ch {
        'i' | 'j' | 'l' | '.' | ',' | ':' | ';' | '\'' | '!' | '|' => 0.24,
        ' ' | 'f' | 't' | 'I' | '(' | ')' | '[' | ']' | '/' | '-' => 0.30,
        'r' => 0.34,
        'm' | 'w' => 0.83,
        'M' | 'W' | '@' => 0.88,
        '0'..='9' => 0.556,
        'A'..='Z' => 0.68,
        'a'..='z' => 0.53,
        c if c.is_whitespace() => 0.30,
        c if c.is_alphabetic() => 0.6,
        _ => 0.58,
    }
}

impl TextMeasure for HeuristicMeasure {
    fn text_width(&self, text: &str, font: FontSpec) -> f64 {
        let ems: f64 = text.chars().map(glyph_advance).sum();
        let weight = match font.weight {
            FontWeight::Regular => 1.0,
            FontWeight::Medium => 1.03,
            FontWeight::Bold => 1.07,
        };
        ems * font.size_px * weight
    }
}

impl<T: TextMeasure + ?Sized> TextMeasure for &T {
    fn text_width(&self, text: &str, font: FontSpec) -> f64 {
        (**self).text_width(text, font)
    }
}

/// Browser-backed measurement through an offscreen canvas.
#[cfg(target_arch = "wasm32")]
pub struct CanvasMeasure {
    context: Option<web_sys::CanvasRenderingContext2d>,
}

#[cfg(target_arch = "wasm32")]
impl CanvasMeasure {
    pub fn new() -> Self {
        use wasm_bindgen::JsCast;

        let context = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|doc| doc.create_element("canvas").ok())
            .and_then(|el| el.dyn_into::<web_sys::HtmlCanvasElement>().ok())
            .and_then(|canvas| canvas.get_context("2d").ok().flatten())
            .and_then(|ctx| ctx.dyn_into::<web_sys::CanvasRenderingContext2d>().ok());
        if context.is_none() {
            tracing::warn!("canvas text measurement unavailable; using glyph table");
        }
        Self { context }
    }
}

#[cfg(target_arch = "wasm32")]
impl Default for CanvasMeasure {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(target_arch = "wasm32")]
impl TextMeasure for CanvasMeasure {
    fn text_width(&self, text: &str, font: FontSpec) -> f64 {
        if let Some(context) = &self.context {
            context.set_font(&font.css_font());
            if let Ok(measured) = context.measure_text(text) {
                return measured.width();
            }
        }
        HeuristicMeasure.text_width(text, font)
    }
}

/// The measurer the running platform should use.
pub fn platform_measure() -> Box<dyn TextMeasure> {
    #[cfg(target_arch = "wasm32")]
    {
        Box::new(CanvasMeasure::new())
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        Box::new(HeuristicMeasure)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn width_scales_with_size_and_length() {
        let m = HeuristicMeasure;
        let twelve = m.text_width("Leadership", FontSpec::new(12.0, FontWeight::Regular));
        let twenty_four = m.text_width("Leadership", FontSpec::new(24.0, FontWeight::Regular));
        assert!((twenty_four - 2.0 * twelve).abs() < 1e-9);
        assert!(m.text_width("Lead", FontSpec::axis_label()) < m.text_width("Leadership", FontSpec::axis_label()));
        assert_eq!(m.text_width("", FontSpec::axis_label()), 0.0);
    }

    #[test]
    fn bold_is_wider() {
        let m = HeuristicMeasure;
        let regular = m.text_width("Team", FontSpec::new(14.0, FontWeight::Regular));
        let bold = m.text_width("Team", FontSpec::new(14.0, FontWeight::Bold));
        assert!(bold > regular);
    }

    #[test]
    fn css_font_shorthand() {
        assert_eq!(FontSpec::axis_label().css_font(), "500 12px Arial, sans-serif");
    }
}
