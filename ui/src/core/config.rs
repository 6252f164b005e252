//! Radar chart configuration and the presets used by the app.

use serde::{Deserialize, Serialize};

use super::error::{ChartError, ChartResult};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Margin {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Margin {
    pub const fn new(top: f64, right: f64, bottom: f64, left: f64) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }
}

/// Ordinal color scale: series `i` gets `colors[i % len]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Palette(pub Vec<String>);

impl Palette {
    pub fn color_for(&self, index: usize) -> &str {
        if self.0.is_empty() {
            return FALLBACK_COLOR;
        }
        &self.0[index % self.0.len()]
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self(vec!["#3498db".to_string(), "#27ae60".to_string()])
    }
}

const FALLBACK_COLOR: &str = "#333333";

/// Everything the geometry engine and renderer need for one chart.
///
/// A render never mutates its config; re-rendering with other settings
/// means building a new value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    pub width: f64,
    pub height: f64,
    pub margin: Margin,
    pub levels: u32,
    pub max_value: f64,
    pub label_factor: f64,
    pub wrap_width: f64,
    pub opacity_area: f64,
    pub dot_radius: f64,
    pub stroke_width: f64,
    pub round_strokes: bool,
    pub palette: Palette,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width: 600.0,
            height: 600.0,
            margin: Margin::new(20.0, 20.0, 20.0, 20.0),
            levels: 4,
            max_value: 4.0,
            label_factor: 1.35,
            wrap_width: 80.0,
            opacity_area: 0.35,
            dot_radius: 5.0,
            stroke_width: 2.0,
            round_strokes: false,
            palette: Palette::default(),
        }
    }
}

impl ChartConfig {
    /// On-page chart, `size` being the square plot size in px.
    pub fn interactive(size: f64) -> Self {
        Self {
            width: size,
            height: size,
            margin: Margin::new(60.0, 100.0, 60.0, 100.0),
            levels: 5,
            max_value: 5.0,
            label_factor: 1.3,
            wrap_width: 80.0,
            opacity_area: 0.35,
            dot_radius: 4.0,
            stroke_width: 2.0,
            round_strokes: false,
            palette: Palette::default(),
        }
    }

    /// Off-screen chart rendered for batch exports.
    pub fn batch() -> Self {
        Self {
            margin: Margin::new(100.0, 200.0, 100.0, 200.0),
            wrap_width: 120.0,
            ..Self::interactive(600.0)
        }
    }

    /// Plot size for the interactive chart given the container width and
    /// viewport height.
    pub fn interactive_size(container_width: f64, viewport_height: f64) -> f64 {
        let container_width = if container_width > 0.0 {
            container_width
        } else {
            600.0
        };
        let max_width = (container_width * 0.9).min(600.0);
        max_width.min(viewport_height * 0.6)
    }

    pub fn outer_width(&self) -> f64 {
        self.width + self.margin.left + self.margin.right
    }

    pub fn outer_height(&self) -> f64 {
        self.height + self.margin.top + self.margin.bottom
    }

    pub fn radius(&self) -> f64 {
        (self.width / 2.0).min(self.height / 2.0)
    }

    pub fn validate(&self) -> ChartResult<()> {
        let finite_positive = |name: &str, value: f64| {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(ChartError::config(format!("{name} must be finite and > 0 (got {value})")))
            }
        };
        let finite_non_negative = |name: &str, value: f64| {
            if value.is_finite() && value >= 0.0 {
                Ok(())
            } else {
                Err(ChartError::config(format!("{name} must be finite and >= 0 (got {value})")))
            }
        };

        finite_positive("width", self.width)?;
        finite_positive("height", self.height)?;
        finite_positive("max_value", self.max_value)?;
        finite_positive("wrap_width", self.wrap_width)?;
        for (name, value) in [
            ("margin.top", self.margin.top),
            ("margin.right", self.margin.right),
            ("margin.bottom", self.margin.bottom),
            ("margin.left", self.margin.left),
            ("dot_radius", self.dot_radius),
            ("stroke_width", self.stroke_width),
        ] {
            finite_non_negative(name, value)?;
        }
        if self.levels == 0 {
            return Err(ChartError::config("levels must be at least 1"));
        }
        if !self.label_factor.is_finite() || self.label_factor < 1.0 {
            return Err(ChartError::config(format!(
                "label_factor must be >= 1 (got {})",
                self.label_factor
            )));
        }
        if !(0.0..=1.0).contains(&self.opacity_area) {
            return Err(ChartError::config(format!(
                "opacity_area must be in [0, 1] (got {})",
                self.opacity_area
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_are_valid() {
        assert!(ChartConfig::default().validate().is_ok());
        assert!(ChartConfig::interactive(420.0).validate().is_ok());
        assert!(ChartConfig::batch().validate().is_ok());
    }

    #[test]
    fn batch_preset_widens_margins() {
        let batch = ChartConfig::batch();
        assert_eq!(batch.outer_width(), 1000.0);
        assert_eq!(batch.outer_height(), 800.0);
        assert_eq!(batch.wrap_width, 120.0);
        assert_eq!(batch.levels, 5);
    }

    #[test]
    fn zero_max_value_is_rejected() {
        let config = ChartConfig {
            max_value: 0.0,
            ..ChartConfig::default()
        };
        assert!(matches!(config.validate(), Err(ChartError::Config(_))));
    }

    #[test]
    fn out_of_range_opacity_is_rejected() {
        let config = ChartConfig {
            opacity_area: 1.5,
            ..ChartConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn palette_cycles() {
        let palette = Palette::default();
        assert_eq!(palette.color_for(0), "#3498db");
        assert_eq!(palette.color_for(1), "#27ae60");
        assert_eq!(palette.color_for(2), "#3498db");
        assert_eq!(Palette(Vec::new()).color_for(3), "#333333");
    }

    #[test]
    fn interactive_size_is_capped() {
        assert_eq!(ChartConfig::interactive_size(2000.0, 2000.0), 600.0);
        assert_eq!(ChartConfig::interactive_size(400.0, 2000.0), 360.0);
        assert_eq!(ChartConfig::interactive_size(0.0, 500.0), 300.0);
    }

    #[test]
    fn partial_json_overrides_defaults() {
        let config: ChartConfig =
            serde_json::from_str(r#"{ "levels": 3, "round_strokes": true }"#).unwrap();
        assert_eq!(config.levels, 3);
        assert!(config.round_strokes);
        assert_eq!(config.max_value, 4.0);
    }
}
