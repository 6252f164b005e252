//! Typed scene graph for one radar chart.
//!
//! The renderer builds it, the interactive view draws it and the export
//! pipeline deep-copies it. Every node carries a class so style rules and
//! lookups work the same way in all three places.

use crate::radar::curve::num;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeClass {
    Root,
    Grid,
    GridCircle,
    LevelLabel,
    Axes,
    AxisSpoke,
    AxisLabel,
    SeriesWrapper,
    Area,
    Outline,
    Marker,
    // Export decorations.
    Document,
    Background,
    Title,
    Subtitle,
    Legend,
    LegendSwatch,
    LegendLabel,
}

impl NodeClass {
    pub fn css_class(self) -> &'static str {
        match self {
            NodeClass::Root => "radar-chart",
            NodeClass::Grid => "radar-grid",
            NodeClass::GridCircle => "grid-circle",
            NodeClass::LevelLabel => "level-label",
            NodeClass::Axes => "radar-axes",
            NodeClass::AxisSpoke => "axis-line",
            NodeClass::AxisLabel => "axis-label",
            NodeClass::SeriesWrapper => "radar-wrapper",
            NodeClass::Area => "radar-area",
            NodeClass::Outline => "radar-stroke",
            NodeClass::Marker => "radar-circle",
            NodeClass::Document => "export-document",
            NodeClass::Background => "export-background",
            NodeClass::Title => "export-title",
            NodeClass::Subtitle => "export-subtitle",
            NodeClass::Legend => "export-legend",
            NodeClass::LegendSwatch => "legend-swatch",
            NodeClass::LegendLabel => "legend-label",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextLine {
    pub text: String,
    pub dy_em: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Group { translate: Option<(f64, f64)> },
    Circle { cx: f64, cy: f64, r: f64 },
    Line { x1: f64, y1: f64, x2: f64, y2: f64 },
    Path { d: String },
    Rect { x: f64, y: f64, width: f64, height: f64 },
    Text { x: f64, y: f64, lines: Vec<TextLine> },
}

impl Shape {
    pub fn tag(&self) -> &'static str {
        match self {
            Shape::Group { .. } => "g",
            Shape::Circle { .. } => "circle",
            Shape::Line { .. } => "line",
            Shape::Path { .. } => "path",
            Shape::Rect { .. } => "rect",
            Shape::Text { .. } => "text",
        }
    }

    /// Geometry attributes in document order.
    pub fn attributes(&self) -> Vec<(&'static str, String)> {
        match self {
            Shape::Group { translate } => translate
                .map(|(x, y)| vec![("transform", format!("translate({},{})", num(x), num(y)))])
                .unwrap_or_default(),
            Shape::Circle { cx, cy, r } => {
                vec![("cx", num(*cx)), ("cy", num(*cy)), ("r", num(*r))]
            }
            Shape::Line { x1, y1, x2, y2 } => vec![
                ("x1", num(*x1)),
                ("y1", num(*y1)),
                ("x2", num(*x2)),
                ("y2", num(*y2)),
            ],
            Shape::Path { d } => vec![("d", d.clone())],
            Shape::Rect {
                x,
                y,
                width,
                height,
            } => vec![
                ("x", num(*x)),
                ("y", num(*y)),
                ("width", num(*width)),
                ("height", num(*height)),
            ],
            Shape::Text { x, y, .. } => vec![("x", num(*x)), ("y", num(*y))],
        }
    }
}

/// Presentation properties. `None` means "not set here".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Style {
    pub fill: Option<String>,
    pub stroke: Option<String>,
    pub stroke_width: Option<f64>,
    pub fill_opacity: Option<f64>,
    pub stroke_opacity: Option<f64>,
    pub opacity: Option<f64>,
    pub font_family: Option<String>,
    pub font_size: Option<f64>,
    pub font_weight: Option<String>,
    pub text_anchor: Option<String>,
}

impl Style {
    /// Fields set on `self` win; the rest come from `base`.
    pub fn over(&self, base: &Style) -> Style {
        Style {
            fill: self.fill.clone().or_else(|| base.fill.clone()),
            stroke: self.stroke.clone().or_else(|| base.stroke.clone()),
            stroke_width: self.stroke_width.or(base.stroke_width),
            fill_opacity: self.fill_opacity.or(base.fill_opacity),
            stroke_opacity: self.stroke_opacity.or(base.stroke_opacity),
            opacity: self.opacity.or(base.opacity),
            font_family: self.font_family.clone().or_else(|| base.font_family.clone()),
            font_size: self.font_size.or(base.font_size),
            font_weight: self.font_weight.clone().or_else(|| base.font_weight.clone()),
            text_anchor: self.text_anchor.clone().or_else(|| base.text_anchor.clone()),
        }
    }

    /// SVG presentation attributes, in a stable order.
    pub fn attributes(&self) -> Vec<(&'static str, String)> {
        let mut attrs = Vec::new();
        if let Some(fill) = &self.fill {
            attrs.push(("fill", fill.clone()));
        }
        if let Some(stroke) = &self.stroke {
            attrs.push(("stroke", stroke.clone()));
        }
        if let Some(width) = self.stroke_width {
            attrs.push(("stroke-width", format!("{}px", num(width))));
        }
        if let Some(value) = self.fill_opacity {
            attrs.push(("fill-opacity", num(value)));
        }
        if let Some(value) = self.stroke_opacity {
            attrs.push(("stroke-opacity", num(value)));
        }
        if let Some(value) = self.opacity {
            attrs.push(("opacity", num(value)));
        }
        if let Some(family) = &self.font_family {
            attrs.push(("font-family", family.clone()));
        }
        if let Some(size) = self.font_size {
            attrs.push(("font-size", format!("{}px", num(size))));
        }
        if let Some(weight) = &self.font_weight {
            attrs.push(("font-weight", weight.clone()));
        }
        if let Some(anchor) = &self.text_anchor {
            attrs.push(("text-anchor", anchor.clone()));
        }
        attrs
    }

    /// Inline CSS for the live view.
    pub fn css(&self) -> String {
        self.attributes()
            .into_iter()
            .map(|(name, value)| format!("{name}:{value};"))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: Option<String>,
    pub class: NodeClass,
    /// Index of the series this node belongs to, if any.
    pub series: Option<usize>,
    /// Axis index for per-axis nodes (markers).
    pub axis: Option<usize>,
    pub shape: Shape,
    pub style: Style,
    pub children: Vec<Node>,
}

impl Node {
    pub fn new(class: NodeClass, shape: Shape) -> Self {
        Self {
            id: None,
            class,
            series: None,
            axis: None,
            shape,
            style: Style::default(),
            children: Vec::new(),
        }
    }

    pub fn group(class: NodeClass) -> Self {
        Self::new(class, Shape::Group { translate: None })
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_series(mut self, series: usize) -> Self {
        self.series = Some(series);
        self
    }

    pub fn with_axis(mut self, axis: usize) -> Self {
        self.axis = Some(axis);
        self
    }

    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    pub fn push(&mut self, child: Node) {
        self.children.push(child);
    }

    /// Depth-first, self included.
    pub fn walk<'a>(&'a self, visit: &mut dyn FnMut(&'a Node)) {
        visit(self);
        for child in &self.children {
            child.walk(visit);
        }
    }

    pub fn walk_mut(&mut self, visit: &mut dyn FnMut(&mut Node)) {
        visit(self);
        for child in &mut self.children {
            child.walk_mut(visit);
        }
    }

    pub fn count(&self, class: NodeClass) -> usize {
        let mut count = 0;
        self.walk(&mut |node| {
            if node.class == class {
                count += 1;
            }
        });
        count
    }

    pub fn find_all(&self, class: NodeClass) -> Vec<&Node> {
        let mut found = Vec::new();
        self.walk(&mut |node| {
            if node.class == class {
                found.push(node);
            }
        });
        found
    }

    pub fn find_by_id(&self, id: &str) -> Option<&Node> {
        let mut found = None;
        self.walk(&mut |node| {
            if found.is_none() && node.id.as_deref() == Some(id) {
                found = Some(node);
            }
        });
        found
    }

    pub fn ids(&self) -> Vec<&str> {
        let mut ids = Vec::new();
        self.walk(&mut |node| {
            if let Some(id) = node.id.as_deref() {
                ids.push(id);
            }
        });
        ids
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SeriesMeta {
    pub name: String,
    pub color: String,
}

/// A mounted chart: the root group plus the outer canvas size.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    /// Accessible name, usually the person the chart is about.
    pub label: String,
    pub width: f64,
    pub height: f64,
    pub root: Node,
    pub series: Vec<SeriesMeta>,
}

/// Class-level style rules, the equivalent of the page stylesheet.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Stylesheet {
    rules: Vec<(NodeClass, Style)>,
}

impl Stylesheet {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_rule(mut self, class: NodeClass, style: Style) -> Self {
        self.rules.push((class, style));
        self
    }

    /// Later rules override earlier ones for the same class.
    pub fn rule_for(&self, class: NodeClass) -> Style {
        self.rules
            .iter()
            .filter(|(c, _)| *c == class)
            .fold(Style::default(), |acc, (_, style)| style.over(&acc))
    }

    /// Inline style over the class rule.
    pub fn computed(&self, node: &Node) -> Style {
        node.style.over(&self.rule_for(node.class))
    }
}

/// Rules matching the app's `main.css` for chart elements.
pub fn default_stylesheet() -> Stylesheet {
    let text = Style {
        font_family: Some(crate::radar::fonts::DEFAULT_FONT_FAMILY.to_string()),
        ..Style::default()
    };
    Stylesheet::empty()
        .with_rule(NodeClass::AxisLabel, text.clone())
        .with_rule(NodeClass::LevelLabel, text.clone())
        .with_rule(
            NodeClass::LegendLabel,
            Style {
                font_size: Some(14.0),
                fill: Some("#333".into()),
                ..text
            },
        )
}
