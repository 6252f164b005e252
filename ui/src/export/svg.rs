//! SVG serialization of export documents.

use std::fmt::{self, Write};

use crate::radar::curve::num;
use crate::radar::scene::{Node, Shape};

use super::document::ExportDocument;

pub const SVG_MIME: &str = "image/svg+xml";

const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;
const SVG_DOCTYPE: &str = r#"<!DOCTYPE svg PUBLIC "-//W3C//DTD SVG 1.1//EN" "http://www.w3.org/Graphics/SVG/1.1/DTD/svg11.dtd">"#;

/// Escape the five XML special characters for text content and attribute
/// values.
pub fn xml_escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            other => out.push(other),
        }
    }
    out
}

fn write_attr(out: &mut String, name: &str, value: &str) -> fmt::Result {
    write!(out, r#" {name}="{}""#, xml_escape(value))
}

fn write_node(out: &mut String, node: &Node, depth: usize) -> fmt::Result {
    let indent = "  ".repeat(depth);
    let tag = node.shape.tag();
    write!(out, "{indent}<{tag}")?;
    if let Some(id) = &node.id {
        write_attr(out, "id", id)?;
    }
    write_attr(out, "class", node.class.css_class())?;
    for (name, value) in node.shape.attributes() {
        write_attr(out, name, &value)?;
    }
    for (name, value) in node.style.attributes() {
        write_attr(out, name, &value)?;
    }

    match &node.shape {
        Shape::Text { x, lines, .. } => {
            out.push('>');
            for line in lines {
                out.push_str("<tspan");
                write_attr(out, "x", &num(*x))?;
                write_attr(out, "dy", &format!("{}em", num(line.dy_em)))?;
                write!(out, ">{}</tspan>", xml_escape(&line.text))?;
            }
            writeln!(out, "</{tag}>")
        }
        _ if node.children.is_empty() => writeln!(out, "/>"),
        _ => {
            writeln!(out, ">")?;
            for child in &node.children {
                write_node(out, child, depth + 1)?;
            }
            writeln!(out, "{indent}</{tag}>")
        }
    }
}

fn write_document(out: &mut String, doc: &ExportDocument) -> fmt::Result {
    writeln!(out, "{XML_DECLARATION}")?;
    writeln!(out, "{SVG_DOCTYPE}")?;
    let width = num(doc.width);
    let height = num(doc.height);
    writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" version="1.1" width="{width}" height="{height}" viewBox="0 0 {width} {height}">"#,
    )?;
    writeln!(out, "  <title>{}</title>", xml_escape(&doc.title))?;
    write_node(out, &doc.root, 1)?;
    out.push_str("</svg>\n");
    Ok(())
}

/// Complete SVG 1.1 markup for `doc`.
pub fn to_svg_string(doc: &ExportDocument) -> String {
    let mut out = String::new();
    // Writing into a `String` cannot fail.
    let _ = write_document(&mut out, doc);
    out
}

/// UTF-8 bytes of [`to_svg_string`].
pub fn serialize_to_vector(doc: &ExportDocument) -> Vec<u8> {
    to_svg_string(doc).into_bytes()
}
