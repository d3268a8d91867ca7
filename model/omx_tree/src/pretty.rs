//! Indented rendering of element trees.
//!
//! Used by `Display` on [`Element`] and by diagnostics that quote a
//! fragment of the document. Output is stable: fields print in insertion
//! order, one per line, children indented two spaces.

use std::fmt::{self, Write as _};

use crate::{Element, Value};

/// Render an element tree as an indented block.
pub fn pretty(element: &Element) -> String {
    let mut out = String::new();
    // Writing to a String cannot fail.
    let _ = write_element(&mut out, element, 0);
    out
}

fn write_element(out: &mut String, element: &Element, depth: usize) -> fmt::Result {
    write_indent(out, depth)?;
    writeln!(out, "{}:", element.name)?;
    for (name, value) in element.fields.iter() {
        write_field(out, name, value, depth + 1)?;
    }
    Ok(())
}

fn write_field(out: &mut String, name: &str, value: &Value, depth: usize) -> fmt::Result {
    match value {
        Value::Element(child) => {
            write_indent(out, depth)?;
            writeln!(out, "{name}:")?;
            for (child_name, child_value) in child.fields.iter() {
                write_field(out, child_name, child_value, depth + 1)?;
            }
            Ok(())
        }
        Value::List(items) => {
            write_indent(out, depth)?;
            writeln!(out, "{name}: [{}]", items.len())?;
            for item in items {
                match item {
                    Value::Element(child) => write_element(out, child, depth + 1)?,
                    other => {
                        write_indent(out, depth + 1)?;
                        writeln!(out, "- {}", scalar(other))?;
                    }
                }
            }
            Ok(())
        }
        other => {
            write_indent(out, depth)?;
            writeln!(out, "{name}: {}", scalar(other))
        }
    }
}

fn scalar(value: &Value) -> String {
    match value {
        Value::Bool(b) => b.to_string(),
        Value::Int(i) => i.to_string(),
        Value::Float(x) => x.to_string(),
        Value::Str(s) => s.clone(),
        Value::Element(el) => format!("<{}>", el.name),
        Value::List(items) => format!("[{}]", items.len()),
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(pretty(self).trim_end())
    }
}

fn write_indent(out: &mut String, depth: usize) -> fmt::Result {
    for _ in 0..depth {
        out.push_str("  ");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn renders_nested_fields() {
        let el = Element::new("Image")
            .with_field("id", "Image:0")
            .with_field(
                "pixels",
                Element::new("Pixels")
                    .with_field("id", "Pixels:0")
                    .with_field("size_x", 64),
            );
        let text = pretty(&el);
        assert_eq!(
            text,
            "Image:\n  id: Image:0\n  pixels:\n    id: Pixels:0\n    size_x: 64\n"
        );
    }

    #[test]
    fn renders_list_counts_and_items() {
        let el = Element::new("ROI").with_field(
            "union",
            vec![
                Value::Element(Element::new("Point").with_field("x", 1.0)),
                Value::Element(Element::new("Label").with_field("text", "t")),
            ],
        );
        let text = pretty(&el);
        assert!(text.contains("union: [2]"));
        assert!(text.contains("  Point:"));
        assert!(text.contains("  Label:"));
    }

    #[test]
    fn display_trims_trailing_newline() {
        let el = Element::new("Project").with_field("id", "Project:1");
        assert_eq!(el.to_string(), "Project:\n  id: Project:1");
    }
}
