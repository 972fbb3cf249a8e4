//! Plain-text rendering of a synthesized form

use std::fmt::{self, Write};

use super::generator::FieldNode;
use super::operation::OperationForm;

const INDENT: &str = "  ";

/// Render a form as an indented outline, one line per node.
///
/// Scalars show their enable toggle (`[x]`/`[ ]`, `[*]` when required), the
/// identifier, the control kind and the raw value. Containers show their
/// kind; error markers start with `!`.
pub fn render_outline(form: &OperationForm) -> String {
    form.to_string()
}

/// Write the outline of `form` into any formatter sink
pub fn write_outline<W: Write>(out: &mut W, form: &OperationForm) -> fmt::Result {
    match &form.summary {
        Some(summary) => writeln!(out, "{} - {}", form.id, summary)?,
        None => writeln!(out, "{}", form.id)?,
    }
    for field in &form.fields {
        write_node(out, field, 1)?;
    }
    Ok(())
}

impl fmt::Display for OperationForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_outline(f, self)
    }
}

fn write_node<W: Write>(out: &mut W, node: &FieldNode, depth: usize) -> fmt::Result {
    let indent = INDENT.repeat(depth);
    match node {
        FieldNode::Scalar(field) => {
            let toggle = if field.is_required() {
                "[*]"
            } else if field.is_enabled() {
                "[x]"
            } else {
                "[ ]"
            };
            writeln!(
                out,
                "{}{} {} <{}> = {:?}",
                indent,
                toggle,
                field.id,
                field.kind(),
                field.raw_value()
            )?;
        }
        FieldNode::Object(object) => match &object.definition_name {
            Some(name) => writeln!(out, "{}{} <object {}>", indent, object.id, name)?,
            None => writeln!(out, "{}{} <object>", indent, object.id)?,
        },
        FieldNode::Array(array) => {
            let format = array
                .collection_format
                .map(|f| format!(" {}", f.as_str()))
                .unwrap_or_default();
            writeln!(
                out,
                "{}{} <array{}> {} item(s) [{}]",
                indent,
                array.id,
                format,
                array.len(),
                array.appender.label()
            )?;
        }
        FieldNode::Error(marker) => writeln!(out, "{}! {}", indent, marker.message())?,
    }

    for child in node.children() {
        write_node(out, &child, depth + 1)?;
    }
    Ok(())
}
