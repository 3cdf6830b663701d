//! Debug rendering of documents and widget tables.

use std::fmt::Write;

use comfy_table::{Cell, Color, ContentArrangement, Table, presets::UTF8_FULL};

use crate::{
    NodeId,
    core::{dom::Document, page::Page},
    error::{Error, Result},
};

/// Render a subtree as indented markup-like lines: tag, attributes, classes,
/// inline style and text.
pub fn dump(doc: &Document, root: NodeId) -> Result<String> {
    let mut out = String::new();
    dump_node(&mut out, doc, root, 0)?;
    Ok(out)
}

/// Write one element and recurse into its children.
fn dump_node(out: &mut String, doc: &Document, id: NodeId, level: usize) -> Result<()> {
    let el = doc.el(id)?;
    let indent = "  ".repeat(level);
    let mut line = format!("{indent}<{}", el.tag());
    for (k, v) in el.attrs() {
        let r = if v.is_empty() {
            write!(line, " {k}")
        } else {
            write!(line, " {k}=\"{v}\"")
        };
        r.map_err(|e| Error::Internal(e.to_string()))?;
    }
    if !el.classes().is_empty() {
        write!(line, " class=\"{}\"", el.classes().join(" "))
            .map_err(|e| Error::Internal(e.to_string()))?;
    }
    let style: Vec<String> = el.styles().map(|(k, v)| format!("{k}: {v}")).collect();
    if !style.is_empty() {
        write!(line, " style=\"{}\"", style.join("; "))
            .map_err(|e| Error::Internal(e.to_string()))?;
    }
    line.push('>');
    if !el.text().is_empty() {
        line.push_str(el.text());
    }
    if doc.active() == Some(id) {
        line.push_str("  *");
    }
    writeln!(out, "{line}").map_err(|e| Error::Internal(e.to_string()))?;
    for c in el.children() {
        dump_node(out, doc, *c, level + 1)?;
    }
    Ok(())
}

/// A short description of an element: tag plus id or first class.
pub fn describe(doc: &Document, id: NodeId) -> String {
    let Some(el) = doc.get(id) else {
        return "<gone>".into();
    };
    match (el.attr("id"), el.classes().first()) {
        (Some(i), _) => format!("{}#{i}", el.tag()),
        (None, Some(c)) => format!("{}.{c}", el.tag()),
        (None, None) => el.tag().to_string(),
    }
}

/// A table of connected widgets in document order.
pub fn widget_table(page: &Page) -> String {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["widget", "root"]);
    for id in page.widget_ids() {
        if let Some((root, label)) = page.widget_info(id) {
            table.add_row(vec![
                Cell::new(label).fg(Color::Green),
                Cell::new(describe(page.doc(), root)),
            ]);
        }
    }
    table.to_string()
}
