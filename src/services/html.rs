use std::fmt::Write as _;

use crate::model::document::Document;
use crate::model::table::{Cell, Highlight, Row};

/// Escape text for HTML attributes and content.
fn esc(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Renders every table of the document, in id order.
pub fn render(doc: &Document) -> String {
    let mut out = String::new();

    for (id, table) in &doc.tables {
        let _ = writeln!(out, "<table id=\"{}\">", esc(id));
        if let Some(body) = &table.tbody {
            out.push_str("<tbody>\n");
            for row in &body.rows {
                render_row(&mut out, row);
            }
            out.push_str("</tbody>\n");
        }
        out.push_str("</table>\n");
    }

    out
}

fn render_row(out: &mut String, row: &Row) {
    out.push_str("<tr");
    if let Some(key) = &row.key {
        let _ = write!(out, " data-key=\"{}\"", esc(key));
    }
    if row.highlight == Highlight::Missing {
        out.push_str(" class=\"missing\"");
    }
    out.push('>');

    for cell in &row.cells {
        match cell {
            Cell::Text { text } => {
                let _ = write!(out, "<td>{}</td>", esc(text));
            }
            Cell::Link { text, file } => {
                let _ = write!(
                    out,
                    "<td><a href=\"#\" data-file=\"{}\">{}</a></td>",
                    esc(file),
                    esc(text)
                );
            }
            Cell::Input { value } => {
                let _ = write!(
                    out,
                    "<td><input type=\"text\" class=\"value-field\" value=\"{}\"></td>",
                    esc(value)
                );
            }
        }
    }

    out.push_str("</tr>\n");
}
