use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::model::schema::SchemaRow;
use crate::services::schema::EOF_KEY;

pub const NO_AUTHORS: &str = "No authors";

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq, Default)]
pub struct Coverage {
    pub filled: usize,
    pub total: usize,
}

impl Coverage {
    /// Percentage in tenths, ties rounded up. Integer arithmetic keeps
    /// exact ties such as 1/400 = 0.25% from drifting either way.
    pub fn tenths(&self) -> usize {
        if self.total == 0 {
            1000
        } else {
            (self.filled * 2000 + self.total) / (2 * self.total)
        }
    }
}

impl fmt::Display for Coverage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let t = self.tenths();
        write!(f, "{}.{}%", t / 10, t % 10)
    }
}

/// Counts template leaves and how many of them `content` fills with a
/// non-empty string.
pub fn compute_coverage(content: &Value, template: &Value) -> Coverage {
    let mut cov = Coverage::default();
    let empty = Map::new();
    let content = content.as_object().unwrap_or(&empty);
    if let Some(template) = template.as_object() {
        walk(content, template, &mut cov);
    }
    cov
}

fn walk(content: &Map<String, Value>, template: &Map<String, Value>, cov: &mut Coverage) {
    let empty = Map::new();

    for (key, tmpl) in template {
        if key == EOF_KEY {
            continue;
        }

        match tmpl {
            Value::Object(sub) => {
                // absent or mistyped content subtree counts as empty
                let child = content.get(key).and_then(Value::as_object).unwrap_or(&empty);
                walk(child, sub, cov);
            }
            _ => {
                cov.total += 1;
                if matches!(content.get(key), Some(Value::String(s)) if !s.is_empty()) {
                    cov.filled += 1;
                }
            }
        }
    }
}

/// `@metadata.authors`, ignoring entries that are not strings.
pub fn authors(content: &Value) -> Vec<String> {
    content
        .get("@metadata")
        .and_then(|m| m.get("authors"))
        .and_then(Value::as_array)
        .map(|list| {
            list.iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

pub fn authors_label(content: &Value) -> String {
    let list = authors(content);
    if list.is_empty() {
        NO_AUTHORS.to_string()
    } else {
        list.join(", ")
    }
}

/// Value shown for `row` when populating the translation table.
///
/// Nested objects are followed segment by segment first; flat locale files
/// that store the dotted key at the top level are matched second. `None`
/// means the row is missing.
pub fn lookup(content: &Value, row: &SchemaRow) -> Option<String> {
    let nested = row
        .path
        .iter()
        .try_fold(content, |node, seg| node.as_object()?.get(seg));

    nested
        .and_then(display_value)
        .or_else(|| content.get(&row.key).and_then(display_value))
}

fn display_value(v: &Value) -> Option<String> {
    match v {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Object(_) | Value::Array(_) => None,
    }
}
