use serde_json::Value;

use crate::model::schema::SchemaRow;

/// Template key that terminates a locale file. Never a real field.
pub const EOF_KEY: &str = "global.EOF";

/// Flattens the template into its leaves, depth-first, in template order.
pub fn flatten_schema(template: &Value) -> Vec<SchemaRow> {
    let mut rows = Vec::new();
    let mut path = Vec::new();
    walk(template, &mut path, &mut rows);
    rows
}

fn walk(node: &Value, path: &mut Vec<String>, rows: &mut Vec<SchemaRow>) {
    let Some(map) = node.as_object() else {
        return;
    };

    for (key, value) in map {
        if key == EOF_KEY {
            continue;
        }

        path.push(key.clone());
        match value {
            Value::Object(_) => walk(value, path, rows),
            leaf => {
                let description = leaf.as_str().unwrap_or_default().to_string();
                rows.push(SchemaRow::new(path.clone(), description));
            }
        }
        path.pop();
    }
}
