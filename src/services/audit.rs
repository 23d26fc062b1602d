use serde::Serialize;
use serde_json::Value;

use crate::model::schema::SchemaRow;

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct AuditIssue {
    pub key: String,
    pub code: String,
    pub message: String,
}

impl AuditIssue {
    fn new(row: &SchemaRow, code: &str, message: &str) -> Self {
        AuditIssue {
            key: row.key.clone(),
            code: code.to_string(),
            message: message.to_string(),
        }
    }
}

/// Per-key problems of one locale file against the flattened template.
pub fn run(content: &Value, rows: &[SchemaRow]) -> Vec<AuditIssue> {
    let mut issues = Vec::new();

    for row in rows {
        let nested = row
            .path
            .iter()
            .try_fold(content, |node, seg| node.as_object()?.get(seg));
        let value = nested.or_else(|| content.get(&row.key));

        match value {
            None | Some(Value::Null) => {
                issues.push(AuditIssue::new(row, "MISSING_KEY", "Key is missing from the locale file"));
            }
            Some(Value::String(s)) if s.trim().is_empty() => {
                issues.push(AuditIssue::new(row, "EMPTY_VALUE", "Translation is empty"));
            }
            Some(Value::String(_)) => {}
            Some(_) => {
                issues.push(AuditIssue::new(row, "NOT_A_STRING", "Expected a string translation"));
            }
        }
    }

    issues
}
