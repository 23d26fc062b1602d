use serde::Serialize;

/// One template leaf, flattened.
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct SchemaRow {
    /// Dotted path, e.g. `menu.file.open`.
    pub key: String,

    /// Path segments as they appear in the template. Segments may
    /// themselves contain dots, so `key` is not split back into these.
    pub path: Vec<String>,

    pub description: String,
}

impl SchemaRow {
    pub fn new(path: Vec<String>, description: String) -> Self {
        SchemaRow {
            key: path.join("."),
            path,
            description,
        }
    }
}
