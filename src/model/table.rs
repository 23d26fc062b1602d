use serde::Serialize;

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Cell {
    Text { text: String },

    /// Clickable file name. Activating it dispatches `FileSelected(file)`.
    Link { text: String, file: String },

    /// Editable value slot.
    Input { value: String },
}

impl Cell {
    pub fn text(s: impl Into<String>) -> Self {
        Cell::Text { text: s.into() }
    }

    pub fn input(s: impl Into<String>) -> Self {
        Cell::Input { value: s.into() }
    }
}

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Highlight {
    #[default]
    None,
    Missing,
}

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct Row {
    /// `data-key` of the row, when it has one.
    pub key: Option<String>,

    pub cells: Vec<Cell>,

    pub highlight: Highlight,
}

impl Row {
    pub fn new(cells: Vec<Cell>) -> Self {
        Row {
            key: None,
            cells,
            highlight: Highlight::None,
        }
    }

    pub fn keyed(key: impl Into<String>, cells: Vec<Cell>) -> Self {
        Row {
            key: Some(key.into()),
            cells,
            highlight: Highlight::None,
        }
    }
}

/// Selection state of the translation table.
#[derive(Debug, Serialize, Clone, PartialEq, Eq, Default)]
#[serde(tag = "state", content = "file", rename_all = "snake_case")]
pub enum Selection {
    #[default]
    Unpopulated,
    Populated(String),
}
