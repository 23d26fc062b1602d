use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::ViewerError;
use crate::model::table::Row;

pub const FILE_LIST_ID: &str = "fileList";
pub const TRANSLATIONS_ID: &str = "translations";

#[derive(Debug, Serialize, Clone, PartialEq, Eq, Default)]
pub struct TableBody {
    pub rows: Vec<Row>,
}

impl TableBody {
    pub fn clear(&mut self) {
        self.rows.clear();
    }

    pub fn append(&mut self, row: Row) {
        self.rows.push(row);
    }
}

#[derive(Debug, Serialize, Clone, PartialEq, Eq, Default)]
pub struct TableElement {
    pub tbody: Option<TableBody>,
}

/// The page: table elements addressed by id.
#[derive(Debug, Serialize, Clone, PartialEq, Eq, Default)]
pub struct Document {
    pub tables: BTreeMap<String, TableElement>,
}

impl Document {
    /// Skeleton with both viewer tables present and empty.
    pub fn standard() -> Self {
        let mut doc = Document::default();
        for id in [FILE_LIST_ID, TRANSLATIONS_ID] {
            doc.tables.insert(
                id.to_string(),
                TableElement {
                    tbody: Some(TableBody::default()),
                },
            );
        }
        doc
    }

    pub fn tbody(&self, id: &str) -> Result<&TableBody, ViewerError> {
        self.tables
            .get(id)
            .and_then(|t| t.tbody.as_ref())
            .ok_or_else(|| ViewerError::DomAssumption {
                table: id.to_string(),
            })
    }

    pub fn tbody_mut(&mut self, id: &str) -> Result<&mut TableBody, ViewerError> {
        self.tables
            .get_mut(id)
            .and_then(|t| t.tbody.as_mut())
            .ok_or_else(|| ViewerError::DomAssumption {
                table: id.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_document_has_both_bodies() {
        let doc = Document::standard();
        assert!(doc.tbody(FILE_LIST_ID).is_ok());
        assert!(doc.tbody(TRANSLATIONS_ID).is_ok());
    }

    #[test]
    fn table_without_tbody_is_a_dom_assumption_error() {
        let mut doc = Document::standard();
        doc.tables.insert(TRANSLATIONS_ID.to_string(), TableElement { tbody: None });

        match doc.tbody_mut(TRANSLATIONS_ID) {
            Err(ViewerError::DomAssumption { table }) => assert_eq!(table, TRANSLATIONS_ID),
            other => panic!("unexpected: {other:?}"),
        }
    }
}
