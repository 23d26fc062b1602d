use serde::Serialize;
use serde_json::Value;

use crate::config::ViewerConfig;
use crate::error::ViewerError;
use crate::model::document::{Document, FILE_LIST_ID, TRANSLATIONS_ID};
use crate::model::schema::SchemaRow;
use crate::model::table::{Cell, Highlight, Row, Selection};
use crate::services::coverage::{self, Coverage};
use crate::services::loader::{check_file_name, JsonLoader};
use crate::services::schema::flatten_schema;

const AUTHORS_COL: usize = 1;
const VALUE_COL: usize = 1;

/// Messages the tables can raise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    FileSelected(String),
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct FileSummary {
    pub name: String,
    pub authors: String,
    pub coverage: String,
    pub filled: usize,
    pub total: usize,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct InitReport {
    pub files: Vec<FileSummary>,
    pub keys: usize,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct SelectReport {
    pub selection: Selection,
    pub missing: usize,
}

/// Owns the page and keeps its two tables in step with the selection.
#[derive(Debug)]
pub struct Presenter {
    document: Document,
    template: Value,
    schema: Vec<SchemaRow>,
    files: Vec<String>,
    selection: Selection,
}

impl Presenter {
    /// Takes the page, checking up front that both tables and their bodies
    /// exist.
    pub fn attach(document: Document) -> Result<Self, ViewerError> {
        document.tbody(FILE_LIST_ID)?;
        document.tbody(TRANSLATIONS_ID)?;

        Ok(Presenter {
            document,
            template: Value::Null,
            schema: Vec::new(),
            files: Vec::new(),
            selection: Selection::Unpopulated,
        })
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn schema(&self) -> &[SchemaRow] {
        &self.schema
    }

    /// Loads the template, the file list and every listed locale file, one
    /// after the other, then fills both tables. Nothing is written to the
    /// page unless every load succeeds.
    pub fn initialize(
        &mut self,
        loader: &dyn JsonLoader,
        config: &ViewerConfig,
    ) -> Result<InitReport, ViewerError> {
        let template = loader.load_json(&config.template_path)?;
        let list = loader.load_json(&config.file_list_path)?;
        let files = file_names(&list, &config.file_list_path)?;

        let mut summaries = Vec::with_capacity(files.len());
        let mut file_rows = Vec::with_capacity(files.len());

        for name in &files {
            check_file_name(name)?;
            let content = loader.load_json(&config.locale_path(name))?;

            let cov = coverage::compute_coverage(&content, &template);
            let authors = coverage::authors_label(&content);
            tracing::debug!(file = %name, coverage = %cov, "file measured");

            file_rows.push(file_row(name, &authors, &cov));
            summaries.push(FileSummary {
                name: name.clone(),
                authors,
                coverage: cov.to_string(),
                filled: cov.filled,
                total: cov.total,
            });
        }

        let schema = flatten_schema(&template);

        let file_list = self.document.tbody_mut(FILE_LIST_ID)?;
        file_list.clear();
        for row in file_rows {
            file_list.append(row);
        }

        let translations = self.document.tbody_mut(TRANSLATIONS_ID)?;
        translations.clear();
        for entry in &schema {
            translations.append(Row::keyed(
                entry.key.clone(),
                vec![
                    Cell::text(entry.key.clone()),
                    Cell::input(""),
                    Cell::text(entry.description.clone()),
                ],
            ));
        }

        tracing::info!(files = files.len(), keys = schema.len(), "viewer initialized");

        let report = InitReport {
            files: summaries,
            keys: schema.len(),
        };
        self.template = template;
        self.schema = schema;
        self.files = files;
        self.selection = Selection::Unpopulated;
        Ok(report)
    }

    /// Single entry point for table events.
    pub fn dispatch(
        &mut self,
        event: Event,
        loader: &dyn JsonLoader,
        config: &ViewerConfig,
    ) -> Result<SelectReport, ViewerError> {
        match event {
            Event::FileSelected(name) => self.select_file(&name, loader, config),
        }
    }

    fn select_file(
        &mut self,
        name: &str,
        loader: &dyn JsonLoader,
        config: &ViewerConfig,
    ) -> Result<SelectReport, ViewerError> {
        let Some(index) = self.files.iter().position(|f| f == name) else {
            return Err(ViewerError::UnknownFile {
                name: name.to_string(),
            });
        };

        let content = match loader.load_json(&config.locale_path(name)) {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!(file = name, error = %e.detail(), "selection failed, table unchanged");
                return Err(e);
            }
        };

        let file_list = self.document.tbody_mut(FILE_LIST_ID)?;
        if let Some(cell) = file_list
            .rows
            .get_mut(index)
            .and_then(|r| r.cells.get_mut(AUTHORS_COL))
        {
            *cell = Cell::text(coverage::authors_label(&content));
        }

        let translations = self.document.tbody_mut(TRANSLATIONS_ID)?;
        let mut missing = 0usize;

        for (row, entry) in translations.rows.iter_mut().zip(&self.schema) {
            let value = coverage::lookup(&content, entry);
            row.highlight = if value.is_some() {
                Highlight::None
            } else {
                missing += 1;
                Highlight::Missing
            };
            if let Some(cell) = row.cells.get_mut(VALUE_COL) {
                *cell = Cell::input(value.unwrap_or_default());
            }
        }

        self.selection = Selection::Populated(name.to_string());
        tracing::info!(file = name, missing, "translation table populated");

        Ok(SelectReport {
            selection: self.selection.clone(),
            missing,
        })
    }

    /// Content of one listed file, read again from its source.
    pub fn load_listed(
        &self,
        name: &str,
        loader: &dyn JsonLoader,
        config: &ViewerConfig,
    ) -> Result<Value, ViewerError> {
        if !self.files.iter().any(|f| f == name) {
            return Err(ViewerError::UnknownFile {
                name: name.to_string(),
            });
        }
        loader.load_json(&config.locale_path(name))
    }

    pub fn template(&self) -> &Value {
        &self.template
    }
}

fn file_row(name: &str, authors: &str, cov: &Coverage) -> Row {
    Row::new(vec![
        Cell::Link {
            text: name.to_string(),
            file: name.to_string(),
        },
        Cell::text(authors),
        Cell::text(cov.to_string()),
    ])
}

fn file_names(list: &Value, path: &str) -> Result<Vec<String>, ViewerError> {
    let bad = || ViewerError::Load {
        path: path.to_string(),
        reason: "file list must be an array of strings".to_string(),
    };

    list.as_array()
        .ok_or_else(bad)?
        .iter()
        .map(|v| v.as_str().map(str::to_string).ok_or_else(bad))
        .collect()
}
