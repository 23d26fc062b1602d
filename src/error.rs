use serde_json::Error as JsonError;
use thiserror::Error;

/// Notice shown to the user when the page could not be initialised.
pub const STARTUP_NOTICE: &str = "An error occurred while loading the necessary files.";

#[derive(Debug, Error)]
pub enum ViewerError {
    #[error("Failed to load {path}: {reason}")]
    Load { path: String, reason: String },

    #[error("failed to parse JSON from {path}")]
    Parse {
        path: String,
        #[source]
        source: JsonError,
    },

    #[error("expected table '{table}' with a tbody, but it is missing")]
    DomAssumption { table: String },

    #[error("'{name}' is not a plain locale file name")]
    InvalidFileName { name: String },

    #[error("'{name}' is not in the file list")]
    UnknownFile { name: String },

    #[error("viewer is not initialized")]
    NotInitialized,

    #[error("invalid payload: {0}")]
    InvalidPayload(String),
}

impl ViewerError {
    pub fn code(&self) -> &'static str {
        match self {
            ViewerError::Load { .. } => "LOAD_ERROR",
            ViewerError::Parse { .. } => "PARSE_ERROR",
            ViewerError::DomAssumption { .. } => "DOM_ASSUMPTION_ERROR",
            ViewerError::InvalidFileName { .. } => "INVALID_FILE_NAME",
            ViewerError::UnknownFile { .. } => "UNKNOWN_FILE",
            ViewerError::NotInitialized => "NOT_INITIALIZED",
            ViewerError::InvalidPayload(_) => "INVALID_PAYLOAD",
        }
    }

    /// Message including the underlying cause, for logs and error responses.
    pub fn detail(&self) -> String {
        match self {
            ViewerError::Parse { source, .. } => format!("{self}: {source}"),
            _ => self.to_string(),
        }
    }
}
