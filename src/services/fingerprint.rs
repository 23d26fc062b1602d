use sha2::{Digest, Sha256};

use crate::model::document::Document;
use crate::services::html;

/// Hex SHA-256 of the rendered tables. Equal documents render equally.
pub fn digest(doc: &Document) -> String {
    let mut hasher = Sha256::new();
    hasher.update(html::render(doc).as_bytes());
    hex::encode(hasher.finalize())
}
