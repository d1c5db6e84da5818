pub mod batch;
pub mod extract;

use std::path::Path;

use anyhow::{Context, Result};

use crate::model::SpanDocument;

/// Reads a span document JSON file, filling in the source name from the
/// file stem when the parser left it empty.
pub fn read_span_document(path: &Path) -> Result<SpanDocument> {
    let raw = std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let mut doc: SpanDocument = serde_json::from_slice(&raw)
        .with_context(|| format!("failed to parse span document {}", path.display()))?;

    if doc.source.is_empty() {
        doc.source = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("document")
            .to_string();
    }

    Ok(doc)
}

pub fn output_file_name(path: &Path) -> String {
    let stem = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("outline");
    format!("{stem}.json")
}
