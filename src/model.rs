use std::fmt;

use serde::{Deserialize, Serialize};

/// One atomic text run from the external PDF parser. Coordinates are in
/// PDF points with the origin at the top-left of the page.
#[derive(Debug, Clone, Deserialize)]
pub struct Span {
    pub text: String,
    #[serde(default)]
    pub font: String,
    #[serde(default)]
    pub size: f64,
    #[serde(default)]
    pub bold: bool,
    pub bbox: [f64; 4],
}

impl Span {
    /// Bold either via the explicit flag or via the font name, the way
    /// most extraction backends report synthetic bold faces.
    pub fn is_bold(&self) -> bool {
        self.bold || self.font.to_lowercase().contains("bold")
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PageSpans {
    /// 0-based page index.
    pub index: usize,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub spans: Vec<Span>,
}

/// Input boundary: every span of one document, grouped by page.
#[derive(Debug, Clone, Deserialize)]
pub struct SpanDocument {
    #[serde(default)]
    pub source: String,
    pub page_count: usize,
    pub pages: Vec<PageSpans>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum HeadingLevel {
    H1,
    H2,
    H3,
}

impl HeadingLevel {
    pub fn depth(self) -> u8 {
        match self {
            Self::H1 => 1,
            Self::H2 => 2,
            Self::H3 => 3,
        }
    }

    /// Depths past 3 fold into H3.
    pub fn from_depth(depth: u8) -> Self {
        match depth {
            0 | 1 => Self::H1,
            2 => Self::H2,
            _ => Self::H3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::H1 => "H1",
            Self::H2 => "H2",
            Self::H3 => "H3",
        }
    }
}

impl fmt::Display for HeadingLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Finalized outline unit. `page` is 1-based in the external schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadingEntry {
    pub level: HeadingLevel,
    pub text: String,
    pub page: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Outline {
    pub title: String,
    pub outline: Vec<HeadingEntry>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DocumentReport {
    pub source: String,
    pub sha256: String,
    pub status: String,
    pub line_count: usize,
    pub heading_count: usize,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchCounts {
    pub documents_found: usize,
    pub documents_processed: usize,
    pub documents_failed: usize,
    pub headings_total: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchRunManifest {
    pub manifest_version: u32,
    pub run_id: String,
    pub status: String,
    pub started_at: String,
    pub updated_at: String,
    pub input_dir: String,
    pub output_dir: String,
    pub counts: BatchCounts,
    pub documents: Vec<DocumentReport>,
    pub warnings: Vec<String>,
}
