use anyhow::{Context, Result};
use regex::Regex;
use tracing::{debug, warn};

use crate::model::{HeadingEntry, Outline, SpanDocument};
use crate::outline::classifier::{self, Candidate};
use crate::outline::config::OutlineConfig;
use crate::outline::error::OutlineError;
use crate::outline::features::FeatureExtractor;
use crate::outline::hierarchy;
use crate::outline::normalize::SpanNormalizer;
use crate::outline::stats::DocumentStats;
use crate::outline::title::TitleSelector;
use crate::util::title_from_source_name;

#[derive(Debug, Clone)]
pub struct OutlineResult {
    pub outline: Outline,
    pub line_count: usize,
    pub candidate_count: usize,
    pub warnings: Vec<String>,
}

/// The full heading-detection pipeline for one document. Holds compiled
/// patterns and configuration only; all per-document state lives on the
/// stack of [`OutlinePipeline::extract`], so one pipeline may serve many
/// documents, including from different threads.
pub struct OutlinePipeline {
    config: OutlineConfig,
    normalizer: SpanNormalizer,
    extractor: FeatureExtractor,
    titles: TitleSelector,
    trailing_dots: Regex,
    trailing_dashes: Regex,
    trailing_colon: Regex,
}

impl OutlinePipeline {
    pub fn new(config: OutlineConfig) -> Result<Self> {
        Ok(Self {
            config,
            normalizer: SpanNormalizer::new()?,
            extractor: FeatureExtractor::new()?,
            titles: TitleSelector::new()?,
            trailing_dots: Regex::new(r"\.{2,}$")
                .context("failed to compile trailing-dots regex")?,
            trailing_dashes: Regex::new(r"[-_]{2,}$")
                .context("failed to compile trailing-dashes regex")?,
            trailing_colon: Regex::new(r"\s*:\s*$")
                .context("failed to compile trailing-colon regex")?,
        })
    }

    /// Span records in, outline out. The one hard failure is a document
    /// with no spans at all; anything else degrades to a sparse result.
    pub fn extract(&self, doc: &SpanDocument) -> Result<OutlineResult, OutlineError> {
        if doc.pages.iter().all(|page| page.spans.is_empty()) {
            return Err(OutlineError::EmptyInput);
        }

        let (lines, warnings) = self.normalizer.normalize(doc, &self.config);
        if lines.is_empty() {
            warn!(source = %doc.source, "no usable text lines after normalization");
            let mut warnings = warnings;
            warnings.push("no usable text lines after normalization".to_string());
            return Ok(OutlineResult {
                outline: Outline {
                    title: title_from_source_name(&doc.source),
                    outline: Vec::new(),
                },
                line_count: 0,
                candidate_count: 0,
                warnings,
            });
        }

        let stats = DocumentStats::compute(&lines);
        let candidates = classifier::classify(&lines, &stats, &self.extractor, &self.config);
        let title = self.titles.select(&lines, &candidates, &stats, &doc.source);

        // The cover title must not reappear as a page-1 heading.
        let headings: Vec<Candidate> = candidates
            .iter()
            .filter(|candidate| !(candidate.line.page == 1 && candidate.line.text == title))
            .cloned()
            .collect();
        let candidate_count = headings.len();

        let entries: Vec<HeadingEntry> = hierarchy::validate(&headings)
            .into_iter()
            .filter_map(|mut entry| {
                entry.text = self.clean_heading_text(&entry.text);
                (!entry.text.is_empty()).then_some(entry)
            })
            .collect();

        debug!(
            source = %doc.source,
            lines = lines.len(),
            headings = entries.len(),
            "outline extracted"
        );

        Ok(OutlineResult {
            outline: Outline {
                title,
                outline: entries,
            },
            line_count: lines.len(),
            candidate_count,
            warnings,
        })
    }

    /// Strips formatting artifacts that survive span merging: leader-dot
    /// runs, dash runs, and trailing colons.
    fn clean_heading_text(&self, text: &str) -> String {
        let text = self.trailing_dots.replace(text.trim(), "");
        let text = self.trailing_dashes.replace(&text, "");
        let text = self.trailing_colon.replace(&text, "");
        text.trim().to_string()
    }
}

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn clean_heading_text_strips_artifacts() {
        let pipeline = OutlinePipeline::new(OutlineConfig::default()).unwrap();
        assert_eq!(pipeline.clean_heading_text("Overview....."), "Overview");
        assert_eq!(pipeline.clean_heading_text("Heading --"), "Heading");
        assert_eq!(pipeline.clean_heading_text("Methods :"), "Methods");
        assert_eq!(pipeline.clean_heading_text("Plain"), "Plain");
    }
}
