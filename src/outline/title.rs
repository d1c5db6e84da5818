use anyhow::{Context, Result};
use regex::Regex;
use tracing::debug;

use crate::outline::classifier::Candidate;
use crate::outline::normalize::Line;
use crate::outline::stats::DocumentStats;
use crate::util::title_from_source_name;

/// Standalone section headings that should never win as a document title
/// even when set in the largest font on page 1.
const SECTION_HEADINGS: &[&str] = &[
    "CONTENTS",
    "TABLE OF CONTENTS",
    "ABSTRACT",
    "SUMMARY",
    "OBJECTIVE",
    "REFERENCES",
    "ACKNOWLEDGMENTS",
    "ACKNOWLEDGEMENTS",
    "APPENDIX",
    "INDEX",
    "GLOSSARY",
    "EDUCATION",
    "EXPERIENCE",
    "SKILLS",
    "PROJECTS",
    "CERTIFICATIONS",
    "PUBLICATIONS",
];

pub struct TitleSelector {
    numbered_prefix: Regex,
    bullet_prefix: Regex,
}

impl TitleSelector {
    pub fn new() -> Result<Self> {
        Ok(Self {
            numbered_prefix: Regex::new(r"^\d+(?:\.\d+)*[\.\)\-:\s]")
                .context("failed to compile numbered-prefix regex")?,
            bullet_prefix: Regex::new(r"^[•·▪▫◦‣⁃]\s*")
                .context("failed to compile bullet-prefix regex")?,
        })
    }

    /// Layered fallback chain. Each stage yields `Option<String>`; the
    /// final source-name stage always produces something, so the selector
    /// never fails.
    pub fn select(
        &self,
        lines: &[Line],
        candidates: &[Candidate],
        stats: &DocumentStats,
        source: &str,
    ) -> String {
        let title = self
            .largest_font_title(lines, stats)
            .or_else(|| self.best_candidate_title(candidates))
            .or_else(|| self.reconstructed_title(lines))
            .unwrap_or_else(|| title_from_source_name(source));

        debug!(title = %title, "selected document title");
        title
    }

    /// Stage 1: largest-font line on page 1 that also looks like a title
    /// by placement and shape.
    fn largest_font_title(&self, lines: &[Line], stats: &DocumentStats) -> Option<String> {
        let mut page1 = page1_lines(lines);
        page1.sort_by(|a, b| {
            (-a.font_size, a.y0)
                .partial_cmp(&(-b.font_size, b.y0))
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        page1
            .iter()
            .find(|line| self.looks_like_title(line, stats))
            .and_then(|line| plausible(&line.text))
    }

    /// Stage 2: the classifier's most confident page-1 candidate, if it is
    /// confident enough.
    fn best_candidate_title(&self, candidates: &[Candidate]) -> Option<String> {
        candidates
            .iter()
            .filter(|candidate| candidate.line.page == 1)
            .max_by(|a, b| {
                a.probability
                    .partial_cmp(&b.probability)
                    .unwrap_or(std::cmp::Ordering::Equal)
                    // Probability ties go to the larger font.
                    .then(b.features.font_rank.cmp(&a.features.font_rank))
            })
            .filter(|candidate| candidate.probability > 0.5)
            .and_then(|candidate| plausible(&candidate.line.text))
    }

    /// Stage 3: stitch the few largest-font page-1 lines back together in
    /// vertical order, for covers that split the title across lines.
    fn reconstructed_title(&self, lines: &[Line]) -> Option<String> {
        let mut page1 = page1_lines(lines);
        if page1.is_empty() {
            return None;
        }

        page1.sort_by(|a, b| {
            b.font_size
                .partial_cmp(&a.font_size)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        let mut top: Vec<&Line> = page1.into_iter().take(3).collect();
        top.sort_by(|a, b| {
            a.y0.partial_cmp(&b.y0).unwrap_or(std::cmp::Ordering::Equal)
        });

        let joined = top
            .iter()
            .map(|line| line.text.as_str())
            .collect::<Vec<&str>>()
            .join(" ");
        plausible(&joined)
    }

    fn looks_like_title(&self, line: &Line, stats: &DocumentStats) -> bool {
        let text = line.text.trim();

        if SECTION_HEADINGS.contains(&text.to_uppercase().as_str()) {
            return false;
        }

        let word_count = text.split_whitespace().count();
        if !(2..=15).contains(&word_count) {
            return false;
        }

        if self.numbered_prefix.is_match(text) || self.bullet_prefix.is_match(text) {
            return false;
        }

        if stats.rank_of(line.font_size) > 2 {
            return false;
        }

        // Titles live in the upper half of the cover page.
        if line.page_height > 0.0 && line.y0 / line.page_height > 0.5 {
            return false;
        }

        true
    }
}

fn page1_lines(lines: &[Line]) -> Vec<&Line> {
    lines.iter().filter(|line| line.page == 1).collect()
}

/// A usable title is non-empty and of sane length.
fn plausible(text: &str) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.len() < 3 || trimmed.len() > 250 {
        return None;
    }
    Some(trimmed.to_string())
}
