use anyhow::{Context, Result};
use regex::Regex;

use crate::outline::config::OutlineConfig;
use crate::outline::normalize::Line;
use crate::outline::stats::DocumentStats;

/// Per-line signal for classification. All values are in [0, 1] except
/// `font_rank`, where lower means larger font.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    // Typography
    pub font_rank: usize,
    pub is_bold: f64,
    pub caps_ratio: f64,
    pub numbered: f64,
    // Layout
    pub centered: f64,
    pub left_indent: f64,
    pub space_above: f64,
    pub space_below: f64,
    pub isolation: f64,
    // Context
    pub first_page: f64,
    pub length_fit: f64,
    pub over_length: f64,
    pub consistency: f64,
    pub marker: f64,
}

pub struct FeatureExtractor {
    decimal_marker: Regex,
    letter_marker: Regex,
    bullet_prefix: Regex,
}

impl FeatureExtractor {
    pub fn new() -> Result<Self> {
        Ok(Self {
            decimal_marker: Regex::new(r"^(\d+(?:\.\d+)*)[\.\)\-:\s]")
                .context("failed to compile decimal section-marker regex")?,
            letter_marker: Regex::new(r"^[A-Z][\.\)]\s")
                .context("failed to compile letter section-marker regex")?,
            bullet_prefix: Regex::new(r"^[•·▪▫◦‣⁃]\s*")
                .context("failed to compile bullet-prefix regex")?,
        })
    }

    pub fn extract(
        &self,
        line: &Line,
        stats: &DocumentStats,
        config: &OutlineConfig,
    ) -> FeatureVector {
        let text = line.text.as_str();
        let char_count = text.chars().count().max(1);

        let caps_ratio = text.chars().filter(|ch| ch.is_uppercase()).count() as f64
            / char_count as f64;

        let median_gap = stats.median_gap(line.page);
        // A page's first line gets full top-spacing credit; a page's last
        // line gets none, since the bottom edge is not heading evidence.
        let space_above = normalized_gap(line.gap_above, median_gap, 1.0);
        let space_below = normalized_gap(line.gap_below, median_gap, 0.0);

        let length = text.chars().count() as f64;
        let length_fit = bell_score(length, config.ideal_heading_length, config.heading_length_width);

        FeatureVector {
            font_rank: stats.rank_of(line.font_size),
            is_bold: if line.bold { 1.0 } else { 0.0 },
            caps_ratio,
            numbered: self.numbered_score(text),
            centered: centered_score(line),
            left_indent: ((line.x0 - stats.modal_left) / 100.0).clamp(0.0, 1.0),
            space_above,
            space_below,
            isolation: (space_above + space_below) / 2.0,
            first_page: if line.page == 1 { 1.0 } else { 0.0 },
            length_fit,
            over_length: if length > 150.0 { 1.0 } else { 0.0 },
            consistency: self.consistency_score(line, stats),
            marker: self.marker_score(text),
        }
    }

    /// Pattern-specificity score for section numbering: deeper decimal
    /// markers score higher, single-letter markers lower.
    fn numbered_score(&self, text: &str) -> f64 {
        if let Some(captures) = self.decimal_marker.captures(text) {
            let depth = captures
                .get(1)
                .map(|marker| marker.as_str().matches('.').count() + 1)
                .unwrap_or(1);
            return match depth {
                1 => 0.6,
                2 => 0.8,
                _ => 1.0,
            };
        }
        if self.letter_marker.is_match(text) {
            return 0.4;
        }
        0.0
    }

    fn marker_score(&self, text: &str) -> f64 {
        let mut score: f64 = 0.0;
        if text.trim_end().ends_with(':') {
            score += 0.6;
        }
        if self.bullet_prefix.is_match(text) {
            score += 0.4;
        }
        score.min(1.0)
    }

    /// How consistently lines sharing this line's font size share its
    /// weight: bold lines are measured against the bold population, the
    /// rest against overall font usage.
    fn consistency_score(&self, line: &Line, stats: &DocumentStats) -> f64 {
        if line.bold && stats.total_bold > 0 {
            stats.bold_share(line.font_size)
        } else {
            stats.usage_share(line.font_size)
        }
    }
}

fn centered_score(line: &Line) -> f64 {
    if line.page_width <= 0.0 {
        return 0.0;
    }
    let midpoint = (line.x0 + line.x1) / 2.0;
    let center = line.page_width / 2.0;
    let distance = (midpoint - center).abs();
    if distance < line.page_width * 0.15 {
        return 1.0;
    }
    (1.0 - distance / center).clamp(0.0, 1.0)
}

/// Gap measured against the page's median gap; `edge_default` applies when
/// there is no neighbor on that side.
fn normalized_gap(gap: Option<f64>, median_gap: f64, edge_default: f64) -> f64 {
    match gap {
        None => edge_default,
        Some(gap) if median_gap > 0.0 => ((gap - median_gap) / median_gap).clamp(0.0, 1.0),
        Some(_) => 0.0,
    }
}

/// Bell-shaped score peaking at `ideal`, decaying toward 0 for degenerate
/// lengths.
fn bell_score(value: f64, ideal: f64, width: f64) -> f64 {
    if width <= 0.0 {
        return 0.0;
    }
    let deviation = (value - ideal) / width;
    (-deviation * deviation).exp()
}
