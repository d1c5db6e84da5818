use std::collections::HashMap;

use tracing::debug;

use crate::model::HeadingLevel;
use crate::outline::config::OutlineConfig;
use crate::outline::features::{FeatureExtractor, FeatureVector};
use crate::outline::normalize::Line;
use crate::outline::stats::DocumentStats;

/// A line that cleared the adaptive threshold, with its probability and a
/// tentative level. Only the hierarchy validator may adjust the level
/// after this point.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub line: Line,
    pub features: FeatureVector,
    pub probability: f64,
    pub level: HeadingLevel,
}

/// Scores every line, keeps those above the adaptive threshold and buckets
/// them into H1/H2/H3 by font-size rank. Input order (document order) is
/// preserved.
pub fn classify(
    lines: &[Line],
    stats: &DocumentStats,
    extractor: &FeatureExtractor,
    config: &OutlineConfig,
) -> Vec<Candidate> {
    let threshold = adaptive_threshold(stats.total_lines, config);

    let mut passing: Vec<(Line, FeatureVector, f64)> = Vec::new();
    for line in lines {
        let features = extractor.extract(line, stats, config);
        let probability = heading_probability(&features, config);
        if probability >= threshold {
            passing.push((line.clone(), features, probability));
        }
    }

    debug!(
        threshold,
        total = stats.total_lines,
        candidates = passing.len(),
        "classified heading candidates"
    );

    let level_by_rank = bucket_levels(passing.iter().map(|(_, features, _)| features.font_rank));

    passing
        .into_iter()
        .map(|(line, features, probability)| {
            let level = level_by_rank
                .get(&features.font_rank)
                .copied()
                .unwrap_or(HeadingLevel::H3);
            Candidate {
                line,
                features,
                probability,
                level,
            }
        })
        .collect()
}

/// Longer documents get a stricter cutoff, sparse ones a more inclusive
/// one, so sparse documents still surface candidates.
pub fn adaptive_threshold(total_lines: usize, config: &OutlineConfig) -> f64 {
    if total_lines > config.long_document_lines {
        config.base_threshold + config.long_document_shift
    } else {
        config.base_threshold + config.short_document_shift
    }
}

/// Weighted multi-factor probability model over the 14 feature dimensions.
pub fn heading_probability(features: &FeatureVector, config: &OutlineConfig) -> f64 {
    let font_hierarchy = (0.8 - 0.25 * features.font_rank as f64).max(0.0);

    let visual_style = 0.4 * features.is_bold
        + 0.3 * features.caps_ratio
        + 0.2 * features.numbered
        + 0.15 * features.marker
        + 0.25 * features.centered;

    let position_context = 0.2 * (1.0 - features.left_indent)
        + 0.15 * features.space_above
        + 0.1 * features.first_page
        + 0.2 * features.space_below
        + 0.25 * features.isolation;

    let consistency_bonus = 0.15 * features.consistency;

    let weights = &config.weights;
    let mut probability = (weights.font_hierarchy * font_hierarchy
        + weights.visual_style * visual_style
        + weights.position_context * position_context
        + weights.consistency * consistency_bonus)
        * features.length_fit.max(0.3);

    if features.over_length > 0.0 {
        probability *= 0.3;
    }

    probability.min(0.99)
}

/// Distinct font ranks among the passing candidates map to levels in
/// ascending rank order: largest font -> H1, next -> H2, everything
/// deeper folds into H3.
fn bucket_levels(ranks: impl Iterator<Item = usize>) -> HashMap<usize, HeadingLevel> {
    let mut distinct: Vec<usize> = ranks.collect();
    distinct.sort_unstable();
    distinct.dedup();

    distinct
        .into_iter()
        .enumerate()
        .map(|(position, rank)| (rank, HeadingLevel::from_depth(position as u8 + 1)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(text: &str, font_size: f64, bold: bool, bbox: [f64; 4]) -> Line {
        Line {
            text: text.to_string(),
            page: 1,
            font_size,
            bold,
            x0: bbox[0],
            y0: bbox[1],
            x1: bbox[2],
            y1: bbox[3],
            page_width: 612.0,
            page_height: 792.0,
            gap_above: None,
            gap_below: None,
        }
    }

    fn with_gaps(mut lines: Vec<Line>) -> Vec<Line> {
        for index in 0..lines.len() {
            lines[index].gap_above = index
                .checked_sub(1)
                .map(|prev| lines[index].y0 - lines[prev].y1);
            lines[index].gap_below = lines
                .get(index + 1)
                .map(|next| next.y0 - lines[index].y1);
        }
        lines
    }

    #[test]
    fn adaptive_threshold_shifts_with_document_length() {
        let config = OutlineConfig::default();
        assert!((adaptive_threshold(20, &config) - 0.25).abs() < 1e-9);
        assert!((adaptive_threshold(500, &config) - 0.40).abs() < 1e-9);
    }

    #[test]
    fn bucket_levels_assigns_by_ascending_rank() {
        let mapping = bucket_levels([0, 2, 5, 7, 2].into_iter());
        assert_eq!(mapping[&0], HeadingLevel::H1);
        assert_eq!(mapping[&2], HeadingLevel::H2);
        assert_eq!(mapping[&5], HeadingLevel::H3);
        // Ranks past the third distinct value fold into H3.
        assert_eq!(mapping[&7], HeadingLevel::H3);
    }

    #[test]
    fn headings_pass_and_body_text_fails() {
        let config = OutlineConfig::default();
        let extractor = FeatureExtractor::new().unwrap();
        let lines = with_gaps(vec![
            line("Chapter 1", 24.0, true, [250.0, 90.0, 362.0, 114.0]),
            line("Introduction", 18.0, true, [72.0, 150.0, 172.0, 168.0]),
            line("This is a sentence.", 10.0, false, [72.0, 180.0, 167.0, 190.0]),
        ]);
        let stats = DocumentStats::compute(&lines);

        let candidates = classify(&lines, &stats, &extractor, &config);
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].line.text, "Chapter 1");
        assert_eq!(candidates[0].level, HeadingLevel::H1);
        assert_eq!(candidates[1].line.text, "Introduction");
        assert_eq!(candidates[1].level, HeadingLevel::H2);
    }

    #[test]
    fn over_length_text_is_heavily_penalized() {
        let config = OutlineConfig::default();
        let long_text = "word ".repeat(40);
        let long_line = line(long_text.trim(), 24.0, true, [72.0, 90.0, 540.0, 114.0]);
        let short_line = line("Short heading", 24.0, true, [72.0, 90.0, 250.0, 114.0]);
        let stats = DocumentStats::compute(&[short_line.clone()]);
        let extractor = FeatureExtractor::new().unwrap();

        let long_probability =
            heading_probability(&extractor.extract(&long_line, &stats, &config), &config);
        let short_probability =
            heading_probability(&extractor.extract(&short_line, &stats, &config), &config);
        assert!(long_probability < short_probability * 0.5);
    }

    #[test]
    fn probability_never_exceeds_cap() {
        let config = OutlineConfig::default();
        let extractor = FeatureExtractor::new().unwrap();
        let ideal = line("1. PERFECT HEADING LINE:", 36.0, true, [206.0, 40.0, 406.0, 76.0]);
        let stats = DocumentStats::compute(&[ideal.clone()]);

        let probability = heading_probability(&extractor.extract(&ideal, &stats, &config), &config);
        assert!(probability <= 0.99);
        assert!(probability > 0.5);
    }
}
