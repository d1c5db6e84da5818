use std::collections::HashMap;

use anyhow::{Context, Result};
use regex::Regex;
use tracing::debug;
use unicode_normalization::UnicodeNormalization;

use crate::model::{PageSpans, Span, SpanDocument};
use crate::outline::config::OutlineConfig;

/// One visual text line merged from adjacent spans. Spans are discarded
/// once their line is built; everything downstream works on lines.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub text: String,
    /// 1-based page number.
    pub page: u32,
    pub font_size: f64,
    pub bold: bool,
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
    pub page_width: f64,
    pub page_height: f64,
    /// Vertical gap to the previous surviving line on the same page.
    pub gap_above: Option<f64>,
    /// Vertical gap to the next surviving line on the same page.
    pub gap_below: Option<f64>,
}

pub struct SpanNormalizer {
    pure_number: Regex,
    symbols_only: Regex,
    url_prefix: Regex,
    email: Regex,
    roman_numeral: Regex,
}

impl SpanNormalizer {
    pub fn new() -> Result<Self> {
        Ok(Self {
            pure_number: Regex::new(r"^\d{1,4}$").context("failed to compile page-number regex")?,
            symbols_only: Regex::new(r"^[^\w\s]*$")
                .context("failed to compile symbols-only regex")?,
            url_prefix: Regex::new(r"^www\.").context("failed to compile url regex")?,
            email: Regex::new(r"@\S+\.\w+").context("failed to compile email regex")?,
            roman_numeral: Regex::new(r"^[IVXLCDMivxlcdm]+$")
                .context("failed to compile roman-numeral regex")?,
        })
    }

    /// Reduces a span document to cleaned, noise-filtered lines in reading
    /// order. Per-span anomalies are skipped, never fatal; the only
    /// warnings surfaced are document-level conditions like truncation.
    pub fn normalize(&self, doc: &SpanDocument, config: &OutlineConfig) -> (Vec<Line>, Vec<String>) {
        let mut warnings = Vec::new();

        if doc.page_count > config.max_pages {
            warnings.push(format!(
                "document has {} pages, processing only the first {}",
                doc.page_count, config.max_pages
            ));
        }

        let mut lines = Vec::new();
        let mut band_counts: HashMap<String, usize> = HashMap::new();
        let mut processed_pages = 0_usize;

        for page in &doc.pages {
            if page.index >= config.max_pages {
                continue;
            }
            processed_pages += 1;

            for line in self.merge_page_spans(page, config) {
                // Fingerprint lines in the header/footer bands so repeats
                // across pages can be stripped afterwards.
                let relative_y = if page.height > 0.0 {
                    line.y0 / page.height
                } else {
                    0.5
                };
                if relative_y < config.header_band_ratio
                    || relative_y > 1.0 - config.footer_band_ratio
                {
                    let fingerprint = band_fingerprint(&line.text);
                    if !fingerprint.is_empty() {
                        *band_counts.entry(fingerprint).or_insert(0) += 1;
                    }
                }

                lines.push(line);
            }
        }

        let repeated = repeated_fingerprints(&band_counts, processed_pages, config);

        let before = lines.len();
        lines.retain(|line| {
            if repeated.contains_key(&band_fingerprint(&line.text)) {
                return false;
            }
            if self.pure_number.is_match(&line.text) {
                return false;
            }
            // Stray fragments: too short and nothing alphanumeric.
            if line.text.len() < 3 && !line.text.chars().any(|ch| ch.is_alphanumeric()) {
                return false;
            }
            true
        });
        let removed = before - lines.len();
        if removed > 0 {
            debug!(removed, "filtered repeating headers/footers and noise");
        }

        // x0 breaks ties between side-by-side runs at one baseline, keeping
        // the ordering stable across runs.
        lines.sort_by(|a, b| {
            (a.page, a.y0, a.x0)
                .partial_cmp(&(b.page, b.y0, b.x0))
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        attach_vertical_gaps(&mut lines);

        (lines, warnings)
    }

    /// Merges one page's spans into visual lines: group by baseline,
    /// then join spans that sit within the horizontal merge gap.
    fn merge_page_spans(&self, page: &PageSpans, config: &OutlineConfig) -> Vec<Line> {
        let mut by_baseline: HashMap<i64, Vec<&Span>> = HashMap::new();

        for span in &page.spans {
            if !span_is_wellformed(span) {
                debug!(page = page.index + 1, "skipping malformed span");
                continue;
            }
            if span.size < config.min_font_size || span.size > config.max_font_size {
                continue;
            }
            if clean_text(&span.text).is_empty() {
                continue;
            }

            let baseline = (span.bbox[1] * 10.0).round() as i64;
            by_baseline.entry(baseline).or_default().push(span);
        }

        let mut lines = Vec::new();
        for spans in by_baseline.values_mut() {
            spans.sort_by(|a, b| {
                a.bbox[0]
                    .partial_cmp(&b.bbox[0])
                    .unwrap_or(std::cmp::Ordering::Equal)
            });

            let mut groups: Vec<Vec<&Span>> = Vec::new();
            for span in spans.iter().copied() {
                match groups.last_mut() {
                    Some(group)
                        if span.bbox[0]
                            <= group.last().map(|s| s.bbox[2]).unwrap_or(f64::MIN)
                                + config.span_merge_gap =>
                    {
                        group.push(span);
                    }
                    _ => groups.push(vec![span]),
                }
            }

            for group in groups {
                if let Some(line) = self.build_line(&group, page) {
                    lines.push(line);
                }
            }
        }

        lines
    }

    fn build_line(&self, group: &[&Span], page: &PageSpans) -> Option<Line> {
        let text = clean_text(
            &group
                .iter()
                .map(|span| span.text.trim())
                .filter(|text| !text.is_empty())
                .collect::<Vec<&str>>()
                .join(" "),
        );
        if text.len() < 2 {
            return None;
        }

        let font_size = group.iter().map(|span| span.size).fold(0.0, f64::max);
        if self.text_is_noise(&text) {
            return None;
        }

        Some(Line {
            text,
            page: page.index as u32 + 1,
            font_size: (font_size * 100.0).round() / 100.0,
            bold: group.iter().any(|span| span.is_bold()),
            x0: group.iter().map(|span| span.bbox[0]).fold(f64::MAX, f64::min),
            y0: group.iter().map(|span| span.bbox[1]).fold(f64::MAX, f64::min),
            x1: group.iter().map(|span| span.bbox[2]).fold(f64::MIN, f64::max),
            y1: group.iter().map(|span| span.bbox[3]).fold(f64::MIN, f64::max),
            page_width: page.width,
            page_height: page.height,
            gap_above: None,
            gap_below: None,
        })
    }

    fn text_is_noise(&self, text: &str) -> bool {
        let alpha = text.chars().filter(|ch| ch.is_alphabetic()).count();
        if text.len() > 20 && (alpha as f64) / (text.len() as f64) < 0.3 {
            return true;
        }

        self.pure_number.is_match(text)
            || self.symbols_only.is_match(text)
            || self.url_prefix.is_match(text)
            || self.email.is_match(text)
            || self.roman_numeral.is_match(text)
    }
}

fn span_is_wellformed(span: &Span) -> bool {
    span.size.is_finite() && span.bbox.iter().all(|value| value.is_finite())
}

/// NFC normalization, control characters out, whitespace runs collapsed.
pub fn clean_text(input: &str) -> String {
    input
        .nfc()
        .map(|ch| if ch.is_control() { ' ' } else { ch })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<&str>>()
        .join(" ")
}

/// Header/footer fingerprint: lowercased with digit runs collapsed to `#`,
/// so "Page 3 of 10" and "Page 4 of 10" compare equal.
fn band_fingerprint(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_digits = false;
    for ch in text.trim().chars() {
        if ch.is_ascii_digit() {
            if !in_digits {
                out.push('#');
                in_digits = true;
            }
        } else {
            in_digits = false;
            out.extend(ch.to_lowercase());
        }
    }
    out
}

fn repeated_fingerprints(
    band_counts: &HashMap<String, usize>,
    processed_pages: usize,
    config: &OutlineConfig,
) -> HashMap<String, usize> {
    let threshold = ((processed_pages as f64) * config.repeat_page_ratio).ceil() as usize;
    band_counts
        .iter()
        .filter(|&(_, &count)| count >= threshold.max(2))
        .map(|(fingerprint, &count)| (fingerprint.clone(), count))
        .collect()
}

fn attach_vertical_gaps(lines: &mut [Line]) {
    for index in 0..lines.len() {
        let gap_above = index.checked_sub(1).and_then(|prev| {
            let prev = &lines[prev];
            (prev.page == lines[index].page).then(|| lines[index].y0 - prev.y1)
        });
        let gap_below = lines.get(index + 1).and_then(|next| {
            (next.page == lines[index].page).then(|| next.y0 - lines[index].y1)
        });

        lines[index].gap_above = gap_above;
        lines[index].gap_below = gap_below;
    }
}
