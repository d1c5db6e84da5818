use std::collections::HashMap;

use crate::outline::normalize::Line;

/// Font sizes are compared through a rounded integer key so they can be
/// used as hash-map keys and survive float jitter from the parser.
pub fn font_key(size: f64) -> i64 {
    (size * 100.0).round() as i64
}

/// Document-wide statistics computed once per invocation and threaded into
/// feature extraction. Never cached across documents, which keeps
/// concurrent multi-document processing safe.
#[derive(Debug, Clone, Default)]
pub struct DocumentStats {
    /// Font size key -> rank, 0 = largest size in the document.
    font_rank: HashMap<i64, usize>,
    /// Font size key -> number of lines using it.
    font_usage: HashMap<i64, usize>,
    /// Font size key -> number of bold lines using it.
    bold_usage: HashMap<i64, usize>,
    pub total_bold: usize,
    pub total_lines: usize,
    /// Most common left edge across all lines.
    pub modal_left: f64,
    /// Median positive inter-line gap per page.
    median_gap: HashMap<u32, f64>,
}

impl DocumentStats {
    pub fn compute(lines: &[Line]) -> Self {
        if lines.is_empty() {
            return Self::default();
        }

        let mut font_usage: HashMap<i64, usize> = HashMap::new();
        let mut bold_usage: HashMap<i64, usize> = HashMap::new();
        let mut left_counts: HashMap<i64, usize> = HashMap::new();
        let mut gaps_by_page: HashMap<u32, Vec<f64>> = HashMap::new();
        let mut total_bold = 0_usize;

        for line in lines {
            let key = font_key(line.font_size);
            *font_usage.entry(key).or_insert(0) += 1;
            if line.bold {
                *bold_usage.entry(key).or_insert(0) += 1;
                total_bold += 1;
            }
            *left_counts.entry((line.x0 * 10.0).round() as i64).or_insert(0) += 1;

            if let Some(gap) = line.gap_above {
                if gap > 0.0 {
                    gaps_by_page.entry(line.page).or_default().push(gap);
                }
            }
        }

        let mut sizes: Vec<i64> = font_usage.keys().copied().collect();
        sizes.sort_unstable_by(|a, b| b.cmp(a));
        let font_rank = sizes
            .iter()
            .enumerate()
            .map(|(rank, &key)| (key, rank))
            .collect();

        // Smallest key wins count ties so the result is deterministic.
        let modal_left = left_counts
            .into_iter()
            .max_by_key(|&(key, count)| (count, std::cmp::Reverse(key)))
            .map(|(key, _)| key as f64 / 10.0)
            .unwrap_or(0.0);

        let median_gap = gaps_by_page
            .into_iter()
            .map(|(page, mut gaps)| {
                gaps.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
                (page, gaps[gaps.len() / 2])
            })
            .collect();

        Self {
            font_rank,
            font_usage,
            bold_usage,
            total_bold,
            total_lines: lines.len(),
            modal_left,
            median_gap,
        }
    }

    /// Rank of a font size, 0 = largest. Unknown sizes rank below every
    /// known one.
    pub fn rank_of(&self, size: f64) -> usize {
        self.font_rank
            .get(&font_key(size))
            .copied()
            .unwrap_or(self.font_rank.len())
    }

    pub fn usage_share(&self, size: f64) -> f64 {
        if self.total_lines == 0 {
            return 0.0;
        }
        let count = self.font_usage.get(&font_key(size)).copied().unwrap_or(0);
        count as f64 / self.total_lines as f64
    }

    /// Share of all bold lines that use this font size.
    pub fn bold_share(&self, size: f64) -> f64 {
        if self.total_bold == 0 {
            return 0.0;
        }
        let count = self.bold_usage.get(&font_key(size)).copied().unwrap_or(0);
        count as f64 / self.total_bold as f64
    }

    /// Median gap for a page; a generous default when the page had no
    /// measurable gaps.
    pub fn median_gap(&self, page: u32) -> f64 {
        self.median_gap.get(&page).copied().unwrap_or(20.0)
    }
}
