use crate::cli::TuningArgs;

/// Weights applied to the classifier sub-scores. The defaults were tuned
/// empirically against a small labeled corpus; treat them as a starting
/// point, not ground truth.
#[derive(Debug, Clone, Copy)]
pub struct ScoreWeights {
    pub font_hierarchy: f64,
    pub visual_style: f64,
    pub position_context: f64,
    pub consistency: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            font_hierarchy: 0.35,
            visual_style: 0.30,
            position_context: 0.25,
            consistency: 0.10,
        }
    }
}

/// Every tunable heuristic constant in the pipeline. Heading detection has
/// no single correct parameterization, so nothing here is hard-coded at
/// the point of use.
#[derive(Debug, Clone)]
pub struct OutlineConfig {
    /// Pages past this cap are ignored with a warning.
    pub max_pages: usize,
    /// Spans below this size are treated as footnote-scale noise.
    pub min_font_size: f64,
    /// Spans above this size are treated as decorative graphics.
    pub max_font_size: f64,
    /// Fraction of page height considered the running-header band.
    pub header_band_ratio: f64,
    /// Fraction of page height considered the running-footer band.
    pub footer_band_ratio: f64,
    /// A banded line repeating on at least this fraction of pages is
    /// removed everywhere as a header/footer.
    pub repeat_page_ratio: f64,
    /// Maximum horizontal gap (pt) between spans merged into one line.
    pub span_merge_gap: f64,
    pub base_threshold: f64,
    /// Line count above which a document counts as long.
    pub long_document_lines: usize,
    /// Threshold shift applied to long documents (stricter).
    pub long_document_shift: f64,
    /// Threshold shift applied to short documents (more inclusive).
    pub short_document_shift: f64,
    /// Character length at which the length-fit feature peaks.
    pub ideal_heading_length: f64,
    /// Width of the length-fit bell curve.
    pub heading_length_width: f64,
    pub weights: ScoreWeights,
}

impl Default for OutlineConfig {
    fn default() -> Self {
        Self {
            max_pages: 50,
            min_font_size: 6.0,
            max_font_size: 72.0,
            header_band_ratio: 0.08,
            footer_band_ratio: 0.10,
            repeat_page_ratio: 0.5,
            span_merge_gap: 2.0,
            base_threshold: 0.30,
            long_document_lines: 100,
            long_document_shift: 0.10,
            short_document_shift: -0.05,
            ideal_heading_length: 30.0,
            heading_length_width: 40.0,
            weights: ScoreWeights::default(),
        }
    }
}

impl OutlineConfig {
    pub fn from_tuning(args: &TuningArgs) -> Self {
        Self {
            max_pages: args.max_pages,
            min_font_size: args.min_font_size,
            repeat_page_ratio: args.repeat_ratio,
            base_threshold: args.base_threshold,
            weights: ScoreWeights {
                font_hierarchy: args.weight_font,
                visual_style: args.weight_style,
                position_context: args.weight_position,
                consistency: args.weight_consistency,
            },
            ..Self::default()
        }
    }
}
