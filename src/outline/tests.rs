use serde_json::json;

use crate::model::{HeadingLevel, PageSpans, Span, SpanDocument};
use crate::outline::{OutlineConfig, OutlineError, OutlinePipeline};

fn span(text: &str, size: f64, bold: bool, bbox: [f64; 4]) -> Span {
    Span {
        text: text.to_string(),
        font: if bold { "Helvetica-Bold" } else { "Helvetica" }.to_string(),
        size,
        bold,
        bbox,
    }
}

fn page(index: usize, spans: Vec<Span>) -> PageSpans {
    PageSpans {
        index,
        width: 612.0,
        height: 792.0,
        spans,
    }
}

fn doc(source: &str, pages: Vec<PageSpans>) -> SpanDocument {
    SpanDocument {
        source: source.to_string(),
        page_count: pages.len(),
        pages,
    }
}

fn scenario_doc() -> SpanDocument {
    doc("sample.pdf", vec![page(0, vec![
        span("Chapter 1", 24.0, true, [250.0, 90.0, 362.0, 114.0]),
        span("Introduction", 18.0, true, [72.0, 150.0, 172.0, 168.0]),
        span("This is a sentence.", 10.0, false, [72.0, 180.0, 167.0, 190.0]),
    ])])
}

fn report_doc() -> SpanDocument {
    // A small report: cover title, two chapters with subsections, body
    // text between headings.
    let cover = page(0, vec![
        span("Signal Processing Field Report", 26.0, true, [140.0, 80.0, 470.0, 106.0]),
        span("Prepared for internal review only.", 10.0, false, [72.0, 200.0, 320.0, 210.0]),
        span("The document summarizes findings.", 10.0, false, [72.0, 224.0, 330.0, 234.0]),
    ]);
    let chapter = |index: usize, title: &str, sub: &str| {
        page(index, vec![
            span(title, 20.0, true, [72.0, 80.0, 300.0, 100.0]),
            span("Body paragraph follows the heading here.", 10.0, false, [
                72.0, 140.0, 420.0, 150.0,
            ]),
            span("Another body paragraph with detail.", 10.0, false, [
                72.0, 164.0, 400.0, 174.0,
            ]),
            span(sub, 14.0, true, [72.0, 260.0, 260.0, 274.0]),
            span("Closing remarks for the section follow.", 10.0, false, [
                72.0, 320.0, 410.0, 330.0,
            ]),
        ])
    };

    doc("field_report.pdf", vec![
        cover,
        chapter(1, "1. Measurement Setup", "1.1 Calibration Notes"),
        chapter(2, "2. Observed Anomalies", "2.1 Sensor Drift"),
    ])
}

#[test]
fn pipeline_is_idempotent() {
    let pipeline = OutlinePipeline::new(OutlineConfig::default()).unwrap();
    let input = report_doc();

    let first = pipeline.extract(&input).unwrap();
    let second = pipeline.extract(&input).unwrap();

    let first_json = serde_json::to_string(&first.outline).unwrap();
    let second_json = serde_json::to_string(&second.outline).unwrap();
    assert_eq!(first_json, second_json);
}

#[test]
fn scenario_document_yields_expected_title_and_headings() {
    let pipeline = OutlinePipeline::new(OutlineConfig::default()).unwrap();
    let result = pipeline.extract(&scenario_doc()).unwrap();

    assert_eq!(result.outline.title, "Chapter 1");
    // The title is removed from the heading list; the remaining heading
    // is promoted to H1 by the validator.
    assert_eq!(result.outline.outline.len(), 1);
    assert_eq!(result.outline.outline[0].text, "Introduction");
    assert_eq!(result.outline.outline[0].level, HeadingLevel::H1);
    assert_eq!(result.outline.outline[0].page, 1);
}

#[test]
fn report_headings_are_ordered_and_well_formed() {
    let pipeline = OutlinePipeline::new(OutlineConfig::default()).unwrap();
    let result = pipeline.extract(&report_doc()).unwrap();

    assert_eq!(result.outline.title, "Signal Processing Field Report");

    let entries = &result.outline.outline;
    assert!(!entries.is_empty());

    // Ordering invariant: pages never decrease.
    for pair in entries.windows(2) {
        assert!(pair[0].page <= pair[1].page);
    }

    // Hierarchy invariant: never more than one step deeper than the
    // deepest level seen so far.
    let mut deepest = 0_u8;
    for entry in entries {
        assert!(entry.level.depth() <= deepest + 1);
        deepest = deepest.max(entry.level.depth());
    }

    // Chapter headings surface with their subsections below them.
    let texts: Vec<&str> = entries.iter().map(|entry| entry.text.as_str()).collect();
    assert!(texts.contains(&"1. Measurement Setup"));
    assert!(texts.contains(&"1.1 Calibration Notes"));
    let chapter = texts.iter().position(|t| *t == "1. Measurement Setup").unwrap();
    let section = texts.iter().position(|t| *t == "1.1 Calibration Notes").unwrap();
    assert!(chapter < section);
    assert!(entries[chapter].level < entries[section].level);
}

#[test]
fn no_spans_at_all_is_a_hard_error() {
    let pipeline = OutlinePipeline::new(OutlineConfig::default()).unwrap();
    let empty = doc("empty.pdf", vec![page(0, Vec::new())]);

    let err = pipeline.extract(&empty).unwrap_err();
    assert!(matches!(err, OutlineError::EmptyInput));
}

#[test]
fn all_noise_document_degrades_to_source_title() {
    let pipeline = OutlinePipeline::new(OutlineConfig::default()).unwrap();
    let noisy = doc("scanned_archive.pdf", vec![page(0, vec![
        span("123", 10.0, false, [72.0, 100.0, 100.0, 110.0]),
        span("***", 10.0, false, [72.0, 130.0, 100.0, 140.0]),
    ])]);

    let result = pipeline.extract(&noisy).unwrap();
    assert_eq!(result.outline.title, "Scanned Archive");
    assert!(result.outline.outline.is_empty());
    assert!(!result.warnings.is_empty());
}

#[test]
fn oversized_document_truncates_with_warning() {
    let pipeline = OutlinePipeline::new(OutlineConfig::default()).unwrap();
    let pages = (0..120)
        .map(|index| {
            page(index, vec![span(
                "Repeatable body content line.",
                10.0,
                false,
                [72.0, 300.0, 330.0, 310.0],
            )])
        })
        .collect();
    let big = doc("big.pdf", pages);

    let result = pipeline.extract(&big).unwrap();
    assert_eq!(result.line_count, 50);
    assert_eq!(result.warnings.len(), 1);
    assert!(result.warnings[0].contains("120"));
}

#[test]
fn outline_serializes_to_external_schema() {
    let pipeline = OutlinePipeline::new(OutlineConfig::default()).unwrap();
    let result = pipeline.extract(&scenario_doc()).unwrap();

    let value = serde_json::to_value(&result.outline).unwrap();
    assert_eq!(
        value,
        json!({
            "title": "Chapter 1",
            "outline": [
                {"level": "H1", "text": "Introduction", "page": 1}
            ]
        })
    );
}
