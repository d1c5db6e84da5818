use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::cli::ExtractArgs;
use crate::commands::{output_file_name, read_span_document};
use crate::outline::{OutlineConfig, OutlinePipeline};
use crate::util::write_json_pretty;

pub fn run(args: ExtractArgs) -> Result<()> {
    let config = OutlineConfig::from_tuning(&args.tuning);
    let pipeline = OutlinePipeline::new(config)?;

    let doc = read_span_document(&args.spans_path)?;
    let result = pipeline
        .extract(&doc)
        .with_context(|| format!("failed to extract outline from {}", doc.source))?;

    for warning in &result.warnings {
        warn!(source = %doc.source, warning = %warning, "extraction warning");
    }

    let output_path = args
        .output
        .unwrap_or_else(|| args.output_dir.join(output_file_name(&args.spans_path)));
    write_json_pretty(&output_path, &result.outline)?;

    info!(
        source = %doc.source,
        output = %output_path.display(),
        lines = result.line_count,
        candidates = result.candidate_count,
        headings = result.outline.outline.len(),
        title = %result.outline.title,
        "outline written"
    );

    Ok(())
}
