use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use chrono::Utc;
use tracing::{error, info, warn};

use crate::cli::BatchArgs;
use crate::commands::{output_file_name, read_span_document};
use crate::model::{BatchCounts, BatchRunManifest, DocumentReport};
use crate::outline::{OutlineConfig, OutlinePipeline};
use crate::util::{
    ensure_directory, now_utc_string, sha256_file, utc_compact_string, write_json_pretty,
};

pub fn run(args: BatchArgs) -> Result<()> {
    let started_ts = Utc::now();
    let started_at = now_utc_string();
    let run_id = format!("run-{}", utc_compact_string(started_ts));

    if !args.input_dir.is_dir() {
        bail!("input directory does not exist: {}", args.input_dir.display());
    }
    ensure_directory(&args.output_dir)?;

    let config = OutlineConfig::from_tuning(&args.tuning);
    let pipeline = OutlinePipeline::new(config)?;

    let inputs = collect_span_documents(&args)?;
    if inputs.is_empty() {
        warn!(input_dir = %args.input_dir.display(), "no span documents found");
    }

    info!(
        run_id = %run_id,
        input_dir = %args.input_dir.display(),
        documents = inputs.len(),
        "starting batch run"
    );

    let mut counts = BatchCounts {
        documents_found: inputs.len(),
        ..BatchCounts::default()
    };
    let mut documents = Vec::with_capacity(inputs.len());
    let mut warnings = Vec::new();

    for input in &inputs {
        let sha256 = sha256_file(input).unwrap_or_default();
        let source = input
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("document")
            .to_string();

        match process_document(&pipeline, &args, input) {
            Ok(report) => {
                counts.documents_processed += 1;
                counts.headings_total += report.heading_count;
                for warning in &report.warnings {
                    warnings.push(format!("{source}: {warning}"));
                }
                documents.push(DocumentReport { sha256, ..report });
            }
            Err(err) => {
                // A bad document must not sink the rest of the batch.
                error!(source = %source, error = %err, "document failed");
                counts.documents_failed += 1;
                documents.push(DocumentReport {
                    source,
                    sha256,
                    status: "failed".to_string(),
                    line_count: 0,
                    heading_count: 0,
                    warnings: vec![format!("{err:#}")],
                });
            }
        }
    }

    let manifest_path = args.manifest_path.clone().unwrap_or_else(|| {
        args.output_dir
            .join(format!("batch_run_{}.json", utc_compact_string(started_ts)))
    });
    let manifest = BatchRunManifest {
        manifest_version: 1,
        run_id: run_id.clone(),
        status: "completed".to_string(),
        started_at,
        updated_at: now_utc_string(),
        input_dir: args.input_dir.display().to_string(),
        output_dir: args.output_dir.display().to_string(),
        counts,
        documents,
        warnings,
    };
    write_json_pretty(&manifest_path, &manifest)?;

    info!(
        run_id = %run_id,
        manifest = %manifest_path.display(),
        processed = manifest.counts.documents_processed,
        failed = manifest.counts.documents_failed,
        "batch run completed"
    );

    Ok(())
}

fn collect_span_documents(args: &BatchArgs) -> Result<Vec<PathBuf>> {
    let mut inputs = Vec::new();
    let entries = std::fs::read_dir(&args.input_dir)
        .with_context(|| format!("failed to list {}", args.input_dir.display()))?;

    for entry in entries {
        let path = entry
            .with_context(|| format!("failed to list {}", args.input_dir.display()))?
            .path();
        if path.extension().and_then(|ext| ext.to_str()) == Some("json") {
            inputs.push(path);
        }
    }

    inputs.sort();
    Ok(inputs)
}

fn process_document(
    pipeline: &OutlinePipeline,
    args: &BatchArgs,
    input: &Path,
) -> Result<DocumentReport> {
    let doc = read_span_document(input)?;
    let result = pipeline
        .extract(&doc)
        .with_context(|| format!("failed to extract outline from {}", doc.source))?;

    let output_path = args.output_dir.join(output_file_name(input));
    write_json_pretty(&output_path, &result.outline)?;

    info!(
        source = %doc.source,
        output = %output_path.display(),
        headings = result.outline.outline.len(),
        "outline written"
    );

    Ok(DocumentReport {
        source: doc.source,
        sha256: String::new(),
        status: "ok".to_string(),
        line_count: result.line_count,
        heading_count: result.outline.outline.len(),
        warnings: result.warnings,
    })
}
