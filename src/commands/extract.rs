use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result, bail};
use chrono::Utc;
use tracing::{info, warn};

use crate::cli::ExtractArgs;
use crate::commands::inventory;
use crate::model::{
    ExtractCounts, ExtractPaths, ExtractRunManifest, HeadingLevel, OutlineDocument, SpanDocument,
    SpanInventoryManifest,
};
use crate::outline::{OutlineEngine, UNTITLED_TITLE};
use crate::util::{
    clean_text, ensure_directory, now_utc_string, utc_compact_string, write_json_pretty,
};

pub fn run(args: ExtractArgs) -> Result<()> {
    let started_ts = Utc::now();
    let started_at = now_utc_string();
    let run_id = format!("run-{}", utc_compact_string(started_ts));

    let cache_root = args.cache_root.clone();
    let manifest_dir = cache_root.join("manifests");
    ensure_directory(&manifest_dir)?;
    ensure_directory(&args.output_dir)?;

    let inventory_manifest_path = args
        .inventory_manifest_path
        .clone()
        .unwrap_or_else(|| manifest_dir.join("span_inventory.json"));
    let extract_manifest_path = args.extract_manifest_path.clone().unwrap_or_else(|| {
        manifest_dir.join(format!(
            "extract_run_{}.json",
            utc_compact_string(started_ts)
        ))
    });

    info!(input_dir = %args.input_dir.display(), run_id = %run_id, "starting extract");

    let inventory = load_or_refresh_inventory(
        &args.input_dir,
        &inventory_manifest_path,
        args.refresh_inventory,
    )?;

    let engine = OutlineEngine::new()?;

    let mut counts = ExtractCounts {
        document_count: inventory.document_count,
        ..ExtractCounts::default()
    };
    let mut warnings = Vec::<String>::new();
    let mut failed_documents = Vec::<String>::new();

    for entry in &inventory.documents {
        let input_path = args.input_dir.join(&entry.filename);

        let document = match load_span_document(&input_path) {
            Ok(document) => document,
            Err(error) => {
                warn!(
                    file = %input_path.display(),
                    error = %error,
                    "skipping unreadable span file"
                );
                failed_documents.push(entry.filename.clone());
                counts.failed_document_count += 1;
                continue;
            }
        };

        if document.pages.len() > args.max_pages {
            warnings.push(format!(
                "{} has {} pages (limit {})",
                entry.filename,
                document.pages.len(),
                args.max_pages
            ));
            counts.oversized_document_count += 1;
        }

        let processing_start = Instant::now();
        let outline = engine.extract(&document.pages);
        let elapsed_ms = processing_start.elapsed().as_millis() as u64;

        if elapsed_ms > args.slow_threshold_ms {
            warnings.push(format!(
                "{} took {}ms to process (budget {}ms)",
                entry.filename, elapsed_ms, args.slow_threshold_ms
            ));
            counts.slow_document_count += 1;
        }

        let output_path = output_path_for(&args.output_dir, &entry.filename);
        write_json_pretty(&output_path, &outline)?;

        record_outline_counts(&mut counts, &document, &outline);
        counts.processed_document_count += 1;

        info!(
            file = %entry.filename,
            source = %document.source.as_deref().unwrap_or(&entry.filename),
            title = %outline.title,
            headings = outline.outline.len(),
            elapsed_ms,
            "extracted outline"
        );
    }

    if counts.processed_document_count == 0 && counts.document_count > 0 {
        bail!("all {} span files failed to process", counts.document_count);
    }

    let updated_at = now_utc_string();
    let manifest = ExtractRunManifest {
        manifest_version: 1,
        run_id: run_id.clone(),
        status: "completed".to_string(),
        started_at,
        updated_at,
        command: render_extract_command(&args),
        paths: ExtractPaths {
            cache_root: cache_root.display().to_string(),
            manifest_dir: manifest_dir.display().to_string(),
            inventory_manifest_path: inventory_manifest_path.display().to_string(),
            input_dir: args.input_dir.display().to_string(),
            output_dir: args.output_dir.display().to_string(),
        },
        counts: counts.clone(),
        source_hashes: inventory.documents,
        failed_documents,
        warnings,
        notes: vec![
            "Outlines are inferred from span typography; no structural markup is consulted."
                .to_string(),
        ],
    };

    write_json_pretty(&extract_manifest_path, &manifest)?;

    info!(path = %extract_manifest_path.display(), "wrote extract run manifest");
    info!(
        processed = counts.processed_document_count,
        failed = counts.failed_document_count,
        headings = counts.heading_count,
        "extract completed"
    );

    Ok(())
}

fn load_or_refresh_inventory(
    input_dir: &Path,
    inventory_manifest_path: &Path,
    refresh_inventory: bool,
) -> Result<SpanInventoryManifest> {
    if refresh_inventory || !inventory_manifest_path.exists() {
        let manifest = inventory::build_manifest(input_dir)?;
        write_json_pretty(inventory_manifest_path, &manifest)?;
        info!(
            path = %inventory_manifest_path.display(),
            document_count = manifest.document_count,
            "refreshed inventory manifest"
        );
        return Ok(manifest);
    }

    let raw = fs::read(inventory_manifest_path)
        .with_context(|| format!("failed to read {}", inventory_manifest_path.display()))?;
    let manifest: SpanInventoryManifest = serde_json::from_slice(&raw)
        .with_context(|| format!("failed to parse {}", inventory_manifest_path.display()))?;

    info!(
        path = %inventory_manifest_path.display(),
        document_count = manifest.document_count,
        "loaded existing inventory manifest"
    );

    Ok(manifest)
}

fn load_span_document(path: &Path) -> Result<SpanDocument> {
    let raw = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let mut document: SpanDocument = serde_json::from_slice(&raw)
        .with_context(|| format!("failed to parse span file {}", path.display()))?;

    normalize_document(&mut document);
    Ok(document)
}

/// Load-time normalization of collaborator output: clean span text, stamp
/// missing page numbers from the enclosing page, and drop spans that are
/// empty after cleaning. The inference core never mutates spans itself.
fn normalize_document(document: &mut SpanDocument) {
    for page in &mut document.pages {
        for span in &mut page.spans {
            span.text = clean_text(&span.text);
            if span.page_number == 0 {
                span.page_number = page.page_number;
            }
        }
        page.spans.retain(|span| !span.text.is_empty());
    }
}

fn output_path_for(output_dir: &Path, filename: &str) -> PathBuf {
    let stem = Path::new(filename)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or(filename);

    output_dir.join(format!("{stem}.json"))
}

fn record_outline_counts(
    counts: &mut ExtractCounts,
    document: &SpanDocument,
    outline: &OutlineDocument,
) {
    counts.page_count += document.pages.len();
    counts.span_count += document
        .pages
        .iter()
        .map(|page| page.spans.len())
        .sum::<usize>();

    if outline.title == UNTITLED_TITLE {
        counts.untitled_document_count += 1;
    }

    counts.heading_count += outline.outline.len();

    let mut heading_pages = HashSet::<u32>::new();
    for heading in &outline.outline {
        heading_pages.insert(heading.page);
        match heading.level {
            HeadingLevel::H1 => counts.h1_count += 1,
            HeadingLevel::H2 => counts.h2_count += 1,
            HeadingLevel::H3 => counts.h3_count += 1,
        }
    }
    counts.pages_with_headings += heading_pages.len();
}

fn render_extract_command(args: &ExtractArgs) -> String {
    format!(
        "outliner extract --cache-root {} --input-dir {} --output-dir {} --max-pages {} --slow-threshold-ms {}",
        args.cache_root.display(),
        args.input_dir.display(),
        args.output_dir.display(),
        args.max_pages,
        args.slow_threshold_ms
    )
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;

    #[test]
    fn span_file_defaults_fill_missing_attributes() {
        let raw = r#"{
            "pages": [
                { "page_number": 1, "spans": [ { "text": "Introduction" } ] }
            ]
        }"#;

        let document: SpanDocument = serde_json::from_str(raw).expect("span file parses");
        let span = &document.pages[0].spans[0];

        assert!((span.font_size - 12.0).abs() < 1e-9);
        assert!(!span.is_bold);
        assert!(!span.is_italic);
        assert_eq!(span.x, 0.0);
        assert_eq!(span.y, 0.0);
    }

    #[test]
    fn normalize_document_stamps_pages_and_drops_empty_spans() {
        let raw = r#"{
            "pages": [
                {
                    "page_number": 3,
                    "spans": [
                        { "text": "  spaced\tout   text " },
                        { "text": "   " },
                        { "text": "kept", "page_number": 7 }
                    ]
                }
            ]
        }"#;

        let mut document: SpanDocument = serde_json::from_str(raw).expect("span file parses");
        normalize_document(&mut document);

        let spans = &document.pages[0].spans;
        assert_eq!(spans.len(), 2);
        assert_eq!(spans[0].text, "spaced out text");
        assert_eq!(spans[0].page_number, 3);
        assert_eq!(spans[1].page_number, 7);
    }

    #[test]
    fn output_path_reuses_input_stem() {
        let path = output_path_for(Path::new("output"), "report.json");
        assert_eq!(path, Path::new("output").join("report.json"));

        let path = output_path_for(Path::new("output"), "scan.spans.json");
        assert_eq!(path, Path::new("output").join("scan.spans.json"));
    }
}
