use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::cli::StatusArgs;
use crate::model::{ExtractRunManifest, SpanInventoryManifest};

pub fn run(args: StatusArgs) -> Result<()> {
    let manifest_dir = args.cache_root.join("manifests");
    let inventory_path = manifest_dir.join("span_inventory.json");

    info!(cache_root = %args.cache_root.display(), "status requested");

    if inventory_path.exists() {
        let raw = fs::read(&inventory_path)
            .with_context(|| format!("failed to read {}", inventory_path.display()))?;
        let inventory: SpanInventoryManifest = serde_json::from_slice(&raw)
            .with_context(|| format!("failed to parse {}", inventory_path.display()))?;

        info!(
            generated_at = %inventory.generated_at,
            document_count = inventory.document_count,
            source = %inventory.source_directory,
            "loaded inventory manifest"
        );
    } else {
        warn!(path = %inventory_path.display(), "inventory manifest missing");
    }

    match latest_extract_manifest(&manifest_dir)? {
        Some(path) => {
            let raw = fs::read(&path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            let manifest: ExtractRunManifest = serde_json::from_slice(&raw)
                .with_context(|| format!("failed to parse {}", path.display()))?;

            info!(
                run_id = %manifest.run_id,
                status = %manifest.status,
                started_at = %manifest.started_at,
                updated_at = %manifest.updated_at,
                processed = manifest.counts.processed_document_count,
                failed = manifest.counts.failed_document_count,
                untitled = manifest.counts.untitled_document_count,
                headings = manifest.counts.heading_count,
                h1 = manifest.counts.h1_count,
                h2 = manifest.counts.h2_count,
                h3 = manifest.counts.h3_count,
                warnings = manifest.warnings.len(),
                "loaded extract run manifest"
            );
        }
        None => {
            warn!(path = %manifest_dir.display(), "no extract run manifest found");
        }
    }

    let outline_count = count_outline_files(&args.output_dir);
    if outline_count > 0 {
        info!(
            path = %args.output_dir.display(),
            outline_count,
            "output directory status"
        );
    } else {
        warn!(path = %args.output_dir.display(), "no outline files in output directory");
    }

    Ok(())
}

/// Run manifests carry a compact UTC timestamp in their filename, so the
/// lexicographically largest name is the most recent run.
fn latest_extract_manifest(manifest_dir: &Path) -> Result<Option<PathBuf>> {
    if !manifest_dir.exists() {
        return Ok(None);
    }

    let entries = fs::read_dir(manifest_dir)
        .with_context(|| format!("failed to read {}", manifest_dir.display()))?;

    let mut latest: Option<PathBuf> = None;
    for entry in entries {
        let entry =
            entry.with_context(|| format!("failed to read entry in {}", manifest_dir.display()))?;
        let path = entry.path();

        let is_run_manifest = path
            .file_name()
            .and_then(|name| name.to_str())
            .map(|name| name.starts_with("extract_run_") && name.ends_with(".json"))
            .unwrap_or(false);

        if is_run_manifest && latest.as_ref().is_none_or(|current| path > *current) {
            latest = Some(path);
        }
    }

    Ok(latest)
}

fn count_outline_files(output_dir: &Path) -> usize {
    let Ok(entries) = fs::read_dir(output_dir) else {
        return 0;
    };

    entries
        .flatten()
        .filter(|entry| {
            entry
                .path()
                .extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| ext.eq_ignore_ascii_case("json"))
                .unwrap_or(false)
        })
        .count()
}
