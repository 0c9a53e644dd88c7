use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde_json::Value;
use tracing::{info, warn};

use crate::cli::ValidateArgs;
use crate::model::{ValidationIssue, ValidationReport};
use crate::util::{now_utc_string, write_json_pretty};

const HEADING_LEVELS: &[&str] = &["H1", "H2", "H3"];

/// Enforcement point for the outline wire contract: every output file must
/// carry exactly the agreed shape before anything downstream consumes it.
pub fn run(args: ValidateArgs) -> Result<()> {
    let report_path = args
        .report_path
        .unwrap_or_else(|| args.cache_root.join("manifests").join("validation_report.json"));

    let mut outline_paths = discover_outline_files(&args.output_dir)?;
    outline_paths.sort();

    if outline_paths.is_empty() {
        bail!("no outline files found in {}", args.output_dir.display());
    }

    let mut issues = Vec::<ValidationIssue>::new();
    let mut passed_count = 0usize;

    for path in &outline_paths {
        let filename = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("<non-utf8>")
            .to_string();

        let reasons = validate_outline_file(path);
        if reasons.is_empty() {
            passed_count += 1;
        } else {
            warn!(file = %filename, issues = reasons.len(), "outline failed validation");
            for reason in reasons {
                issues.push(ValidationIssue {
                    filename: filename.clone(),
                    reason,
                });
            }
        }
    }

    let checked_count = outline_paths.len();
    let failed_count = checked_count - passed_count;

    let report = ValidationReport {
        manifest_version: 1,
        generated_at: now_utc_string(),
        output_directory: args.output_dir.display().to_string(),
        checked_count,
        passed_count,
        failed_count,
        issues,
    };

    write_json_pretty(&report_path, &report)?;
    info!(path = %report_path.display(), "wrote validation report");
    info!(
        checked = checked_count,
        passed = passed_count,
        failed = failed_count,
        "validation completed"
    );

    if failed_count > 0 {
        bail!("{failed_count} of {checked_count} outline files failed validation");
    }

    Ok(())
}

fn validate_outline_file(path: &Path) -> Vec<String> {
    let raw = match fs::read(path) {
        Ok(raw) => raw,
        Err(error) => return vec![format!("unreadable file: {error}")],
    };

    match serde_json::from_slice::<Value>(&raw) {
        Ok(value) => check_outline_value(&value),
        Err(error) => vec![format!("invalid JSON: {error}")],
    }
}

fn check_outline_value(value: &Value) -> Vec<String> {
    let mut reasons = Vec::new();

    let Some(object) = value.as_object() else {
        return vec!["root is not an object".to_string()];
    };

    match object.get("title") {
        Some(Value::String(_)) => {}
        Some(_) => reasons.push("title is not a string".to_string()),
        None => reasons.push("missing title field".to_string()),
    }

    match object.get("outline") {
        Some(Value::Array(entries)) => {
            for (index, entry) in entries.iter().enumerate() {
                check_heading_entry(index, entry, &mut reasons);
            }
        }
        Some(_) => reasons.push("outline is not an array".to_string()),
        None => reasons.push("missing outline field".to_string()),
    }

    reasons
}

fn check_heading_entry(index: usize, entry: &Value, reasons: &mut Vec<String>) {
    let Some(object) = entry.as_object() else {
        reasons.push(format!("outline[{index}] is not an object"));
        return;
    };

    match object.get("level").and_then(Value::as_str) {
        Some(level) if HEADING_LEVELS.contains(&level) => {}
        Some(level) => reasons.push(format!("outline[{index}] has invalid level {level:?}")),
        None => reasons.push(format!("outline[{index}] is missing a string level")),
    }

    match object.get("text").and_then(Value::as_str) {
        Some(text) if !text.trim().is_empty() => {}
        Some(_) => reasons.push(format!("outline[{index}] has empty text")),
        None => reasons.push(format!("outline[{index}] is missing string text")),
    }

    match object.get("page").and_then(Value::as_u64) {
        Some(page) if page >= 1 => {}
        Some(_) => reasons.push(format!("outline[{index}] has page below 1")),
        None => reasons.push(format!("outline[{index}] is missing an integer page")),
    }
}

fn discover_outline_files(output_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut outline_files = Vec::new();

    let entries = fs::read_dir(output_dir)
        .with_context(|| format!("failed to read {}", output_dir.display()))?;

    for entry in entries {
        let entry =
            entry.with_context(|| format!("failed to read entry in {}", output_dir.display()))?;
        let path = entry.path();

        if !entry
            .file_type()
            .with_context(|| format!("failed to inspect file type: {}", path.display()))?
            .is_file()
        {
            continue;
        }

        let is_outline = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        if is_outline {
            outline_files.push(path);
        }
    }

    Ok(outline_files)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn well_formed_outline_passes_all_checks() {
        let value = json!({
            "title": "Understanding Artificial Intelligence",
            "outline": [
                { "level": "H1", "text": "Introduction", "page": 1 },
                { "level": "H2", "text": "What is AI?", "page": 2 },
                { "level": "H3", "text": "History of AI", "page": 3 }
            ]
        });

        assert!(check_outline_value(&value).is_empty());
    }

    #[test]
    fn empty_outline_with_title_is_valid() {
        let value = json!({ "title": "Untitled Document", "outline": [] });
        assert!(check_outline_value(&value).is_empty());
    }

    #[test]
    fn missing_fields_are_reported() {
        let reasons = check_outline_value(&json!({}));
        assert_eq!(reasons.len(), 2);
        assert!(reasons.iter().any(|reason| reason.contains("title")));
        assert!(reasons.iter().any(|reason| reason.contains("outline")));
    }

    #[test]
    fn invalid_heading_entries_are_reported() {
        let value = json!({
            "title": "Report",
            "outline": [
                { "level": "H4", "text": "Too deep", "page": 1 },
                { "level": "H1", "text": "   ", "page": 1 },
                { "level": "H1", "text": "Zero page", "page": 0 },
                { "level": "H1", "text": "Float page", "page": 1.5 }
            ]
        });

        let reasons = check_outline_value(&value);
        assert_eq!(reasons.len(), 4);
        assert!(reasons[0].contains("invalid level"));
        assert!(reasons[1].contains("empty text"));
        assert!(reasons[2].contains("page below 1"));
        assert!(reasons[3].contains("integer page"));
    }

    #[test]
    fn non_object_root_is_rejected() {
        let reasons = check_outline_value(&json!([1, 2, 3]));
        assert_eq!(reasons, vec!["root is not an object".to_string()]);
    }
}
