use serde::{Deserialize, Serialize};

fn default_font_size() -> f64 {
    12.0
}

/// One run of text with uniform font attributes, as produced by the
/// extraction collaborator. The core only ever reads these.
#[derive(Debug, Clone, Deserialize)]
pub struct TextSpan {
    pub text: String,
    #[serde(default = "default_font_size")]
    pub font_size: f64,
    #[serde(default)]
    pub is_bold: bool,
    #[serde(default)]
    pub is_italic: bool,
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    #[serde(default)]
    pub page_number: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PageSpans {
    pub page_number: u32,
    #[serde(default)]
    pub spans: Vec<TextSpan>,
}

/// A span file: the decoded output of the extraction collaborator for one
/// source document.
#[derive(Debug, Clone, Deserialize)]
pub struct SpanDocument {
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub pages: Vec<PageSpans>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HeadingLevel {
    H1,
    H2,
    H3,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Heading {
    pub level: HeadingLevel,
    pub text: String,
    pub page: u32,
}

/// The wire shape written per document: field names and level literals are
/// fixed by the downstream contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutlineDocument {
    pub title: String,
    pub outline: Vec<Heading>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpanFileEntry {
    pub filename: String,
    pub sha256: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpanInventoryManifest {
    pub manifest_version: u32,
    pub generated_at: String,
    pub source_directory: String,
    pub document_count: usize,
    pub documents: Vec<SpanFileEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractPaths {
    pub cache_root: String,
    pub manifest_dir: String,
    pub inventory_manifest_path: String,
    pub input_dir: String,
    pub output_dir: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractCounts {
    pub document_count: usize,
    pub processed_document_count: usize,
    pub failed_document_count: usize,
    pub untitled_document_count: usize,
    pub oversized_document_count: usize,
    pub slow_document_count: usize,
    pub page_count: usize,
    pub span_count: usize,
    pub heading_count: usize,
    pub h1_count: usize,
    pub h2_count: usize,
    pub h3_count: usize,
    pub pages_with_headings: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractRunManifest {
    pub manifest_version: u32,
    pub run_id: String,
    pub status: String,
    pub started_at: String,
    pub updated_at: String,
    pub command: String,
    pub paths: ExtractPaths,
    pub counts: ExtractCounts,
    pub source_hashes: Vec<SpanFileEntry>,
    pub failed_documents: Vec<String>,
    pub warnings: Vec<String>,
    pub notes: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ValidationIssue {
    pub filename: String,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    pub manifest_version: u32,
    pub generated_at: String,
    pub output_directory: String,
    pub checked_count: usize,
    pub passed_count: usize,
    pub failed_count: usize,
    pub issues: Vec<ValidationIssue>,
}
