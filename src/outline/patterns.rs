use anyhow::{Context, Result};
use regex::Regex;

/// Keywords that frequently appear in section headings. Matched as
/// substrings of the lower-cased fragment text.
const HEADING_KEYWORDS: &[&str] = &[
    "introduction",
    "conclusion",
    "abstract",
    "summary",
    "overview",
    "background",
    "methodology",
    "results",
    "discussion",
    "references",
    "acknowledgments",
    "appendix",
    "chapter",
    "section",
    "part",
    "table of contents",
    "executive summary",
    "literature review",
];

/// Prefix shapes that mark heading-like fragments. The whole set matches
/// case-insensitively; first hit wins.
const HEADING_PATTERNS: &[&str] = &[
    r"(?i)^\d+\.?\s+",
    r"(?i)^\d+\.\d+\.?\s+",
    r"(?i)^\d+\.\d+\.\d+\.?\s+",
    r"(?i)^[A-Z][A-Z\s]{2,}$",
    r"(?i)^[IVX]+\.?\s+",
    r"(?i)^[A-Z]\.?\s+",
    r"(?i)^\([a-z]\)\s+",
    r"(?i)^Chapter\s+\d+",
    r"(?i)^Section\s+\d+",
    r"(?i)^Part\s+[IVX]+",
];

/// Stateless predicate library over fragment text. All regexes are compiled
/// once at construction; every method is pure.
#[derive(Debug)]
pub struct PatternMatcher {
    heading_patterns: Vec<Regex>,
    keywords: &'static [&'static str],
    numbered_depth1: Regex,
    numbered_depth2: Regex,
    numbered_depth3: Regex,
    bare_number: Regex,
    page_label: Regex,
}

impl PatternMatcher {
    pub fn new() -> Result<Self> {
        let heading_patterns = HEADING_PATTERNS
            .iter()
            .map(|pattern| {
                Regex::new(pattern)
                    .with_context(|| format!("failed to compile heading pattern: {pattern}"))
            })
            .collect::<Result<Vec<Regex>>>()?;

        Ok(Self {
            heading_patterns,
            keywords: HEADING_KEYWORDS,
            numbered_depth1: Regex::new(r"^\d+\.?\s+")
                .context("failed to compile depth-1 numbering regex")?,
            numbered_depth2: Regex::new(r"^\d+\.\d+\.?\s+")
                .context("failed to compile depth-2 numbering regex")?,
            numbered_depth3: Regex::new(r"^\d+\.\d+\.\d+\.?\s+")
                .context("failed to compile depth-3 numbering regex")?,
            bare_number: Regex::new(r"^\d+$").context("failed to compile bare number regex")?,
            page_label: Regex::new(r"^page\s+\d+").context("failed to compile page label regex")?,
        })
    }

    pub fn matches_heading_pattern(&self, text: &str) -> bool {
        self.heading_patterns
            .iter()
            .any(|pattern| pattern.is_match(text))
    }

    /// True only for a bare numeric prefix ("1. " or "1 ").
    pub fn has_numbering(&self, text: &str) -> bool {
        self.numbered_depth1.is_match(text)
    }

    /// Depth of a hierarchical numeric prefix: 3 for "1.1.1 ", 2 for "1.1 ",
    /// 1 for "1. ", None otherwise. Deepest prefix wins.
    pub fn numbering_depth(&self, text: &str) -> Option<u8> {
        if self.numbered_depth3.is_match(text) {
            Some(3)
        } else if self.numbered_depth2.is_match(text) {
            Some(2)
        } else if self.numbered_depth1.is_match(text) {
            Some(1)
        } else {
            None
        }
    }

    pub fn contains_heading_keyword(&self, text: &str) -> bool {
        let lower = text.to_lowercase();
        self.keywords.iter().any(|keyword| lower.contains(keyword))
    }

    /// Page numbers, copyright lines, URLs, and mail addresses: fragments
    /// that belong to the page chrome, not the document body.
    pub fn is_likely_header_footer(&self, text: &str) -> bool {
        let lower = text.trim().to_lowercase();

        if self.bare_number.is_match(&lower) || self.page_label.is_match(&lower) {
            return true;
        }

        if lower.starts_with("copyright")
            || lower.starts_with('\u{a9}')
            || lower.starts_with("www.")
            || lower.starts_with("http")
            || lower.contains('@')
        {
            return true;
        }

        lower.chars().count() <= 3 && !lower.is_empty() && lower.chars().all(char::is_numeric)
    }

    /// At least two words, and at least 60% of them open with an uppercase
    /// letter and run longer than one character.
    pub fn is_title_case(&self, text: &str) -> bool {
        let words = text.split_whitespace().collect::<Vec<&str>>();
        if words.len() < 2 {
            return false;
        }

        let title_words = words
            .iter()
            .filter(|word| {
                word.chars().next().is_some_and(char::is_uppercase) && word.chars().count() > 1
            })
            .count();

        title_words as f64 / words.len() as f64 >= 0.6
    }
}
