use crate::model::PageSpans;

use super::config::OutlineConfig;
use super::patterns::PatternMatcher;
use super::stats::DocumentStats;

/// Fallback when no usable title candidate exists on the first page.
pub const UNTITLED_TITLE: &str = "Untitled Document";

const TITLE_PREFIXES: &[&str] = &["title:", "document:", "paper:"];

#[derive(Debug)]
struct TitleCandidate {
    text: String,
    font_size: f64,
    y: f64,
}

/// Picks the document title from first-page fragments: largest font wins,
/// topmost among ties.
#[derive(Debug)]
pub struct TitleSelector<'a> {
    matcher: &'a PatternMatcher,
    config: &'a OutlineConfig,
}

impl<'a> TitleSelector<'a> {
    pub fn new(matcher: &'a PatternMatcher, config: &'a OutlineConfig) -> Self {
        Self { matcher, config }
    }

    pub fn select(&self, pages: &[PageSpans], stats: &DocumentStats) -> String {
        let Some(first_page) = pages.first() else {
            return UNTITLED_TITLE.to_string();
        };

        let mut candidates = Vec::<TitleCandidate>::new();

        for span in &first_page.spans {
            if span.font_size < stats.avg_font_size {
                continue;
            }

            let text = span.text.trim();
            let char_count = text.chars().count();
            if char_count < self.config.min_title_chars || char_count > self.config.max_title_chars
            {
                continue;
            }

            if self.matcher.is_likely_header_footer(text) {
                continue;
            }

            candidates.push(TitleCandidate {
                text: text.to_string(),
                font_size: span.font_size,
                y: span.y,
            });
        }

        if candidates.is_empty() {
            return UNTITLED_TITLE.to_string();
        }

        candidates.sort_by(|a, b| {
            b.font_size
                .total_cmp(&a.font_size)
                .then_with(|| a.y.total_cmp(&b.y))
        });

        let title = clean_title_text(&candidates[0].text);
        if title.is_empty() {
            UNTITLED_TITLE.to_string()
        } else {
            title
        }
    }
}

/// Collapse whitespace, strip one leading label prefix, and uppercase the
/// first character.
fn clean_title_text(raw: &str) -> String {
    let mut title = raw.split_whitespace().collect::<Vec<&str>>().join(" ");

    for prefix in TITLE_PREFIXES {
        let matches_prefix = title
            .get(..prefix.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(prefix));
        if matches_prefix {
            title = title[prefix.len()..].trim().to_string();
            break;
        }
    }

    let mut chars = title.chars();
    match chars.next() {
        Some(first) if first.is_lowercase() => {
            format!("{}{}", first.to_uppercase(), chars.as_str())
        }
        _ => title,
    }
}
