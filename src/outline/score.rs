use crate::model::{Heading, HeadingLevel, TextSpan};

use super::config::OutlineConfig;
use super::patterns::PatternMatcher;
use super::stats::DocumentStats;

/// A fragment that passed the admission filter, scored and awaiting level
/// assignment. Immutable: classification produces a `Heading` instead of
/// mutating the candidate.
#[derive(Debug, Clone)]
pub struct HeadingCandidate {
    pub text: String,
    pub page: u32,
    pub font_size: f64,
    pub y: f64,
    pub score: f64,
    pub has_numbering: bool,
    pub matches_pattern: bool,
    pub contains_keyword: bool,
}

impl HeadingCandidate {
    pub fn into_heading(self, level: HeadingLevel) -> Heading {
        Heading {
            level,
            text: self.text,
            page: self.page,
        }
    }
}

/// Combines fragment attributes, corpus statistics, and pattern predicates
/// into one additive likelihood score in [0, 1].
#[derive(Debug)]
pub struct HeadingScorer<'a> {
    matcher: &'a PatternMatcher,
    config: &'a OutlineConfig,
}

impl<'a> HeadingScorer<'a> {
    pub fn new(matcher: &'a PatternMatcher, config: &'a OutlineConfig) -> Self {
        Self { matcher, config }
    }

    pub fn score(&self, span: &TextSpan, stats: &DocumentStats) -> f64 {
        let weights = &self.config.weights;
        let text = span.text.trim();
        let char_count = text.chars().count();
        let mut score = 0.0_f64;

        if span.font_size > stats.avg_font_size * self.config.large_font_ratio {
            score += weights.large_font_bonus;
        } else if span.font_size > stats.avg_font_size {
            score += weights.above_average_font_bonus;
        }

        if span.is_bold {
            score += weights.bold_bonus;
        }

        if span.x < self.config.left_margin_x {
            score += weights.left_margin_bonus;
        }

        if self.matcher.matches_heading_pattern(text) {
            score += weights.pattern_bonus;
        }

        if self.matcher.contains_heading_keyword(text) {
            score += weights.keyword_bonus;
        }

        if char_count >= self.config.compact_min_chars
            && char_count <= self.config.compact_max_chars
        {
            score += weights.compact_length_bonus;
        } else if char_count > self.config.long_text_chars {
            score -= weights.long_text_penalty;
        }

        // Title case is checked before the all-caps bonus; a fragment earns
        // at most one of the two.
        if self.matcher.is_title_case(text) {
            score += weights.title_case_bonus;
        } else if is_fully_uppercase(text) && char_count > self.config.uppercase_min_chars {
            score += weights.uppercase_bonus;
        }

        if !text.ends_with('.') && !text.ends_with(',') {
            score += weights.clean_ending_bonus;
        }

        score.clamp(0.0, 1.0)
    }

    /// Admission filter: fragments that are too short, too long, look like
    /// page chrome, or score at or below the threshold are dropped silently.
    pub fn admit(&self, span: &TextSpan, stats: &DocumentStats) -> Option<HeadingCandidate> {
        let text = span.text.trim();
        let char_count = text.chars().count();

        if char_count < self.config.min_candidate_chars
            || char_count > self.config.max_candidate_chars
        {
            return None;
        }

        if self.matcher.is_likely_header_footer(text) {
            return None;
        }

        let score = self.score(span, stats);
        if score <= self.config.admission_threshold {
            return None;
        }

        Some(HeadingCandidate {
            text: text.to_string(),
            page: span.page_number,
            font_size: span.font_size,
            y: span.y,
            score,
            has_numbering: self.matcher.has_numbering(text),
            matches_pattern: self.matcher.matches_heading_pattern(text),
            contains_keyword: self.matcher.contains_heading_keyword(text),
        })
    }
}

/// Python-style isupper: at least one cased character and none lowercase.
fn is_fully_uppercase(text: &str) -> bool {
    text.chars().any(char::is_uppercase) && !text.chars().any(char::is_lowercase)
}
