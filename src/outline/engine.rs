use anyhow::Result;
use tracing::debug;

use crate::model::{OutlineDocument, PageSpans};

use super::classify::LevelClassifier;
use super::config::OutlineConfig;
use super::patterns::PatternMatcher;
use super::score::{HeadingCandidate, HeadingScorer};
use super::stats::compute_stats;
use super::title::TitleSelector;

/// The full inference pipeline: statistics, per-fragment scoring, level
/// classification, and title selection. One synchronous call per document,
/// no state carried across calls.
#[derive(Debug)]
pub struct OutlineEngine {
    matcher: PatternMatcher,
    config: OutlineConfig,
}

impl OutlineEngine {
    pub fn new() -> Result<Self> {
        Self::with_config(OutlineConfig::default())
    }

    pub fn with_config(config: OutlineConfig) -> Result<Self> {
        Ok(Self {
            matcher: PatternMatcher::new()?,
            config,
        })
    }

    pub fn extract(&self, pages: &[PageSpans]) -> OutlineDocument {
        let stats = compute_stats(pages, self.config.default_font_size);
        debug!(
            spans = stats.total_span_count,
            avg_font_size = stats.avg_font_size,
            max_font_size = ?stats.max_font_size,
            min_font_size = ?stats.min_font_size,
            "computed document statistics"
        );

        let scorer = HeadingScorer::new(&self.matcher, &self.config);
        let candidates = pages
            .iter()
            .flat_map(|page| page.spans.iter())
            .filter_map(|span| scorer.admit(span, &stats))
            .collect::<Vec<HeadingCandidate>>();

        debug!(
            candidates = candidates.len(),
            numbered = candidates.iter().filter(|c| c.has_numbering).count(),
            patterned = candidates.iter().filter(|c| c.matches_pattern).count(),
            keyword_hits = candidates.iter().filter(|c| c.contains_keyword).count(),
            top_score = candidates
                .iter()
                .map(|c| c.score)
                .fold(0.0_f64, f64::max),
            "admitted heading candidates"
        );

        let outline = LevelClassifier::new(&self.matcher).classify(candidates);
        let title = TitleSelector::new(&self.matcher, &self.config).select(pages, &stats);

        OutlineDocument { title, outline }
    }
}
