use crate::model::{Heading, HeadingLevel};

use super::patterns::PatternMatcher;
use super::score::HeadingCandidate;

/// Buckets scored candidates into H1/H2/H3. Phase one ranks the distinct
/// font sizes seen among admitted candidates (largest first); phase two lets
/// hierarchical numbering depth override the font rank, which compensates
/// for inconsistently typeset source documents.
#[derive(Debug)]
pub struct LevelClassifier<'a> {
    matcher: &'a PatternMatcher,
}

impl<'a> LevelClassifier<'a> {
    pub fn new(matcher: &'a PatternMatcher) -> Self {
        Self { matcher }
    }

    pub fn classify(&self, candidates: Vec<HeadingCandidate>) -> Vec<Heading> {
        if candidates.is_empty() {
            return Vec::new();
        }

        let size_ranks = distinct_sizes_descending(&candidates);

        let mut headings = candidates
            .into_iter()
            .map(|candidate| {
                let font_rank = size_ranks
                    .iter()
                    .position(|size| *size == candidate.font_size)
                    .unwrap_or(size_ranks.len());
                let base_level = level_for_rank(font_rank);

                let level = match self.matcher.numbering_depth(&candidate.text) {
                    Some(3) => HeadingLevel::H3,
                    Some(2) => HeadingLevel::H2,
                    Some(1) => HeadingLevel::H1,
                    _ => base_level,
                };

                (candidate.page, candidate.y, candidate.into_heading(level))
            })
            .collect::<Vec<(u32, f64, Heading)>>();

        // Stable sort: ties on (page, y) keep discovery order.
        headings.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.total_cmp(&b.1)));

        headings
            .into_iter()
            .map(|(_, _, heading)| heading)
            .collect()
    }
}

fn distinct_sizes_descending(candidates: &[HeadingCandidate]) -> Vec<f64> {
    let mut sizes = candidates
        .iter()
        .map(|candidate| candidate.font_size)
        .collect::<Vec<f64>>();

    sizes.sort_by(|a, b| b.total_cmp(a));
    sizes.dedup();
    sizes
}

fn level_for_rank(rank: usize) -> HeadingLevel {
    match rank {
        0 => HeadingLevel::H1,
        1 => HeadingLevel::H2,
        _ => HeadingLevel::H3,
    }
}
