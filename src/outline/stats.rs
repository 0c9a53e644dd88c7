use crate::model::PageSpans;

/// Corpus-wide font-size aggregates, computed once per document. Max/min are
/// absent for an empty span set and never consulted in that case.
#[derive(Debug, Clone, Copy)]
pub struct DocumentStats {
    pub avg_font_size: f64,
    pub max_font_size: Option<f64>,
    pub min_font_size: Option<f64>,
    pub total_span_count: usize,
}

pub fn compute_stats(pages: &[PageSpans], fallback_avg_font_size: f64) -> DocumentStats {
    let mut count = 0usize;
    let mut sum = 0.0_f64;
    let mut max: Option<f64> = None;
    let mut min: Option<f64> = None;

    for page in pages {
        for span in &page.spans {
            count += 1;
            sum += span.font_size;
            max = Some(max.map_or(span.font_size, |value| value.max(span.font_size)));
            min = Some(min.map_or(span.font_size, |value| value.min(span.font_size)));
        }
    }

    if count == 0 {
        return DocumentStats {
            avg_font_size: fallback_avg_font_size,
            max_font_size: None,
            min_font_size: None,
            total_span_count: 0,
        };
    }

    DocumentStats {
        avg_font_size: sum / count as f64,
        max_font_size: max,
        min_font_size: min,
        total_span_count: count,
    }
}
