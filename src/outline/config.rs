/// Additive score contributions for the heading likelihood model. The values
/// are empirically tuned, not derived; keeping them here means retuning never
/// touches control flow.
#[derive(Debug, Clone)]
pub struct ScoreWeights {
    pub large_font_bonus: f64,
    pub above_average_font_bonus: f64,
    pub bold_bonus: f64,
    pub left_margin_bonus: f64,
    pub pattern_bonus: f64,
    pub keyword_bonus: f64,
    pub compact_length_bonus: f64,
    pub long_text_penalty: f64,
    pub title_case_bonus: f64,
    pub uppercase_bonus: f64,
    pub clean_ending_bonus: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            large_font_bonus: 0.30,
            above_average_font_bonus: 0.15,
            bold_bonus: 0.20,
            left_margin_bonus: 0.10,
            pattern_bonus: 0.25,
            keyword_bonus: 0.15,
            compact_length_bonus: 0.10,
            long_text_penalty: 0.20,
            title_case_bonus: 0.10,
            uppercase_bonus: 0.15,
            clean_ending_bonus: 0.05,
        }
    }
}

/// Thresholds and cutoffs for scoring, candidate admission, and title
/// selection. All lengths are in characters, not bytes.
#[derive(Debug, Clone)]
pub struct OutlineConfig {
    pub weights: ScoreWeights,
    pub admission_threshold: f64,
    pub large_font_ratio: f64,
    pub left_margin_x: f64,
    pub min_candidate_chars: usize,
    pub max_candidate_chars: usize,
    pub compact_min_chars: usize,
    pub compact_max_chars: usize,
    pub long_text_chars: usize,
    pub uppercase_min_chars: usize,
    pub min_title_chars: usize,
    pub max_title_chars: usize,
    pub default_font_size: f64,
}

impl Default for OutlineConfig {
    fn default() -> Self {
        Self {
            weights: ScoreWeights::default(),
            admission_threshold: 0.3,
            large_font_ratio: 1.2,
            left_margin_x: 100.0,
            min_candidate_chars: 2,
            max_candidate_chars: 300,
            compact_min_chars: 5,
            compact_max_chars: 100,
            long_text_chars: 200,
            uppercase_min_chars: 3,
            min_title_chars: 3,
            max_title_chars: 200,
            default_font_size: 12.0,
        }
    }
}
