use super::*;

use crate::model::{HeadingLevel, PageSpans, TextSpan};

fn span(text: &str, font_size: f64, is_bold: bool, x: f64, y: f64, page_number: u32) -> TextSpan {
    TextSpan {
        text: text.to_string(),
        font_size,
        is_bold,
        is_italic: false,
        x,
        y,
        page_number,
    }
}

fn page(page_number: u32, spans: Vec<TextSpan>) -> PageSpans {
    PageSpans { page_number, spans }
}

fn matcher() -> PatternMatcher {
    PatternMatcher::new().expect("pattern matcher compiles")
}

#[test]
fn matches_heading_pattern_detects_numbered_and_labeled_prefixes() {
    let matcher = matcher();

    assert!(matcher.matches_heading_pattern("1. Introduction"));
    assert!(matcher.matches_heading_pattern("1.1.1 Detail"));
    assert!(matcher.matches_heading_pattern("IV. Evaluation"));
    assert!(matcher.matches_heading_pattern("A. Scope"));
    assert!(matcher.matches_heading_pattern("(a) first item"));
    assert!(matcher.matches_heading_pattern("Chapter 3"));
    assert!(matcher.matches_heading_pattern("Part IV"));
    assert!(matcher.matches_heading_pattern("RELATED WORK"));

    assert!(!matcher.matches_heading_pattern("plain body sentence, nothing more."));
}

#[test]
fn has_numbering_requires_bare_numeric_prefix() {
    let matcher = matcher();

    assert!(matcher.has_numbering("1. Introduction"));
    assert!(matcher.has_numbering("12 Results"));
    assert!(!matcher.has_numbering("Introduction"));
    assert!(!matcher.has_numbering("A. Introduction"));
}

#[test]
fn numbering_depth_prefers_deepest_prefix() {
    let matcher = matcher();

    assert_eq!(matcher.numbering_depth("1. Overview"), Some(1));
    assert_eq!(matcher.numbering_depth("2.3 Design"), Some(2));
    assert_eq!(matcher.numbering_depth("2.3.1 Details"), Some(3));
    assert_eq!(matcher.numbering_depth("Appendix"), None);
}

#[test]
fn heading_keywords_match_case_insensitively() {
    let matcher = matcher();

    assert!(matcher.contains_heading_keyword("METHODOLOGY"));
    assert!(matcher.contains_heading_keyword("Executive Summary of findings"));
    assert!(!matcher.contains_heading_keyword("unrelated body text"));
}

#[test]
fn header_footer_filter_drops_page_chrome() {
    let matcher = matcher();

    assert!(matcher.is_likely_header_footer("42"));
    assert!(matcher.is_likely_header_footer("Page 12"));
    assert!(matcher.is_likely_header_footer("Copyright 2024 Acme"));
    assert!(matcher.is_likely_header_footer("\u{a9} 2024 Acme"));
    assert!(matcher.is_likely_header_footer("www.example.com"));
    assert!(matcher.is_likely_header_footer("https://example.com/doc"));
    assert!(matcher.is_likely_header_footer("contact@example.com"));

    assert!(!matcher.is_likely_header_footer("Introduction"));
    assert!(!matcher.is_likely_header_footer("1. Introduction"));
}

#[test]
fn title_case_requires_majority_capitalized_words() {
    let matcher = matcher();

    assert!(matcher.is_title_case("The Quick Brown Fox"));
    assert!(matcher.is_title_case("Machine Learning in Practice"));
    assert!(!matcher.is_title_case("Introduction"));
    assert!(!matcher.is_title_case("a plain lowercase sentence"));
}

#[test]
fn compute_stats_aggregates_font_sizes() {
    let pages = vec![
        page(
            1,
            vec![
                span("one", 10.0, false, 0.0, 10.0, 1),
                span("two", 14.0, false, 0.0, 20.0, 1),
            ],
        ),
        page(2, vec![span("three", 18.0, false, 0.0, 10.0, 2)]),
    ];

    let stats = compute_stats(&pages, 12.0);
    assert_eq!(stats.total_span_count, 3);
    assert!((stats.avg_font_size - 14.0).abs() < 1e-9);
    assert_eq!(stats.max_font_size, Some(18.0));
    assert_eq!(stats.min_font_size, Some(10.0));
}

#[test]
fn compute_stats_empty_input_uses_fallback_average() {
    let stats = compute_stats(&[], 12.0);

    assert_eq!(stats.total_span_count, 0);
    assert!((stats.avg_font_size - 12.0).abs() < 1e-9);
    assert_eq!(stats.max_font_size, None);
    assert_eq!(stats.min_font_size, None);
}

#[test]
fn score_saturates_and_admits_strong_heading() {
    let matcher = matcher();
    let config = OutlineConfig::default();
    let scorer = HeadingScorer::new(&matcher, &config);
    let stats = compute_stats(&[], 12.0);

    let strong = span("METHODOLOGY", 18.0, true, 40.0, 120.0, 2);
    assert!((scorer.score(&strong, &stats) - 1.0).abs() < 1e-9);

    let candidate = scorer.admit(&strong, &stats).expect("strong heading admitted");
    assert_eq!(candidate.page, 2);
    assert!(candidate.matches_pattern);
    assert!(candidate.contains_keyword);
    assert!(!candidate.has_numbering);
}

#[test]
fn score_never_leaves_unit_interval() {
    let matcher = matcher();
    let config = OutlineConfig::default();
    let scorer = HeadingScorer::new(&matcher, &config);
    let stats = compute_stats(&[], 12.0);

    // A long, small-font paragraph collects only the penalty; the clamp
    // floors it at zero.
    let body = "this paragraph rambles on, clause after clause, with commas. ".repeat(5);
    let weak = span(body.trim(), 8.0, false, 150.0, 400.0, 3);
    assert_eq!(scorer.score(&weak, &stats), 0.0);

    let strong = span("1. EXECUTIVE SUMMARY", 30.0, true, 10.0, 40.0, 1);
    let score = scorer.score(&strong, &stats);
    assert!((0.0..=1.0).contains(&score));
    assert!((score - 1.0).abs() < 1e-9);
}

#[test]
fn admission_drops_short_chrome_and_weak_fragments() {
    let matcher = matcher();
    let config = OutlineConfig::default();
    let scorer = HeadingScorer::new(&matcher, &config);
    let stats = compute_stats(&[], 12.0);

    assert!(scorer.admit(&span("A", 20.0, true, 0.0, 0.0, 1), &stats).is_none());
    assert!(scorer.admit(&span("42", 20.0, true, 0.0, 0.0, 1), &stats).is_none());
    assert!(
        scorer
            .admit(&span("Page 7", 20.0, true, 0.0, 0.0, 1), &stats)
            .is_none()
    );

    let body = "an ordinary sentence of body text that trails off with a period.";
    assert!(scorer.admit(&span(body, 10.0, false, 150.0, 0.0, 1), &stats).is_none());
}

fn admit_all(pages: &[PageSpans]) -> Vec<HeadingCandidate> {
    let matcher = matcher();
    let config = OutlineConfig::default();
    let scorer = HeadingScorer::new(&matcher, &config);
    let stats = compute_stats(pages, config.default_font_size);

    pages
        .iter()
        .flat_map(|page| page.spans.iter())
        .filter_map(|span| scorer.admit(span, &stats))
        .collect()
}

#[test]
fn classifier_assigns_levels_by_font_rank() {
    let pages = vec![page(
        1,
        vec![
            span("Major Section Heading", 24.0, true, 20.0, 100.0, 1),
            span("Minor Section Heading", 18.0, true, 20.0, 200.0, 1),
            span("Detail Level Heading", 14.0, true, 20.0, 300.0, 1),
            span("Another Detail Heading", 13.0, true, 20.0, 400.0, 1),
        ],
    )];

    let matcher = matcher();
    let candidates = admit_all(&pages);
    assert_eq!(candidates.len(), 4);

    let headings = LevelClassifier::new(&matcher).classify(candidates);
    let levels = headings
        .iter()
        .map(|heading| heading.level)
        .collect::<Vec<HeadingLevel>>();

    // Rank 0 is H1, rank 1 is H2, rank 2 and below are H3.
    assert_eq!(
        levels,
        vec![
            HeadingLevel::H1,
            HeadingLevel::H2,
            HeadingLevel::H3,
            HeadingLevel::H3
        ]
    );
}

#[test]
fn numbering_override_beats_font_rank() {
    let pages = vec![page(
        1,
        vec![
            span("Unnumbered Top Heading", 24.0, true, 20.0, 100.0, 1),
            span("1.1.1 Detail", 24.0, true, 20.0, 200.0, 1),
        ],
    )];

    let matcher = matcher();
    let headings = LevelClassifier::new(&matcher).classify(admit_all(&pages));
    assert_eq!(headings.len(), 2);

    // Both share the rank-0 font size, but the three-level prefix forces H3.
    assert_eq!(headings[0].level, HeadingLevel::H1);
    assert_eq!(headings[1].level, HeadingLevel::H3);
    assert_eq!(headings[1].text, "1.1.1 Detail");
}

#[test]
fn single_font_size_yields_h1_unless_numbered() {
    let pages = vec![page(
        1,
        vec![
            span("Opening Remarks Heading", 20.0, true, 20.0, 100.0, 1),
            span("2.4 Numbered Heading", 20.0, true, 20.0, 200.0, 1),
            span("Closing Remarks Heading", 20.0, true, 20.0, 300.0, 1),
        ],
    )];

    let matcher = matcher();
    let headings = LevelClassifier::new(&matcher).classify(admit_all(&pages));

    assert_eq!(headings[0].level, HeadingLevel::H1);
    assert_eq!(headings[1].level, HeadingLevel::H2);
    assert_eq!(headings[2].level, HeadingLevel::H1);
}

#[test]
fn outline_is_sorted_by_page_then_vertical_position() {
    let pages = vec![
        page(
            2,
            vec![
                span("Later Page Heading", 20.0, true, 20.0, 50.0, 2),
                span("Bottom Of Later Page", 20.0, true, 20.0, 600.0, 2),
            ],
        ),
        page(
            1,
            vec![
                span("Lower First Page Heading", 20.0, true, 20.0, 400.0, 1),
                span("Upper First Page Heading", 20.0, true, 20.0, 80.0, 1),
            ],
        ),
    ];

    let matcher = matcher();
    let headings = LevelClassifier::new(&matcher).classify(admit_all(&pages));

    let order = headings
        .iter()
        .map(|heading| (heading.page, heading.text.as_str()))
        .collect::<Vec<(u32, &str)>>();
    assert_eq!(
        order,
        vec![
            (1, "Upper First Page Heading"),
            (1, "Lower First Page Heading"),
            (2, "Later Page Heading"),
            (2, "Bottom Of Later Page"),
        ]
    );
}

#[test]
fn ties_on_page_and_position_keep_discovery_order() {
    let pages = vec![page(
        1,
        vec![
            span("First Discovered Heading", 20.0, true, 20.0, 100.0, 1),
            span("Second Discovered Heading", 20.0, true, 20.0, 100.0, 1),
        ],
    )];

    let matcher = matcher();
    let headings = LevelClassifier::new(&matcher).classify(admit_all(&pages));

    assert_eq!(headings[0].text, "First Discovered Heading");
    assert_eq!(headings[1].text, "Second Discovered Heading");
}

#[test]
fn classification_is_idempotent_on_unchanged_candidates() {
    let pages = vec![page(
        1,
        vec![
            span("Major Section Heading", 24.0, true, 20.0, 100.0, 1),
            span("1.2 Numbered Heading", 18.0, true, 20.0, 200.0, 1),
            span("Minor Section Heading", 14.0, true, 20.0, 300.0, 1),
        ],
    )];

    let matcher = matcher();
    let candidates = admit_all(&pages);

    let first = LevelClassifier::new(&matcher).classify(candidates.clone());
    let second = LevelClassifier::new(&matcher).classify(candidates);
    assert_eq!(first, second);
}

#[test]
fn title_prefers_largest_font_then_topmost() {
    let pages = vec![page(
        1,
        vec![
            span("Draft Paper", 24.0, false, 40.0, 50.0, 1),
            span("Author Name", 14.0, false, 40.0, 90.0, 1),
        ],
    )];

    let matcher = matcher();
    let config = OutlineConfig::default();
    let stats = compute_stats(&pages, config.default_font_size);

    let title = TitleSelector::new(&matcher, &config).select(&pages, &stats);
    assert_eq!(title, "Draft Paper");
}

#[test]
fn title_cleanup_strips_label_prefix_and_capitalizes() {
    let pages = vec![page(
        1,
        vec![span("Title:   the  quarterly   report", 24.0, false, 40.0, 50.0, 1)],
    )];

    let matcher = matcher();
    let config = OutlineConfig::default();
    let stats = compute_stats(&pages, config.default_font_size);

    let title = TitleSelector::new(&matcher, &config).select(&pages, &stats);
    assert_eq!(title, "The quarterly report");
}

#[test]
fn title_cleanup_empty_result_falls_back_to_sentinel() {
    let pages = vec![page(1, vec![span("title:", 24.0, false, 40.0, 50.0, 1)])];

    let matcher = matcher();
    let config = OutlineConfig::default();
    let stats = compute_stats(&pages, config.default_font_size);

    let title = TitleSelector::new(&matcher, &config).select(&pages, &stats);
    assert_eq!(title, UNTITLED_TITLE);
}

#[test]
fn empty_document_produces_sentinel_and_empty_outline() {
    let engine = OutlineEngine::new().expect("engine builds");

    let result = engine.extract(&[]);
    assert_eq!(result.title, UNTITLED_TITLE);
    assert!(result.outline.is_empty());

    let empty_page = vec![page(1, Vec::new())];
    let result = engine.extract(&empty_page);
    assert_eq!(result.title, UNTITLED_TITLE);
    assert!(result.outline.is_empty());
}

#[test]
fn extracted_headings_satisfy_output_invariants() {
    let pages = vec![
        page(
            1,
            vec![
                span("Understanding Distributed Systems", 28.0, true, 40.0, 60.0, 1),
                span("1. Introduction", 20.0, true, 40.0, 140.0, 1),
                span("a short body sentence that should not be a heading.", 11.0, false, 40.0, 200.0, 1),
            ],
        ),
        page(
            2,
            vec![
                span("1.1 Scope", 16.0, true, 40.0, 80.0, 2),
                span("42", 11.0, false, 300.0, 700.0, 2),
            ],
        ),
    ];

    let engine = OutlineEngine::new().expect("engine builds");
    let result = engine.extract(&pages);

    assert_eq!(result.title, "Understanding Distributed Systems");
    assert!(!result.outline.is_empty());
    for heading in &result.outline {
        assert!(!heading.text.trim().is_empty());
        assert!(heading.page >= 1);
        assert!(matches!(
            heading.level,
            HeadingLevel::H1 | HeadingLevel::H2 | HeadingLevel::H3
        ));
    }

    let pages_in_order = result
        .outline
        .iter()
        .map(|heading| heading.page)
        .collect::<Vec<u32>>();
    let mut sorted = pages_in_order.clone();
    sorted.sort_unstable();
    assert_eq!(pages_in_order, sorted);
}

#[test]
fn wire_shape_uses_exact_field_names_and_level_literals() {
    let pages = vec![page(
        1,
        vec![
            span("Annual Review", 28.0, true, 40.0, 40.0, 1),
            span("1. Introduction", 18.0, true, 40.0, 120.0, 1),
            span("1.1 Scope", 15.0, true, 40.0, 180.0, 1),
            span("1.1.1 Detail", 13.0, true, 40.0, 240.0, 1),
        ],
    )];

    let engine = OutlineEngine::new().expect("engine builds");
    let value = serde_json::to_value(engine.extract(&pages)).expect("serializes");

    assert_eq!(value["title"], "Annual Review");
    // The title fragment itself is admitted as a rank-0 heading too.
    let outline = value["outline"].as_array().expect("outline is an array");
    assert_eq!(outline.len(), 4);
    assert_eq!(outline[0]["level"], "H1");
    assert_eq!(outline[1]["level"], "H1");
    assert_eq!(outline[2]["level"], "H2");
    assert_eq!(outline[3]["level"], "H3");
    assert_eq!(outline[1]["text"], "1. Introduction");
    assert_eq!(outline[1]["page"], 1);
}

#[test]
fn numbered_headings_score_across_scripts() {
    let matcher = matcher();
    let config = OutlineConfig::default();
    let scorer = HeadingScorer::new(&matcher, &config);
    let stats = compute_stats(&[], 12.0);

    for text in ["1. Введение", "2.1 方法論", "1. مقدمة", "2. पद्धति"] {
        let heading = span(text, 16.0, true, 50.0, 100.0, 1);
        let candidate = scorer.admit(&heading, &stats);
        assert!(candidate.is_some(), "expected admission for {text}");
    }

    assert!(matcher.has_numbering("1. Введение"));
    assert_eq!(matcher.numbering_depth("2.1 方法論"), Some(2));
}
