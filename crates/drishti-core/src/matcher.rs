//! Keyword scoring against the pattern catalog.
//!
//! Pure function: no allocation beyond the lowered input, no panics, and a
//! deterministic first-reaching-highest tie-break. A pattern with zero
//! keyword hits is never a match, even as the only candidate: inputs with
//! no lexical signal route to the dynamic-generation path instead of being
//! forced onto a spurious archetype.

use crate::catalog::{Pattern, PatternCatalog};

/// Outcome of matching user text against the catalog.
///
/// Consumers branch exhaustively on this; the matched/dynamic distinction is
/// a tagged union, never a nullable field probed ad hoc.
#[derive(Debug, Clone)]
pub enum MatchResult<'a> {
    /// No pattern scored above zero.
    NoMatch,
    /// Best-scoring pattern with its keyword-hit count.
    Matched { pattern: &'a Pattern, score: u32 },
}

impl<'a> MatchResult<'a> {
    pub fn is_match(&self) -> bool {
        matches!(self, MatchResult::Matched { .. })
    }

    /// The matched pattern's id, if any.
    pub fn pattern_id(&self) -> Option<&'a str> {
        match self {
            MatchResult::NoMatch => None,
            MatchResult::Matched { pattern, .. } => Some(pattern.id.as_str()),
        }
    }
}

/// Scores every catalog pattern against `text` and returns the best.
///
/// A keyword hits when it occurs case-insensitively as a contiguous substring
/// of the input; multi-word phrases must appear contiguously. Substring
/// matching means "fear" also hits "fearless", an accepted imprecision kept
/// in line with the catalog data that relies on it.
pub fn best_match<'a>(text: &str, catalog: &'a PatternCatalog) -> MatchResult<'a> {
    let lowered = text.trim().to_lowercase();
    if lowered.is_empty() || catalog.is_empty() {
        return MatchResult::NoMatch;
    }

    let mut best: Option<&Pattern> = None;
    let mut highest: u32 = 0;

    for pattern in catalog.iter() {
        let score = pattern
            .keywords
            .iter()
            .filter(|keyword| {
                let k = keyword.trim().to_lowercase();
                !k.is_empty() && lowered.contains(&k)
            })
            .count() as u32;
        // Strictly-greater keeps the first pattern reaching the highest score.
        if score > highest {
            highest = score;
            best = Some(pattern);
        }
    }

    match best {
        Some(pattern) if highest > 0 => MatchResult::Matched {
            pattern,
            score: highest,
        },
        _ => MatchResult::NoMatch,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Pattern;

    fn pattern(id: &str, keywords: &[&str]) -> Pattern {
        Pattern {
            id: id.to_string(),
            name: id.to_string(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            modern_context: "ctx".to_string(),
            mythological_summary: None,
            mythological_source: None,
            philosophical_concept: None,
            philosophical_explanation: None,
            guidance_steps: Vec::new(),
            translations: Default::default(),
        }
    }

    #[test]
    fn zero_overlap_yields_no_match() {
        let catalog =
            PatternCatalog::from_patterns(vec![pattern("a", &["grief"]), pattern("b", &["anger"])]);
        let result = best_match("a perfectly sunny afternoon", &catalog);
        assert!(!result.is_match());
    }

    #[test]
    fn single_keyword_scores_at_least_one() {
        let catalog = PatternCatalog::from_patterns(vec![pattern("grief", &["grief", "sorrow"])]);
        match best_match("River of grief brings me sorrow", &catalog) {
            MatchResult::Matched { pattern, score } => {
                assert_eq!(pattern.id, "grief");
                assert!(score >= 1);
            }
            MatchResult::NoMatch => panic!("expected a match"),
        }
    }

    #[test]
    fn tie_break_prefers_catalog_order() {
        let catalog = PatternCatalog::from_patterns(vec![
            pattern("first", &["torn", "duty"]),
            pattern("second", &["torn", "duty"]),
        ]);
        match best_match("torn between duty and desire", &catalog) {
            MatchResult::Matched { pattern, score } => {
                assert_eq!(pattern.id, "first");
                assert_eq!(score, 2);
            }
            MatchResult::NoMatch => panic!("expected a match"),
        }
    }

    #[test]
    fn multi_word_phrase_must_be_contiguous() {
        let catalog = PatternCatalog::from_patterns(vec![pattern("p", &["family pressure"])]);
        assert!(best_match("the family pressure is constant", &catalog).is_match());
        assert!(!best_match("my family applies a lot of pressure", &catalog).is_match());
    }

    #[test]
    fn substring_hit_crosses_word_boundaries() {
        // Documented imprecision: "fear" hits "fearless".
        let catalog = PatternCatalog::from_patterns(vec![pattern("p", &["fear"])]);
        assert!(best_match("I want to be fearless", &catalog).is_match());
    }

    #[test]
    fn matching_is_case_insensitive() {
        let catalog = PatternCatalog::from_patterns(vec![pattern("p", &["Grief"])]);
        assert!(best_match("GRIEF overwhelms me", &catalog).is_match());
    }

    #[test]
    fn empty_text_and_empty_catalog_are_no_match() {
        let catalog = PatternCatalog::from_patterns(vec![pattern("p", &["grief"])]);
        assert!(!best_match("   ", &catalog).is_match());
        let empty = PatternCatalog::from_patterns(Vec::new());
        assert!(!best_match("grief", &empty).is_match());
    }

    #[test]
    fn higher_score_beats_earlier_position() {
        let catalog = PatternCatalog::from_patterns(vec![
            pattern("one_hit", &["grief"]),
            pattern("two_hits", &["grief", "sorrow"]),
        ]);
        match best_match("grief and sorrow", &catalog) {
            MatchResult::Matched { pattern, score } => {
                assert_eq!(pattern.id, "two_hits");
                assert_eq!(score, 2);
            }
            MatchResult::NoMatch => panic!("expected a match"),
        }
    }
}
