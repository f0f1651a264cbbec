//! Generation request assembly.
//!
//! The request is an ephemeral value object, never persisted. When a catalog
//! pattern matched, its locale-resolved fields ride along as seed material;
//! the generator personalizes this material rather than copying it. On the
//! dynamic path the generator works from the user text alone.

use serde::Serialize;

use crate::matcher::MatchResult;
use crate::resolver::resolve_view;

/// Matched-pattern context attached to a generation request.
///
/// Contract with the generator: strong inspiration, not canonical output.
#[derive(Debug, Clone, Serialize)]
pub struct PatternSeed {
    pub pattern_id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mythological_summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub philosophical_concept: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub initial_guidance: Vec<String>,
}

/// Structured input for the external generator.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationRequest {
    pub user_text: String,
    /// Already normalized at the boundary; never re-defaulted downstream.
    pub locale: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<PatternSeed>,
}

/// Composes the generator payload from user text, a normalized locale, and
/// the match outcome. Matched-pattern fields are resolved for `locale`
/// before being attached, so the seed reads in the user's language where the
/// catalog carries translations.
pub fn build_request(user_text: &str, locale: &str, matched: &MatchResult<'_>) -> GenerationRequest {
    let seed = match matched {
        MatchResult::NoMatch => None,
        MatchResult::Matched { pattern, .. } => {
            let view = resolve_view(pattern, locale);
            Some(PatternSeed {
                pattern_id: view.id,
                name: view.name,
                mythological_summary: view.mythological_summary,
                philosophical_concept: view.philosophical_concept,
                initial_guidance: view.guidance_steps,
            })
        }
    };

    GenerationRequest {
        user_text: user_text.to_string(),
        locale: locale.to_string(),
        seed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Pattern, PatternCatalog};
    use crate::matcher::best_match;

    fn catalog() -> PatternCatalog {
        PatternCatalog::from_patterns(vec![Pattern {
            id: "crossroads".to_string(),
            name: "The Crossroads".to_string(),
            keywords: vec!["torn".to_string()],
            modern_context: "ctx".to_string(),
            mythological_summary: Some("Arjuna at Kurukshetra".to_string()),
            mythological_source: Some("Mahabharata".to_string()),
            philosophical_concept: Some("Nishkama Karma".to_string()),
            philosophical_explanation: Some("explained".to_string()),
            guidance_steps: vec!["step".to_string()],
            translations: Default::default(),
        }])
    }

    #[test]
    fn matched_pattern_attaches_seed_context() {
        let catalog = catalog();
        let matched = best_match("I feel torn", &catalog);
        let request = build_request("I feel torn", "en", &matched);
        let seed = request.seed.expect("seed");
        assert_eq!(seed.pattern_id, "crossroads");
        assert_eq!(seed.name, "The Crossroads");
        assert_eq!(
            seed.mythological_summary.as_deref(),
            Some("Arjuna at Kurukshetra")
        );
        assert_eq!(seed.philosophical_concept.as_deref(), Some("Nishkama Karma"));
        assert_eq!(seed.initial_guidance, vec!["step"]);
    }

    #[test]
    fn no_match_omits_seed() {
        let catalog = catalog();
        let matched = best_match("sunny afternoon", &catalog);
        let request = build_request("sunny afternoon", "hi", &matched);
        assert!(request.seed.is_none());
        assert_eq!(request.locale, "hi");
    }
}
