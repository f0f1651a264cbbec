//! Localization resolver: merges locale overrides over a pattern's base fields.
//!
//! The merge is field-by-field, not all-or-nothing: a pattern may carry a
//! Hindi override for guidance steps but not for the mythological summary,
//! and each resolves independently. Blank overrides (empty after trimming)
//! are treated as absent. Dynamically generated content never passes through
//! here; the generator is instructed to produce the target locale directly.

use crate::catalog::Pattern;
use crate::locale::DEFAULT_LOCALE;

/// A pattern with all localizable fields resolved for one target locale.
#[derive(Debug, Clone)]
pub struct ResolvedPatternView {
    pub id: String,
    pub name: String,
    pub modern_context: String,
    pub mythological_summary: Option<String>,
    pub mythological_source: Option<String>,
    pub philosophical_concept: Option<String>,
    pub philosophical_explanation: Option<String>,
    pub guidance_steps: Vec<String>,
}

fn non_blank(value: &Option<String>) -> Option<&String> {
    value.as_ref().filter(|s| !s.trim().is_empty())
}

/// Resolves `pattern` for `locale`, substituting per-field overrides where
/// present and falling back to the base-locale values otherwise.
pub fn resolve_view(pattern: &Pattern, locale: &str) -> ResolvedPatternView {
    let translation = if locale == DEFAULT_LOCALE {
        None
    } else {
        pattern.translations.get(locale)
    };

    let mut view = ResolvedPatternView {
        id: pattern.id.clone(),
        name: pattern.name.clone(),
        modern_context: pattern.modern_context.clone(),
        mythological_summary: pattern.mythological_summary.clone(),
        mythological_source: pattern.mythological_source.clone(),
        philosophical_concept: pattern.philosophical_concept.clone(),
        philosophical_explanation: pattern.philosophical_explanation.clone(),
        guidance_steps: pattern.guidance_steps.clone(),
    };

    let Some(t) = translation else {
        return view;
    };

    if let Some(name) = non_blank(&t.name) {
        view.name = name.clone();
    }
    if let Some(ctx) = non_blank(&t.modern_context) {
        view.modern_context = ctx.clone();
    }
    if let Some(summary) = non_blank(&t.mythological_summary) {
        view.mythological_summary = Some(summary.clone());
    }
    if let Some(explanation) = non_blank(&t.philosophical_explanation) {
        view.philosophical_explanation = Some(explanation.clone());
    }
    if let Some(steps) = t.guidance_steps.as_ref().filter(|s| !s.is_empty()) {
        view.guidance_steps = steps.clone();
    }

    view
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::PatternTranslation;

    fn pattern_with_hindi_steps() -> Pattern {
        let mut translations = std::collections::BTreeMap::new();
        translations.insert(
            "hi".to_string(),
            PatternTranslation {
                guidance_steps: Some(vec!["पहला कदम".to_string(), "दूसरा कदम".to_string()]),
                ..Default::default()
            },
        );
        Pattern {
            id: "p".to_string(),
            name: "Pattern".to_string(),
            keywords: Vec::new(),
            modern_context: "base context".to_string(),
            mythological_summary: Some("base summary".to_string()),
            mythological_source: Some("Mahabharata".to_string()),
            philosophical_concept: Some("Karma Yoga".to_string()),
            philosophical_explanation: Some("base explanation".to_string()),
            guidance_steps: vec!["step one".to_string()],
            translations,
        }
    }

    #[test]
    fn partial_override_resolves_field_by_field() {
        let pattern = pattern_with_hindi_steps();
        let view = resolve_view(&pattern, "hi");
        assert_eq!(view.guidance_steps, vec!["पहला कदम", "दूसरा कदम"]);
        // Fields without a Hindi override keep the base-locale values.
        assert_eq!(view.modern_context, "base context");
        assert_eq!(view.name, "Pattern");
        assert_eq!(view.mythological_summary.as_deref(), Some("base summary"));
    }

    #[test]
    fn default_locale_skips_overrides() {
        let pattern = pattern_with_hindi_steps();
        let view = resolve_view(&pattern, "en");
        assert_eq!(view.guidance_steps, vec!["step one"]);
    }

    #[test]
    fn blank_override_falls_back() {
        let mut pattern = pattern_with_hindi_steps();
        if let Some(t) = pattern.translations.get_mut("hi") {
            t.name = Some("   ".to_string());
        }
        let view = resolve_view(&pattern, "hi");
        assert_eq!(view.name, "Pattern");
    }

    #[test]
    fn unknown_locale_resolves_to_base() {
        let pattern = pattern_with_hindi_steps();
        let view = resolve_view(&pattern, "pa");
        assert_eq!(view.guidance_steps, vec!["step one"]);
        assert_eq!(view.modern_context, "base context");
    }
}
