//! Guidance-generation prompt: turn a described dilemma into structured,
//! culturally grounded counsel.
//!
//! The model must answer with a single JSON object matching
//! `RawGenerationResult`; the validator repairs any contract violations, so
//! the prompt asks for strict JSON but the engine survives deviation.

use crate::request::GenerationRequest;

/// System instruction for the generation model.
pub const DYNAMIC_GUIDANCE_SYSTEM: &str = r#"You are a wise, empathetic Dharmic counselor. You understand the heart of a person's struggle even when their words are vague or emotionally charged, and you respond with clarity, compassion, and actionable wisdom rooted in Dharmic principles.

Respond with ONLY a single JSON object, no prose before or after, with exactly these keys:
{
  "pattern_name": string,            // short, empathetic, evocative title for the situation
  "insight": string,                 // 2-4 sentences: acknowledge the feeling, then offer a modern reframe
  "mythological_summary": string,    // concise retelling of the most relevant archetypal story
  "philosophical_explanation": string, // the core Dharmic concept applied practically to this dilemma
  "guidance_steps": [string],        // 3-4 practical, compassionate steps, each one clear sentence
  "quotation": {
    "original_text": string,         // a highly relevant Sanskrit shloka or devotional verse, Devanagari preferred
    "english_translation": string,   // always English, regardless of target language
    "locale_translation": string     // rendering in the target language
  }
}

All textual fields except the quotation translations must be written in the target language. Prefer lesser-known but precisely fitting verses over generic ones. Never leave a field empty."#;

/// Builds the user prompt. Matched-pattern seed material, when present, is
/// offered as strong inspiration for personalization, never as canonical
/// output to copy.
pub fn dynamic_guidance_user_prompt(request: &GenerationRequest) -> String {
    let mut prompt = format!(
        "Target language: {}\n\nA person has described their situation:\n\"{}\"\n",
        request.locale, request.user_text
    );

    if let Some(seed) = &request.seed {
        prompt.push_str(&format!(
            "\nTheir situation resembles the archetypal pattern \"{}\".\n",
            seed.name
        ));
        if let Some(summary) = &seed.mythological_summary {
            prompt.push_str(&format!("Mythological foundation: {}\n", summary));
        }
        if let Some(concept) = &seed.philosophical_concept {
            prompt.push_str(&format!("Philosophical concept: {}\n", concept));
        }
        if !seed.initial_guidance.is_empty() {
            prompt.push_str("Existing guidance for this pattern:\n");
            for step in &seed.initial_guidance {
                prompt.push_str(&format!(" - {}\n", step));
            }
        }
        prompt.push_str(
            "\nUse this pattern as strong inspiration, but personalize every field to the \
             person's actual words rather than copying the pattern material.\n",
        );
    } else {
        prompt.push_str(
            "\nNo predefined pattern matched. Craft the response entirely from the person's \
             description.\n",
        );
    }

    prompt.push_str("\nAnswer with the JSON object only.");
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::{GenerationRequest, PatternSeed};

    #[test]
    fn seed_material_is_framed_as_inspiration() {
        let request = GenerationRequest {
            user_text: "I feel torn".to_string(),
            locale: "en".to_string(),
            seed: Some(PatternSeed {
                pattern_id: "crossroads".to_string(),
                name: "The Crossroads of Duty".to_string(),
                mythological_summary: Some("Arjuna's dilemma".to_string()),
                philosophical_concept: Some("Nishkama Karma".to_string()),
                initial_guidance: vec!["Write it down.".to_string()],
            }),
        };
        let prompt = dynamic_guidance_user_prompt(&request);
        assert!(prompt.contains("The Crossroads of Duty"));
        assert!(prompt.contains("Arjuna's dilemma"));
        assert!(prompt.contains("strong inspiration"));
        assert!(prompt.contains("Write it down."));
    }

    #[test]
    fn dynamic_path_omits_pattern_block() {
        let request = GenerationRequest {
            user_text: "something new".to_string(),
            locale: "hi".to_string(),
            seed: None,
        };
        let prompt = dynamic_guidance_user_prompt(&request);
        assert!(prompt.contains("No predefined pattern matched"));
        assert!(prompt.contains("Target language: hi"));
    }
}
