//! Response validation and field-level repair.
//!
//! The generator's output is checked against the mandatory-field contract.
//! Each broken field is independently replaced with a deterministic,
//! locale-aware fallback; valid fields are preserved byte-for-byte. A
//! guidance response must never reach the caller with missing content, but
//! genuinely good partial output is not discarded wholesale. Every repair is
//! logged so generator failure frequency stays observable downstream.

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Sourced quotation with its two renderings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quotation {
    /// Source-language text (Devanagari preferred, IAST otherwise).
    pub original_text: String,
    pub english_translation: String,
    /// Rendering in the request's target locale.
    pub locale_translation: String,
}

/// Fully validated guidance. All fields are contractually non-empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationResult {
    pub pattern_name: String,
    pub insight: String,
    pub mythological_summary: String,
    pub philosophical_explanation: String,
    /// 3-4 actionable steps.
    pub guidance_steps: Vec<String>,
    pub quotation: Quotation,
}

/// Wire-shaped generator output: everything optional until validated.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawGenerationResult {
    #[serde(default)]
    pub pattern_name: Option<String>,
    #[serde(default)]
    pub insight: Option<String>,
    #[serde(default)]
    pub mythological_summary: Option<String>,
    #[serde(default)]
    pub philosophical_explanation: Option<String>,
    #[serde(default)]
    pub guidance_steps: Option<Vec<String>>,
    #[serde(default)]
    pub quotation: Option<RawQuotation>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawQuotation {
    #[serde(default)]
    pub original_text: Option<String>,
    #[serde(default)]
    pub english_translation: Option<String>,
    #[serde(default)]
    pub locale_translation: Option<String>,
}

/// Which fields were repaired during validation. Empty on a clean response.
#[derive(Debug, Clone, Default)]
pub struct RepairReport {
    pub repaired_fields: Vec<&'static str>,
}

impl RepairReport {
    pub fn is_clean(&self) -> bool {
        self.repaired_fields.is_empty()
    }

    pub fn count(&self) -> usize {
        self.repaired_fields.len()
    }
}

/// Static fallback content for one locale variant.
struct FallbackContent {
    pattern_name: &'static str,
    insight: &'static str,
    mythological_summary: &'static str,
    philosophical_explanation: &'static str,
    guidance_steps: [&'static str; 3],
    quotation_locale_translation: &'static str,
}

/// Canonical fallback verse: Bhagavad Gita 12.14.
const FALLBACK_QUOTE_ORIGINAL: &str =
    "सन्तुष्टः सततं योगी यतात्मा दृढनिश्चयः। मय्यर्पितमनोबुद्धिर्यो मद्भक्तः स मे प्रियः॥";
const FALLBACK_QUOTE_ENGLISH: &str = "The yogi who is ever content, self-controlled, resolute, \
     with mind and intellect dedicated to Me—that devotee of Mine is dear to Me.";
const FALLBACK_QUOTE_HINDI: &str = "जो योगी निरन्तर सन्तुष्ट रहता है, जिसने मन और इन्द्रियों सहित शरीर को वश में कर \
     लिया है और दृढ़ निश्चय वाला है - वह अपने मन और बुद्धि को मुझमें अर्पित किये हुए मेरा भक्त मुझे प्रिय है।";

const FALLBACK_EN: FallbackContent = FallbackContent {
    pattern_name: "A Path of Discovery",
    insight: "Your situation holds more than one truth, and the discomfort you feel is the \
         beginning of clarity, not the absence of it. Treat this moment as a path of discovery \
         rather than a verdict.",
    mythological_summary: "The epics are full of seekers who began without a map: each found that \
         the path revealed itself only after the first sincere step was taken.",
    philosophical_explanation: "Dharma is discovered in motion. Acting with honesty about where \
         you stand matters more than certainty about where the road ends.",
    guidance_steps: [
        "Reflect on what this situation is asking you to learn rather than to decide.",
        "Take one small, honest action today that aligns with your values.",
        "Release the need to resolve everything at once; revisit the question after acting.",
    ],
    quotation_locale_translation: FALLBACK_QUOTE_ENGLISH,
};

const FALLBACK_HI: FallbackContent = FallbackContent {
    pattern_name: "खोज का मार्ग",
    insight: "आपकी परिस्थिति में एक से अधिक सत्य छिपे हैं, और जो असहजता आप अनुभव कर रहे हैं वह \
         स्पष्टता की शुरुआत है, उसका अभाव नहीं। इस क्षण को निर्णय नहीं, खोज का मार्ग मानिए।",
    mythological_summary: "महाकाव्य ऐसे खोजियों से भरे हैं जिन्होंने बिना मानचित्र के यात्रा शुरू की: हर एक ने पाया \
         कि मार्ग पहला सच्चा कदम उठाने के बाद ही प्रकट होता है।",
    philosophical_explanation: "धर्म गति में खोजा जाता है। आप जहाँ खड़े हैं उसके प्रति ईमानदारी से कार्य करना, \
         मार्ग के अंत की निश्चितता से अधिक महत्त्व रखता है।",
    guidance_steps: [
        "विचार कीजिए कि यह परिस्थिति आपसे निर्णय नहीं, सीख माँग रही है।",
        "आज एक छोटा, ईमानदार कदम उठाइए जो आपके मूल्यों के अनुरूप हो।",
        "सब कुछ एक साथ सुलझाने की आवश्यकता छोड़िए; कार्य करने के बाद प्रश्न पर लौटिए।",
    ],
    quotation_locale_translation: FALLBACK_QUOTE_HINDI,
};

fn fallback_for(locale: &str) -> &'static FallbackContent {
    if locale == "hi" {
        &FALLBACK_HI
    } else {
        &FALLBACK_EN
    }
}

fn valid_string(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

/// Checks `raw` against the mandatory-field contract and repairs each broken
/// field from the locale-aware fallback table. Field-level, not
/// all-or-nothing: valid generator output is preserved unchanged.
pub fn validate_and_repair(raw: RawGenerationResult, locale: &str) -> (GenerationResult, RepairReport) {
    let fallback = fallback_for(locale);
    let mut report = RepairReport::default();
    let mut repaired = |field: &'static str| {
        warn!(field, locale, "generator response missing mandatory field; repaired");
        report.repaired_fields.push(field);
    };

    let pattern_name = valid_string(raw.pattern_name).unwrap_or_else(|| {
        repaired("pattern_name");
        fallback.pattern_name.to_string()
    });
    let insight = valid_string(raw.insight).unwrap_or_else(|| {
        repaired("insight");
        fallback.insight.to_string()
    });
    let mythological_summary = valid_string(raw.mythological_summary).unwrap_or_else(|| {
        repaired("mythological_summary");
        fallback.mythological_summary.to_string()
    });
    let philosophical_explanation = valid_string(raw.philosophical_explanation).unwrap_or_else(|| {
        repaired("philosophical_explanation");
        fallback.philosophical_explanation.to_string()
    });

    let guidance_steps = match raw.guidance_steps {
        Some(steps) => {
            let steps: Vec<String> = steps
                .into_iter()
                .filter(|s| !s.trim().is_empty())
                .collect();
            if steps.is_empty() {
                repaired("guidance_steps");
                fallback.guidance_steps.iter().map(|s| s.to_string()).collect()
            } else {
                steps
            }
        }
        None => {
            repaired("guidance_steps");
            fallback.guidance_steps.iter().map(|s| s.to_string()).collect()
        }
    };

    let raw_quote = raw.quotation.unwrap_or_default();
    let original_text = valid_string(raw_quote.original_text).unwrap_or_else(|| {
        repaired("quotation.original_text");
        FALLBACK_QUOTE_ORIGINAL.to_string()
    });
    let english_translation = valid_string(raw_quote.english_translation).unwrap_or_else(|| {
        repaired("quotation.english_translation");
        FALLBACK_QUOTE_ENGLISH.to_string()
    });
    let locale_translation = valid_string(raw_quote.locale_translation).unwrap_or_else(|| {
        repaired("quotation.locale_translation");
        fallback.quotation_locale_translation.to_string()
    });

    let result = GenerationResult {
        pattern_name,
        insight,
        mythological_summary,
        philosophical_explanation,
        guidance_steps,
        quotation: Quotation {
            original_text,
            english_translation,
            locale_translation,
        },
    };

    (result, report)
}
