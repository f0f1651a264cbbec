//! Pattern catalog: the immutable list of archetypal patterns.
//!
//! Loaded once at startup from a JSON data file (or the compiled-in default)
//! and read-only for the lifetime of the process. Pattern ids are unique;
//! loading rejects duplicates rather than silently shadowing.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::CatalogError;

/// Default catalog shipped with the crate.
const BUILTIN_PATTERNS: &str = include_str!("../data/patterns.json");

/// A catalog entry describing a recurring life-situation theme.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pattern {
    /// Opaque stable identifier, unique across the catalog.
    pub id: String,
    /// Short evocative title.
    pub name: String,
    /// Keywords used for matching; a keyword may be a multi-word phrase.
    #[serde(default)]
    pub keywords: Vec<String>,
    /// 2-3 sentence description of the pattern in a modern setting.
    pub modern_context: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mythological_summary: Option<String>,
    /// Scriptural source of the mythological summary (e.g. "Mahabharata").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mythological_source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub philosophical_concept: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub philosophical_explanation: Option<String>,
    /// Actionable steps or reflective questions; may be empty.
    #[serde(default)]
    pub guidance_steps: Vec<String>,
    /// Locale code -> partial field overrides. Missing fields fall back to
    /// the base (English) values, field by field.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub translations: BTreeMap<String, PatternTranslation>,
}

/// Partial locale override for a pattern. Every field optional; an absent or
/// blank field means "use the base value".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PatternTranslation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modern_context: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mythological_summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub philosophical_explanation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guidance_steps: Option<Vec<String>>,
}

#[derive(Deserialize)]
struct CatalogFile {
    #[serde(default)]
    patterns: Vec<Pattern>,
}

/// Immutable, in-memory pattern catalog.
#[derive(Debug, Clone, Default)]
pub struct PatternCatalog {
    patterns: Vec<Pattern>,
}

impl PatternCatalog {
    /// Parses a catalog from JSON text, rejecting duplicate ids.
    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = serde_json::from_str(json)?;
        let mut seen = HashSet::new();
        for pattern in &file.patterns {
            if !seen.insert(pattern.id.clone()) {
                return Err(CatalogError::DuplicateId(pattern.id.clone()));
            }
        }
        Ok(Self {
            patterns: file.patterns,
        })
    }

    /// Loads the catalog from a file path.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// The compiled-in default catalog.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_json_str(BUILTIN_PATTERNS)
    }

    /// Loads from `path` when given, otherwise the compiled-in default.
    pub fn load(path: Option<&Path>) -> Result<Self, CatalogError> {
        match path {
            Some(p) => Self::from_path(p),
            None => Self::builtin(),
        }
    }

    /// Builds a catalog directly from patterns (test seams and tooling).
    pub fn from_patterns(patterns: Vec<Pattern>) -> Self {
        Self { patterns }
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Patterns in catalog order. Ordering matters: the matcher's tie-break
    /// is first-reaching-highest-score.
    pub fn iter(&self) -> impl Iterator<Item = &Pattern> {
        self.patterns.iter()
    }

    pub fn get(&self, id: &str) -> Option<&Pattern> {
        self.patterns.iter().find(|p| p.id == id)
    }
}
