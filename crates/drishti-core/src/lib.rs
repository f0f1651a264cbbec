//! drishti-core: guidance resolution engine (catalog, matcher, localization,
//! generation bridge, validator, cache, and orchestrator).
//!
//! The engine turns a free-text dilemma plus a locale into culturally
//! grounded guidance: a matched or generated archetype, an insight, 3-4
//! action steps, and a sourced quotation with translations. The external
//! generation service sits behind the [`GuidanceGenerator`] trait; everything
//! else is deterministic and testable in isolation.

mod bridge;
mod cache;
mod catalog;
mod config;
mod engine;
mod error;
mod locale;
mod matcher;
pub mod prompts;
mod request;
mod resolver;
mod validate;

// Catalog and matching
pub use catalog::{Pattern, PatternCatalog, PatternTranslation};
pub use matcher::{best_match, MatchResult};

// Localization
pub use locale::{normalize_locale, DEFAULT_LOCALE, SUPPORTED_LOCALES};
pub use resolver::{resolve_view, ResolvedPatternView};

// Generation request and bridge
pub use bridge::{GuidanceBridge, GuidanceGenerator};
pub use request::{build_request, GenerationRequest, PatternSeed};

// Validation and repair
pub use validate::{
    validate_and_repair, GenerationResult, Quotation, RawGenerationResult, RawQuotation,
    RepairReport,
};

// Cache
pub use cache::{fingerprint, GuidanceCache, DEFAULT_CACHE_CAPACITY, NO_MATCH_SENTINEL};

// Orchestrator
pub use engine::{EngineStatsSnapshot, GuidanceEngine};

// Configuration
pub use config::{GuidanceConfig, UserConfig};

// Errors
pub use error::{BridgeError, CatalogError, GuidanceError};
