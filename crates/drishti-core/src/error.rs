//! Error taxonomy for the guidance engine.
//!
//! `EmptyInput` and `CatalogUnavailable` are rejected before any external call.
//! `Generator` wraps a classified bridge failure; nothing is cached on that path.
//! A malformed-but-present generator response is NOT an error: the validator
//! repairs it field-by-field and the caller receives a complete result.

use std::time::Duration;

/// Failure of the outbound generation call, subclassified by cause.
///
/// The subclass exists for user messaging, not control flow: callers decide
/// what to tell the user, the engine treats every variant the same way
/// (no cache write, error propagated). Causes are carried as strings so the
/// error stays `Clone` for coalesced waiters.
#[derive(Debug, Clone, thiserror::Error)]
pub enum BridgeError {
    #[error("generator transport failure: {0}")]
    Transport(String),

    #[error("generator rate limited: {0}")]
    RateLimited(String),

    #[error("generator model unavailable: {0}")]
    MissingModel(String),

    #[error("generator service error {status}: {detail}")]
    Service { status: u16, detail: String },

    /// The response body contained no JSON object at all. There is nothing to
    /// repair field-by-field, so this is a hard failure like `Service`.
    #[error("generator response unreadable: {0}")]
    Unreadable(String),

    #[error("generator call timed out after {0:?}")]
    Timeout(Duration),
}

/// Top-level error surfaced at the `resolve` boundary.
#[derive(Debug, Clone, thiserror::Error)]
pub enum GuidanceError {
    /// Blank user text, rejected before any work.
    #[error("empty input: describe the situation before requesting guidance")]
    EmptyInput,

    /// The pattern catalog is empty or missing.
    #[error("pattern catalog unavailable")]
    CatalogUnavailable,

    #[error(transparent)]
    Generator(#[from] BridgeError),
}

/// Catalog loading failure (startup only, never during request handling).
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("duplicate pattern id in catalog: {0}")]
    DuplicateId(String),
}
