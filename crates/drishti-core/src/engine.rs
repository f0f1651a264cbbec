//! Guidance orchestrator: match, build, generate, validate, cache.
//!
//! Per request: reject blank input and an empty catalog synchronously,
//! compute the fingerprint, return a cache hit immediately, otherwise run
//! the full pipeline. Matching runs up front because the fingerprint
//! includes the matched pattern's identity; it is pure and cheap.
//!
//! Concurrent requests for the same fingerprint are coalesced through a
//! per-key in-flight table: the first caller becomes the leader and invokes
//! the generator once, followers await its published outcome. Unrelated keys
//! generate concurrently with no ordering guarantees. On generator failure
//! nothing is cached, the key is released, and a later request may retry.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::{watch, Mutex};
use tracing::{debug, info, warn};

use crate::bridge::GuidanceGenerator;
use crate::cache::{fingerprint, GuidanceCache};
use crate::catalog::PatternCatalog;
use crate::config::GuidanceConfig;
use crate::error::{BridgeError, GuidanceError};
use crate::locale::normalize_locale;
use crate::matcher::{best_match, MatchResult};
use crate::request::build_request;
use crate::validate::{validate_and_repair, GenerationResult};

/// Outcome published to coalesced waiters.
#[derive(Clone)]
enum FlightState {
    Pending,
    Done(GenerationResult),
    Failed(GuidanceError),
}

#[derive(Default)]
struct EngineStats {
    cache_hits: AtomicU64,
    cache_misses: AtomicU64,
    coalesced_waits: AtomicU64,
    generation_calls: AtomicU64,
    generator_failures: AtomicU64,
    repaired_fields: AtomicU64,
}

/// Point-in-time counters for observability surfaces.
#[derive(Debug, Clone, Serialize)]
pub struct EngineStatsSnapshot {
    pub cache_hits: u64,
    pub cache_misses: u64,
    pub coalesced_waits: u64,
    pub generation_calls: u64,
    pub generator_failures: u64,
    pub repaired_fields: u64,
}

struct EngineInner {
    catalog: PatternCatalog,
    cache: Arc<GuidanceCache>,
    generator: Arc<dyn GuidanceGenerator>,
    generation_timeout: Duration,
    in_flight: Mutex<HashMap<String, watch::Receiver<FlightState>>>,
    stats: EngineStats,
}

/// The top-level coordinator. Cheap to clone; all state is shared.
#[derive(Clone)]
pub struct GuidanceEngine {
    inner: Arc<EngineInner>,
}

impl GuidanceEngine {
    /// The cache is injected rather than constructed internally so tests and
    /// embedders control its lifetime and capacity.
    pub fn new(
        catalog: PatternCatalog,
        cache: Arc<GuidanceCache>,
        generator: Arc<dyn GuidanceGenerator>,
        config: &GuidanceConfig,
    ) -> Self {
        Self {
            inner: Arc::new(EngineInner {
                catalog,
                cache,
                generator,
                generation_timeout: config.generation_timeout,
                in_flight: Mutex::new(HashMap::new()),
                stats: EngineStats::default(),
            }),
        }
    }

    pub fn catalog(&self) -> &PatternCatalog {
        &self.inner.catalog
    }

    pub fn cache_len(&self) -> usize {
        self.inner.cache.len()
    }

    /// Pure classification of user text against the catalog, for callers
    /// that want to surface the matched/dynamic distinction alongside the
    /// resolved guidance.
    pub fn match_pattern<'a>(&'a self, text: &str) -> MatchResult<'a> {
        best_match(text, &self.inner.catalog)
    }

    pub fn stats(&self) -> EngineStatsSnapshot {
        let s = &self.inner.stats;
        EngineStatsSnapshot {
            cache_hits: s.cache_hits.load(Ordering::Relaxed),
            cache_misses: s.cache_misses.load(Ordering::Relaxed),
            coalesced_waits: s.coalesced_waits.load(Ordering::Relaxed),
            generation_calls: s.generation_calls.load(Ordering::Relaxed),
            generator_failures: s.generator_failures.load(Ordering::Relaxed),
            repaired_fields: s.repaired_fields.load(Ordering::Relaxed),
        }
    }

    /// Resolves guidance for `user_text` in `locale`.
    ///
    /// The caller always receives either a complete result (every mandatory
    /// field populated, possibly via repair) or a classified error. Never a
    /// partially populated result, and never a fabricated result for a hard
    /// generator failure.
    pub async fn resolve(
        &self,
        user_text: &str,
        locale: &str,
    ) -> Result<GenerationResult, GuidanceError> {
        let text = user_text.trim();
        if text.is_empty() {
            return Err(GuidanceError::EmptyInput);
        }
        if self.inner.catalog.is_empty() {
            return Err(GuidanceError::CatalogUnavailable);
        }
        // Locale defaulting happens here, once; downstream never re-applies it.
        let locale = normalize_locale(locale);

        let matched = best_match(text, &self.inner.catalog);
        let key = fingerprint(text, matched.pattern_id(), &locale);

        if let Some(hit) = self.inner.cache.get(&key) {
            self.inner.stats.cache_hits.fetch_add(1, Ordering::Relaxed);
            debug!(key = %key, "guidance cache hit");
            return Ok(hit);
        }
        self.inner.stats.cache_misses.fetch_add(1, Ordering::Relaxed);

        let publisher = {
            let mut in_flight = self.inner.in_flight.lock().await;
            match in_flight.get(&key) {
                Some(rx) => {
                    let rx = rx.clone();
                    drop(in_flight);
                    self.inner
                        .stats
                        .coalesced_waits
                        .fetch_add(1, Ordering::Relaxed);
                    debug!(key = %key, "coalescing onto in-flight generation");
                    return Self::await_leader(rx).await;
                }
                None => {
                    let (tx, rx) = watch::channel(FlightState::Pending);
                    in_flight.insert(key.clone(), rx);
                    tx
                }
            }
        };

        let outcome = self.generate_and_store(text, &locale, &matched, &key).await;

        // Publish before releasing the key so followers observe a terminal
        // state; late arrivals after removal hit the cache on success.
        let state = match &outcome {
            Ok(result) => FlightState::Done(result.clone()),
            Err(err) => FlightState::Failed(err.clone()),
        };
        let _ = publisher.send(state);
        self.inner.in_flight.lock().await.remove(&key);

        outcome
    }

    async fn await_leader(
        mut rx: watch::Receiver<FlightState>,
    ) -> Result<GenerationResult, GuidanceError> {
        loop {
            let state = rx.borrow().clone();
            match state {
                FlightState::Done(result) => return Ok(result),
                FlightState::Failed(err) => return Err(err),
                FlightState::Pending => {}
            }
            if rx.changed().await.is_err() {
                // Leader dropped without publishing a terminal state.
                return Err(GuidanceError::Generator(BridgeError::Transport(
                    "coalesced generation was abandoned".to_string(),
                )));
            }
        }
    }

    async fn generate_and_store(
        &self,
        text: &str,
        locale: &str,
        matched: &MatchResult<'_>,
        key: &str,
    ) -> Result<GenerationResult, GuidanceError> {
        let request = build_request(text, locale, matched);
        self.inner
            .stats
            .generation_calls
            .fetch_add(1, Ordering::Relaxed);
        info!(
            matched = matched.is_match(),
            locale, "cache miss; invoking generator"
        );

        let generated = tokio::time::timeout(
            self.inner.generation_timeout,
            self.inner.generator.generate(&request),
        )
        .await;

        let raw = match generated {
            Ok(Ok(raw)) => raw,
            Ok(Err(err)) => {
                self.inner
                    .stats
                    .generator_failures
                    .fetch_add(1, Ordering::Relaxed);
                warn!(error = %err, "generator call failed; nothing cached");
                return Err(GuidanceError::Generator(err));
            }
            Err(_) => {
                self.inner
                    .stats
                    .generator_failures
                    .fetch_add(1, Ordering::Relaxed);
                warn!(
                    timeout_secs = self.inner.generation_timeout.as_secs(),
                    "generator call timed out; nothing cached"
                );
                return Err(GuidanceError::Generator(BridgeError::Timeout(
                    self.inner.generation_timeout,
                )));
            }
        };

        let (result, report) = validate_and_repair(raw, locale);
        if !report.is_clean() {
            self.inner
                .stats
                .repaired_fields
                .fetch_add(report.count() as u64, Ordering::Relaxed);
        }

        // Only validated results ever enter the cache.
        self.inner.cache.put(key.to_string(), result.clone());
        Ok(result)
    }
}
