//! Guidance endpoint: DTOs and the error-to-status mapping.
//!
//! The engine classifies generator failures by cause; this layer turns each
//! class into a status code and a calm, user-facing message. Classification
//! never changes control flow: every failure path is "tell the user and let
//! them retry".

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use drishti_core::{normalize_locale, BridgeError, GenerationResult, GuidanceError};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use super::AppState;

#[derive(Deserialize)]
pub struct GuidanceBody {
    pub situation: String,
    #[serde(default)]
    pub locale: Option<String>,
}

#[derive(Serialize)]
pub struct GuidanceReply {
    pub request_id: String,
    pub locale: String,
    /// `Some` when a catalog pattern seeded the generation.
    pub matched_pattern_id: Option<String>,
    /// True when the guidance was generated without a catalog pattern.
    pub dynamic: bool,
    pub guidance: GenerationResult,
}

#[derive(Serialize)]
pub struct ErrorReply {
    pub error: &'static str,
    pub message: String,
}

pub async fn resolve_guidance(
    State(state): State<AppState>,
    Json(body): Json<GuidanceBody>,
) -> Result<Json<GuidanceReply>, (StatusCode, Json<ErrorReply>)> {
    let request_id = Uuid::new_v4().to_string();
    let locale = normalize_locale(body.locale.as_deref().unwrap_or(""));

    let matched_pattern_id = state
        .engine
        .match_pattern(&body.situation)
        .pattern_id()
        .map(str::to_string);

    match state.engine.resolve(&body.situation, &locale).await {
        Ok(guidance) => {
            info!(
                %request_id,
                %locale,
                matched = matched_pattern_id.is_some(),
                "guidance resolved"
            );
            Ok(Json(GuidanceReply {
                request_id,
                locale,
                dynamic: matched_pattern_id.is_none(),
                matched_pattern_id,
                guidance,
            }))
        }
        Err(err) => {
            warn!(%request_id, error = %err, "guidance resolution failed");
            Err(error_reply(&err))
        }
    }
}

fn error_reply(err: &GuidanceError) -> (StatusCode, Json<ErrorReply>) {
    let (status, code, message) = match err {
        GuidanceError::EmptyInput => (
            StatusCode::UNPROCESSABLE_ENTITY,
            "empty_input",
            "Please describe your situation before seeking guidance.".to_string(),
        ),
        GuidanceError::CatalogUnavailable => (
            StatusCode::SERVICE_UNAVAILABLE,
            "catalog_unavailable",
            "The pattern catalog is not available right now. Please try again later.".to_string(),
        ),
        GuidanceError::Generator(bridge) => generator_reply(bridge),
    };
    (
        status,
        Json(ErrorReply {
            error: code,
            message,
        }),
    )
}

fn generator_reply(err: &BridgeError) -> (StatusCode, &'static str, String) {
    match err {
        BridgeError::MissingModel(_) => (
            StatusCode::SERVICE_UNAVAILABLE,
            "generator_unavailable",
            "Our guide is temporarily unavailable. Like the changing seasons, this too shall pass."
                .to_string(),
        ),
        BridgeError::RateLimited(_) => (
            StatusCode::TOO_MANY_REQUESTS,
            "generator_rate_limited",
            "The cosmic energies need a moment to realign. Please take a mindful pause before \
             trying again."
                .to_string(),
        ),
        BridgeError::Service { .. } | BridgeError::Unreadable(_) => (
            StatusCode::BAD_GATEWAY,
            "generator_error",
            "The universe is asking us to practice patience. Please try again in a few moments."
                .to_string(),
        ),
        BridgeError::Transport(_) | BridgeError::Timeout(_) => (
            StatusCode::GATEWAY_TIMEOUT,
            "generator_unreachable",
            "A temporary disturbance in the flow of wisdom. Please try again.".to_string(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_error_class_gets_a_distinct_status() {
        let (s, body) = error_reply(&GuidanceError::EmptyInput);
        assert_eq!(s, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body.error, "empty_input");

        let (s, _) = error_reply(&GuidanceError::CatalogUnavailable);
        assert_eq!(s, StatusCode::SERVICE_UNAVAILABLE);

        let (s, _) = error_reply(&GuidanceError::Generator(BridgeError::RateLimited(
            String::new(),
        )));
        assert_eq!(s, StatusCode::TOO_MANY_REQUESTS);

        let (s, _) = error_reply(&GuidanceError::Generator(BridgeError::MissingModel(
            "models/x".to_string(),
        )));
        assert_eq!(s, StatusCode::SERVICE_UNAVAILABLE);

        let (s, _) = error_reply(&GuidanceError::Generator(BridgeError::Service {
            status: 500,
            detail: String::new(),
        }));
        assert_eq!(s, StatusCode::BAD_GATEWAY);

        let (s, _) = error_reply(&GuidanceError::Generator(BridgeError::Transport(
            String::new(),
        )));
        assert_eq!(s, StatusCode::GATEWAY_TIMEOUT);
    }
}
