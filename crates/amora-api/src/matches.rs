use axum::{Extension, Json, extract::State, http::StatusCode, response::IntoResponse};
use tracing::info;

use amora_core::conversation::derive_mutual_matches;
use amora_core::discovery::{browse_queue, order_feed};
use amora_types::api::MatchDecisionRequest;
use amora_types::models::MatchDecision;

use crate::error::ApiError;
use crate::middleware::Principal;
use crate::state::{AppState, blocking};

pub async fn list_decisions(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> Result<impl IntoResponse, ApiError> {
    let viewer = principal.require()?;
    let decisions = blocking(move || Ok(state.backend.get_user_matches(&viewer)?)).await?;
    Ok(Json(decisions))
}

pub async fn add_decision(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(req): Json<MatchDecisionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let viewer = principal.require()?;
    if viewer == req.id {
        return Err(ApiError::BadRequest("cannot decide on yourself".into()));
    }

    let decision = MatchDecision {
        id: req.id,
        decision: req.decision,
    };
    let recorded = decision.clone();
    blocking(move || Ok(state.backend.add_match_decision(&viewer, &recorded)?)).await?;

    info!("Recorded {} on {}", decision.decision.as_str(), decision.id);
    Ok((StatusCode::CREATED, Json(decision)))
}

/// Profiles the caller has not decided on yet, excluding themselves.
pub async fn browse(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> Result<impl IntoResponse, ApiError> {
    let viewer = principal.require()?;
    let queue = blocking(move || {
        let profiles = state.backend.get_profiles()?;
        let decisions = state.backend.get_user_matches(&viewer)?;
        Ok(browse_queue(&profiles, &viewer, &decisions))
    })
    .await?;
    Ok(Json(queue))
}

/// Photo posts from liked users, newest first.
pub async fn feed(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> Result<impl IntoResponse, ApiError> {
    let viewer = principal.require()?;
    let posts = blocking(move || {
        let decisions = state.backend.get_user_matches(&viewer)?;
        let owners: Vec<_> = derive_mutual_matches(&decisions).into_iter().collect();
        if owners.is_empty() {
            return Ok(Vec::new());
        }
        let posts = state.backend.get_feed(&owners, state.feed_limit)?;
        Ok(order_feed(posts))
    })
    .await?;
    Ok(Json(posts))
}
