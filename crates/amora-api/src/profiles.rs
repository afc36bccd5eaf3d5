use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::info;

use amora_core::discovery::{validate_caption, validate_profile};
use amora_core::media::{ImageAttachment, MAX_POST_IMAGE_SIZE_BYTES};
use amora_core::session::now_nanos;
use amora_types::api::{CreatePostRequest, CreatePostResponse, SaveProfileRequest};
use amora_types::models::UserId;

use crate::error::ApiError;
use crate::middleware::Principal;
use crate::state::{AppState, blocking};

pub async fn get_profile(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = UserId::from(id);
    let lookup = id.clone();
    let profile = blocking(move || Ok(state.backend.get_user_profile(&lookup)?)).await?;
    profile
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("profile {id}")))
}

/// Create or replace the caller's own profile.
pub async fn save_profile(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(req): Json<SaveProfileRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let viewer = principal.require()?;
    let profile = validate_profile(viewer, &req.display_name, req.age, &req.bio, &req.interests)?;

    let stored = profile.clone();
    blocking(move || Ok(state.backend.save_profile(&stored)?)).await?;

    info!("Saved profile for {}", profile.id);
    Ok(Json(profile))
}

pub async fn create_post(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(req): Json<CreatePostRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let owner = principal.require()?;
    let photo = ImageAttachment::with_limit(&req.photo, MAX_POST_IMAGE_SIZE_BYTES)?;
    let caption = validate_caption(&req.caption)?;
    let timestamp = now_nanos();

    let id = blocking(move || {
        Ok(state
            .backend
            .create_photo_post(&owner, photo.data_url(), &caption, timestamp)?)
    })
    .await?;

    Ok((StatusCode::CREATED, Json(CreatePostResponse { id })))
}

pub async fn list_posts(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let owner = UserId::from(id);
    let posts = blocking(move || Ok(state.backend.get_user_posts(&owner)?)).await?;
    Ok(Json(posts))
}
