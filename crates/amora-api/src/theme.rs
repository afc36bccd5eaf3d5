use std::sync::Arc;

use axum::{Extension, Json, extract::State, response::IntoResponse};
use tracing::debug;

use amora_core::theme::{SettingsStore, ThemeCatalog, ThemeResolver};
use amora_types::api::{
    CustomColorsRequest, FontSizeRequest, PresetListResponse, SelectPresetRequest, ThemeResponse,
    ToggleCustomColorsRequest,
};

use crate::error::ApiError;
use crate::middleware::Principal;
use crate::state::{AppState, blocking};

type Resolver = ThemeResolver<Arc<dyn SettingsStore>>;

/// Load the caller's resolver, apply `update`, and answer with the settings
/// as they stand afterwards. Anonymous callers share one record.
async fn with_resolver<F>(state: AppState, principal: Principal, update: F) -> Result<ThemeResponse, ApiError>
where
    F: FnOnce(&mut Resolver) -> Result<(), ApiError> + Send + 'static,
{
    blocking(move || {
        let key = principal.id().map(|id| id.as_str());
        let mut resolver = ThemeResolver::load(state.settings.clone(), key);
        update(&mut resolver)?;
        Ok(ThemeResponse {
            settings: resolver.settings().clone(),
            resolved: resolver.resolved(),
        })
    })
    .await
}

pub async fn get_theme(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(with_resolver(state, principal, |_| Ok(())).await?))
}

pub async fn select_preset(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(req): Json<SelectPresetRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let response = with_resolver(state, principal, move |resolver| {
        if !resolver.select_preset(&req.theme_id)? {
            debug!("Preset '{}' not in catalog, settings unchanged", req.theme_id);
        }
        Ok(())
    })
    .await?;
    Ok(Json(response))
}

pub async fn set_custom_colors(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(req): Json<CustomColorsRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let response = with_resolver(state, principal, move |resolver| {
        Ok(resolver.set_custom_colors(&req.sent, &req.received, &req.background)?)
    })
    .await?;
    Ok(Json(response))
}

pub async fn set_font_size(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(req): Json<FontSizeRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let response = with_resolver(state, principal, move |resolver| {
        Ok(resolver.set_font_size(req.font_size)?)
    })
    .await?;
    Ok(Json(response))
}

pub async fn toggle_custom_colors(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(req): Json<ToggleCustomColorsRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let response = with_resolver(state, principal, move |resolver| {
        Ok(resolver.toggle_custom_colors(req.enabled)?)
    })
    .await?;
    Ok(Json(response))
}

pub async fn list_presets() -> impl IntoResponse {
    Json(PresetListResponse {
        presets: ThemeCatalog::builtin().themes().to_vec(),
    })
}
