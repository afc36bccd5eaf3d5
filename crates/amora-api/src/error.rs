use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::error;

use amora_core::backend::BackendError;
use amora_core::discovery::ValidationError;
use amora_core::media::MediaError;
use amora_core::session::SessionError;
use amora_core::theme::ThemeError;
use amora_types::api::ErrorResponse;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("missing x-principal header")]
    Unauthorized,

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("internal error")]
    Internal,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(ErrorResponse { error: self.to_string() })).into_response()
    }
}

impl From<BackendError> for ApiError {
    fn from(e: BackendError) -> Self {
        match e {
            BackendError::NotFound(what) => Self::NotFound(what),
            BackendError::Invalid(why) => Self::BadRequest(why),
            other => {
                error!("Backend error: {}", other);
                Self::Internal
            }
        }
    }
}

impl From<ThemeError> for ApiError {
    fn from(e: ThemeError) -> Self {
        error!("Theme settings error: {}", e);
        Self::Internal
    }
}

impl From<MediaError> for ApiError {
    fn from(e: MediaError) -> Self {
        Self::BadRequest(e.to_string())
    }
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        Self::BadRequest(e.to_string())
    }
}

impl From<SessionError> for ApiError {
    fn from(e: SessionError) -> Self {
        match e {
            SessionError::Backend(e) => e.into(),
            SessionError::Media(e) => e.into(),
            SessionError::Join(e) => {
                error!("spawn_blocking join error: {}", e);
                Self::Internal
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_errors_map_to_status() {
        let invalid = ApiError::from(BackendError::Invalid("no".into())).into_response();
        assert_eq!(invalid.status(), StatusCode::BAD_REQUEST);

        let missing = ApiError::from(BackendError::NotFound("x".into())).into_response();
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);

        let down = ApiError::from(BackendError::Unavailable("db".into())).into_response();
        assert_eq!(down.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
