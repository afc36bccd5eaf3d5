use axum::{extract::Request, middleware::Next, response::Response};

use amora_types::models::UserId;

use crate::error::ApiError;

pub const PRINCIPAL_HEADER: &str = "x-principal";

/// The caller's identity, if any. Authentication happens upstream; this
/// only carries the principal it established.
#[derive(Debug, Clone)]
pub struct Principal(pub Option<UserId>);

impl Principal {
    pub fn id(&self) -> Option<&UserId> {
        self.0.as_ref()
    }

    /// The caller's id, or 401 for anonymous callers.
    pub fn require(&self) -> Result<UserId, ApiError> {
        self.0.clone().ok_or(ApiError::Unauthorized)
    }
}

/// Attach a [`Principal`] extension from the `x-principal` header.
pub async fn identify(mut req: Request, next: Next) -> Response {
    let principal = req
        .headers()
        .get(PRINCIPAL_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(UserId::from);

    req.extensions_mut().insert(Principal(principal));
    next.run(req).await
}
