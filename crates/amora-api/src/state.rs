use std::sync::Arc;

use tracing::error;

use amora_core::backend::Backend;
use amora_core::theme::SettingsStore;

use crate::error::ApiError;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub backend: Arc<dyn Backend>,
    pub settings: Arc<dyn SettingsStore>,
    /// Maximum number of posts returned by the feed.
    pub feed_limit: usize,
}

pub const DEFAULT_FEED_LIMIT: usize = 50;

impl AppStateInner {
    pub fn new(backend: Arc<dyn Backend>, settings: Arc<dyn SettingsStore>) -> AppState {
        Arc::new(Self {
            backend,
            settings,
            feed_limit: DEFAULT_FEED_LIMIT,
        })
    }
}

/// Run blocking backend work off the async runtime.
pub(crate) async fn blocking<F, T>(f: F) -> Result<T, ApiError>
where
    F: FnOnce() -> Result<T, ApiError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f).await.map_err(|e| {
        error!("spawn_blocking join error: {}", e);
        ApiError::Internal
    })?
}
