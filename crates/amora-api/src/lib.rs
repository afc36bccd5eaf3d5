pub mod conversations;
pub mod error;
pub mod matches;
pub mod middleware;
pub mod profiles;
pub mod state;
pub mod theme;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post, put},
};

use amora_core::media::{MAX_IMAGE_SIZE_BYTES, MAX_POST_IMAGE_SIZE_BYTES};

pub use state::{AppState, AppStateInner};

/// Room for the JSON wrapper, the data URL header and message text.
const ENVELOPE_BYTES: usize = 64 * 1024;

const fn base64_len(decoded: usize) -> usize {
    decoded.div_ceil(3) * 4
}

/// Request body cap for sending a chat message with an image at the limit.
pub const MESSAGE_BODY_LIMIT: usize = base64_len(MAX_IMAGE_SIZE_BYTES) + ENVELOPE_BYTES;

/// Request body cap for creating a post with a photo at the limit.
pub const POST_BODY_LIMIT: usize = base64_len(MAX_POST_IMAGE_SIZE_BYTES) + ENVELOPE_BYTES;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/conversations", get(conversations::list_conversations))
        .route("/conversations/{partner}", get(conversations::get_conversation))
        .route(
            "/conversations/{partner}/messages",
            post(conversations::send_message).layer(DefaultBodyLimit::max(MESSAGE_BODY_LIMIT)),
        )
        .route("/matches", get(matches::list_decisions).post(matches::add_decision))
        .route("/browse", get(matches::browse))
        .route("/feed", get(matches::feed))
        .route("/profile", put(profiles::save_profile))
        .route("/profiles/{id}", get(profiles::get_profile))
        .route("/profiles/{id}/posts", get(profiles::list_posts))
        .route(
            "/posts",
            post(profiles::create_post).layer(DefaultBodyLimit::max(POST_BODY_LIMIT)),
        )
        .route("/theme", get(theme::get_theme))
        .route("/theme/presets", get(theme::list_presets))
        .route("/theme/preset", post(theme::select_preset))
        .route("/theme/custom", post(theme::set_custom_colors))
        .route("/theme/font-size", post(theme::set_font_size))
        .route("/theme/custom-toggle", post(theme::toggle_custom_colors))
        .layer(axum::middleware::from_fn(middleware::identify))
        .with_state(state)
}
