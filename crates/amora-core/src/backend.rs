use amora_types::models::{MatchDecision, PhotoPost, Profile, UserId};

use crate::conversation::Conversation;

pub type BackendResult<T> = Result<T, BackendError>;

#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("backend unavailable: {0}")]
    Unavailable(String),

    /// The request itself was rejected, such as a decision on oneself.
    #[error("invalid request: {0}")]
    Invalid(String),

    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

/// The remote store of profiles, match decisions, messages and posts.
///
/// Calls are blocking. Async callers run them through
/// `tokio::task::spawn_blocking`.
pub trait Backend: Send + Sync {
    /// Messages between `viewer` and `partner`, split by direction, in
    /// creation order.
    fn get_conversation(&self, viewer: &UserId, partner: &UserId) -> BackendResult<Conversation>;

    fn send_message(
        &self,
        sender: &UserId,
        recipient: &UserId,
        content: &str,
        image: Option<&str>,
        timestamp: i64,
    ) -> BackendResult<()>;

    /// Marks every message from `partner` to `viewer` as read. Calling it
    /// again when nothing is unread is not an error.
    fn mark_as_read(&self, viewer: &UserId, partner: &UserId) -> BackendResult<()>;

    fn get_user_matches(&self, user: &UserId) -> BackendResult<Vec<MatchDecision>>;

    fn get_user_profile(&self, user: &UserId) -> BackendResult<Option<Profile>>;

    /// Records a decision. A second decision on the same target replaces the first.
    fn add_match_decision(&self, viewer: &UserId, decision: &MatchDecision) -> BackendResult<()>;

    fn get_profiles(&self) -> BackendResult<Vec<Profile>>;

    fn save_profile(&self, profile: &Profile) -> BackendResult<()>;

    /// Returns the id of the new post.
    fn create_photo_post(
        &self,
        owner: &UserId,
        photo: &str,
        caption: &str,
        timestamp: i64,
    ) -> BackendResult<i64>;

    fn get_feed(&self, users: &[UserId], limit: usize) -> BackendResult<Vec<PhotoPost>>;

    fn get_user_posts(&self, user: &UserId) -> BackendResult<Vec<PhotoPost>>;
}
