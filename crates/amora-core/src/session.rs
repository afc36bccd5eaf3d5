//! A live chat with one partner: fetch, mark read, send, and poll.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use amora_types::models::UserId;

use crate::backend::{Backend, BackendError};
use crate::conversation::{MarkRead, TimelineEntry, mark_conversation_read};
use crate::media::{ImageAttachment, MediaError};

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Backend(#[from] BackendError),

    #[error(transparent)]
    Media(#[from] MediaError),

    #[error("background task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// One fetch of the conversation, merged for display.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub timeline: Vec<TimelineEntry>,
    /// Unread count as fetched, before this refresh cleared it.
    pub unread_count: u64,
    pub marked_read: bool,
    pub fetched_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    Sent,
    /// Nothing to send: empty text and no image.
    Skipped,
}

/// Current time as nanoseconds since the epoch, the unit message timestamps use.
pub fn now_nanos() -> i64 {
    let now = Utc::now();
    now.timestamp_nanos_opt()
        .unwrap_or_else(|| now.timestamp_micros().saturating_mul(1_000))
}

pub struct ChatSession<B: ?Sized> {
    backend: Arc<B>,
    viewer: UserId,
    partner: UserId,
}

impl<B: ?Sized> Clone for ChatSession<B> {
    fn clone(&self) -> Self {
        Self {
            backend: self.backend.clone(),
            viewer: self.viewer.clone(),
            partner: self.partner.clone(),
        }
    }
}

impl<B: Backend + ?Sized + 'static> ChatSession<B> {
    pub fn new(backend: Arc<B>, viewer: UserId, partner: UserId) -> Self {
        Self {
            backend,
            viewer,
            partner,
        }
    }

    pub fn partner(&self) -> &UserId {
        &self.partner
    }

    /// Fetch the conversation and clear its unread state if needed. The
    /// mark-read request is only issued after the fetch has returned. A
    /// failed mark-read is logged and the fetched snapshot is still returned;
    /// the next refresh retries it.
    pub async fn refresh(&self) -> Result<Snapshot, SessionError> {
        let session = self.clone();
        let snapshot = tokio::task::spawn_blocking(move || {
            let conversation = session
                .backend
                .get_conversation(&session.viewer, &session.partner)?;
            let marked = match mark_conversation_read(
                session.backend.as_ref(),
                &session.viewer,
                &session.partner,
                &conversation,
            ) {
                Ok(marked) => marked == MarkRead::Cleared,
                Err(e) => {
                    warn!("Failed to mark conversation with {} read: {}", session.partner, e);
                    false
                }
            };
            Ok::<_, BackendError>(Snapshot {
                timeline: conversation.timeline(),
                unread_count: conversation.unread_count,
                marked_read: marked,
                fetched_at: Utc::now(),
            })
        })
        .await??;

        Ok(snapshot)
    }

    /// Send a message. Content is trimmed; a message with no text and no
    /// image is skipped. Images over the size limit are rejected before
    /// anything is transmitted.
    pub async fn send(&self, content: &str, image: Option<&str>) -> Result<SendOutcome, SessionError> {
        let content = content.trim().to_string();
        if content.is_empty() && image.is_none() {
            return Ok(SendOutcome::Skipped);
        }

        let image = image.map(ImageAttachment::from_data_url).transpose()?;
        let timestamp = now_nanos();

        let session = self.clone();
        tokio::task::spawn_blocking(move || {
            session.backend.send_message(
                &session.viewer,
                &session.partner,
                &content,
                image.as_ref().map(ImageAttachment::data_url),
                timestamp,
            )
        })
        .await??;

        debug!("{} sent a message to {}", self.viewer, self.partner);
        Ok(SendOutcome::Sent)
    }

    /// Re-fetch on a fixed interval and publish each snapshot.
    ///
    /// The loop ends once every receiver has been dropped. Failed fetches are
    /// logged and retried on the next tick.
    pub fn spawn_poller(&self, interval: Duration) -> (watch::Receiver<Option<Snapshot>>, JoinHandle<()>) {
        let (tx, rx) = watch::channel(None);
        let session = self.clone();

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // A slow fetch pushes the next tick back instead of bursting.
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            info!("Polling conversation {} <-> {} every {:?}", session.viewer, session.partner, interval);

            loop {
                tokio::select! {
                    _ = ticker.tick() => {}
                    _ = tx.closed() => break,
                }

                match session.refresh().await {
                    Ok(snapshot) => {
                        if tx.send(Some(snapshot)).is_err() {
                            break;
                        }
                    }
                    Err(e) => warn!("Conversation poll failed: {}", e),
                }
            }

            debug!("Stopped polling conversation with {}", session.partner);
        });

        (rx, handle)
    }
}
