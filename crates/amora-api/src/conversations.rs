use std::collections::HashMap;

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::{DateTime, Utc};
use tracing::warn;

use amora_core::conversation::{
    ConversationSummary, TimelineEntry, derive_mutual_matches, sort_summaries,
};
use amora_core::session::{ChatSession, SendOutcome};
use amora_types::api::{
    ConversationResponse, ConversationSummaryResponse, SendMessageRequest, SendMessageResponse,
    TimelineMessageResponse,
};
use amora_types::models::UserId;

use crate::error::ApiError;
use crate::middleware::Principal;
use crate::state::{AppState, blocking};

const NANOS_PER_SEC: i64 = 1_000_000_000;

fn sent_at(timestamp: i64) -> DateTime<Utc> {
    let secs = timestamp.div_euclid(NANOS_PER_SEC);
    let nanos = timestamp.rem_euclid(NANOS_PER_SEC) as u32;
    DateTime::from_timestamp(secs, nanos).unwrap_or_else(|| {
        warn!("Message timestamp {} out of range", timestamp);
        DateTime::default()
    })
}

fn to_response(entry: TimelineEntry) -> TimelineMessageResponse {
    TimelineMessageResponse {
        direction: entry.direction,
        sent_at: sent_at(entry.message.timestamp),
        sender: entry.message.sender,
        content: entry.message.content,
        image: entry.message.image,
        timestamp: entry.message.timestamp,
        read: entry.message.read,
    }
}

/// Conversation list: one row per liked user, most recent activity first.
pub async fn list_conversations(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> Result<impl IntoResponse, ApiError> {
    let viewer = principal.require()?;

    let (summaries, names) = blocking(move || {
        let decisions = state.backend.get_user_matches(&viewer)?;
        let mut summaries = Vec::new();
        let mut names: HashMap<UserId, String> = HashMap::new();

        for partner in derive_mutual_matches(&decisions) {
            let conversation = state.backend.get_conversation(&viewer, &partner)?;
            if let Some(profile) = state.backend.get_user_profile(&partner)? {
                names.insert(partner.clone(), profile.display_name);
            }
            summaries.push(ConversationSummary::from_conversation(partner, &conversation));
        }

        sort_summaries(&mut summaries);
        Ok((summaries, names))
    })
    .await?;

    let body: Vec<ConversationSummaryResponse> = summaries
        .into_iter()
        .map(|s| ConversationSummaryResponse {
            display_name: names.get(&s.partner).cloned(),
            partner: s.partner,
            last_message: s.last_message.map(to_response),
            unread_count: s.unread_count,
        })
        .collect();

    Ok(Json(body))
}

/// Merged timeline with one partner. Opening the conversation clears its
/// unread state.
pub async fn get_conversation(
    State(state): State<AppState>,
    Path(partner): Path<String>,
    Extension(principal): Extension<Principal>,
) -> Result<impl IntoResponse, ApiError> {
    let viewer = principal.require()?;
    let partner = UserId::from(partner);

    let session = ChatSession::new(state.backend.clone(), viewer, partner.clone());
    let snapshot = session.refresh().await?;

    Ok(Json(ConversationResponse {
        partner,
        messages: snapshot.timeline.into_iter().map(to_response).collect(),
        unread_count: snapshot.unread_count,
        marked_read: snapshot.marked_read,
    }))
}

pub async fn send_message(
    State(state): State<AppState>,
    Path(partner): Path<String>,
    Extension(principal): Extension<Principal>,
    Json(req): Json<SendMessageRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let viewer = principal.require()?;
    let partner = UserId::from(partner);
    if viewer == partner {
        return Err(ApiError::BadRequest("cannot message yourself".into()));
    }

    let session = ChatSession::new(state.backend.clone(), viewer, partner);
    let outcome = session.send(&req.content, req.image.as_deref()).await?;

    let status = match outcome {
        SendOutcome::Sent => StatusCode::CREATED,
        SendOutcome::Skipped => StatusCode::OK,
    };
    Ok((status, Json(SendMessageResponse { sent: outcome == SendOutcome::Sent })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nanosecond_timestamps_convert() {
        let at = sent_at(1_700_000_000_123_456_789);
        assert_eq!(at.timestamp(), 1_700_000_000);
        assert_eq!(at.timestamp_subsec_nanos(), 123_456_789);
        assert_eq!(sent_at(0), DateTime::<Utc>::UNIX_EPOCH);
    }
}
